//! The organization chart engine.
//!
//! A chart is a tree rooted at a company department. Employees are hired
//! under a manager (an employee or a department) and fired with their
//! direct reports promoted to the fired employee's boss.

use std::collections::HashMap;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena, TreeIterator, TreeNode};
use crate::domain::entities::{Department, Employee, EmployeeId, NodeKind, ROOT_SENTINEL};
use crate::domain::error::DomainError;

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, DomainError>;

/// Indentation unit repeated once per level in the rendered chart.
pub const INDENT: &str = "  |--";

/// Outcome of a successful hire.
#[derive(Debug, Clone, PartialEq)]
pub struct Hired {
    pub node: NodeId,
    pub manager: NodeId,
    /// Department name or employee name of the manager
    pub manager_name: String,
}

/// Outcome of a successful fire.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired {
    pub id: EmployeeId,
    pub boss: NodeId,
    pub boss_name: String,
    /// Number of direct reports moved up to the boss
    pub promoted: usize,
}

#[derive(Debug)]
pub struct OrgChart {
    tree: TreeArena,
    root: NodeId,
    /// Employee id to node; ids are unique within a chart
    by_id: HashMap<EmployeeId, NodeId>,
}

impl OrgChart {
    /// Create a chart holding only the root department.
    pub fn new(company_name: impl Into<String>) -> Self {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(Department::new(company_name).into(), None);
        Self {
            tree,
            root,
            by_id: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn company_name(&self) -> &str {
        self.display_name(self.root).unwrap_or_default()
    }

    pub fn node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.tree.get_node(idx)
    }

    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.node(idx).and_then(|node| node.parent)
    }

    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.node(idx).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of nodes, root included.
    pub fn size(&self) -> usize {
        self.tree.len()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Department name or employee name of a node.
    pub fn display_name(&self, idx: NodeId) -> Option<&str> {
        self.node(idx).map(|node| node.kind.display_name())
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.find_node(id)
            .and_then(|idx| self.node(idx))
            .and_then(|node| node.kind.as_employee())
    }

    /// Pre-order traversal with depth, children in insertion order.
    pub fn iter(&self) -> TreeIterator<'_> {
        self.tree.iter()
    }

    /// Node of the employee with `id`. Departments never match.
    pub fn find_node(&self, id: EmployeeId) -> Option<NodeId> {
        self.by_id.get(&id).copied()
    }

    /// Breadth-first search for the first department called `name`, root included.
    #[instrument(level = "trace", skip(self))]
    pub fn find_department(&self, name: &str) -> Option<NodeId> {
        self.tree
            .iter_breadth_first()
            .find(|(_, node)| match &node.kind {
                NodeKind::Department(dept) => dept.name == name,
                NodeKind::Employee(_) => false,
            })
            .map(|(idx, _)| idx)
    }

    /// Employee lookup with the root fallback for [`ROOT_SENTINEL`].
    pub fn resolve_manager(&self, manager_id: EmployeeId) -> Option<NodeId> {
        self.find_node(manager_id)
            .or_else(|| (manager_id == ROOT_SENTINEL).then_some(self.root))
    }

    /// Hire `employee` under the employee `manager_id` (or the root, see [`ROOT_SENTINEL`]).
    pub fn hire(&mut self, manager_id: EmployeeId, employee: Employee) -> ChartResult<Hired> {
        let manager = self
            .resolve_manager(manager_id)
            .ok_or(DomainError::ManagerNotFound(manager_id))?;
        self.hire_under(manager, employee)
    }

    /// Hire `employee` as the last child of an already resolved node.
    pub fn hire_under(&mut self, manager: NodeId, employee: Employee) -> ChartResult<Hired> {
        if !self.tree.contains(manager) {
            return Err(DomainError::StaleNode);
        }
        let id = employee.id;
        if self.by_id.contains_key(&id) {
            return Err(DomainError::DuplicateEmployeeId(id));
        }
        debug!("hire: id={} under {}", id, manager);
        let node = self.tree.insert_node(employee.into(), Some(manager));
        self.by_id.insert(id, node);
        let manager_name = self.display_name(manager).unwrap_or_default().to_string();
        Ok(Hired {
            node,
            manager,
            manager_name,
        })
    }

    /// Append a department as the last child of `parent`.
    pub fn add_department(&mut self, parent: NodeId, name: impl Into<String>) -> ChartResult<NodeId> {
        if !self.tree.contains(parent) {
            return Err(DomainError::StaleNode);
        }
        let dept = Department::new(name);
        debug!("add_department: {} under {}", dept.name, parent);
        Ok(self.tree.insert_node(dept.into(), Some(parent)))
    }

    /// Remove an employee, promoting their direct reports to their boss.
    ///
    /// Promoted children are appended after the boss's existing children in
    /// their original order; their own subtrees move with them.
    pub fn fire(&mut self, id: EmployeeId) -> ChartResult<Fired> {
        let target = self
            .resolve_manager(id)
            .ok_or(DomainError::EmployeeNotFound(id))?;
        let boss = self.parent(target).ok_or(DomainError::CannotRemoveRoot)?;
        if !self.tree.contains(boss) {
            return Err(DomainError::StaleNode);
        }
        let removed = self.tree.remove_node(target).ok_or(DomainError::StaleNode)?;
        if let Some(emp) = removed.kind.as_employee() {
            self.by_id.remove(&emp.id);
        }

        for &child in &removed.children {
            if let Some(child_node) = self.tree.get_node_mut(child) {
                child_node.parent = Some(boss);
            }
        }
        if let Some(boss_node) = self.tree.get_node_mut(boss) {
            boss_node.children.extend(removed.children.iter().copied());
            // Identity removal: equal payloads in other nodes are untouched
            boss_node.children.retain(|&c| c != target);
        }

        let fired_id = removed.kind.as_employee().map_or(id, |emp| emp.id);
        debug!(
            "fire: id={} promoted {} to {}",
            fired_id,
            removed.children.len(),
            boss
        );
        Ok(Fired {
            id: fired_id,
            boss,
            boss_name: self.display_name(boss).unwrap_or_default().to_string(),
            promoted: removed.children.len(),
        })
    }

    /// Sum of salaries in the subtree rooted at `start`, `start` included.
    ///
    /// Departments contribute nothing; `None` or a removed node sums to 0.
    pub fn calculate_budget(&self, start: Option<NodeId>) -> f64 {
        match start {
            Some(start) if self.tree.contains(start) => self
                .tree
                .iter_from(start)
                .map(|(_, _, node)| node.kind.salary())
                .sum(),
            _ => 0.0,
        }
    }

    pub fn total_budget(&self) -> f64 {
        self.calculate_budget(Some(self.root))
    }

    /// Deepest node that is an ancestor of both employees, each inclusive.
    ///
    /// The query is symmetric and an employee paired with itself yields its own node.
    #[instrument(level = "debug", skip(self))]
    pub fn find_lowest_common_boss(&self, id1: EmployeeId, id2: EmployeeId) -> ChartResult<NodeId> {
        let first = self.find_node(id1).ok_or(DomainError::EmployeeNotFound(id1))?;
        let second = self.find_node(id2).ok_or(DomainError::EmployeeNotFound(id2))?;

        let first_path = self.tree.ancestors(first);
        self.tree
            .ancestors(second)
            .into_iter()
            .find(|idx| first_path.contains(idx))
            .ok_or(DomainError::StaleNode)
    }

    /// Render the chart depth-first, one line per node.
    ///
    /// ```text
    /// [DEPT] HQ
    ///   |--Ann (Dev) - ID: 1
    ///   |--  |--Bob (QA) - ID: 2
    /// ```
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (_, depth, node) in self.iter() {
            out.push_str(&INDENT.repeat(depth));
            out.push_str(&node.kind.to_string());
            out.push('\n');
        }
        out
    }

    /// Same hierarchy as a termtree, for compact display.
    ///
    /// Built bottom-up without recursion. Only the construction is
    /// iterative: printing very deep charts should go through [`Self::display`].
    pub fn to_tree(&self) -> Tree<String> {
        let order: Vec<NodeId> = self.iter().map(|(idx, _, _)| idx).collect();
        let mut built: HashMap<NodeId, Tree<String>> = HashMap::with_capacity(order.len());
        // Reverse pre-order reaches every child before its parent
        for &idx in order.iter().rev() {
            let leaves: Vec<_> = self
                .children(idx)
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            let label = self
                .node(idx)
                .map(|node| node.kind.to_string())
                .unwrap_or_default();
            built.insert(idx, Tree::new(label).with_leaves(leaves));
        }
        built
            .remove(&self.root)
            .unwrap_or_else(|| Tree::new(String::new()))
    }
}
