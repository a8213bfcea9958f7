use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::NodeKind;

/// Stable handle to a node in the chart arena.
///
/// Handles of removed nodes never resolve again, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "{}v{}", slot, generation)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Department or employee payload
    pub kind: NodeKind,
    /// Handle of the parent node, None for the root
    pub parent: Option<NodeId>,
    /// Child handles in insertion order
    pub children: Vec<NodeId>,
}

/// Arena-based tree structure.
///
/// The arena owns every node; `children` is the only ownership path and
/// `parent` is a plain back reference.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Handle of the root node, None until the first insert
    root: Option<NodeId>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node as the last child of `parent`, or as root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            kind,
            parent,
            children: Vec::new(),
        };
        let node_idx = NodeId(self.arena.insert(node));

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx.0) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Drop a single node from storage. Callers rewire links first.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, idx: NodeId) -> Option<TreeNode> {
        self.arena.remove(idx.0)
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx.0)
    }

    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx.0)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx.0)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order, depth-first, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `start`.
    pub fn iter_from(&self, start: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, Some(start))
    }

    /// Breadth-first, level by level, children left to right.
    pub fn iter_breadth_first(&self) -> BreadthFirstIterator<'_> {
        BreadthFirstIterator::new(self)
    }

    /// Handles from `idx` up to the root, both inclusive.
    pub fn ancestors(&self, idx: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(idx);
        while let Some(node_idx) = current {
            match self.get_node(node_idx) {
                Some(node) => {
                    path.push(node_idx);
                    current = node.parent;
                }
                None => break,
            }
        }
        path
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, depth, _)| depth + 1).max().unwrap_or(0)
    }
}

/// Yields `(handle, depth, node)` in pre-order; the start node has depth 0.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<NodeId>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push((start, 0));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, depth, node));
            }
        }
        None
    }
}

pub struct BreadthFirstIterator<'a> {
    arena: &'a TreeArena,
    queue: VecDeque<NodeId>,
}

impl<'a> BreadthFirstIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = arena.root() {
            queue.push_back(root);
        }
        Self { arena, queue }
    }
}

impl<'a> Iterator for BreadthFirstIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.queue.pop_front() {
            if let Some(node) = self.arena.get_node(current_idx) {
                self.queue.extend(node.children.iter().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Department;

    fn dept(name: &str) -> NodeKind {
        NodeKind::Department(Department::new(name))
    }

    fn names<'a>(items: impl Iterator<Item = &'a TreeNode>) -> Vec<String> {
        items.map(|n| n.kind.display_name().to_string()).collect()
    }

    //      a
    //    b   c
    //   d     e
    fn sample() -> TreeArena {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(dept("a"), None);
        let b = tree.insert_node(dept("b"), Some(a));
        let c = tree.insert_node(dept("c"), Some(a));
        tree.insert_node(dept("d"), Some(b));
        tree.insert_node(dept("e"), Some(c));
        tree
    }

    #[test]
    fn given_tree_when_iterating_then_visits_preorder() {
        let tree = sample();
        let order = names(tree.iter().map(|(_, _, n)| n));
        assert_eq!(order, vec!["a", "b", "d", "c", "e"]);
        let depths: Vec<usize> = tree.iter().map(|(_, d, _)| d).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 2]);
    }

    #[test]
    fn given_tree_when_iterating_breadth_first_then_visits_level_order() {
        let tree = sample();
        let order = names(tree.iter_breadth_first().map(|(_, n)| n));
        assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn given_tree_when_collecting_ancestors_then_path_ends_at_root() {
        let tree = sample();
        let (e_idx, _, _) = tree.iter().last().unwrap();
        let path: Vec<String> = tree
            .ancestors(e_idx)
            .into_iter()
            .map(|idx| tree.get_node(idx).unwrap().kind.display_name().to_string())
            .collect();
        assert_eq!(path, vec!["e", "c", "a"]);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_removed_node_when_resolving_handle_then_returns_none() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(dept("root"), None);
        let child = tree.insert_node(dept("child"), Some(root));
        tree.get_node_mut(root).unwrap().children.clear();
        assert!(tree.remove_node(child).is_some());

        let reused = tree.insert_node(dept("other"), Some(root));
        assert!(tree.get_node(child).is_none());
        assert!(tree.contains(reused));
        assert_eq!(tree.len(), 2);
    }
}
