//! Domain entities: core data structures

use std::fmt;

use crate::domain::error::DomainError;

/// Employee identifier, used as the lookup key inside a chart.
pub type EmployeeId = i64;

/// Manager id that resolves to the root department when no employee carries it.
pub const ROOT_SENTINEL: EmployeeId = 0;

/// Organizational unit. Holds no employee data.
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub name: String,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A person in the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub title: String,
    /// Finite and non-negative
    pub salary: f64,
}

impl Employee {
    /// Create an employee, rejecting negative or non-finite salaries.
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        title: impl Into<String>,
        salary: f64,
    ) -> Result<Self, DomainError> {
        if !salary.is_finite() || salary < 0.0 {
            return Err(DomainError::InvalidSalary { id, salary });
        }
        Ok(Self {
            id,
            name: name.into(),
            title: title.into(),
            salary,
        })
    }
}

/// Payload of a chart node: either a department or an employee.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Department(Department),
    Employee(Employee),
}

impl NodeKind {
    /// Department name or employee name.
    pub fn display_name(&self) -> &str {
        match self {
            NodeKind::Department(dept) => &dept.name,
            NodeKind::Employee(emp) => &emp.name,
        }
    }

    pub fn as_employee(&self) -> Option<&Employee> {
        match self {
            NodeKind::Employee(emp) => Some(emp),
            NodeKind::Department(_) => None,
        }
    }

    /// Salary contributed by this node alone (0 for departments).
    pub fn salary(&self) -> f64 {
        self.as_employee().map_or(0.0, |emp| emp.salary)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Department(dept) => write!(f, "[DEPT] {}", dept.name),
            NodeKind::Employee(emp) => {
                write!(f, "{} ({}) - ID: {}", emp.name, emp.title, emp.id)
            }
        }
    }
}

impl From<Department> for NodeKind {
    fn from(dept: Department) -> Self {
        NodeKind::Department(dept)
    }
}

impl From<Employee> for NodeKind {
    fn from(emp: Employee) -> Self {
        NodeKind::Employee(emp)
    }
}

/// Expand shell variables and tilde in a string.
///
/// Falls back to the input unchanged when a variable is undefined.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
