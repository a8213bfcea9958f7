//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::EmployeeId;

/// Domain errors represent violations of the chart's structural rules.
/// Every failed engine operation leaves the chart unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    #[error("manager not found: {0}")]
    ManagerNotFound(EmployeeId),

    #[error("cannot remove the root department")]
    CannotRemoveRoot,

    #[error("employee id already in use: {0}")]
    DuplicateEmployeeId(EmployeeId),

    #[error("invalid salary for employee {id}: {salary}")]
    InvalidSalary { id: EmployeeId, salary: f64 },

    #[error("node no longer exists in the chart")]
    StaleNode,
}

impl DomainError {
    /// True for lookup failures (missing manager or employee).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::EmployeeNotFound(_) | DomainError::ManagerNotFound(_)
        )
    }
}
