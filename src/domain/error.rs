//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the org tree invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("manager not found for: {0}")]
    ManagerNotFound(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("cannot remove root employee: {0}")]
    RootRemovalForbidden(String),

    #[error("duplicate employee name: {0}")]
    DuplicateName(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
