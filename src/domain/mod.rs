//! Domain layer: the org tree and its operations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod arena;
pub mod edit;
pub mod entities;
pub mod error;
pub mod search;

pub use aggregate::{
    department_spend, find_highest_paid_employee, find_highest_spend_department,
    find_lowest_paid_employee, find_lowest_spend_department, first_duplicate_name,
    get_department_employee_count, get_departments, has_unique_names,
};
pub use arena::{EmployeeData, OrgArena, OrgNode};
pub use edit::{add_employee, remove_employee, replace_employee};
pub use entities::{Employee, EmployeeIter};
pub use error::{DomainError, DomainResult};
pub use search::{find_employee, find_employee_with, SearchStrategy};
