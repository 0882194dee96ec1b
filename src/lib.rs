//! Organization tree queries and copy-on-write edits.
//!
//! The [`domain`] layer holds the employee tree and all pure operations on it;
//! [`application`] loads org documents and wraps the domain in use cases;
//! [`cli`] is the `orgtree` command line surface.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    add_employee, department_spend, find_employee, find_employee_with, find_highest_paid_employee,
    find_highest_spend_department, find_lowest_paid_employee, find_lowest_spend_department,
    get_department_employee_count, get_departments, has_unique_names, remove_employee,
    replace_employee, DomainError, Employee, SearchStrategy,
};
