//! Application services

pub mod org;

pub use org::{EmployeeQuery, OrgReport, OrgService};
