//! Org document service
//!
//! Loads org trees from JSON documents and runs queries and edits on them.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    self, find_employee_with, DomainError, Employee, OrgArena, SearchStrategy,
};
use crate::infrastructure::traits::FileSystem;

/// Field-based lookup used by the `find` command.
#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeQuery {
    Name(String),
    Title(String),
    Department(String),
    Salary(f64),
}

impl EmployeeQuery {
    pub fn matches(&self, employee: &Employee) -> bool {
        match self {
            EmployeeQuery::Name(name) => employee.name == *name,
            EmployeeQuery::Title(title) => employee.title == *title,
            EmployeeQuery::Department(department) => employee.department == *department,
            EmployeeQuery::Salary(salary) => employee.salary == *salary,
        }
    }
}

impl fmt::Display for EmployeeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeQuery::Name(name) => write!(f, "name = {}", name),
            EmployeeQuery::Title(title) => write!(f, "title = {}", title),
            EmployeeQuery::Department(department) => write!(f, "department = {}", department),
            EmployeeQuery::Salary(salary) => write!(f, "salary = {}", salary),
        }
    }
}

/// Summary of an org tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgReport {
    pub root: String,
    pub headcount: usize,
    pub depth: usize,
    pub departments: Vec<(String, usize, f64)>,
    pub highest_paid: String,
    pub lowest_paid: String,
    pub highest_spend_department: String,
    pub lowest_spend_department: String,
}

/// Service for loading, querying and editing org trees.
pub struct OrgService {
    fs: Arc<dyn FileSystem>,
    strategy: SearchStrategy,
}

impl OrgService {
    /// Create a new org service.
    pub fn new(fs: Arc<dyn FileSystem>, strategy: SearchStrategy) -> Self {
        Self { fs, strategy }
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Load an org tree from a JSON document.
    ///
    /// Rejects negative salaries; duplicate names are accepted here so they can
    /// be reported by `validate`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Employee> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DocumentNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InvalidDocument {
                origin: path.display().to_string(),
                message: "not a regular file".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read org document", path)?;
        let root = Self::parse_employee(&content, &path.display().to_string())?;
        debug!("load: {} employees", root.headcount());
        Ok(root)
    }

    /// Load an org tree and reject it when a name occurs twice.
    pub fn load_validated(&self, path: &Path) -> ApplicationResult<Employee> {
        let root = self.load(path)?;
        Self::ensure_unique_names(&root, &path.display().to_string())?;
        Ok(root)
    }

    /// Parse a JSON employee record (with optional subordinates).
    ///
    /// `origin` names the source in error messages.
    pub fn parse_employee(json: &str, origin: &str) -> ApplicationResult<Employee> {
        let employee: Employee =
            serde_json::from_str(json).map_err(|source| ApplicationError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        Self::ensure_valid_salaries(&employee, origin)?;
        Ok(employee)
    }

    /// Salaries must be finite and non-negative.
    pub fn ensure_valid_salaries(root: &Employee, origin: &str) -> ApplicationResult<()> {
        for employee in root.iter() {
            let message = if !employee.salary.is_finite() {
                format!("salary of {} is not a finite number", employee.name)
            } else if employee.salary < 0.0 {
                format!("negative salary for {}: {}", employee.name, employee.salary)
            } else {
                continue;
            };
            return Err(ApplicationError::InvalidDocument {
                origin: origin.to_string(),
                message,
            });
        }
        Ok(())
    }

    /// Resolve an employee argument: inline JSON, or `@path` to a JSON file.
    pub fn resolve_employee(&self, arg: &str) -> ApplicationResult<Employee> {
        match arg.strip_prefix('@') {
            Some(path) => self.load(Path::new(path)),
            None => Self::parse_employee(arg, "argument"),
        }
    }

    pub fn ensure_unique_names(root: &Employee, origin: &str) -> ApplicationResult<()> {
        match domain::first_duplicate_name(root) {
            Some(name) => Err(ApplicationError::DuplicateNames {
                origin: origin.to_string(),
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn find<'a>(&self, root: &'a Employee, query: &EmployeeQuery) -> Option<&'a Employee> {
        debug!("find: {} using {}", query, self.strategy);
        find_employee_with(root, self.strategy, |e| query.matches(e))
    }

    #[instrument(level = "debug", skip_all, fields(root = %root.name))]
    pub fn report(&self, root: &Employee) -> OrgReport {
        let arena = OrgArena::from_employee(root);
        let departments = domain::department_spend(root)
            .into_iter()
            .map(|(department, spend)| {
                let count = domain::get_department_employee_count(root, &department);
                (department, count, spend)
            })
            .collect();

        OrgReport {
            root: root.name.clone(),
            headcount: root.headcount(),
            depth: arena.depth(),
            departments,
            highest_paid: domain::find_highest_paid_employee(root).name.clone(),
            lowest_paid: domain::find_lowest_paid_employee(root).name.clone(),
            highest_spend_department: domain::find_highest_spend_department(root),
            lowest_spend_department: domain::find_lowest_spend_department(root),
        }
    }

    pub fn add(
        &self,
        root: &Employee,
        manager: Option<&str>,
        new_employee: Employee,
    ) -> ApplicationResult<Employee> {
        Ok(domain::add_employee(root, manager, new_employee)?)
    }

    pub fn remove(&self, root: &Employee, name: &str) -> ApplicationResult<Employee> {
        Ok(domain::remove_employee(root, name)?)
    }

    pub fn replace(
        &self,
        root: &Employee,
        name: &str,
        replacement: Employee,
    ) -> ApplicationResult<Employee> {
        Ok(domain::replace_employee(root, name, replacement)?)
    }

    /// Names from the root down to `name`.
    pub fn chain_of_command(&self, root: &Employee, name: &str) -> ApplicationResult<Vec<String>> {
        let arena = OrgArena::from_employee(root);
        arena
            .chain_of_command(name)
            .map(|chain| chain.into_iter().map(str::to_string).collect())
            .ok_or_else(|| DomainError::EmployeeNotFound(name.to_string()).into())
    }
}
