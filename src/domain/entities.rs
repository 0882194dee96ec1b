//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node of the organization tree.
///
/// The field names match the JSON document shape exactly. Each employee owns
/// its subordinates; there is no sharing between nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique across the whole tree
    pub name: String,
    pub title: String,
    pub department: String,
    /// Non-negative
    pub salary: f64,
    /// Direct reports, in order
    #[serde(default)]
    pub subordinates: Vec<Employee>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        department: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            department: department.into(),
            salary,
            subordinates: Vec::new(),
        }
    }

    /// Builder-style setter for the direct reports.
    pub fn with_subordinates(mut self, subordinates: Vec<Employee>) -> Self {
        self.subordinates = subordinates;
        self
    }

    /// Pre-order traversal: node first, then subordinates left-to-right.
    pub fn iter(&self) -> EmployeeIter<'_> {
        EmployeeIter::new(self)
    }

    /// Number of employees in this subtree, including `self`.
    pub fn headcount(&self) -> usize {
        self.iter().count()
    }

    pub fn is_leaf(&self) -> bool {
        self.subordinates.is_empty()
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.name, self.title, self.department, self.salary
        )
    }
}

impl<'a> IntoIterator for &'a Employee {
    type Item = &'a Employee;
    type IntoIter = EmployeeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator driven by an explicit stack.
pub struct EmployeeIter<'a> {
    stack: Vec<&'a Employee>,
}

impl<'a> EmployeeIter<'a> {
    fn new(root: &'a Employee) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for EmployeeIter<'a> {
    type Item = &'a Employee;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.subordinates.iter().rev());
        Some(current)
    }
}
