//! Tree-wide aggregate queries: uniqueness, salary extremes and department totals.
//!
//! All reductions walk the tree in pre-order. Ties keep the first value seen.

use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::Employee;

/// True when no employee name occurs twice in the tree.
pub fn has_unique_names(root: &Employee) -> bool {
    first_duplicate_name(root).is_none()
}

/// Returns the first name (in pre-order) that was already seen earlier in the traversal.
#[instrument(level = "debug", skip_all, fields(root = %root.name))]
pub fn first_duplicate_name(root: &Employee) -> Option<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let duplicate = root
        .iter()
        .map(|e| e.name.as_str())
        .find(|name| !seen.insert(*name));
    if let Some(name) = duplicate {
        debug!("duplicate name: {}", name);
    }
    duplicate
}

/// Highest salary in the tree; only a strictly greater salary replaces the current pick.
pub fn find_highest_paid_employee(root: &Employee) -> &Employee {
    root.iter()
        .fold(root, |best, e| if e.salary > best.salary { e } else { best })
}

/// Lowest salary in the tree; only a strictly smaller salary replaces the current pick.
pub fn find_lowest_paid_employee(root: &Employee) -> &Employee {
    root.iter()
        .fold(root, |best, e| if e.salary < best.salary { e } else { best })
}

pub fn get_departments(root: &Employee) -> BTreeSet<String> {
    root.iter().map(|e| e.department.clone()).collect()
}

pub fn get_department_employee_count(root: &Employee, department: &str) -> usize {
    root.iter().filter(|e| e.department == department).count()
}

/// Salary totals per department, in the order departments are first seen (pre-order).
#[instrument(level = "debug", skip_all, fields(root = %root.name))]
pub fn department_spend(root: &Employee) -> Vec<(String, f64)> {
    let order: Vec<&str> = root.iter().map(|e| e.department.as_str()).unique().collect();
    let totals = root
        .iter()
        .map(|e| (e.department.as_str(), e.salary))
        .into_grouping_map()
        .sum();
    order
        .into_iter()
        .map(|department| {
            let total = totals.get(department).copied().unwrap_or_default();
            (department.to_string(), total)
        })
        .collect()
}

/// Department with the largest salary total.
///
/// Departments are compared in first-seen order; a later department only wins
/// when its total is strictly greater.
pub fn find_highest_spend_department(root: &Employee) -> String {
    pick_department(root, |candidate, best| candidate > best)
}

/// Department with the smallest salary total, same tie rule as the highest.
pub fn find_lowest_spend_department(root: &Employee) -> String {
    pick_department(root, |candidate, best| candidate < best)
}

fn pick_department(root: &Employee, replaces: impl Fn(f64, f64) -> bool) -> String {
    department_spend(root)
        .into_iter()
        .reduce(|best, candidate| {
            if replaces(candidate.1, best.1) {
                candidate
            } else {
                best
            }
        })
        .map(|(department, _)| department)
        // the root always contributes a department
        .unwrap_or_else(|| root.department.clone())
}
