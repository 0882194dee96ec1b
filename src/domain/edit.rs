//! Copy-on-write structural edits.
//!
//! Each edit clones the input tree, mutates the clone and returns it only on
//! success. The caller's tree is never touched.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::{DomainError, DomainResult, Employee};

/// Adds `new_employee` below the manager named `manager_name`.
///
/// With no manager, `new_employee` becomes the new root and the previous tree
/// its only subordinate; subordinates `new_employee` already had are dropped.
/// Fails with `ManagerNotFound` when the manager does not exist and with
/// `DuplicateName` when a name of the added subtree is already taken.
#[instrument(level = "debug", skip_all, fields(root = %root.name, manager = ?manager_name, new = %new_employee.name))]
pub fn add_employee(
    root: &Employee,
    manager_name: Option<&str>,
    new_employee: Employee,
) -> DomainResult<Employee> {
    let Some(manager_name) = manager_name else {
        let mut new_root = new_employee;
        new_root.subordinates.clear();
        ensure_names_available(root, &new_root, None)?;
        debug!("promoting {} to root", new_root.name);
        new_root.subordinates = vec![root.clone()];
        return Ok(new_root);
    };

    ensure_names_available(root, &new_employee, None)?;

    let mut tree = root.clone();
    let manager = find_employee_mut(&mut tree, |e| e.name == manager_name)
        .ok_or_else(|| DomainError::ManagerNotFound(manager_name.to_string()))?;
    manager.subordinates.push(new_employee);
    Ok(tree)
}

/// Removes the employee `name`, moving its subordinates up to its manager.
///
/// The inherited subordinates keep their order and are appended after the
/// manager's remaining direct reports.
#[instrument(level = "debug", skip_all, fields(root = %root.name, %name))]
pub fn remove_employee(root: &Employee, name: &str) -> DomainResult<Employee> {
    if root.name == name {
        return Err(DomainError::RootRemovalForbidden(name.to_string()));
    }

    let mut tree = root.clone();
    let manager = find_manager_mut(&mut tree, name)?;
    let position = position_of(manager, name)?;
    let removed = manager.subordinates.remove(position);
    debug!(
        "moving {} subordinates of {} to {}",
        removed.subordinates.len(),
        removed.name,
        manager.name
    );
    manager.subordinates.extend(removed.subordinates);
    Ok(tree)
}

/// Puts `replacement` in place of the employee `name`.
///
/// The replacement takes the same position and inherits the replaced
/// employee's subordinates; its own subordinates are discarded. Replacing the
/// root yields a new root with the old root's subordinates.
#[instrument(level = "debug", skip_all, fields(root = %root.name, %name, replacement = %replacement.name))]
pub fn replace_employee(
    root: &Employee,
    name: &str,
    replacement: Employee,
) -> DomainResult<Employee> {
    let mut replacement = replacement;
    replacement.subordinates.clear();
    ensure_names_available(root, &replacement, Some(name))?;

    if root.name == name {
        replacement.subordinates = root.subordinates.clone();
        return Ok(replacement);
    }

    let mut tree = root.clone();
    let manager = find_manager_mut(&mut tree, name)?;
    let position = position_of(manager, name)?;
    let replaced = &mut manager.subordinates[position];
    replacement.subordinates = std::mem::take(&mut replaced.subordinates);
    *replaced = replacement;
    Ok(tree)
}

/// Mutable pre-order search, used to edit the working copy in place.
pub(crate) fn find_employee_mut<P>(root: &mut Employee, predicate: P) -> Option<&mut Employee>
where
    P: Fn(&Employee) -> bool,
{
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if predicate(current) {
            return Some(current);
        }
        stack.extend(current.subordinates.iter_mut().rev());
    }
    None
}

/// The manager is the node whose direct subordinates contain `name`.
fn find_manager_mut<'a>(tree: &'a mut Employee, name: &str) -> DomainResult<&'a mut Employee> {
    find_employee_mut(tree, |e| e.subordinates.iter().any(|s| s.name == name))
        .ok_or_else(|| DomainError::ManagerNotFound(name.to_string()))
}

fn position_of(manager: &Employee, name: &str) -> DomainResult<usize> {
    manager
        .subordinates
        .iter()
        .position(|s| s.name == name)
        .ok_or_else(|| DomainError::EmployeeNotFound(name.to_string()))
}

/// Rejects `incoming` when one of its names already exists in `tree`.
///
/// `leaving` names an employee about to be replaced, whose name becomes free.
fn ensure_names_available(
    tree: &Employee,
    incoming: &Employee,
    leaving: Option<&str>,
) -> DomainResult<()> {
    let taken: HashSet<&str> = tree
        .iter()
        .map(|e| e.name.as_str())
        .filter(|name| Some(*name) != leaving)
        .collect();
    let mut incoming_names = HashSet::new();
    for employee in incoming.iter() {
        let name = employee.name.as_str();
        if taken.contains(name) || !incoming_names.insert(name) {
            return Err(DomainError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}
