use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::Employee;

/// Employee record without its subordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeData {
    pub name: String,
    pub title: String,
    pub department: String,
    pub salary: f64,
}

impl From<&Employee> for EmployeeData {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            title: employee.title.clone(),
            department: employee.department.clone(),
            salary: employee.salary,
        }
    }
}

impl fmt::Display for EmployeeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.title)
    }
}

/// Node in the arena-based org index.
#[derive(Debug)]
pub struct OrgNode {
    pub data: EmployeeData,
    /// Index of the manager, None for the root
    pub parent: Option<Index>,
    /// Indices of direct subordinates, in order
    pub children: Vec<Index>,
}

/// Arena-backed, read-only index over an org tree.
///
/// Unlike [`Employee`], every node knows its manager, which makes upward
/// queries (manager, chain of command) O(depth) after an O(1) name lookup.
#[derive(Debug)]
pub struct OrgArena {
    arena: Arena<OrgNode>,
    root: Index,
    by_name: HashMap<String, Index>,
}

impl OrgArena {
    /// Flattens `root` into an arena, keeping subordinate order.
    ///
    /// With duplicate names, the name index points at the first occurrence in pre-order.
    #[instrument(level = "debug", skip_all, fields(root = %root.name))]
    pub fn from_employee(root: &Employee) -> Self {
        let mut arena = Arena::new();
        let mut by_name = HashMap::new();
        let root_idx = arena.insert(OrgNode {
            data: EmployeeData::from(root),
            parent: None,
            children: Vec::new(),
        });
        by_name.insert(root.name.clone(), root_idx);

        let mut stack = vec![(root, root_idx)];
        while let Some((employee, idx)) = stack.pop() {
            let mut children = Vec::with_capacity(employee.subordinates.len());
            for subordinate in &employee.subordinates {
                let child_idx = arena.insert(OrgNode {
                    data: EmployeeData::from(subordinate),
                    parent: Some(idx),
                    children: Vec::new(),
                });
                by_name.entry(subordinate.name.clone()).or_insert(child_idx);
                children.push(child_idx);
                stack.push((subordinate, child_idx));
            }
            if let Some(node) = arena.get_mut(idx) {
                node.children = children;
            }
        }

        Self {
            arena,
            root: root_idx,
            by_name,
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get_node(&self, idx: Index) -> Option<&OrgNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, name: &str) -> Option<Index> {
        self.by_name.get(name).copied()
    }

    pub fn manager_of(&self, name: &str) -> Option<&OrgNode> {
        let node = self.get_node(self.find(name)?)?;
        self.get_node(node.parent?)
    }

    /// Names from the root down to `name`, both included.
    #[instrument(level = "debug", skip(self))]
    pub fn chain_of_command(&self, name: &str) -> Option<Vec<&str>> {
        let mut chain = Vec::new();
        let mut current = Some(self.find(name)?);
        while let Some(idx) = current {
            let node = self.get_node(idx)?;
            chain.push(node.data.name.as_str());
            current = node.parent;
        }
        chain.reverse();
        Some(chain)
    }

    /// Number of employees in the subtree rooted at `name`, including them.
    pub fn subtree_size(&self, name: &str) -> Option<usize> {
        let start = self.find(name)?;
        let mut count = 0;
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                count += 1;
                stack.extend(node.children.iter().copied());
            }
        }
        Some(count)
    }

    /// Number of levels; a lone root has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        max_depth
    }

    pub fn iter(&self) -> OrgArenaIter<'_> {
        OrgArenaIter {
            arena: self,
            stack: vec![self.root],
        }
    }
}

/// Pre-order iterator over the arena.
pub struct OrgArenaIter<'a> {
    arena: &'a OrgArena,
    stack: Vec<Index>,
}

impl<'a> Iterator for OrgArenaIter<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> Employee {
        Employee::new("ceo", "CEO", "Exec", 10.0).with_subordinates(vec![
            Employee::new("cto", "CTO", "IT", 8.0).with_subordinates(vec![
                Employee::new("lead", "Lead", "IT", 6.0)
                    .with_subordinates(vec![Employee::new("dev", "Developer", "IT", 5.0)]),
            ]),
            Employee::new("cfo", "CFO", "Finance", 7.0),
        ])
    }

    #[test]
    fn test_arena_mirrors_tree() {
        let tree = org();
        let arena = OrgArena::from_employee(&tree);
        assert_eq!(arena.len(), 5);
        assert!(!arena.is_empty());

        let from_arena: Vec<&str> = arena.iter().map(|(_, n)| n.data.name.as_str()).collect();
        let from_tree: Vec<&str> = tree.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(from_arena, from_tree);
    }

    #[test]
    fn test_manager_of() {
        let arena = OrgArena::from_employee(&org());
        assert_eq!(arena.manager_of("dev").map(|n| n.data.name.as_str()), Some("lead"));
        assert_eq!(arena.manager_of("cfo").map(|n| n.data.name.as_str()), Some("ceo"));
        assert!(arena.manager_of("ceo").is_none());
        assert!(arena.manager_of("ghost").is_none());
    }

    #[test]
    fn test_chain_of_command() {
        let arena = OrgArena::from_employee(&org());
        assert_eq!(
            arena.chain_of_command("dev"),
            Some(vec!["ceo", "cto", "lead", "dev"])
        );
        assert_eq!(arena.chain_of_command("ceo"), Some(vec!["ceo"]));
        assert_eq!(arena.chain_of_command("ghost"), None);
    }

    #[test]
    fn test_depth_and_subtree_size() {
        let arena = OrgArena::from_employee(&org());
        assert_eq!(arena.depth(), 4);
        assert_eq!(arena.subtree_size("cto"), Some(3));
        assert_eq!(arena.subtree_size("cfo"), Some(1));
        assert_eq!(arena.subtree_size("ceo"), Some(5));
        assert_eq!(arena.subtree_size("ghost"), None);
        assert_eq!(arena.get_node(arena.root()).map(|n| n.data.to_string()), Some("ceo (CEO)".into()));
    }
}
