use termtree::Tree;
use tracing::instrument;

use crate::domain::{Employee, OrgArena};
use generational_arena::Index;

/// Conversion into a printable `termtree` tree.
pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for Employee {
    #[instrument(level = "trace", skip_all, fields(root = %self.name))]
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self
            .subordinates
            .iter()
            .map(|s| s.to_term_tree())
            .collect();

        Tree::new(self.to_string()).with_leaves(leaves)
    }
}

impl ToTermTree for OrgArena {
    fn to_term_tree(&self) -> Tree<String> {
        fn build_tree(arena: &OrgArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.data.to_string());
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let root_label = self
            .get_node(self.root())
            .map(|n| n.data.to_string())
            .unwrap_or_else(|| "Empty tree".to_string());
        let mut tree = Tree::new(root_label);
        build_tree(self, self.root(), &mut tree);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> Employee {
        Employee::new("ceo", "CEO", "Exec", 10.0).with_subordinates(vec![
            Employee::new("cto", "CTO", "IT", 8.0),
            Employee::new("cfo", "CFO", "Finance", 7.0),
        ])
    }

    #[test]
    fn test_employee_tree_rendering() {
        let rendered = org().to_term_tree().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ceo (CEO, Exec, 10)");
        assert!(lines[1].ends_with("cto (CTO, IT, 8)"));
        assert!(lines[2].ends_with("cfo (CFO, Finance, 7)"));
    }

    #[test]
    fn test_arena_tree_rendering() {
        let arena = OrgArena::from_employee(&org());
        let rendered = arena.to_term_tree().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ceo (CEO)");
        assert!(lines[1].ends_with("cto (CTO)"));
        assert!(lines[2].ends_with("cfo (CFO)"));
    }
}
