//! Predicate search over the org tree.
//!
//! Every strategy returns the first pre-order match: a node is tested before
//! its subordinates, and subordinates are visited left-to-right, depth-first.
//! They differ only in what drives the traversal:
//!
//! - `Recursive`: the native call stack
//! - `Stack`: an explicit LIFO of pending nodes
//! - `Worklist`: an explicit LIFO of pending sibling lists, consumed head-first
//! - `Continuation`: continuation-passing, the result is handed to a callback
//! - `Trampoline`: each step yields a final value or a thunk to resume with
//!
//! All but `Recursive` keep native stack usage constant in the size of the
//! tree; `Continuation` does so by driving its callbacks through [`Bounce`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::Employee;

/// Borrowed predicate used by all search strategies.
pub type Predicate<'p> = &'p dyn Fn(&Employee) -> bool;

/// Traversal mechanism used by [`find_employee_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    Recursive,
    #[default]
    Stack,
    Worklist,
    Continuation,
    Trampoline,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 5] = [
        SearchStrategy::Recursive,
        SearchStrategy::Stack,
        SearchStrategy::Worklist,
        SearchStrategy::Continuation,
        SearchStrategy::Trampoline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Recursive => "recursive",
            SearchStrategy::Stack => "stack",
            SearchStrategy::Worklist => "worklist",
            SearchStrategy::Continuation => "continuation",
            SearchStrategy::Trampoline => "trampoline",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown search strategy '{}', expected one of: {}",
                    s,
                    SearchStrategy::ALL.map(|st| st.as_str()).join(", ")
                )
            })
    }
}

/// Finds the first employee (pre-order) matching the predicate.
pub fn find_employee<P>(root: &Employee, predicate: P) -> Option<&Employee>
where
    P: Fn(&Employee) -> bool,
{
    find_employee_with(root, SearchStrategy::default(), predicate)
}

/// Finds the first employee (pre-order) matching the predicate using the given strategy.
#[instrument(level = "debug", skip_all, fields(root = %root.name, %strategy))]
pub fn find_employee_with<P>(
    root: &Employee,
    strategy: SearchStrategy,
    predicate: P,
) -> Option<&Employee>
where
    P: Fn(&Employee) -> bool,
{
    let predicate: Predicate<'_> = &predicate;
    match strategy {
        SearchStrategy::Recursive => find_recursive(root, predicate),
        SearchStrategy::Stack => find_stack(root, predicate),
        SearchStrategy::Worklist => find_worklist(root, predicate),
        SearchStrategy::Continuation => find_with_continuation(root, predicate, |found| found),
        SearchStrategy::Trampoline => find_trampoline(root, predicate),
    }
}

pub fn find_recursive<'a>(employee: &'a Employee, predicate: Predicate<'_>) -> Option<&'a Employee> {
    if predicate(employee) {
        return Some(employee);
    }
    employee
        .subordinates
        .iter()
        .find_map(|subordinate| find_recursive(subordinate, predicate))
}

pub fn find_stack<'a>(root: &'a Employee, predicate: Predicate<'_>) -> Option<&'a Employee> {
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if predicate(current) {
            return Some(current);
        }
        // Push children in reverse order for left-to-right traversal
        stack.extend(current.subordinates.iter().rev());
    }
    None
}

/// Depth-first search over sibling lists.
///
/// The head of the top list is tested; the rest of that list is put back and
/// the head's subordinates become the next list to work on.
pub fn find_worklist<'a>(root: &'a Employee, predicate: Predicate<'_>) -> Option<&'a Employee> {
    let mut lists: Vec<&'a [Employee]> = vec![std::slice::from_ref(root)];
    while let Some(list) = lists.pop() {
        let Some((head, rest)) = list.split_first() else {
            continue;
        };
        if predicate(head) {
            return Some(head);
        }
        lists.push(rest);
        lists.push(&head.subordinates);
    }
    None
}

/// Continuation receiving the search outcome; it returns the next step
/// instead of running it.
type Continuation<'p, 'a, R> = Box<dyn FnOnce(Option<&'a Employee>) -> Bounce<'p, R> + 'p>;

/// Continuation-passing search: `k` is invoked exactly once with the match or `None`.
pub fn find_with_continuation<'a: 'p, 'p, R: 'p, K>(
    root: &'a Employee,
    predicate: Predicate<'p>,
    k: K,
) -> R
where
    K: FnOnce(Option<&'a Employee>) -> R + 'p,
{
    search_cps(
        std::slice::from_ref(root),
        predicate,
        Box::new(move |found| Bounce::Done(k(found))),
    )
    .run()
}

// Every call to a continuation or to `search_cps` is deferred behind a
// `Bounce::Resume`, so nothing nests on the native stack.
fn search_cps<'a: 'p, 'p, R: 'p>(
    nodes: &'a [Employee],
    predicate: Predicate<'p>,
    k: Continuation<'p, 'a, R>,
) -> Bounce<'p, R> {
    match nodes.split_first() {
        None => Bounce::Resume(Box::new(move || k(None))),
        Some((head, _)) if predicate(head) => Bounce::Resume(Box::new(move || k(Some(head)))),
        Some((head, rest)) => Bounce::Resume(Box::new(move || {
            search_cps(
                &head.subordinates,
                predicate,
                // Only fall through to the siblings when the subtree had no match
                Box::new(move |found| match found {
                    Some(employee) => Bounce::Resume(Box::new(move || k(Some(employee)))),
                    None => search_cps(rest, predicate, k),
                }),
            )
        })),
    }
}

/// One step of a trampolined computation.
pub enum Bounce<'p, T> {
    Done(T),
    Resume(Box<dyn FnOnce() -> Bounce<'p, T> + 'p>),
}

impl<'p, T> Bounce<'p, T> {
    /// Drives thunks until a final value appears.
    pub fn run(self) -> T {
        let mut current = self;
        loop {
            match current {
                Bounce::Done(value) => return value,
                Bounce::Resume(thunk) => current = thunk(),
            }
        }
    }
}

pub fn find_trampoline<'a: 'p, 'p>(
    root: &'a Employee,
    predicate: Predicate<'p>,
) -> Option<&'a Employee> {
    trampoline_step(vec![root], predicate).run()
}

fn trampoline_step<'a: 'p, 'p>(
    mut pending: Vec<&'a Employee>,
    predicate: Predicate<'p>,
) -> Bounce<'p, Option<&'a Employee>> {
    match pending.pop() {
        None => Bounce::Done(None),
        Some(current) if predicate(current) => Bounce::Done(Some(current)),
        Some(current) => {
            pending.extend(current.subordinates.iter().rev());
            Bounce::Resume(Box::new(move || trampoline_step(pending, predicate)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    //        a
    //      / | \
    //     b  e  f
    //    / \     \
    //   c   d     g
    fn org() -> Employee {
        Employee::new("a", "Boss", "X", 50.0).with_subordinates(vec![
            Employee::new("b", "Lead", "Y", 30.0).with_subordinates(vec![
                Employee::new("c", "Dev", "Y", 20.0),
                Employee::new("d", "Dev", "Z", 20.0),
            ]),
            Employee::new("e", "Dev", "Z", 20.0),
            Employee::new("f", "Lead", "Y", 30.0)
                .with_subordinates(vec![Employee::new("g", "Dev", "Z", 10.0)]),
        ])
    }

    fn deep_chain(depth: usize) -> Employee {
        let mut node = Employee::new(format!("n{}", depth), "t", "d", 1.0);
        for i in (0..depth).rev() {
            node = Employee::new(format!("n{}", i), "t", "d", 1.0).with_subordinates(vec![node]);
        }
        node
    }

    #[rstest]
    #[case(SearchStrategy::Recursive)]
    #[case(SearchStrategy::Stack)]
    #[case(SearchStrategy::Worklist)]
    #[case(SearchStrategy::Continuation)]
    #[case(SearchStrategy::Trampoline)]
    fn test_first_preorder_match(#[case] strategy: SearchStrategy) {
        let org = org();
        // d, e and g are all in department Z; d comes first in pre-order
        let found = find_employee_with(&org, strategy, |e| e.department == "Z");
        assert_eq!(found.map(|e| e.name.as_str()), Some("d"));

        let found = find_employee_with(&org, strategy, |e| e.title == "Lead");
        assert_eq!(found.map(|e| e.name.as_str()), Some("b"));
    }

    #[rstest]
    #[case(SearchStrategy::Recursive)]
    #[case(SearchStrategy::Stack)]
    #[case(SearchStrategy::Worklist)]
    #[case(SearchStrategy::Continuation)]
    #[case(SearchStrategy::Trampoline)]
    fn test_root_and_no_match(#[case] strategy: SearchStrategy) {
        let org = org();
        let root = find_employee_with(&org, strategy, |_| true);
        assert_eq!(root.map(|e| e.name.as_str()), Some("a"));
        assert!(find_employee_with(&org, strategy, |e| e.department == "Nonsense").is_none());
    }

    #[rstest]
    #[case(SearchStrategy::Stack)]
    #[case(SearchStrategy::Worklist)]
    #[case(SearchStrategy::Continuation)]
    #[case(SearchStrategy::Trampoline)]
    fn test_deep_tree_does_not_grow_native_stack(#[case] strategy: SearchStrategy) {
        let chain = deep_chain(100_000);
        let found = find_employee_with(&chain, strategy, |e| e.name == "n100000");
        assert_eq!(found.map(|e| e.name.as_str()), Some("n100000"));
        // Dropping a deeply nested Vec tree recurses; leak it instead
        std::mem::forget(chain);
    }

    #[rstest]
    #[case(SearchStrategy::Recursive)]
    #[case(SearchStrategy::Stack)]
    #[case(SearchStrategy::Worklist)]
    #[case(SearchStrategy::Continuation)]
    #[case(SearchStrategy::Trampoline)]
    fn test_wide_tree_does_not_grow_native_stack(#[case] strategy: SearchStrategy) {
        let leaves = (0..200_000)
            .map(|i| Employee::new(format!("n{}", i), "t", "d", 1.0))
            .collect();
        let flat = Employee::new("root", "t", "d", 1.0).with_subordinates(leaves);

        assert!(find_employee_with(&flat, strategy, |e| e.department == "none").is_none());
        let last = find_employee_with(&flat, strategy, |e| e.name == "n199999");
        assert_eq!(last.map(|e| e.name.as_str()), Some("n199999"));
    }

    #[test]
    fn test_continuation_is_invoked_with_outcome() {
        let org = org();
        let predicate = |e: &Employee| e.name == "g";
        let salary = find_with_continuation(&org, &predicate, |found| found.map(|e| e.salary));
        assert_eq!(salary, Some(10.0));

        let missing = find_with_continuation(&org, &|_: &Employee| false, |found| found.is_none());
        assert!(missing);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Trampoline".parse::<SearchStrategy>(), Ok(SearchStrategy::Trampoline));
        assert_eq!(" stack ".parse::<SearchStrategy>(), Ok(SearchStrategy::Stack));
        assert!("bfs".parse::<SearchStrategy>().is_err());
        for strategy in SearchStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<SearchStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_default_strategy_is_stack() {
        assert_eq!(SearchStrategy::default(), SearchStrategy::Stack);
        let org = org();
        assert_eq!(find_employee(&org, |e| e.salary == 10.0).map(|e| e.name.as_str()), Some("g"));
    }
}
