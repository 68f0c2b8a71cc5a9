//! Property-based invariant tests for the event log and normalizer.
//!
//! 1. Rebasing on start preserves the relative order of earlier events.
//! 2. In-place events never advance the counter and never keep a message.
//! 3. END sits at max + 1 on every branch that was not deleted.
//! 4. Duplicate branch names fail in every log state.
//! 5. Unknown merge sources and branch origins always fail.
//! 6. Normalization is idempotent.
//! 7. Normalized groups are sorted and START sits at position 0.

use gitline_core::{
    BranchOptions, CommitOptions, EventKind, Graph, GraphError, LogState, normalize,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Commit { branch: usize, in_place: bool },
    Merge { target: usize, source: usize, in_place: bool, dashed: bool },
    Delete { branch: usize, in_place: bool },
    Create { from: usize, index: Option<usize> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8, any::<bool>()).prop_map(|(branch, in_place)| Op::Commit { branch, in_place }),
        (0usize..8, 0usize..8, any::<bool>(), any::<bool>()).prop_map(
            |(target, source, in_place, dashed)| Op::Merge {
                target,
                source,
                in_place,
                dashed
            }
        ),
        (0usize..8, any::<bool>()).prop_map(|(branch, in_place)| Op::Delete { branch, in_place }),
        (0usize..8, proptest::option::of(0usize..8))
            .prop_map(|(from, index)| Op::Create { from, index }),
    ]
}

fn options(in_place: bool, dashed: bool, message: &str) -> CommitOptions {
    let options = CommitOptions::from(message).in_place(in_place);
    if dashed { options.dashed() } else { options }
}

/// Build a started graph from `pre` pre-existing branches and a list of ops.
/// Branch indices are taken modulo the current registry size.
fn build(pre: usize, ops: &[Op]) -> Graph {
    let mut graph = Graph::new();
    for i in 0..pre {
        graph
            .create_branch(format!("b{i}"), BranchOptions::default(), CommitOptions::default())
            .unwrap();
    }
    graph.start().unwrap();

    let mut created = pre;
    for op in ops {
        let names: Vec<String> = graph.branches().iter().map(|b| b.name.clone()).collect();
        let pick = |i: usize| names[i % names.len()].clone();
        match op {
            Op::Commit { branch, in_place } => {
                graph
                    .commit(&pick(*branch), options(*in_place, false, "c"))
                    .unwrap();
            }
            Op::Merge {
                target,
                source,
                in_place,
                dashed,
            } => {
                graph
                    .merge(&pick(*target), &pick(*source), options(*in_place, *dashed, "m"))
                    .unwrap();
            }
            Op::Delete { branch, in_place } => {
                graph
                    .delete_branch(&pick(*branch), options(*in_place, false, "d"))
                    .unwrap();
            }
            Op::Create { from, index } => {
                let mut branch_options = BranchOptions::default().from(pick(*from));
                if let Some(index) = index {
                    branch_options = branch_options.index(*index);
                }
                graph
                    .create_branch(format!("n{created}"), branch_options, "new")
                    .unwrap();
                created += 1;
            }
        }
    }
    graph
}

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..5, proptest::collection::vec(op_strategy(), 0..24))
        .prop_map(|(pre, ops)| build(pre, &ops))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Rebasing preserves order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rebase_preserves_pre_start_order(
        pre in 1usize..6,
        in_place in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let mut graph = Graph::new();
        for i in 0..pre {
            graph
                .create_branch(
                    format!("b{i}"),
                    BranchOptions::default(),
                    CommitOptions::default().in_place(in_place[i]),
                )
                .unwrap();
        }
        let before: Vec<i64> = graph.events().iter().map(|e| e.position).collect();
        let counter = graph.position();
        graph.start().unwrap();

        let after: Vec<i64> = graph.events()[..pre].iter().map(|e| e.position).collect();
        for (b, a) in before.iter().zip(&after) {
            prop_assert_eq!(*a, *b - counter);
            prop_assert!(*a < 0 || (*a == 0 && counter == 0));
        }
        for pair in after.windows(2) {
            prop_assert!(pair[0] <= pair[1], "order inverted: {:?}", after);
        }
        prop_assert_eq!(graph.events()[pre].position, 0);
        prop_assert_eq!(graph.position(), 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. In-place events
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn in_place_never_advances(pre in 1usize..5, ops in proptest::collection::vec(op_strategy(), 1..24)) {
        let mut graph = build(pre, &[]);
        for op in &ops {
            let before = graph.position();
            let len = graph.events().len();
            let names: Vec<String> = graph.branches().iter().map(|b| b.name.clone()).collect();
            let pick = |i: usize| names[i % names.len()].clone();
            let in_place = match op {
                Op::Commit { branch, in_place } => {
                    graph.commit(&pick(*branch), options(*in_place, false, "c")).unwrap();
                    *in_place
                }
                Op::Merge { target, source, in_place, dashed } => {
                    graph
                        .merge(&pick(*target), &pick(*source), options(*in_place, *dashed, "m"))
                        .unwrap();
                    *in_place
                }
                Op::Delete { branch, in_place } => {
                    graph.delete_branch(&pick(*branch), options(*in_place, false, "d")).unwrap();
                    *in_place
                }
                Op::Create { .. } => continue,
            };
            let event = &graph.events()[len];
            if in_place {
                prop_assert_eq!(graph.position(), before);
                prop_assert_eq!(event.position, before - 1);
                prop_assert!(event.message.is_none());
                prop_assert!(event.is_in_place());
            } else {
                prop_assert_eq!(graph.position(), before + 1);
                prop_assert_eq!(event.position, before);
                prop_assert!(event.message.is_some());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. END markers
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn end_marker_at_max_plus_one(graph in graph_strategy()) {
        let normalized = normalize(&graph);
        let global_max = normalized
            .groups
            .iter()
            .flat_map(|g| g.events.iter())
            .filter(|e| e.kind != EventKind::End)
            .map(|e| e.position)
            .max()
            .unwrap_or(0);
        prop_assert_eq!(normalized.max_position, global_max);

        for group in &normalized.groups {
            let ends: Vec<_> = group.events.iter().filter(|e| e.kind == EventKind::End).collect();
            if group.is_deleted() {
                prop_assert!(ends.is_empty(), "deleted branch {} has END", group.key);
            } else {
                prop_assert_eq!(ends.len(), 1);
                prop_assert_eq!(ends[0].position, global_max + 1);
                prop_assert_eq!(group.events.last().map(|e| &e.kind), Some(&EventKind::End));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Duplicate names
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn duplicate_names_always_fail(graph in graph_strategy(), pick in 0usize..16, end in any::<bool>()) {
        let mut graph = graph;
        if end {
            graph.end().unwrap();
            prop_assert_eq!(graph.state(), LogState::Ended);
        }
        let name = graph.branches()[pick % graph.branches().len()].name.clone();
        let err = graph
            .create_branch(name.clone(), BranchOptions::default(), CommitOptions::default())
            .unwrap_err();
        prop_assert_eq!(err, GraphError::DuplicateBranch { name });
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Unknown references
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_references_always_fail(graph in graph_strategy(), ghost in "[a-z]{1,6}") {
        let mut graph = graph;
        let ghost = format!("ghost-{ghost}");
        let target = graph.branches()[0].name.clone();
        let events = graph.events().len();

        let err = graph.merge(&target, &ghost, CommitOptions::default()).unwrap_err();
        prop_assert_eq!(err, GraphError::UnknownBranch { name: ghost.clone() });

        let err = graph
            .create_branch("fresh", BranchOptions::default().from(ghost.clone()), CommitOptions::default())
            .unwrap_err();
        prop_assert_eq!(err, GraphError::UnknownBranch { name: ghost });

        prop_assert_eq!(graph.events().len(), events, "failed calls must not record events");
        prop_assert!(graph.branch("fresh").is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalize_is_idempotent(graph in graph_strategy()) {
        prop_assert_eq!(normalize(&graph), normalize(&graph));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Group shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn groups_are_sorted_with_single_start(graph in graph_strategy()) {
        let normalized = normalize(&graph);
        prop_assert_eq!(normalized.groups.len(), graph.branches().len());
        for (lane, group) in normalized.groups.iter().enumerate() {
            prop_assert_eq!(group.index, lane);
            prop_assert_eq!(&group.key, &graph.branches()[lane].name);
            for pair in group.events.windows(2) {
                prop_assert!(pair[0].position <= pair[1].position);
            }
            let starts: Vec<_> = group.events.iter().filter(|e| e.kind == EventKind::Start).collect();
            prop_assert_eq!(starts.len(), 1);
            prop_assert_eq!(starts[0].position, 0);
            prop_assert!(group.events.iter().all(|e| e.kind != EventKind::Empty || !e.is_in_place()));
        }
    }
}
