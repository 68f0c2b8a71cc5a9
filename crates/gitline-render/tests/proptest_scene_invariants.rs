//! Property-based invariant tests for the primitive builder and exporters.
//!
//! 1. Without deletions, every merge and every post-start branch yields one
//!    curve, and a curve is dashed exactly when its event was.
//! 2. Markers and crosses sit on event centers inside the scene.
//! 3. SVG output is well-formed: every `<` opens a tag and every `&` opens
//!    an entity, whatever the branch names and messages contain.
//! 4. Canvas replay strokes once per line, curve and marker and twice per
//!    ripple and cross.
//! 5. A live lifeline has exactly one line per slot step, in-place events
//!    included, from its first forked slot after START to its DELETE or END.

use gitline_core::{Axis, BranchOptions, CommitOptions, EventKind, Graph, Point, normalize};
use gitline_layout::{GraphLayout, Lane, LayoutConfig, UnicodeMetrics, layout};
use gitline_render::{Primitive, RecordingCanvas, Scene, SvgExporter, build_scene};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Commit(usize, String),
    Merge(usize, usize, bool, bool),
    Delete(usize),
    Create(usize),
}

fn op_strategy(deletes: bool) -> BoxedStrategy<Op> {
    let base = prop_oneof![
        (0usize..8, "[a-z <>&\"]{0,10}").prop_map(|(b, m)| Op::Commit(b, m)),
        (0usize..8, 0usize..8, any::<bool>(), any::<bool>())
            .prop_map(|(t, s, dashed, in_place)| Op::Merge(t, s, dashed, in_place)),
        (0usize..8).prop_map(Op::Create),
    ];
    if deletes {
        prop_oneof![4 => base, 1 => (0usize..8).prop_map(Op::Delete)].boxed()
    } else {
        base.boxed()
    }
}

fn build(names: &[String], ops: &[Op]) -> Graph {
    let mut graph = Graph::new();
    for name in names {
        graph
            .create_branch(name.clone(), BranchOptions::default(), CommitOptions::default())
            .unwrap();
    }
    graph.start().unwrap();
    for (step, op) in ops.iter().enumerate() {
        let registered: Vec<String> = graph.branches().iter().map(|b| b.name.clone()).collect();
        let pick = |i: usize| registered[i % registered.len()].clone();
        match op {
            Op::Commit(b, message) => {
                graph.commit(&pick(*b), message.as_str()).unwrap();
            }
            Op::Merge(t, s, dashed, in_place) => {
                let mut options = CommitOptions::default().in_place(*in_place);
                if *dashed {
                    options = options.dashed();
                }
                graph.merge(&pick(*t), &pick(*s), options).unwrap();
            }
            Op::Delete(b) => {
                graph.delete_branch(&pick(*b), CommitOptions::default()).unwrap();
            }
            Op::Create(from) => {
                graph
                    .create_branch(
                        format!("new&{step}"),
                        BranchOptions::default().from(pick(*from)),
                        "<branch>",
                    )
                    .unwrap();
            }
        }
    }
    graph
}

fn graph_strategy(deletes: bool) -> impl Strategy<Value = Graph> {
    (
        proptest::collection::btree_set("[a-z<>&\"]{1,8}", 1..5),
        proptest::collection::vec(op_strategy(deletes), 0..20),
    )
        .prop_map(|(names, ops)| build(&names.into_iter().collect::<Vec<_>>(), &ops))
}

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

fn render(graph: &Graph, axis: Axis) -> (GraphLayout, Scene) {
    let config = LayoutConfig {
        axis,
        ..LayoutConfig::default()
    };
    let positioned = layout(&normalize(graph), &config, &UnicodeMetrics::default());
    let scene = build_scene(&positioned);
    (positioned, scene)
}

fn event_centers(layout: &GraphLayout, kind: fn(&EventKind) -> bool) -> Vec<Point> {
    layout
        .lanes
        .iter()
        .flat_map(|lane| lane.events.iter())
        .filter(|positioned| kind(&positioned.event.kind))
        .map(|positioned| positioned.center)
        .collect()
}

/// First and last slot a lane's lifeline must cover.
fn live_span(lane: &Lane) -> Option<(i64, i64)> {
    let mut active = false;
    let mut forked = false;
    let mut first = None;
    for positioned in &lane.events {
        match &positioned.event.kind {
            EventKind::Start => active = true,
            EventKind::Branch { .. } => forked = true,
            EventKind::Delete | EventKind::End if first.is_some() => {
                return first.map(|slot| (slot, positioned.slot));
            }
            EventKind::Delete => forked = false,
            _ => {}
        }
        if active && forked && first.is_none() {
            first = Some(positioned.slot);
        }
    }
    first.zip(lane.events.last().map(|positioned| positioned.slot))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Curves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn curves_match_sourced_events(graph in graph_strategy(false), axis in axis_strategy()) {
        let (_, scene) = render(&graph, axis);
        let mut expected: Vec<bool> = Vec::new();
        let mut actual: Vec<bool> = Vec::new();
        for event in graph.events() {
            if event.kind.source().is_some() {
                expected.push(event.is_dashed());
            }
        }
        for primitive in &scene.primitives {
            if let Primitive::Curve { dashed, .. } = primitive {
                actual.push(*dashed);
            }
        }
        prop_assert_eq!(actual.len(), expected.len());
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Markers
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn markers_sit_on_event_centers(graph in graph_strategy(true), axis in axis_strategy()) {
        let (layout, scene) = render(&graph, axis);
        let bounds = layout.bounds();
        let marked = event_centers(&layout, |kind| {
            matches!(kind, EventKind::Branch { .. } | EventKind::Commit | EventKind::Merge { .. })
        });
        let deleted = event_centers(&layout, |kind| *kind == EventKind::Delete);

        for primitive in &scene.primitives {
            match primitive {
                Primitive::CommitMarker { center, .. } => {
                    prop_assert!(bounds.contains(*center));
                    prop_assert!(marked.contains(center));
                }
                Primitive::Cross { center, .. } => {
                    prop_assert!(deleted.contains(center));
                }
                _ => {}
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. SVG escaping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn svg_is_well_formed(graph in graph_strategy(true), axis in axis_strategy()) {
        let (_, scene) = render(&graph, axis);
        let svg = SvgExporter::default().export(&scene);
        prop_assert!(svg.starts_with("<svg "));
        prop_assert!(svg.ends_with("</svg>"));

        for (i, _) in svg.match_indices('<') {
            let next = svg[i + 1..].chars().next();
            prop_assert!(
                matches!(next, Some(c) if c.is_ascii_lowercase() || c == '/'),
                "stray '<' at {}", i
            );
        }
        for (i, _) in svg.match_indices('&') {
            let rest = &svg[i..];
            prop_assert!(
                ["&lt;", "&gt;", "&amp;", "&quot;"].iter().any(|e| rest.starts_with(e)),
                "stray '&' at {}", i
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Canvas replay
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn canvas_strokes_match_primitives(graph in graph_strategy(true), axis in axis_strategy()) {
        let (_, scene) = render(&graph, axis);
        let expected: usize = scene
            .primitives
            .iter()
            .map(|primitive| match primitive {
                Primitive::Line { .. } | Primitive::Curve { .. } | Primitive::CommitMarker { .. } => 1,
                Primitive::Ripple { .. } | Primitive::Cross { .. } => 2,
                Primitive::Legend { .. } | Primitive::Text { .. } => 0,
            })
            .sum();
        prop_assert_eq!(RecordingCanvas::record(&scene).stroke_count(), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Lifeline continuity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn live_lifelines_have_no_gaps(graph in graph_strategy(true), axis in axis_strategy()) {
        let (layout, scene) = render(&graph, axis);
        let lines: Vec<(Point, Point)> = scene
            .primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();

        for lane in &layout.lanes {
            let Some((first, last)) = live_span(lane) else {
                continue;
            };
            for slot in first..last {
                let step = (layout.point(lane.index, slot), layout.point(lane.index, slot + 1));
                let count = lines.iter().filter(|line| **line == step).count();
                prop_assert_eq!(count, 1, "lane {} slot {}", &lane.key, slot);
            }
        }
    }
}
