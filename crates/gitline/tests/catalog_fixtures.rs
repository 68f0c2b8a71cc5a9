//! Catalog fixture tests: every named diagram builds, renders in every
//! format on both axes, and keeps the shape its workflow describes.

use gitline::catalog;
use gitline::prelude::*;
use gitline::{DrawCommand, Primitive, RecordingCanvas, build_named, render, render_named, scene};

// ── Helpers ─────────────────────────────────────────────────────────────

fn config(axis: Axis) -> LayoutConfig {
    LayoutConfig {
        axis,
        ..LayoutConfig::default()
    }
}

fn count(scene: &Scene, kind: &str) -> usize {
    scene.of_kind(kind).count()
}

fn dashed_curves(scene: &Scene) -> usize {
    scene
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Curve { dashed: true, .. }))
        .count()
}

// ═════════════════════════════════════════════════════════════════════════
// Every entry
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn every_builder_renders_well_formed_svg() {
    for name in catalog::names() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let svg = render_named(name, &config(axis))
                .unwrap_or_else(|err| panic!("{name} ({axis}) failed: {err}"));
            assert!(svg.starts_with("<svg xmlns="), "{name}: bad prologue");
            assert!(svg.ends_with("</svg>"), "{name}: unterminated");
            assert_eq!(svg.matches("<svg").count(), 1, "{name}: nested svg");
            assert_eq!(
                svg.matches("<text").count(),
                svg.matches("</text>").count(),
                "{name}: unbalanced text"
            );
        }
    }
}

#[test]
fn every_builder_renders_json_and_commands() {
    for name in catalog::names() {
        let graph = build_named(name).unwrap();
        for format in [OutputFormat::Json, OutputFormat::Commands] {
            let text = render(&graph, &LayoutConfig::default(), format).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text)
                .unwrap_or_else(|err| panic!("{name} {format}: invalid JSON: {err}"));
            match format {
                OutputFormat::Json => assert!(value["primitives"].is_array()),
                _ => assert!(value.is_array()),
            }
        }
    }
}

#[test]
fn every_builder_has_one_legend_entry_per_branch() {
    for name in catalog::names() {
        let graph = build_named(name).unwrap();
        let scene = scene(&graph, &LayoutConfig::default());
        assert_eq!(count(&scene, "legend"), graph.branches().len(), "{name}");
    }
}

#[test]
fn unknown_name_is_not_found() {
    let err = render_named("missing", &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownGraph(ref name) if name == "missing"));
    assert!(build_named("Test").is_err());
}

// ═════════════════════════════════════════════════════════════════════════
// Individual workflows
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn hotfix_fans_out_dashed_and_is_crossed_out() {
    let graph = build_named("submitting-a-hotfix").unwrap();
    let scene = scene(&graph, &LayoutConfig::default());
    assert_eq!(count(&scene, "curve"), 3);
    assert_eq!(dashed_curves(&scene), 3);
    assert_eq!(count(&scene, "cross"), 1);
    // Three merge markers; the pre-existing branches carry none of their own.
    assert_eq!(count(&scene, "commit_marker"), 3);
}

#[test]
fn test_graph_branches_feature_off_staging() {
    let graph = build_named("test").unwrap();
    let scene = scene(&graph, &LayoutConfig::default());
    // BRANCH plus three commits.
    assert_eq!(count(&scene, "commit_marker"), 4);
    assert_eq!(count(&scene, "curve"), 1);
    assert_eq!(dashed_curves(&scene), 0);
}

#[test]
fn local_squashing_marks_only_pr_merges_dashed() {
    let graph = build_named("local-squashing").unwrap();
    let scene = scene(&graph, &LayoutConfig::default());
    assert_eq!(dashed_curves(&scene), 2);
    // feature, to-dev, to-staging branch off; seven merges.
    assert_eq!(count(&scene, "curve"), 10);
    assert_eq!(count(&scene, "legend"), 6);
}

#[test]
fn vertical_history_lists_messages() {
    let graph = build_named("local-squashing-history").unwrap();
    let scene = scene(&graph, &config(Axis::Vertical));
    let texts: Vec<&str> = scene
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    // The feature tip shares its row with the branch message.
    assert!(texts.contains(&"[FEATURE] branch into feature"));
    assert!(texts.contains(&"revert feature"));
    assert!(texts.iter().any(|t| t.starts_with("[STAGING]")));
    assert_eq!(count(&scene, "legend"), 0);
}

#[test]
fn canvas_replay_starts_with_background() {
    let graph = build_named("submitting-to-foh").unwrap();
    let scene = scene(&graph, &LayoutConfig::default());
    let canvas = RecordingCanvas::record(&scene);
    assert_eq!(
        canvas.commands.first(),
        Some(&DrawCommand::SetFillStyle {
            color: Color::WHITE
        })
    );
}
