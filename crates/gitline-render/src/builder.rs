#![forbid(unsafe_code)]

//! Positioned lanes → [`Scene`].
//!
//! Each lane is walked in slot order with two flags: `active` (START has
//! been seen) and `forked` (the branch exists: set by BRANCH, cleared by
//! DELETE). Nothing is drawn before START or while a branch is not forked.
//! The segment from a slot to the next is drawn once, by the first event on
//! that slot, and never from a slot that carries a DELETE.
//!
//! Paint order is legend, then every merge curve, then each lane's lifeline
//! and markers, then the message column, so curves run underneath markers.

use gitline_core::{Axis, Color, EventKind, Point};
use gitline_layout::{GraphLayout, Lane};
use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

use crate::primitive::{Path, PathSegment, Primitive, Scene, TextAlign};

/// Halo under ripples and crosses, relative to the line width.
const MARK_HALO: f64 = 2.25;
/// Halo around commit markers, relative to the line width.
const COMMIT_HALO: f64 = 1.5;
/// Zigzag amplitude along the lifeline, in pixels.
const RIPPLE_AMPLITUDE: f64 = 2.0;
/// Zigzag stops across the lifeline, in commit radii.
const RIPPLE_STOPS: [f64; 6] = [-1.0, -0.6, -0.2, 0.2, 0.6, 1.0];

/// Build the drawable scene for a finished layout.
#[must_use]
pub fn build_scene(layout: &GraphLayout) -> Scene {
    let config = &layout.config;
    let _span = debug_span!("build_scene", lanes = layout.lanes.len()).entered();

    let mut scene = Scene::new(layout.size, config.background, config.font_family.clone());

    let legend_font = config.legend_font();
    for entry in &layout.legend {
        scene.push(Primitive::Legend {
            label: entry.label.clone(),
            bounds: entry.bounds,
            corner_radius: entry.corner_radius,
            color: entry.color,
            text_anchor: entry.text_anchor,
            font_size: legend_font.size,
        });
    }

    for lane in &layout.lanes {
        merge_curves(layout, lane, &mut scene);
    }
    for lane in &layout.lanes {
        lifeline(layout, lane, &mut scene);
    }

    for row in &layout.messages {
        scene.push(Primitive::Text {
            anchor: row.anchor,
            text: row.text.clone(),
            color: Color::BLACK,
            align: TextAlign::Left,
            font_size: config.font_size,
            bold: false,
        });
    }

    debug!(primitives = scene.primitives.len(), "scene built");
    scene
}

fn merge_curves(layout: &GraphLayout, lane: &Lane, scene: &mut Scene) {
    let mut active = false;
    let mut forked = false;
    for positioned in &lane.events {
        let event = &positioned.event;
        match &event.kind {
            EventKind::Start => {
                active = true;
                continue;
            }
            EventKind::Branch { .. } => forked = true,
            EventKind::Delete => forked = false,
            EventKind::Commit | EventKind::Merge { .. } | EventKind::End | EventKind::Empty => {}
        }
        if !(active && forked) {
            continue;
        }
        let Some(source) = event.kind.source() else {
            continue;
        };
        let Some(source_lane) = layout.lane(source) else {
            continue;
        };

        // Events on the START slot have no earlier slot to leave from, so
        // the curve crosses lanes without moving along time.
        let (from_slot, half_slot) = if positioned.slot > 0 {
            (positioned.slot - 1, layout.slot_step() / 2.0)
        } else {
            (positioned.slot, 0.0)
        };
        let from = layout.point(source_lane.index, from_slot);
        trace!(
            lane = %lane.key,
            source,
            slot = positioned.slot,
            dashed = event.is_dashed(),
            "merge curve"
        );
        scene.push(Primitive::Curve {
            path: curve_path(layout, from, positioned.center, half_slot),
            color: lane.color,
            width: layout.config.line_width,
            dashed: event.is_dashed(),
        });
    }
}

/// Leave `from` along time, cross lanes `half_slot` later, enter `to` along
/// time. Both bends are quadratic so the curve meets each lifeline tangent.
fn curve_path(layout: &GraphLayout, from: Point, to: Point, half_slot: f64) -> Path {
    let axis = layout.axis();
    let (from_p, from_s) = (axis.primary(from), axis.secondary(from));
    let (to_p, to_s) = (axis.primary(to), axis.secondary(to));
    let half_branch = lane_direction(from_s, to_s) * layout.config.branch_spacing / 2.0;

    let mut path = Path::new();
    path.push(PathSegment::MoveTo { to: from });
    path.push(PathSegment::QuadTo {
        ctrl: axis.point(from_p + half_slot, from_s),
        to: axis.point(from_p + half_slot, from_s + half_branch),
    });
    path.push(PathSegment::LineTo {
        to: axis.point(to_p - half_slot, to_s - half_branch),
    });
    path.push(PathSegment::QuadTo {
        ctrl: axis.point(to_p - half_slot, to_s),
        to,
    });
    path
}

fn lane_direction(from: f64, to: f64) -> f64 {
    if to > from {
        1.0
    } else if to < from {
        -1.0
    } else {
        0.0
    }
}

fn lifeline(layout: &GraphLayout, lane: &Lane, scene: &mut Scene) {
    let config = &layout.config;
    let mut active = false;
    let mut forked = false;
    // Slot whose segment to the next slot is already drawn.
    let mut drawn: Option<i64> = None;

    for (i, positioned) in lane.events.iter().enumerate() {
        let event = &positioned.event;
        let here = positioned.center;
        let next = layout.point(lane.index, positioned.slot + 1);
        let stops_here = lane.events[i + 1..]
            .iter()
            .take_while(|following| following.slot == positioned.slot)
            .any(|following| following.event.kind == EventKind::Delete);

        match &event.kind {
            EventKind::Start => {
                active = true;
                if forked {
                    if !stops_here {
                        scene.push(line(layout, lane, here, next));
                        drawn = Some(positioned.slot);
                    }
                    scene.push(ripple(layout, lane, here));
                }
                continue;
            }
            EventKind::Branch { .. } => forked = true,
            EventKind::Delete => {
                if active && forked {
                    scene.push(Primitive::Cross {
                        center: here,
                        half_size: config.commit_radius / 2.0,
                        color: lane.color,
                        width: config.line_width,
                        halo: config.line_width * MARK_HALO,
                    });
                }
                forked = false;
                continue;
            }
            EventKind::Commit | EventKind::Merge { .. } | EventKind::End | EventKind::Empty => {}
        }
        if !(active && forked) {
            continue;
        }

        let terminal = event.kind == EventKind::End;
        if !terminal && !stops_here && drawn != Some(positioned.slot) {
            scene.push(line(layout, lane, here, next));
            drawn = Some(positioned.slot);
        }
        if matches!(
            event.kind,
            EventKind::Branch { .. } | EventKind::Commit | EventKind::Merge { .. }
        ) {
            scene.push(Primitive::CommitMarker {
                center: here,
                radius: config.commit_radius,
                color: lane.color,
                halo: config.line_width * COMMIT_HALO,
            });
        }
    }

    if forked && let Some(last) = lane.events.last() {
        scene.push(ripple(layout, lane, last.center));
    }
}

fn line(layout: &GraphLayout, lane: &Lane, from: Point, to: Point) -> Primitive {
    Primitive::Line {
        from,
        to,
        color: lane.color,
        width: layout.config.line_width,
    }
}

fn ripple(layout: &GraphLayout, lane: &Lane, center: Point) -> Primitive {
    let axis: Axis = layout.axis();
    let config = &layout.config;
    let (p, s) = (axis.primary(center), axis.secondary(center));
    let points: SmallVec<[Point; 6]> = RIPPLE_STOPS
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let wiggle = if i % 2 == 0 {
                -RIPPLE_AMPLITUDE
            } else {
                RIPPLE_AMPLITUDE
            };
            axis.point(p + wiggle, s + stop * config.commit_radius)
        })
        .collect();
    Primitive::Ripple {
        points,
        color: lane.color,
        width: config.line_width,
        halo: config.line_width * MARK_HALO,
    }
}
