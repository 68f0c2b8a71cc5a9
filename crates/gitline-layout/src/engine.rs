#![forbid(unsafe_code)]

//! Normalized branch groups → diagram coordinates.
//!
//! One engine serves both orientations. Every formula is written in terms of
//! a *primary* offset (time) and a *secondary* offset (branch lane) and the
//! [`Axis`] decides which screen coordinate each one becomes.
//!
//! # Coordinates
//! - Lane `i` sits at `padding + branch_spacing * (i + 0.5)` across time.
//! - Position `p` sits at `padding + label_space + commit_spacing * p` along
//!   time, measured from the left edge (horizontal) or upward from the bottom
//!   edge (vertical). Pre-start positions collapse onto the START slot.
//! - `label_space` is the legend plus one padding horizontally and half a
//!   commit slot vertically.

use std::collections::BTreeMap;

use gitline_core::{Axis, BranchGroup, Color, Event, NormalizedGraph, Point, Rect, Size};
use tracing::{debug, debug_span};

use crate::config::LayoutConfig;
use crate::metrics::TextMetrics;

/// Slots reserved past the last position: the END marker plus half a slot of
/// breathing room for its ripple.
pub const BOUNDARY_SLOTS: f64 = 1.5;

/// An event with its slot and screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEvent {
    pub event: Event,
    /// Position clamped to the START slot.
    pub slot: i64,
    pub center: Point,
}

/// One branch lifeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub key: String,
    pub index: usize,
    pub color: Color,
    /// Screen coordinate of the lifeline across the time axis.
    pub offset: f64,
    pub events: Vec<PositionedEvent>,
}

/// A branch name badge in the horizontal legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    /// Upper-cased branch name.
    pub label: String,
    pub color: Color,
    pub bounds: Rect,
    pub corner_radius: f64,
    /// Right-aligned, vertically centered text anchor.
    pub text_anchor: Point,
}

/// One line of the vertical message column.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRow {
    pub slot: i64,
    /// Branches whose tip is this slot, in display order.
    pub labels: Vec<String>,
    pub message: Option<String>,
    /// `[LABEL] ` prefixes followed by the message.
    pub text: String,
    /// Left-aligned, vertically centered text anchor.
    pub anchor: Point,
}

/// Output of [`layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    pub config: LayoutConfig,
    pub size: Size,
    /// Width reserved for the legend; zero in vertical mode.
    pub legend_width: f64,
    pub lanes: Vec<Lane>,
    pub legend: Vec<LegendEntry>,
    pub messages: Vec<MessageRow>,
    pub max_position: i64,
    pub end_position: i64,
    /// Distance from the leading edge to slot 0 along the time axis.
    origin: f64,
}

impl GraphLayout {
    #[inline]
    pub fn axis(&self) -> Axis {
        self.config.axis
    }

    /// Screen coordinate of `slot` along the time axis.
    #[must_use]
    pub fn primary_at(&self, slot: i64) -> f64 {
        let lead = self.origin + self.config.commit_spacing * slot.max(0) as f64;
        match self.axis() {
            Axis::Horizontal => lead,
            Axis::Vertical => self.size.height - lead,
        }
    }

    /// Screen coordinate of lane `index` across the time axis.
    #[must_use]
    pub fn secondary_at(&self, index: usize) -> f64 {
        lane_offset(&self.config, index)
    }

    #[must_use]
    pub fn point(&self, lane: usize, slot: i64) -> Point {
        self.axis()
            .point(self.primary_at(slot), self.secondary_at(lane))
    }

    /// Signed screen distance of one commit slot in the direction of time.
    #[must_use]
    pub fn slot_step(&self) -> f64 {
        self.axis().forward() * self.config.commit_spacing
    }

    #[must_use]
    pub fn lane(&self, key: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.key == key)
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }
}

fn lane_offset(config: &LayoutConfig, index: usize) -> f64 {
    config.padding + config.branch_spacing * (index as f64 + 0.5)
}

/// Assign coordinates to every event of `graph`.
///
/// `metrics` is queried for the legend (horizontal) or the message column
/// (vertical), never both.
#[must_use]
pub fn layout(
    graph: &NormalizedGraph,
    config: &LayoutConfig,
    metrics: &dyn TextMetrics,
) -> GraphLayout {
    let axis = config.axis;
    let _span = debug_span!(
        "layout",
        axis = axis.as_str(),
        lanes = graph.groups.len(),
        max_position = graph.max_position
    )
    .entered();

    let legend_width = match axis {
        Axis::Horizontal => legend_width(graph, config, metrics),
        Axis::Vertical => 0.0,
    };
    let origin = config.padding
        + match axis {
            Axis::Horizontal => legend_width + config.padding,
            Axis::Vertical => config.commit_spacing / 2.0,
        };

    let rows = match axis {
        Axis::Horizontal => BTreeMap::new(),
        Axis::Vertical => message_rows(graph),
    };
    let message_font = config.message_font();
    let message_width = rows
        .values()
        .map(|(labels, message)| metrics.measure_text_width(&row_text(labels, message.as_deref()), &message_font))
        .fold(0.0_f64, f64::max);

    let lanes_extent = config.padding * 2.0 + config.branch_spacing * graph.groups.len() as f64;
    let secondary_extent = if rows.is_empty() {
        lanes_extent
    } else {
        lanes_extent + config.padding + message_width
    };
    let primary_extent = config.padding * 2.0
        + (origin - config.padding)
        + config.commit_spacing * (graph.max_position as f64 + BOUNDARY_SLOTS);

    let mut layout = GraphLayout {
        config: config.clone(),
        size: axis.size(primary_extent, secondary_extent),
        legend_width,
        lanes: Vec::with_capacity(graph.groups.len()),
        legend: Vec::new(),
        messages: Vec::with_capacity(rows.len()),
        max_position: graph.max_position,
        end_position: graph.end_position,
        origin,
    };

    layout.lanes = graph
        .groups
        .iter()
        .map(|group| position_lane(&layout, group))
        .collect();

    if axis == Axis::Horizontal {
        layout.legend = legend_entries(&layout, graph, metrics);
    }

    let column = lanes_extent;
    layout.messages = rows
        .into_iter()
        .map(|(slot, (labels, message))| {
            let text = row_text(&labels, message.as_deref());
            let anchor = Point::new(column, layout.primary_at(slot) - config.font_size / 8.0);
            MessageRow {
                slot,
                labels,
                message,
                text,
                anchor,
            }
        })
        .collect();

    debug!(
        width = layout.size.width,
        height = layout.size.height,
        legend_width,
        messages = layout.messages.len(),
        "layout extents"
    );
    layout
}

fn position_lane(layout: &GraphLayout, group: &BranchGroup) -> Lane {
    let events = group
        .events
        .iter()
        .map(|event| {
            let slot = event.position.max(0);
            PositionedEvent {
                event: event.clone(),
                slot,
                center: layout.point(group.index, slot),
            }
        })
        .collect();
    Lane {
        key: group.key.clone(),
        index: group.index,
        color: group.color,
        offset: layout.secondary_at(group.index),
        events,
    }
}

fn legend_width(graph: &NormalizedGraph, config: &LayoutConfig, metrics: &dyn TextMetrics) -> f64 {
    if let Some(width) = config.legend_width {
        return width;
    }
    if graph.groups.is_empty() {
        return 0.0;
    }
    let font = config.legend_font();
    let widest = graph
        .groups
        .iter()
        .map(|group| metrics.measure_text_width(&group.key.to_uppercase(), &font))
        .fold(0.0_f64, f64::max);
    widest + config.padding
}

fn legend_entries(
    layout: &GraphLayout,
    graph: &NormalizedGraph,
    metrics: &dyn TextMetrics,
) -> Vec<LegendEntry> {
    let config = &layout.config;
    let font = config.legend_font();
    let right = config.padding + layout.legend_width;
    let inset = config.padding / 2.0;
    let height = config.font_size + config.padding / 2.0;

    graph
        .groups
        .iter()
        .map(|group| {
            let label = group.key.to_uppercase();
            let width = metrics.measure_text_width(&label, &font) + inset * 2.0;
            let center = layout.secondary_at(group.index);
            LegendEntry {
                key: group.key.clone(),
                color: group.color,
                bounds: Rect::new(right - width, center - height / 2.0, width, height),
                corner_radius: (config.commit_radius / 2.0).min(width / 2.0).min(height / 2.0),
                text_anchor: Point::new(right - inset, center),
                label,
            }
        })
        .collect()
}

type Row = (Vec<String>, Option<String>);

/// Slots with something to say: a message, or the tip of a branch.
fn message_rows(graph: &NormalizedGraph) -> BTreeMap<i64, Row> {
    let mut rows: BTreeMap<i64, Row> = BTreeMap::new();
    for group in &graph.groups {
        for event in &group.events {
            if event.position < 0 || event.is_in_place() {
                continue;
            }
            if let Some(message) = &event.message {
                rows.entry(event.position)
                    .or_default()
                    .1
                    .get_or_insert_with(|| message.clone());
            }
        }
        if let Some(tip) = group.last_activity() {
            rows.entry(tip.max(0)).or_default().0.push(group.key.clone());
        }
    }
    rows.retain(|_, (labels, message)| !labels.is_empty() || message.is_some());
    rows
}

fn row_text(labels: &[String], message: Option<&str>) -> String {
    let mut text: String = labels
        .iter()
        .map(|label| format!("[{}] ", label.to_uppercase()))
        .collect();
    text.push_str(message.unwrap_or_default());
    text
}
