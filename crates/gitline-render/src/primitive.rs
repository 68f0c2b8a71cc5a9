#![forbid(unsafe_code)]

//! Target-independent drawing primitives.
//!
//! A [`Scene`] is the complete hand-off to a renderer: final coordinates,
//! colors and stroke widths, in paint order. Renderers never look back at the
//! graph or the layout.

use gitline_core::{Color, Point, Rect, Size};
use serde::Serialize;
use smallvec::SmallVec;

/// Dash pattern for dashed curves (on, off).
pub const DASH_PATTERN: [f64; 2] = [4.0, 4.0];

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { ctrl: Point, to: Point },
}

pub type Path = SmallVec<[PathSegment; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
}

/// A drawable shape.
///
/// `halo` widths are strokes in the scene background color painted under the
/// shape, so markers cut cleanly through lines they sit on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    /// Branch name badge: filled rounded rectangle with a light label.
    Legend {
        label: String,
        bounds: Rect,
        corner_radius: f64,
        color: Color,
        text_anchor: Point,
        font_size: f64,
    },
    /// Straight lifeline segment between two slots.
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    /// Branch-off or merge curve between lanes.
    Curve {
        path: Path,
        color: Color,
        width: f64,
        dashed: bool,
    },
    CommitMarker {
        center: Point,
        radius: f64,
        color: Color,
        halo: f64,
    },
    /// Zigzag across an open-ended lifeline.
    Ripple {
        points: SmallVec<[Point; 6]>,
        color: Color,
        width: f64,
        halo: f64,
    },
    /// Deletion marker: two diagonals through `center`.
    Cross {
        center: Point,
        half_size: f64,
        color: Color,
        width: f64,
        halo: f64,
    },
    Text {
        anchor: Point,
        text: String,
        color: Color,
        align: TextAlign,
        font_size: f64,
        bold: bool,
    },
}

impl Primitive {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Legend { .. } => "legend",
            Self::Line { .. } => "line",
            Self::Curve { .. } => "curve",
            Self::CommitMarker { .. } => "commit_marker",
            Self::Ripple { .. } => "ripple",
            Self::Cross { .. } => "cross",
            Self::Text { .. } => "text",
        }
    }
}

/// Everything a renderer needs, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub size: Size,
    pub background: Color,
    pub font_family: String,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    #[must_use]
    pub fn new(size: Size, background: Color, font_family: impl Into<String>) -> Self {
        Self {
            size,
            background,
            font_family: font_family.into(),
            primitives: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Primitives of one kind, in paint order.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.primitives.iter().filter(move |p| p.kind() == kind)
    }

    /// Pretty-printed JSON dump.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Outline of a rounded rectangle, clockwise from the top edge.
#[must_use]
pub fn rounded_rect(bounds: Rect, radius: f64) -> SmallVec<[PathSegment; 9]> {
    let r = radius.min(bounds.width / 2.0).min(bounds.height / 2.0).max(0.0);
    let (x, y, w, h) = (bounds.x, bounds.y, bounds.width, bounds.height);
    smallvec::smallvec![
        PathSegment::MoveTo { to: Point::new(x + r, y) },
        PathSegment::LineTo { to: Point::new(x + w - r, y) },
        PathSegment::QuadTo { ctrl: Point::new(x + w, y), to: Point::new(x + w, y + r) },
        PathSegment::LineTo { to: Point::new(x + w, y + h - r) },
        PathSegment::QuadTo { ctrl: Point::new(x + w, y + h), to: Point::new(x + w - r, y + h) },
        PathSegment::LineTo { to: Point::new(x + r, y + h) },
        PathSegment::QuadTo { ctrl: Point::new(x, y + h), to: Point::new(x, y + h - r) },
        PathSegment::LineTo { to: Point::new(x, y + r) },
        PathSegment::QuadTo { ctrl: Point::new(x, y), to: Point::new(x + r, y) },
    ]
}
