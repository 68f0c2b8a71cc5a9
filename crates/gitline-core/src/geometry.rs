#![forbid(unsafe_code)]

//! Geometric primitives.

use std::fmt;

use serde::Serialize;

/// A point in diagram coordinates (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by the given deltas.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Width and height of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle for legend boxes and diagram bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Orientation of a diagram.
///
/// The primary axis carries chronological progression; the secondary axis
/// carries branch ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Time flows left to right, branches are stacked top to bottom.
    #[default]
    Horizontal,
    /// Time flows bottom to top, branches are stacked left to right.
    Vertical,
}

impl Axis {
    /// Parse an axis name (`horizontal`/`h` or `vertical`/`v`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" | "x" => Some(Self::Horizontal),
            "vertical" | "v" | "y" => Some(Self::Vertical),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }

    /// Compose a point from primary and secondary coordinates.
    #[inline]
    pub fn point(self, primary: f64, secondary: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(primary, secondary),
            Self::Vertical => Point::new(secondary, primary),
        }
    }

    /// The coordinate of `point` along the primary axis.
    #[inline]
    pub fn primary(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// The coordinate of `point` along the secondary axis.
    #[inline]
    pub fn secondary(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.y,
            Self::Vertical => point.x,
        }
    }

    /// Compose a size from primary and secondary extents.
    #[inline]
    pub fn size(self, primary: f64, secondary: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(primary, secondary),
            Self::Vertical => Size::new(secondary, primary),
        }
    }

    /// Direction of chronological progression in screen coordinates.
    ///
    /// Vertical diagrams grow upward, against the screen's y axis.
    #[inline]
    pub const fn forward(self) -> f64 {
        match self {
            Self::Horizontal => 1.0,
            Self::Vertical => -1.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
