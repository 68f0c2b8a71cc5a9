#![forbid(unsafe_code)]

//! Rendering: a positioned layout becomes a [`Scene`] of drawing primitives,
//! which is exported as SVG or replayed onto a [`Canvas`].

pub mod builder;
pub mod canvas;
pub mod primitive;
pub mod svg;

pub use builder::build_scene;
pub use canvas::{Canvas, DrawCommand, RecordingCanvas, paint};
pub use primitive::{DASH_PATTERN, Path, PathSegment, Primitive, Scene, TextAlign, rounded_rect};
pub use svg::SvgExporter;
