#![forbid(unsafe_code)]

//! Core: branch/commit event log, normalization, geometry and colors.

pub mod color;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod normalize;

pub use color::Color;
pub use error::GraphError;
pub use geometry::{Axis, Point, Rect, Size};
pub use graph::{
    Branch, BranchMut, BranchOptions, CommitOptions, Event, EventFlags, EventKind, Graph,
    LogState,
};
pub use normalize::{BranchGroup, NormalizedGraph, normalize};
