#![forbid(unsafe_code)]

//! gitline public facade crate.
//!
//! Re-exports the types most callers need, a prelude, the catalog of named
//! diagrams and a one-call pipeline from [`Graph`] to output text.
//!
//! ```
//! use gitline::prelude::*;
//!
//! let svg = gitline::render_named("submitting-a-hotfix", &LayoutConfig::default())?;
//! assert!(svg.contains("stroke-dasharray"));
//! # Ok::<(), gitline::Error>(())
//! ```

use std::fmt;

use tracing::debug_span;

pub mod catalog;

// --- Core re-exports -------------------------------------------------------

pub use gitline_core::{
    Axis, Branch, BranchGroup, BranchMut, BranchOptions, Color, CommitOptions, Event, EventFlags,
    EventKind, Graph, GraphError, LogState, NormalizedGraph, Point, Rect, Size, normalize,
};

// --- Layout re-exports -----------------------------------------------------

pub use gitline_layout::{
    ConfigError, Font, GraphLayout, LayoutConfig, LayoutConfigParse, TextMetrics, UnicodeMetrics,
    layout,
};

// --- Render re-exports -----------------------------------------------------

pub use gitline_render::{
    Canvas, DrawCommand, Primitive, RecordingCanvas, Scene, SvgExporter, build_scene, paint,
};

pub use catalog::GraphBuilder;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gitline callers.
#[derive(Debug)]
pub enum Error {
    /// A builder broke a graph rule.
    Graph(GraphError),
    /// No catalog entry with this name.
    UnknownGraph(String),
    /// I/O failure while writing output.
    Io(std::io::Error),
    /// JSON serialization failure.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph(err) => write!(f, "{err}"),
            Self::UnknownGraph(name) => write!(f, "unknown graph: {name}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnknownGraph(_) => None,
        }
    }
}

impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Standard result type for gitline APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Pipeline -------------------------------------------------------------

/// What [`render`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    /// The scene as JSON.
    Json,
    /// Recorded canvas calls as JSON.
    Commands,
}

impl OutputFormat {
    pub const ALL: [Self; 3] = [Self::Svg, Self::Json, Self::Commands];

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "json" | "scene" => Some(Self::Json),
            "commands" | "canvas" => Some(Self::Commands),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json => "json",
            Self::Commands => "commands",
        }
    }

    /// File extension for output files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json | Self::Commands => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run a catalog builder on a fresh graph.
///
/// # Errors
///
/// [`Error::UnknownGraph`] for unregistered names, [`Error::Graph`] if the
/// builder fails.
pub fn build_named(name: &str) -> Result<Graph> {
    let builder = catalog::lookup(name).ok_or_else(|| Error::UnknownGraph(name.to_owned()))?;
    let mut graph = Graph::new();
    builder(&mut graph)?;
    Ok(graph)
}

/// Normalize, lay out and build the scene with the built-in text metrics.
#[must_use]
pub fn scene(graph: &Graph, config: &LayoutConfig) -> Scene {
    let normalized = normalize(graph);
    let positioned = layout(&normalized, config, &UnicodeMetrics::default());
    build_scene(&positioned)
}

/// Render `graph` in the requested format.
///
/// # Errors
///
/// [`Error::Json`] if a JSON format fails to serialize.
pub fn render(graph: &Graph, config: &LayoutConfig, format: OutputFormat) -> Result<String> {
    let _span = debug_span!("render", format = format.as_str()).entered();
    let scene = scene(graph, config);
    Ok(match format {
        OutputFormat::Svg => SvgExporter::default().export(&scene),
        OutputFormat::Json => scene.to_json()?,
        OutputFormat::Commands => RecordingCanvas::record(&scene).to_json()?,
    })
}

/// Build a catalog diagram and render it as SVG.
///
/// # Errors
///
/// See [`build_named`].
pub fn render_named(name: &str, config: &LayoutConfig) -> Result<String> {
    let graph = build_named(name)?;
    render(&graph, config, OutputFormat::Svg)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Axis, BranchOptions, Color, CommitOptions, Error, Graph, GraphError, LayoutConfig,
        OutputFormat, RecordingCanvas, Result, Scene, SvgExporter,
    };
}

pub use gitline_core;
pub use gitline_layout;
pub use gitline_render;
