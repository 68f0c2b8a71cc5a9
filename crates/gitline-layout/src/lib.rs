#![forbid(unsafe_code)]

//! Layout: normalized branch groups to positioned lanes, legend and message
//! column, for either axis.

pub mod config;
pub mod engine;
pub mod metrics;

pub use config::{ConfigError, LayoutConfig, LayoutConfigParse};
pub use engine::{
    BOUNDARY_SLOTS, GraphLayout, Lane, LegendEntry, MessageRow, PositionedEvent, layout,
};
pub use metrics::{CacheStats, Font, TextMetrics, UnicodeMetrics, WidthCache, display_width};
