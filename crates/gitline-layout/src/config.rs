#![forbid(unsafe_code)]

//! Spacing, stroke and font settings for the layout engine.
//!
//! Defaults reproduce the classic gitline look (16px padding, 12px commit
//! radius, 48px commit slots, 32px branch slots). Every field can be
//! overridden from the environment.

use std::env;
use std::fmt;

use gitline_core::{Axis, Color};

use crate::metrics::Font;

const ENV_AXIS: &str = "GITLINE_AXIS";
const ENV_PADDING: &str = "GITLINE_PADDING";
const ENV_COMMIT_RADIUS: &str = "GITLINE_COMMIT_RADIUS";
const ENV_LINE_WIDTH: &str = "GITLINE_LINE_WIDTH";
const ENV_FONT_SIZE: &str = "GITLINE_FONT_SIZE";
const ENV_FONT_FAMILY: &str = "GITLINE_FONT_FAMILY";
const ENV_BRANCH_SPACING: &str = "GITLINE_BRANCH_SPACING";
const ENV_COMMIT_SPACING: &str = "GITLINE_COMMIT_SPACING";
const ENV_LEGEND_WIDTH: &str = "GITLINE_LEGEND_WIDTH";
const ENV_BACKGROUND: &str = "GITLINE_BACKGROUND";

pub const DEFAULT_FONT_FAMILY: &str = "helvetica, segoe ui, sans-serif";

/// Legend labels use a bold font at this fraction of the base size.
pub const LEGEND_FONT_SCALE: f64 = 0.75;

/// Layout configuration (deterministic, env-overridable).
///
/// # Environment Variables
/// - `GITLINE_AXIS` = horizontal|vertical
/// - `GITLINE_PADDING` (f64, >= 0)
/// - `GITLINE_COMMIT_RADIUS` (f64, > 0)
/// - `GITLINE_LINE_WIDTH` (f64, > 0)
/// - `GITLINE_FONT_SIZE` (f64, > 0)
/// - `GITLINE_FONT_FAMILY` (string)
/// - `GITLINE_BRANCH_SPACING` (f64, > 0)
/// - `GITLINE_COMMIT_SPACING` (f64, > 0)
/// - `GITLINE_LEGEND_WIDTH` (f64, or `auto` to measure)
/// - `GITLINE_BACKGROUND` (`#rgb` / `#rrggbb`)
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub axis: Axis,
    pub padding: f64,
    pub commit_radius: f64,
    pub line_width: f64,
    pub font_size: f64,
    pub font_family: String,
    /// Slot size across the time axis, one per branch.
    pub branch_spacing: f64,
    /// Slot size along the time axis, one per position.
    pub commit_spacing: f64,
    /// Fixed legend width; `None` measures the branch names.
    pub legend_width: Option<f64>,
    pub background: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            padding: 16.0,
            commit_radius: 12.0,
            line_width: 4.0,
            font_size: 16.0,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            branch_spacing: 32.0,
            commit_spacing: 48.0,
            legend_width: None,
            background: Color::WHITE,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct LayoutConfigParse {
    pub config: LayoutConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl LayoutConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> LayoutConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> LayoutConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary key lookup.
    ///
    /// Unparseable values are reported and the default is kept.
    #[must_use]
    pub fn from_env_with<F>(mut get: F) -> LayoutConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = LayoutConfig::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_AXIS) {
            match Axis::parse(&value) {
                Some(parsed) => config.axis = parsed,
                None => errors.push(ConfigError::new(
                    "axis",
                    value,
                    "expected horizontal|vertical",
                )),
            }
        }

        for (key, field, slot) in [
            (ENV_PADDING, "padding", &mut config.padding),
            (ENV_COMMIT_RADIUS, "commit_radius", &mut config.commit_radius),
            (ENV_LINE_WIDTH, "line_width", &mut config.line_width),
            (ENV_FONT_SIZE, "font_size", &mut config.font_size),
            (ENV_BRANCH_SPACING, "branch_spacing", &mut config.branch_spacing),
            (ENV_COMMIT_SPACING, "commit_spacing", &mut config.commit_spacing),
        ] {
            if let Some(value) = get(key) {
                match parse_f64(&value) {
                    Some(parsed) => *slot = parsed,
                    None => errors.push(ConfigError::new(field, value, "expected number")),
                }
            }
        }

        if let Some(value) = get(ENV_FONT_FAMILY) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                errors.push(ConfigError::new(
                    "font_family",
                    value,
                    "expected non-empty font list",
                ));
            } else {
                config.font_family = trimmed.to_owned();
            }
        }

        if let Some(value) = get(ENV_LEGEND_WIDTH) {
            if value.trim().eq_ignore_ascii_case("auto") {
                config.legend_width = None;
            } else {
                match parse_f64(&value) {
                    Some(parsed) => config.legend_width = Some(parsed),
                    None => errors.push(ConfigError::new(
                        "legend_width",
                        value,
                        "expected number or auto",
                    )),
                }
            }
        }

        if let Some(value) = get(ENV_BACKGROUND) {
            match Color::parse_hex(&value) {
                Some(parsed) => config.background = parsed,
                None => errors.push(ConfigError::new(
                    "background",
                    value,
                    "expected #rgb or #rrggbb",
                )),
            }
        }

        if let Err(violations) = config.validate() {
            errors.extend(violations);
        }

        LayoutConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_non_negative("padding", self.padding, &mut errors);
        validate_positive("commit_radius", self.commit_radius, &mut errors);
        validate_positive("line_width", self.line_width, &mut errors);
        validate_positive("font_size", self.font_size, &mut errors);
        validate_positive("branch_spacing", self.branch_spacing, &mut errors);
        validate_positive("commit_spacing", self.commit_spacing, &mut errors);
        if let Some(width) = self.legend_width {
            validate_non_negative("legend_width", width, &mut errors);
        }
        if self.font_family.trim().is_empty() {
            errors.push(ConfigError::new(
                "font_family",
                self.font_family.clone(),
                "must not be empty",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Font for commit messages.
    #[must_use]
    pub fn message_font(&self) -> Font {
        Font::new(self.font_size, self.font_family.clone())
    }

    /// Bold, smaller font for legend labels.
    #[must_use]
    pub fn legend_font(&self) -> Font {
        Font::new(
            (self.font_size * LEGEND_FONT_SCALE).ceil(),
            self.font_family.clone(),
        )
        .bold()
    }

    /// Short human-readable summary for log lines.
    #[must_use]
    pub fn summary_short(&self) -> String {
        format!(
            "{} · slots {}x{} · radius {} · font {}px",
            self.axis, self.commit_spacing, self.branch_spacing, self.commit_radius, self.font_size
        )
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn validate_positive(field: &'static str, value: f64, errors: &mut Vec<ConfigError>) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigError::new(field, value.to_string(), "must be > 0"));
    }
}

fn validate_non_negative(field: &'static str, value: f64, errors: &mut Vec<ConfigError>) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(field, value.to_string(), "must be >= 0"));
    }
}
