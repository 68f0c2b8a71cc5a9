#![forbid(unsafe_code)]

//! Command-line argument parsing for the `gitline` binary.
//!
//! Parses args manually to keep the binary lean. `GITLINE_FORMAT` and
//! `GITLINE_OUT` provide defaults that explicit flags override; layout
//! settings come from the `GITLINE_*` variables read by `LayoutConfig`.

use std::env;
use std::fmt;
use std::path::PathBuf;

use gitline::{Axis, OutputFormat};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
gitline: render branch/commit history diagrams

USAGE:
    gitline [OPTIONS] <GRAPH>
    gitline --list

OPTIONS:
    --list               List the named diagrams and exit
    --axis=AXIS          Timeline direction: 'horizontal' or 'vertical'
    --format=FORMAT      Output: 'svg' (default), 'json' (scene) or 'commands'
    --out=PATH           Write to PATH instead of stdout
    --log-json           Emit logs as JSON lines on stderr
    --help, -h           Show this help message
    --version, -V        Show version

EXIT STATUS:
    0  Success
    1  Invalid arguments or output failure
    2  Unknown graph name

ENVIRONMENT VARIABLES:
    GITLINE_FORMAT            Override --format
    GITLINE_OUT               Override --out
    GITLINE_LOG               Log filter (default: warn)
    GITLINE_AXIS              Default timeline direction
    GITLINE_PADDING           Outer padding in pixels
    GITLINE_COMMIT_RADIUS     Commit marker radius
    GITLINE_LINE_WIDTH        Stroke width of lifelines and curves
    GITLINE_FONT_SIZE         Message font size
    GITLINE_FONT_FAMILY       Font family for all text
    GITLINE_BRANCH_SPACING    Distance between lanes
    GITLINE_COMMIT_SPACING    Distance between positions
    GITLINE_LEGEND_WIDTH      Fixed legend width, or 'auto'
    GITLINE_BACKGROUND        Background color (#rgb or #rrggbb)";

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Run(Opts),
}

/// What to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    List,
    Graph(String),
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub target: Target,
    /// Overrides the configured axis when set.
    pub axis: Option<Axis>,
    pub format: OutputFormat,
    /// Output file; stdout when unset.
    pub out: Option<PathBuf>,
    /// JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

/// Invalid invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl Command {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Self, CliError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name) with `get` for environment
    /// lookups.
    pub fn parse_from<I, F>(args: I, mut get: F) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
        F: FnMut(&str) -> Option<String>,
    {
        let mut format = OutputFormat::default();
        let mut out = None;

        // Environment first, flags override.
        if let Some(val) = get("GITLINE_FORMAT") {
            format = parse_format(&val, "GITLINE_FORMAT")?;
        }
        if let Some(val) = get("GITLINE_OUT")
            && !val.is_empty()
        {
            out = Some(PathBuf::from(val));
        }

        let mut list = false;
        let mut graph = None;
        let mut axis = None;
        let mut log_json = false;

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Self::Help),
                "--version" | "-V" => return Ok(Self::Version),
                "--list" => list = true,
                "--log-json" => log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--axis=") {
                        axis = Some(
                            Axis::parse(val)
                                .ok_or_else(|| CliError::new(format!("Invalid --axis value: {val}")))?,
                        );
                    } else if let Some(val) = other.strip_prefix("--format=") {
                        format = parse_format(val, "--format")?;
                    } else if let Some(val) = other.strip_prefix("--out=") {
                        out = Some(PathBuf::from(val));
                    } else if other.starts_with('-') {
                        return Err(CliError::new(format!("Unknown argument: {other}")));
                    } else if let Some(previous) = &graph {
                        return Err(CliError::new(format!(
                            "Only one graph can be rendered at a time (got {previous} and {other})"
                        )));
                    } else {
                        graph = Some(other.to_owned());
                    }
                }
            }
        }

        let target = match (list, graph) {
            (true, _) => Target::List,
            (false, Some(name)) => Target::Graph(name),
            (false, None) => return Err(CliError::new("Missing graph name")),
        };

        Ok(Self::Run(Opts {
            target,
            axis,
            format,
            out,
            log_json,
        }))
    }
}

fn parse_format(value: &str, source: &str) -> Result<OutputFormat, CliError> {
    OutputFormat::parse(value).ok_or_else(|| CliError::new(format!("Invalid {source} value: {value}")))
}
