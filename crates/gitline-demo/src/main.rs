#![forbid(unsafe_code)]

//! `gitline`: render a named diagram from the catalog.
//!
//! Run: `cargo run -p gitline-demo -- --axis=vertical local-squashing`

mod cli;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use gitline::{Error, LayoutConfig, catalog};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Command, Opts, Target};

/// Log filter variable.
const LOG_ENV: &str = "GITLINE_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Exit status for a graph name the catalog does not know.
const EXIT_NOT_FOUND: u8 = 2;

fn main() -> ExitCode {
    let opts = match Command::parse() {
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("gitline {}", cli::VERSION);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(opts)) => opts,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Run with --help for usage information.");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(opts.log_json);

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::UnknownGraph(_)) => {
            eprintln!("gitline: {err}");
            eprintln!("Run with --list to see the available graphs.");
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(err) => {
            eprintln!("gitline: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only the rendered output.
fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn run(opts: &Opts) -> gitline::Result<()> {
    let name = match &opts.target {
        Target::List => return list(),
        Target::Graph(name) => name,
    };

    let parsed = LayoutConfig::from_env_with_diagnostics();
    for err in &parsed.errors {
        warn!(%err, "ignoring invalid layout setting");
    }
    let mut config = parsed.config;
    if let Some(axis) = opts.axis {
        config.axis = axis;
    }
    debug!(config = %config.summary_short(), "layout config");

    let graph = gitline::build_named(name)?;
    let output = gitline::render(&graph, &config, opts.format)?;
    info!(
        graph = %name,
        format = opts.format.as_str(),
        events = graph.events().len(),
        bytes = output.len(),
        "rendered"
    );

    match &opts.out {
        Some(path) => {
            fs::write(path, &output)?;
            info!(path = %path.display(), "written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn list() -> gitline::Result<()> {
    let mut stdout = io::stdout().lock();
    for name in catalog::names() {
        writeln!(stdout, "{name:<26}{}", catalog::label(name))?;
    }
    Ok(())
}
