//! cli
//!
//! Command-line interface for `bsg`.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration and install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It turns flags and config into a [`Context`] and
//! dispatches to [`commands`], which drive [`crate::core::hierarchy`] over a
//! [`crate::store::MemoryStore`] loaded from the document.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Document the command operates on
    pub document: PathBuf,
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Loaded configuration
    pub config: Config,
}

impl Context {
    /// Build a context from parsed flags and config. `--file` wins over the
    /// configured document.
    pub fn new(cli: &Cli, config: Config) -> Self {
        Self {
            document: cli.file.clone().unwrap_or_else(|| config.document()),
            verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
            config,
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::load().context("failed to load configuration")?;
    let ctx = Context::new(&cli, config);

    init_logging(&ctx);

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// Level comes from `--debug`/`--quiet` first, then `RUST_LOG`, then the
/// configured `log_level`.
fn init_logging(ctx: &Context) {
    let filter = match ctx.verbosity.log_filter() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(ctx.config.log_level())),
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
