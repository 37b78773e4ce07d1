//! cli
//!
//! Command-line interface layer for chirpgraph.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Set up logging
//! - Load configuration once and hand explicit values to each component
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a
//! [`Context`], and dispatches to a handler in [`commands`]. Only this
//! layer reads the environment; the library modules receive paths, tokens
//! and policies as arguments.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Per-invocation state shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory for relative paths and the project config
    pub cwd: PathBuf,
    /// Debug output requested
    pub debug: bool,
    /// Minimal output requested
    pub quiet: bool,
    /// Merged configuration
    pub config: Config,
    /// `--db` override
    pub db: Option<PathBuf>,
}

impl Context {
    /// Output verbosity from the global flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Resolve a path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Post store location: `--db`, then configuration.
    pub fn store_path(&self) -> PathBuf {
        let path = self.db.clone().unwrap_or_else(|| self.config.store_path());
        self.resolve(&path)
    }

    /// Artifact directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output_dir())
    }

    /// `explicit`, or `file_name` inside the artifact directory.
    pub fn output_path(&self, explicit: Option<&Path>, file_name: &str) -> PathBuf {
        match explicit {
            Some(path) => self.resolve(path),
            None => self.output_dir().join(file_name),
        }
    }
}

/// Default log filter for the global flags.
fn default_filter(debug: bool, quiet: bool) -> String {
    let level = if quiet {
        "warn"
    } else if debug {
        "debug"
    } else {
        "info"
    };
    format!("warn,chirpgraph={}", level)
}

/// Install the tracing subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(debug: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug, quiet)));

    // A second init (tests calling run twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet);

    // Completion scripts must work without a readable config.
    if let args::Command::Completion { shell } = cli.command {
        return commands::completion::completion(shell);
    }

    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let loaded = Config::load(cli.config.as_deref(), Some(&cwd))
        .context("failed to load configuration")?;
    for warning in &loaded.warnings {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
    }

    let ctx = Context {
        cwd,
        debug: cli.debug,
        quiet: cli.quiet,
        config: loaded.config,
        db: cli.db,
    };

    commands::dispatch(cli.command, &ctx)
}
