//! cli::commands
//!
//! Command handlers. Each handler takes its parsed arguments and the
//! shared [`Context`], wires the components it needs, and reports results
//! through [`crate::ui::output`].

pub mod collect;
pub mod completion;
pub mod config_cmd;
pub mod import;
pub mod network;
pub mod sentiment;
pub mod summarize;
pub mod visualize;

use std::path::Path;

use anyhow::{Context as _, Result};

use super::args::{Command, ConfigAction};
use super::Context;
use crate::store::SqliteStore;

/// Default network export file.
pub const NETWORK_FILE: &str = "network.gexf";

/// Default network image.
pub const NETWORK_PNG: &str = "network.png";

/// Default sentiment chart.
pub const SENTIMENT_PNG: &str = "sentiment_bar.png";

/// Default summary file.
pub const SUMMARY_FILE: &str = "post_summary.txt";

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Collect { query, limit } => collect::collect(ctx, query, limit),
        Command::Import { file } => import::import(ctx, &file),
        Command::Network {
            limit,
            out,
            format,
            store,
            clear,
            dry_run,
            top,
            collapse,
            self_loops,
            require_posts,
        } => network::network(
            ctx,
            network::NetworkArgs {
                limit,
                out,
                format,
                store,
                clear,
                dry_run,
                top,
                collapse,
                self_loops,
                require_posts,
            },
        ),
        Command::Visualize {
            graph,
            out,
            top,
            from_store,
        } => visualize::visualize(ctx, graph.as_deref(), out.as_deref(), top, from_store),
        Command::Sentiment { limit, out, store } => {
            sentiment::sentiment(ctx, limit, out.as_deref(), store)
        }
        Command::Summarize { limit, top, out } => {
            summarize::summarize(ctx, limit, top, out.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
            ConfigAction::Init { force } => config_cmd::init(ctx, force),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Open the post store for reading. A missing file is an error.
pub(crate) fn open_store(ctx: &Context) -> Result<SqliteStore> {
    let path = ctx.store_path();
    SqliteStore::open_existing(&path)
        .with_context(|| format!("cannot read post store at {}", path.display()))
}

/// Open the post store for writing, creating it if needed.
pub(crate) fn open_store_for_write(ctx: &Context) -> Result<SqliteStore> {
    let path = ctx.store_path();
    SqliteStore::open(&path)
        .with_context(|| format!("cannot open post store at {}", path.display()))
}

/// Write a text artifact, creating parent directories.
pub(crate) fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
