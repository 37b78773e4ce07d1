//! cli::commands::summarize
//!
//! Write a plain-text digest of stored posts.

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{open_store, write_text, SUMMARY_FILE};
use crate::cli::Context;
use crate::store::PostStore;
use crate::summary;
use crate::ui::output;

/// Run the summarize command.
///
/// An empty store prints a notice and writes no file.
pub fn summarize(ctx: &Context, limit: usize, top: usize, out: Option<&Path>) -> Result<()> {
    let posts = open_store(ctx)?
        .fetch_posts(limit)
        .context("failed to read posts")?;

    let digest = summary::summarize(&posts, top);
    if digest.is_empty() {
        output::print("No posts to summarize", ctx.verbosity());
        return Ok(());
    }

    let text = digest.to_string();
    let out = ctx.output_path(out, SUMMARY_FILE);
    write_text(&out, &text)?;

    output::print(text.trim_end(), ctx.verbosity());
    output::success(format!("Wrote summary to {}", out.display()), ctx.verbosity());
    Ok(())
}
