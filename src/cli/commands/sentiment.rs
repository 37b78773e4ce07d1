//! cli::commands::sentiment
//!
//! Score stored posts, print the label counts, and chart them.
//!
//! Without the `plotters` feature the chart is skipped with a warning; the
//! counts and the optional store writes still happen.

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{open_store, open_store_for_write, SENTIMENT_PNG};
use crate::cli::Context;
use crate::render::{self, plot};
use crate::sentiment::{score_posts, SentimentAnalyzer};
use crate::store::PostStore;
use crate::ui::output;

/// Run the sentiment command.
pub fn sentiment(ctx: &Context, limit: usize, out: Option<&Path>, store: bool) -> Result<()> {
    let verbosity = ctx.verbosity();

    let posts = open_store(ctx)?
        .fetch_posts(limit)
        .context("failed to read posts")?;

    let analyzer = SentimentAnalyzer::new();
    let (scored, counts) = score_posts(&analyzer, &posts);
    tracing::info!(posts = posts.len(), scored = scored.len(), "scored posts");

    if store {
        let mut db = open_store_for_write(ctx)?;
        let rows = db
            .store_sentiments(&scored)
            .context("failed to store sentiment results")?;
        db.store_sentiment_summary(&counts)
            .context("failed to store sentiment summary")?;
        tracing::info!(rows, "stored sentiment results");
    }

    output::print(format!("Sentiment: {}", counts), verbosity);

    if counts.total() == 0 {
        tracing::info!("no posts with text; skipping chart");
        return Ok(());
    }

    if !render::png_supported() {
        output::warn("chart skipped: built without the plotters feature", verbosity);
        return Ok(());
    }

    let out = ctx.output_path(out, SENTIMENT_PNG);
    plot::draw_sentiment_chart(&counts, &out)
        .with_context(|| format!("failed to draw {}", out.display()))?;
    output::success(format!("Wrote chart to {}", out.display()), verbosity);
    Ok(())
}
