//! cli::commands::collect
//!
//! Fetch recent posts from the search API into the post store.
//!
//! # Example
//!
//! ```bash
//! # Collect the configured query
//! chirp collect
//!
//! # Collect 300 posts for another query
//! chirp collect --query 'rustlang -is:retweet' --limit 300
//! ```

use anyhow::{Context as _, Result};

use super::open_store_for_write;
use crate::cli::Context;
use crate::source::{collect_posts, PostSource, SourceError, TwitterClient};
use crate::ui::output;

/// Run the collect command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn collect(ctx: &Context, query: Option<String>, limit: Option<usize>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(collect_async(ctx, query, limit))
}

async fn collect_async(ctx: &Context, query: Option<String>, limit: Option<usize>) -> Result<()> {
    let query = query.unwrap_or_else(|| ctx.config.query());
    let limit = limit.unwrap_or_else(|| ctx.config.max_posts());

    let token = ctx.config.bearer_token().ok_or(SourceError::AuthRequired)?;
    let client = TwitterClient::with_api_base(Some(token), ctx.config.api_base());

    // Open before fetching so a bad store path fails without spending quota.
    let mut store = open_store_for_write(ctx)?;

    tracing::info!(source = client.name(), %query, limit, "collecting posts");
    let posts = collect_posts(&client, &query, limit)
        .await
        .context("failed to collect posts")?;

    let report = store
        .insert_posts(&posts)
        .context("failed to store collected posts")?;

    output::success(
        format!(
            "Collected {} posts for {:?}: {}",
            posts.len(),
            query,
            report
        ),
        ctx.verbosity(),
    );
    tracing::info!(total = store.post_count()?, "post store updated");
    Ok(())
}
