//! cli::commands::visualize
//!
//! Draw the best-connected part of a mention network as a PNG.
//!
//! # Graph sources
//!
//! In order of preference:
//! 1. `--graph <file>` (GEXF or node-link JSON, by extension) when it
//!    exists and `--from-store` is not set
//! 2. Edges persisted by `chirp network --store`
//! 3. A fresh build from the stored posts
//!
//! An empty result is an error.

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use super::{open_store, NETWORK_PNG};
use crate::cli::Context;
use crate::core::network::{Network, NetworkBuilder};
use crate::export;
use crate::render::{plot, RenderError};
use crate::store::PostStore;
use crate::ui::output;

/// Run the visualize command.
pub fn visualize(
    ctx: &Context,
    graph: Option<&Path>,
    out: Option<&Path>,
    top: usize,
    from_store: bool,
) -> Result<()> {
    let network = load(ctx, graph, from_store)?;
    if network.is_empty() {
        bail!("no graph data to plot");
    }

    let out = ctx.output_path(out, NETWORK_PNG);
    let drawn = match plot::draw_network(&network, top, &out) {
        Ok(drawn) => drawn,
        Err(RenderError::EmptyGraph) => bail!("no graph data to plot"),
        Err(err) => return Err(err).with_context(|| format!("failed to draw {}", out.display())),
    };

    output::success(
        format!(
            "Drew {} nodes and {} edges ({} labelled) to {}",
            drawn.nodes,
            drawn.edges,
            drawn.labels,
            out.display()
        ),
        ctx.verbosity(),
    );
    Ok(())
}

fn load(ctx: &Context, graph: Option<&Path>, from_store: bool) -> Result<Network> {
    if let Some(path) = graph.filter(|_| !from_store) {
        let path = ctx.resolve(path);
        if path.exists() {
            tracing::info!(path = %path.display(), "loading network file");
            return export::read_network(&path)
                .with_context(|| format!("failed to read network from {}", path.display()));
        }
        tracing::warn!(path = %path.display(), "network file not found; using the post store");
    }

    let store = open_store(ctx)?;
    let stored = store
        .load_network(ctx.config.collapse())
        .context("failed to load stored edges")?;
    if !stored.is_empty() {
        tracing::info!(edges = stored.edge_count(), "loaded stored edges");
        return Ok(stored);
    }

    tracing::info!("no stored edges; building from posts");
    let posts = store.fetch_posts(0).context("failed to read posts")?;
    Ok(NetworkBuilder::new(ctx.config.build_options()).build(&posts))
}
