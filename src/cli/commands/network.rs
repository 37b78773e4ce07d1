//! cli::commands::network
//!
//! Build the mention network from stored posts, then export it, persist
//! it, or preview its heaviest edges.
//!
//! # Example
//!
//! ```bash
//! # GEXF for Gephi
//! chirp network --out artifacts/user_network.gexf
//!
//! # Preview only
//! chirp network --dry-run --top 10
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use super::{open_store, open_store_for_write, NETWORK_FILE};
use crate::cli::Context;
use crate::core::network::{BuildOptions, CollapsePolicy, NetworkBuilder, SelfLoopPolicy};
use crate::export::{self, ExportFormat};
use crate::store::PostStore;
use crate::ui::output;

/// Arguments for the network command.
#[derive(Debug, Clone, Default)]
pub struct NetworkArgs {
    pub limit: usize,
    pub out: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub store: bool,
    pub clear: bool,
    pub dry_run: bool,
    pub top: usize,
    pub collapse: Option<CollapsePolicy>,
    pub self_loops: Option<SelfLoopPolicy>,
    pub require_posts: bool,
}

impl NetworkArgs {
    /// Flags over configuration.
    fn build_options(&self, ctx: &Context) -> BuildOptions {
        let configured = ctx.config.build_options();
        BuildOptions {
            collapse: self.collapse.unwrap_or(configured.collapse),
            self_loops: self.self_loops.unwrap_or(configured.self_loops),
        }
    }
}

/// Run the network command.
pub fn network(ctx: &Context, args: NetworkArgs) -> Result<()> {
    let verbosity = ctx.verbosity();
    let options = args.build_options(ctx);

    let posts = {
        let store = open_store(ctx)?;
        store.fetch_posts(args.limit).context("failed to read posts")?
    };

    if posts.is_empty() {
        if args.require_posts {
            bail!("no posts in the store at {}", ctx.store_path().display());
        }
        tracing::info!("post store is empty; building an empty network");
    }

    let network = NetworkBuilder::new(options).build(&posts);
    tracing::info!(
        posts = posts.len(),
        nodes = network.node_count(),
        edges = network.edge_count(),
        collapse = %options.collapse,
        self_loops = %options.self_loops,
        "built mention network"
    );

    if args.dry_run {
        output::print(
            format!(
                "{} nodes, {} edges, {} mentions",
                network.node_count(),
                network.edge_count(),
                network.total_weight()
            ),
            verbosity,
        );
        let edges: Vec<String> = network
            .top_edges(args.top)
            .iter()
            .map(output::format_edge)
            .collect();
        if !edges.is_empty() {
            output::print(output::format_list(&edges, "  "), verbosity);
        }
        return Ok(());
    }

    let out = ctx.output_path(args.out.as_deref(), NETWORK_FILE);
    let format = ExportFormat::resolve(args.format, &out)?;
    export::write_network(&network, &out, format)
        .with_context(|| format!("failed to write {}", out.display()))?;
    output::success(
        format!(
            "Wrote {} network ({} nodes, {} edges) to {}",
            format,
            network.node_count(),
            network.edge_count(),
            out.display()
        ),
        verbosity,
    );

    if args.store {
        let mut store = open_store_for_write(ctx)?;
        let rows = store
            .store_network(&network, args.clear)
            .context("failed to store network edges")?;
        output::success(format!("Stored {} edges", rows), verbosity);
    }

    Ok(())
}
