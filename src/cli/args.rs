//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this global config file
//! - `--db <path>`: Use this post store
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::network::{CollapsePolicy, SelfLoopPolicy};
use crate::export::ExportFormat;

/// chirpgraph - collect posts, build mention networks, and report on them
#[derive(Parser, Debug)]
#[command(name = "chirp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global config file (replaces the default search)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Post store database (overrides config and CHIRPGRAPH_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch recent posts from the search API and store them
    #[command(
        name = "collect",
        after_help = "\
EXAMPLES:
    # Collect up to 100 posts for the configured query
    chirp collect

    # Collect 300 posts for a custom query
    chirp collect --query '\"rust lang\" -is:retweet' --limit 300

Requires TWITTER_BEARER_TOKEN or [twitter] bearer_token in the global config."
    )]
    Collect {
        /// Search query (defaults to [twitter] query)
        #[arg(long)]
        query: Option<String>,

        /// Maximum posts to collect (defaults to [twitter] max_posts)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Import raw post documents from a JSON-lines file
    #[command(name = "import")]
    Import {
        /// File with one JSON document per line ("-" for stdin)
        file: PathBuf,
    },

    /// Build the mention network from stored posts
    #[command(
        name = "network",
        after_help = "\
EXAMPLES:
    # Write the network as GEXF for Gephi
    chirp network --out artifacts/user_network.gexf

    # Preview the heaviest edges without writing anything
    chirp network --dry-run

    # Persist edges in the store, replacing earlier runs
    chirp network --store --clear

    # Node-link JSON, one edge per mention
    chirp network --out net.json --collapse multigraph"
    )]
    Network {
        /// Read at most N posts (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Output file (.gexf or .json)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Output format (inferred from --out when omitted)
        #[arg(long, value_name = "gexf|json")]
        format: Option<ExportFormat>,

        /// Persist edges in the store
        #[arg(long)]
        store: bool,

        /// Delete previously stored edges first (with --store)
        #[arg(long, requires = "store")]
        clear: bool,

        /// Print the heaviest edges instead of writing anything
        #[arg(long)]
        dry_run: bool,

        /// Edges shown by --dry-run
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Edge collapse policy (defaults to [network] collapse)
        #[arg(long, value_name = "weighted|multigraph")]
        collapse: Option<CollapsePolicy>,

        /// Self-mention policy (defaults to [network] self_loops)
        #[arg(long, value_name = "keep|drop")]
        self_loops: Option<SelfLoopPolicy>,

        /// Fail if the store holds no posts
        #[arg(long)]
        require_posts: bool,
    },

    /// Draw the best-connected part of a network as a PNG
    #[command(
        name = "visualize",
        after_help = "\
EXAMPLES:
    # Draw the network written by `chirp network`
    chirp visualize --graph artifacts/network.gexf --top 100

    # Draw a saved node-link JSON network
    chirp visualize --graph net.json --out user_network.png

    # Draw from edges persisted with `chirp network --store`
    chirp visualize --from-store

Requires a build with --features plotters."
    )]
    Visualize {
        /// Network file to draw (.gexf or .json)
        #[arg(long, value_name = "PATH")]
        graph: Option<PathBuf>,

        /// Output PNG
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Number of top nodes to focus on
        #[arg(
            long,
            default_value_t = 100,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        top: usize,

        /// Load stored edges even if --graph exists
        #[arg(long)]
        from_store: bool,
    },

    /// Score post sentiment and chart the label counts
    #[command(name = "sentiment")]
    Sentiment {
        /// Score at most N posts (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Output PNG
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Store per-post results and a summary row
        #[arg(long)]
        store: bool,
    },

    /// Write a plain-text digest of stored posts
    #[command(name = "summarize")]
    Summarize {
        /// Read at most N posts (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Representative posts to include
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Output file
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Show or create configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config files in use
    Path,
    /// Write a starter project config (chirpgraph.toml)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn network_flags_parse() {
        let cli = Cli::try_parse_from([
            "chirp",
            "network",
            "--out",
            "net.json",
            "--collapse",
            "multigraph",
            "--self-loops",
            "drop",
            "--store",
            "--clear",
        ])
        .unwrap();

        match cli.command {
            Command::Network {
                collapse,
                self_loops,
                store,
                clear,
                out,
                ..
            } => {
                assert_eq!(collapse, Some(CollapsePolicy::Multigraph));
                assert_eq!(self_loops, Some(SelfLoopPolicy::Drop));
                assert!(store && clear);
                assert_eq!(out, Some(PathBuf::from("net.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn clear_requires_store() {
        assert!(Cli::try_parse_from(["chirp", "network", "--clear"]).is_err());
    }

    #[test]
    fn visualize_top_must_be_positive() {
        assert!(Cli::try_parse_from(["chirp", "visualize", "--top", "0"]).is_err());
        let cli = Cli::try_parse_from(["chirp", "visualize", "--top", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Visualize { top: 3, .. }));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["chirp", "summarize", "--db", "x.db", "-q"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(cli.quiet);
    }
}
