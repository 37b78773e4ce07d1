//! config command - Show or create configuration

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, ConfigFile};
use crate::ui::output;

/// Print the effective configuration. The token is never shown.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let token = if config.bearer_token().is_some() {
        "(set)"
    } else {
        "(not set)"
    };

    let lines = [
        format!("store.path = {}", ctx.store_path().display()),
        format!("twitter.api_base = {}", config.api_base()),
        format!("twitter.query = {}", config.query()),
        format!("twitter.max_posts = {}", config.max_posts()),
        format!("twitter.bearer_token = {}", token),
        format!("network.collapse = {}", config.collapse()),
        format!("network.self_loops = {}", config.self_loops()),
        format!("output.dir = {}", ctx.output_dir().display()),
    ];
    println!("{}", lines.join("\n"));
    Ok(())
}

/// Print the config files in use.
pub fn path(ctx: &Context) -> Result<()> {
    let describe = |p: Option<&std::path::Path>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };
    println!("global: {}", describe(ctx.config.global_config_loaded_from()));
    println!("project: {}", describe(ctx.config.project_config_loaded_from()));
    Ok(())
}

/// Write a project config template in the working directory.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = Config::write_project(&ctx.cwd, &ConfigFile::template(), force)
        .context("failed to write project config")?;
    output::success(format!("Wrote {}", path.display()), ctx.verbosity());
    Ok(())
}
