//! render
//!
//! Network layout and PNG charts.
//!
//! # Modules
//!
//! - [`layout`]: focus subgraph, spring layout, node sizing (always built)
//! - [`plot`]: PNG drawing via plotters (requires the `plotters` feature)
//!
//! Without the `plotters` feature the drawing functions return
//! [`RenderError::Unsupported`]; everything in [`layout`] still works.

pub mod layout;
pub mod plot;

use thiserror::Error;

/// Errors from rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// There is nothing to draw.
    #[error("graph is empty; nothing to plot")]
    EmptyGraph,

    /// PNG output was not compiled in.
    #[error("PNG rendering requires building with --features plotters")]
    Unsupported,

    /// The drawing backend failed.
    #[error("drawing failed: {0}")]
    Draw(String),

    /// I/O failure preparing the output path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether PNG output is available in this build.
pub fn png_supported() -> bool {
    cfg!(feature = "plotters")
}

/// Create the parent directory of `path` if needed.
#[cfg_attr(not(feature = "plotters"), allow(dead_code))]
pub(crate) fn ensure_parent(path: &std::path::Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
