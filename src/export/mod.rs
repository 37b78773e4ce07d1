//! export
//!
//! Network serialization for external graph tools.
//!
//! # Formats
//!
//! - [`gexf`]: GEXF 1.2, for Gephi and similar tools
//! - [`json`]: node-link JSON
//!
//! Both are read and written, and keep every edge's weight and
//! contributing post ids. JSON records the collapse policy; GEXF readers
//! infer it from repeated pairs.

pub mod gexf;
pub mod json;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::core::network::Network;
use crate::core::types::TypeError;

/// Errors from reading or writing a serialized network.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A link references a node that was not declared.
    #[error("link references undeclared node '{0}'")]
    UnknownNode(String),

    /// A link carries a zero weight.
    #[error("link {from} -> {to} has zero weight")]
    InvalidWeight { from: String, to: String },

    /// The document describes an undirected graph.
    #[error("graph is undirected; mention networks are directed")]
    Undirected,

    /// A node id is not a usable handle.
    #[error(transparent)]
    InvalidHandle(#[from] TypeError),

    /// The format could not be determined from the file name.
    #[error("cannot infer network format from '{0}'; expected a .gexf or .json file")]
    UnknownFormat(String),

    /// The document is not a usable network.
    #[error("malformed network file: {0}")]
    Malformed(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML decoding failure.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Output format for a serialized network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Gexf,
    Json,
}

impl ExportFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "gexf" => Some(ExportFormat::Gexf),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    /// Use `explicit` if given, else infer from `path`.
    pub fn resolve(explicit: Option<Self>, path: &Path) -> Result<Self, ExportError> {
        explicit
            .or_else(|| Self::from_path(path))
            .ok_or_else(|| ExportError::UnknownFormat(path.display().to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Gexf => write!(f, "gexf"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gexf" => Ok(ExportFormat::Gexf),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown format '{}', expected gexf or json", other)),
        }
    }
}

/// Write `network` to `path` in `format`, creating parent directories.
pub fn write_network(network: &Network, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Gexf => gexf::write_gexf(network, &mut writer)?,
        ExportFormat::Json => json::write_json(network, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Read a network from `path`, choosing the format by extension.
pub fn read_network(path: &Path) -> Result<Network, ExportError> {
    let format = ExportFormat::resolve(None, path)?;
    let reader = BufReader::new(File::open(path)?);
    match format {
        ExportFormat::Gexf => gexf::read_gexf(reader),
        ExportFormat::Json => json::read_json(reader),
    }
}
