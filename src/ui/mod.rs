//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Command results are printed through this module so `--quiet` is
//! honoured in one place. Logs go through `tracing` to stderr.

pub mod output;
