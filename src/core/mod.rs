//! core
//!
//! Core domain types, the mention network builder, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Handle, PostId, Post
//! - [`document`] - Raw post documents and handle normalization
//! - [`extract`] - Mention, hashtag, and word extraction
//! - [`network`] - Mention network and its builder
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing keeps malformed records out of the builder
//! - The builder is a pure function of its input
//! - Configuration is passed in explicitly, never read ambiently

pub mod config;
pub mod document;
pub mod extract;
pub mod network;
pub mod types;
