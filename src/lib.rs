//! chirpgraph - collect posts, build mention networks, report on them
//!
//! chirpgraph is a single-binary tool (`chirp`) that gathers social-media
//! posts matching a query into a local store, derives the directed mention
//! network between their authors, and renders summaries of what was
//! collected.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, wires components)
//! - [`core`] - Domain types, mention network builder, configuration
//! - [`store`] - Post store (SQLite and in-memory)
//! - [`source`] - Post sources (Twitter v2 recent search)
//! - [`export`] - Network serializers (GEXF, JSON node-link)
//! - [`render`] - Focus selection, layout, and PNG charts
//! - [`sentiment`] - Lexicon-based sentiment scoring
//! - [`summary`] - Text summary of a post collection
//! - [`ui`] - User-facing output
//!
//! # Invariants
//!
//! 1. The network builder is pure: it never performs I/O
//! 2. Every edge's endpoints are nodes of the network
//! 3. Records are validated at the store boundary, not inside the builder
//! 4. Components receive explicit configuration; only the CLI reads the
//!    environment

pub mod cli;
pub mod core;
pub mod export;
pub mod render;
pub mod sentiment;
pub mod source;
pub mod store;
pub mod summary;
pub mod ui;
