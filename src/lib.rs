//! poctl - gettext catalog pipeline
//!
//! poctl scans JavaScript sources for translatable messages, writes them as a
//! gettext PO template, rewrites catalogs in canonical form and pulls
//! translated catalogs from a remote translation service, merging each with
//! the local template.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and per-operation parameters
//! - `core`: Catalog model, source scanner, catalog builder and PO text format
//! - `error`: Error taxonomy shared by all operations
//! - `pipeline`: The extract, reformat and pull operations
//! - `sync`: Remote client, merge policy and pull orchestration

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod sync;
