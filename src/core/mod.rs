//! Catalog pipeline building blocks.
//!
//! ## Module Structure
//!
//! - `catalog`: Entry, Catalog and header data model
//! - `scanner`: Call-site extraction of message literals from sources
//! - `builder`: Deduplication of extractions into a template catalog
//! - `po`: Gettext PO serialization and parsing
//! - `sources`: Expansion of files, directories and globs to scan
//! - `line_index`: Offset to line number lookup

pub mod builder;
pub mod catalog;
pub mod line_index;
pub mod po;
pub mod scanner;
pub mod sources;

pub use builder::CatalogBuilder;
pub use catalog::{Catalog, Comment, Entry, Flag, Header, Location};
pub use scanner::{ExtractionRule, RawExtraction, SourceScanner, default_rules};
