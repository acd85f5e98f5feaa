//! Gettext PO text format.
//!
//! [`to_text`] and [`from_text`] are inverses for any catalog whose
//! translations belong to its own locale: keys, translations, locations,
//! comment order and flags survive a round trip unchanged.

mod parser;
mod writer;

use std::{fs, path::Path};

use tracing::debug;

pub use parser::{ParseError, ParseErrorKind, from_text, from_text_for_locale};
pub use writer::to_text;

use crate::core::catalog::Catalog;
use crate::error::{Error, Result};

/// Unicode isolates wrapping a reference path that contains whitespace, as
/// written by gettext 0.20 and later.
const ISOLATE_START: char = '\u{2068}';
const ISOLATE_END: char = '\u{2069}';

/// Read and parse a catalog file.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    from_text(&text).map_err(|e| Error::parse(path.display().to_string(), e))
}

/// Serialize `catalog` and write it to `path`, creating parent directories.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    write_atomic(path, &to_text(catalog))
}

/// Write through a sibling temporary file renamed into place, so readers
/// never observe a partially written catalog.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = fs::write(&tmp, text).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(Error::write(path, e));
    }
    debug!(path = %path.display(), bytes = text.len(), "catalog written");
    Ok(())
}

/// Escape a value for use inside a quoted PO string.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            c => out.push(c),
        }
    }
    out
}
