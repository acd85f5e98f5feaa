//! Expansion of `from` entries into the ordered list of files to scan.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use glob::glob;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extensions picked up when a directory is given.
pub const SOURCE_EXTENSIONS: &[&str] = &["js"];

/// Check if a pattern contains glob wildcards (* or ?).
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Expand files, directories and glob patterns, in the order given.
///
/// Directories are walked recursively in file-name order; glob matches are
/// taken in the alphabetical order `glob` yields. A file reached twice is kept
/// at its first position. Plain paths are not checked here: a missing file
/// fails later, when it is read.
pub fn expand_sources(entries: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for entry in entries {
        if is_glob_pattern(entry) {
            let matches = glob(entry).map_err(|e| Error::InvalidParameter {
                name: "from",
                reason: format!("invalid glob pattern \"{}\": {}", entry, e.msg),
            })?;
            for matched in matches {
                let path = matched.map_err(|e| {
                    let path = e.path().to_path_buf();
                    Error::read(path, e.into_error())
                })?;
                if path.is_file() {
                    push(path);
                }
            }
        } else if Path::new(entry).is_dir() {
            for item in WalkDir::new(entry).sort_by_file_name() {
                let item = item.map_err(|e| {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| entry.into());
                    Error::read(path, e.into())
                })?;
                if item.file_type().is_file() && has_source_extension(item.path()) {
                    push(item.into_path());
                }
            }
        } else {
            push(PathBuf::from(entry));
        }
    }

    Ok(files)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
