//! The three pipeline operations: extract, reformat and pull.
//!
//! Operations share no in-process state; each takes a parameter object,
//! validates it before touching the filesystem and communicates only through
//! the files it reads and writes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

pub use crate::sync::{PullSummary, pull};

use crate::config::{ExtractParams, ReformatParams};
use crate::core::{
    builder::CatalogBuilder,
    catalog::{Catalog, Flag},
    po,
    scanner::SourceScanner,
    sources::expand_sources,
};
use crate::error::{Error, Result};

/// Result of `extract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub output: PathBuf,
    pub files_scanned: usize,
    pub entries: usize,
    pub needs_review: usize,
}

/// Result of `reformat`: one written path per input, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReformatSummary {
    pub written: Vec<PathBuf>,
}

/// Scan the sources and overwrite the output with a fresh template.
pub fn extract(params: &ExtractParams) -> Result<ExtractSummary> {
    extract_at(params, Utc::now())
}

/// `extract` with a fixed creation timestamp.
pub fn extract_at(params: &ExtractParams, created: DateTime<Utc>) -> Result<ExtractSummary> {
    params.validate()?;
    let scanner = SourceScanner::new(&params.rules)?;

    let files = expand_sources(&params.sources)?;
    if files.is_empty() {
        return Err(Error::InvalidParameter {
            name: "from",
            reason: "no source files matched".to_string(),
        });
    }

    let extractions = scanner.scan_files(&files)?;
    let catalog = CatalogBuilder::new(&params.project, &params.version, created).build(extractions);
    po::write_catalog(&params.output, &catalog)?;

    let needs_review = catalog
        .iter()
        .filter(|entry| entry.has_flag(&Flag::NeedsReview))
        .count();
    info!(
        output = %params.output.display(),
        files = files.len(),
        entries = catalog.len(),
        needs_review,
        "template written"
    );

    Ok(ExtractSummary {
        output: params.output.clone(),
        files_scanned: files.len(),
        entries: catalog.len(),
        needs_review,
    })
}

/// Parse every input and write it back in canonical form.
///
/// All inputs are parsed before anything is written, so a malformed input
/// leaves every destination untouched.
pub fn reformat(params: &ReformatParams) -> Result<ReformatSummary> {
    params.validate()?;

    let catalogs = params
        .inputs
        .iter()
        .map(|input| po::read_catalog(input).map(|catalog| (input, catalog)))
        .collect::<Result<Vec<(&PathBuf, Catalog)>>>()?;

    let single_file = params.inputs.len() == 1 && is_file_target(&params.output);
    let mut written = Vec::with_capacity(catalogs.len());
    for (input, catalog) in catalogs {
        let target = if single_file {
            params.output.clone()
        } else {
            let name = input.file_name().ok_or_else(|| Error::InvalidParameter {
                name: "from",
                reason: format!("{} has no file name", input.display()),
            })?;
            params.output.join(name)
        };
        po::write_catalog(&target, &catalog)?;
        info!(input = %input.display(), output = %target.display(), "catalog reformatted");
        written.push(target);
    }

    Ok(ReformatSummary { written })
}

/// A destination names a file when it is not an existing directory and
/// carries a catalog extension.
fn is_file_target(path: &Path) -> bool {
    !path.is_dir()
        && path
            .extension()
            .is_some_and(|ext| ext == "po" || ext == "pot")
}
