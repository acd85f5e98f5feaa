//! Pull of translated catalogs from the remote translation service.
//!
//! ## Module Structure
//!
//! - `client`: Authenticated HTTP access to one remote resource
//! - `merge`: Reconciliation of the local template with a locale catalog

pub mod client;
pub mod merge;

use std::path::PathBuf;

use futures::future::join_all;
use tracing::{info, warn};

pub use client::RemoteSyncClient;
pub use merge::{MergeStats, merge_locale};

use crate::config::PullParams;
use crate::core::{
    catalog::Catalog,
    po::{self, from_text_for_locale},
};
use crate::error::{Error, Result};

/// A locale written to the destination directory.
#[derive(Debug)]
pub struct LocaleOutcome {
    pub locale: String,
    pub path: PathBuf,
    pub stats: MergeStats,
}

/// A locale that could not be fetched, parsed or written.
#[derive(Debug)]
pub struct LocaleFailure {
    pub locale: String,
    pub error: Error,
}

/// Per-locale result of a pull.
#[derive(Debug, Default)]
pub struct PullSummary {
    pub succeeded: Vec<LocaleOutcome>,
    pub failed: Vec<LocaleFailure>,
}

impl PullSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch every locale of the resource, merge each with the local template and
/// write `<dest>/<locale>.po`.
///
/// All locale fetches run concurrently and are awaited to completion before
/// anything is written. Rejected credentials on any request fail the whole
/// pull with nothing written; any other per-locale problem only fails that
/// locale. Running two pulls into the same directory at once is not guarded
/// against.
pub async fn pull(params: &PullParams) -> Result<PullSummary> {
    params.validate()?;
    let template = po::read_catalog(&params.template)?;

    let client = RemoteSyncClient::new(
        &params.endpoint,
        &params.resource,
        params.credentials.clone(),
    )?;
    let locales = client.list_locales().await?;
    info!(
        resource = client.resource_url(),
        count = locales.len(),
        "fetching locales"
    );

    let client = &client;
    let fetched = join_all(locales.into_iter().map(|locale| async move {
        let result = client.fetch_locale(&locale).await;
        (locale, result)
    }))
    .await;

    let mut responses = Vec::with_capacity(fetched.len());
    for (locale, result) in fetched {
        match result {
            Err(error @ Error::Auth { .. }) => return Err(error),
            other => responses.push((locale, other)),
        }
    }

    let mut summary = PullSummary::default();
    for (locale, result) in responses {
        match result.and_then(|text| write_locale(&template, &text, &locale, params)) {
            Ok(outcome) => {
                info!(locale = %outcome.locale, path = %outcome.path.display(), "locale written");
                summary.succeeded.push(outcome);
            }
            Err(error) => {
                warn!(locale = %locale, %error, "locale failed");
                summary.failed.push(LocaleFailure { locale, error });
            }
        }
    }
    Ok(summary)
}

fn write_locale(
    template: &Catalog,
    text: &str,
    locale: &str,
    params: &PullParams,
) -> Result<LocaleOutcome> {
    let remote = from_text_for_locale(text, locale)
        .map_err(|e| Error::parse(format!("remote catalog for {}", locale), e))?;
    let merged = merge_locale(template, remote, locale);

    let path = params.dest_dir.join(format!("{}.po", locale));
    po::write_catalog(&path, &merged)?;

    Ok(LocaleOutcome {
        locale: locale.to_string(),
        path,
        stats: MergeStats::of(&merged, locale),
    })
}
