//! Error taxonomy for the catalog pipeline.
//!
//! Extraction ambiguity is deliberately absent: an argument that cannot be
//! resolved statically becomes an entry flagged `needs-review`, not an error.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::core::po::ParseError;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A parameter the operation cannot run without was not supplied.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A parameter was supplied but is unusable.
    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A source file or catalog could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A catalog could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Catalog text is malformed. `origin` names the file or remote locale.
    #[error("{origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ParseError,
    },

    /// The remote service rejected the credentials.
    #[error("authentication rejected by {url} (HTTP {status})")]
    Auth { url: String, status: u16 },

    /// A request failed in transport or returned an unexpected status.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub fn parse(origin: impl Into<String>, source: ParseError) -> Self {
        Error::Parse {
            origin: origin.into(),
            source,
        }
    }

    /// Errors after which no part of an operation can meaningfully succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_) | Error::InvalidParameter { .. } | Error::Auth { .. }
        )
    }
}
