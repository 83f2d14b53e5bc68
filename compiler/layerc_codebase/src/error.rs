//! Errors that abort a file's scan.
//!
//! Everything else (conflicting sightings, ambiguous annotations, macro
//! arity errors) is reported through the diagnostics sink and never stops
//! scanning.

use std::io;
use std::path::PathBuf;

/// A file or cache entry could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scan cache entry {key}: {message}")]
    Cache { key: String, message: String },
}

impl ScanError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScanError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn cache(key: impl Into<String>, message: impl ToString) -> Self {
        ScanError::Cache {
            key: key.into(),
            message: message.to_string(),
        }
    }
}
