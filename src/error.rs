//! Error types for dirload
//!
//! Every failure aborts the running load and surfaces to the caller. The
//! memo keeps whatever entries were written before the failure.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring or running a directory load
#[derive(Error, Debug)]
pub enum Error {
    /// Metadata query or directory listing failed
    #[error("Failed to read '{}': {source}", .path.display())]
    Lookup {
        /// Absolute path that could not be inspected
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The artifact loader could not turn a matched file into a value
    #[error("Failed to load artifact '{}': {source:#}", .path.display())]
    Load {
        /// Absolute path of the artifact
        path: PathBuf,
        /// Loader failure
        #[source]
        source: anyhow::Error,
    },

    /// A caller-supplied `map` or `resolve` callback failed
    #[error("Callback failed for '{}': {source:#}", .path.display())]
    Callback {
        /// Absolute path of the artifact being resolved
        path: PathBuf,
        /// Error returned by the callback, untouched
        #[source]
        source: anyhow::Error,
    },

    /// A filter or exclude pattern did not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern text as given
        pattern: String,
        /// Compiler error
        #[source]
        source: regex::Error,
    },

    /// Configuration file could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Absolute path the error refers to, if any
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Lookup { path, .. } | Self::Load { path, .. } | Self::Callback { path, .. } => {
                Some(path)
            }
            Self::Pattern { .. } | Self::Config(_) => None,
        }
    }

    /// Wrap a callback failure, keeping load failures raised inside the callback as `Load`
    pub(crate) fn from_callback(path: PathBuf, source: anyhow::Error) -> Self {
        match source.downcast::<Self>() {
            Ok(inner) => inner,
            Err(source) => Self::Callback { path, source },
        }
    }
}
