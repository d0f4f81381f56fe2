// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type for the fallible parts of the logging core.
//!
//! Only initialization surfaces these to callers. Failures while writing or
//! rotating are reported on the fallback channel instead, see [`crate::fallback`].

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid logging configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to encode log record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
