use std::path::PathBuf;

use xsltgen_core::EncodingError;

/// Errors produced while reading or writing cached content.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode cached content {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },

    #[error("cannot encode content for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
