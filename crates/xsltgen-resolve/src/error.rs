use std::path::PathBuf;

use xsltgen_cache::CacheError;
use xsltgen_config::ConfigError;
use xsltgen_core::EncodingError;

use crate::filter::FilterError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured filter could not be created, initialized or applied.
    #[error("cannot process filter {filter}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: FilterError,
    },

    /// A template that was explicitly asked for does not exist. `path` is the
    /// last candidate that was tried.
    #[error("cannot process template file {path}: not found")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },

    #[error("cannot express {path} as a file URL")]
    SystemId { path: PathBuf },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
