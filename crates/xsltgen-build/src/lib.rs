//! Incremental build tracking.
//!
//! A build run calls [`BuildTimestamp::prepare`] when it starts and
//! [`BuildTimestamp::finalize`] once it is done. The finalized marker then
//! carries the start time of the last completed run; any input modified after
//! it needs regeneration.

mod timestamp;

use std::path::PathBuf;

pub use timestamp::{is_up_to_date, BuildTimestamp, FinalizeOutcome, TimestampState};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to create timestamp directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to touch timestamp file {path}: {source}")]
    Touch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read modification time of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;
