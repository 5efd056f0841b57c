use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;
use xsltgen_cache::BuildLayout;
use xsltgen_config::XsltGenConfig;
use xsltgen_core::modified_time;

use crate::{BuildError, Result};

/// Where a build cycle stands, derived from the marker files on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampState {
    /// No marker exists yet.
    Uninitialized,
    /// A run started and has not been finalized since.
    Prepared,
    /// The last started run was finalized.
    Finalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The finalized marker took over the prepared marker's time.
    CopiedFromPrepared(SystemTime),
    /// No prepared marker existed; the current time was used instead.
    DefaultedToNow(SystemTime),
}

impl FinalizeOutcome {
    pub fn time(self) -> SystemTime {
        match self {
            Self::CopiedFromPrepared(time) | Self::DefaultedToNow(time) => time,
        }
    }
}

/// The two-phase build marker: `prepared-timestamp` is touched when a run
/// starts, `timestamp` receives its time when the run completes.
#[derive(Clone, Debug)]
pub struct BuildTimestamp {
    prepared: PathBuf,
    finalized: PathBuf,
    force: bool,
}

impl BuildTimestamp {
    pub fn new(layout: &BuildLayout) -> Self {
        Self {
            prepared: layout.prepared_timestamp_file(),
            finalized: layout.timestamp_file(),
            force: false,
        }
    }

    /// Markers under the configured build directory, forced when the
    /// project sets `force = true`.
    pub fn from_config(config: &XsltGenConfig) -> Self {
        Self::new(&BuildLayout::new(config.build_dir())).with_force(config.force)
    }

    /// Treat every input as stale, regardless of the markers.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn prepared_file(&self) -> &Path {
        &self.prepared
    }

    pub fn timestamp_file(&self) -> &Path {
        &self.finalized
    }

    /// Marks the start of a build run.
    pub fn prepare(&self) -> Result<SystemTime> {
        let now = SystemTime::now();
        touch(&self.prepared, FileTime::from_system_time(now))?;
        tracing::info!(
            target = "xsltgen.build",
            path = %self.prepared.display(),
            "prepared timestamp"
        );
        Ok(now)
    }

    /// Marks the end of a build run.
    ///
    /// Tolerates a missing `prepare`: the current time is used and a warning
    /// is logged.
    pub fn finalize(&self) -> Result<FinalizeOutcome> {
        let outcome = match mtime(&self.prepared)? {
            Some(prepared) => FinalizeOutcome::CopiedFromPrepared(prepared),
            None => {
                tracing::warn!(
                    target = "xsltgen.build",
                    path = %self.prepared.display(),
                    "prepared timestamp not available (did you forget to configure an initialize goal?); using current time"
                );
                FinalizeOutcome::DefaultedToNow(SystemTime::now())
            }
        };
        touch(&self.finalized, FileTime::from_system_time(outcome.time()))?;
        tracing::info!(
            target = "xsltgen.build",
            path = %self.finalized.display(),
            "finalized timestamp"
        );
        Ok(outcome)
    }

    pub fn state(&self) -> Result<TimestampState> {
        let prepared = mtime(&self.prepared)?;
        let finalized = mtime(&self.finalized)?;
        Ok(match (prepared, finalized) {
            (None, None) => TimestampState::Uninitialized,
            (Some(prepared), Some(finalized)) if prepared > finalized => TimestampState::Prepared,
            (Some(_), None) => TimestampState::Prepared,
            (_, Some(_)) => TimestampState::Finalized,
        })
    }

    /// Time of the last finalized run, if any.
    pub fn finalized_at(&self) -> Result<Option<SystemTime>> {
        mtime(&self.finalized)
    }

    /// Whether `file` changed since the last finalized run.
    ///
    /// Always true when forced. Without a finalized marker every existing
    /// file is stale; a missing `file` never is.
    pub fn is_stale(&self, file: &Path) -> Result<bool> {
        if self.force {
            return Ok(true);
        }
        let Some(modified) = mtime(file)? else {
            return Ok(false);
        };
        Ok(match self.finalized_at()? {
            Some(finalized) => modified > finalized,
            None => true,
        })
    }

    /// Whether `dest` has to be regenerated from `src`.
    pub fn needs_generation(&self, src: &Path, dest: &Path) -> Result<bool> {
        if self.force {
            return Ok(true);
        }
        Ok(self.is_stale(src)? && !is_up_to_date(src, dest)?)
    }
}

/// True iff `dest` exists and `src` is strictly older than it.
pub fn is_up_to_date(src: &Path, dest: &Path) -> Result<bool> {
    let Some(dest_time) = mtime(dest)? else {
        return Ok(false);
    };
    Ok(mtime(src)?.is_some_and(|src_time| src_time < dest_time))
}

fn mtime(path: &Path) -> Result<Option<SystemTime>> {
    modified_time(path).map_err(|source| BuildError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

fn touch(path: &Path, time: FileTime) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| BuildError::Touch {
            path: path.to_path_buf(),
            source,
        })?;
    filetime::set_file_mtime(path, time).map_err(|source| BuildError::Touch {
        path: path.to_path_buf(),
        source,
    })
}
