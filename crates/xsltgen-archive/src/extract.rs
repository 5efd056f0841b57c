use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

/// File extensions handled by [`ZipExtractor`] (compared case-insensitively).
pub const ZIP_ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "war", "ear", "aar", "jmod"];

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("no extractor for archive type of {path}")]
    UnsupportedArchive { path: PathBuf },

    #[error("failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read zip {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("entry {entry} of {path} escapes the extraction directory")]
    UnsafeEntry { path: PathBuf, entry: String },

    #[error("failed to extract {entry} from {path}: {source}")]
    Write {
        path: PathBuf,
        entry: String,
        #[source]
        source: xsltgen_cache::CacheError,
    },
}

/// Extracts single entries out of archive files.
pub trait ArchiveExtractor: fmt::Debug + Send + Sync {
    /// Extracts `entry` (a `/`-separated name) from `archive` into `dest_dir`,
    /// preserving the entry's relative path.
    ///
    /// Returns `Ok(false)` when the archive has no file entry with that name.
    fn extract_entry(&self, archive: &Path, entry: &str, dest_dir: &Path)
        -> Result<bool, ArchiveError>;
}

/// Zip-format extractor (JAR, WAR, EAR, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn supports(archive: &Path) -> bool {
        archive
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ZIP_ARCHIVE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract_entry(
        &self,
        archive: &Path,
        entry: &str,
        dest_dir: &Path,
    ) -> Result<bool, ArchiveError> {
        if !Self::supports(archive) {
            return Err(ArchiveError::UnsupportedArchive {
                path: archive.to_path_buf(),
            });
        }

        let file = File::open(archive).map_err(|source| ArchiveError::Open {
            path: archive.to_path_buf(),
            source,
        })?;
        let zip_err = |source| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source,
        };
        let mut zip = ZipArchive::new(BufReader::new(file)).map_err(zip_err)?;
        let mut zip_entry = match zip.by_name(entry) {
            Ok(zip_entry) => zip_entry,
            Err(ZipError::FileNotFound) => return Ok(false),
            Err(err) => return Err(zip_err(err)),
        };
        if zip_entry.is_dir() {
            return Ok(false);
        }

        let Some(relative) = zip_entry.enclosed_name() else {
            return Err(ArchiveError::UnsafeEntry {
                path: archive.to_path_buf(),
                entry: entry.to_string(),
            });
        };
        let dest = dest_dir.join(relative);

        xsltgen_cache::atomic_write_with(&dest, |out| io::copy(&mut zip_entry, out).map(|_| ()))
            .map_err(|source| ArchiveError::Write {
                path: archive.to_path_buf(),
                entry: entry.to_string(),
                source,
            })?;
        Ok(true)
    }
}
