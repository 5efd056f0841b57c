use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use xsltgen_core::{join_entry, join_rel, normalize_entry, parent_entry, LocalProbe, PathProbe};

use crate::extract::{ArchiveExtractor, ZipExtractor};

/// Outcome of one `(archive, requested entry)` lookup, remembered for the
/// lifetime of the cache.
#[derive(Clone, Debug)]
struct ExtractionRecord {
    path: PathBuf,
    found: bool,
    /// Directory the request was reinterpreted under, if the direct lookup missed.
    fallback_subdir: Option<String>,
}

#[derive(Debug, Default)]
struct CacheState {
    records: HashMap<(String, String), ExtractionRecord>,
    /// Parent directory (inside the archive) of the last entry found directly.
    /// `None` records a hit on a top-level entry.
    last_valid_subdir: HashMap<String, Option<String>>,
}

/// Serves files out of classpath archives, extracting each entry at most once.
///
/// Each archive gets a private extraction directory named after the archive
/// file (`<extracts>/<archive-name>/`), so a warm extraction directory is reused
/// across processes. When an entry is not found at the requested path, the
/// request is retried once relative to the directory of the last entry found
/// in the same archive: after `dirA/x.xsl` was found, a request for `y.xsl` is
/// served from `dirA/y.xsl`.
///
/// Extraction failures never propagate: they are logged and reported as a
/// (non-existent) path, so resolution can move on to the next classpath entry.
#[derive(Debug)]
pub struct ArchiveEntryCache {
    extracts_dir: PathBuf,
    extractor: Box<dyn ArchiveExtractor>,
    probe: Arc<dyn PathProbe>,
    state: Mutex<CacheState>,
}

impl ArchiveEntryCache {
    pub fn new(extracts_dir: impl Into<PathBuf>) -> Self {
        Self::with_extractor(extracts_dir, Box::new(ZipExtractor))
    }

    pub fn with_extractor(
        extracts_dir: impl Into<PathBuf>,
        extractor: Box<dyn ArchiveExtractor>,
    ) -> Self {
        Self {
            extracts_dir: extracts_dir.into(),
            extractor,
            probe: Arc::new(LocalProbe),
            state: Mutex::new(CacheState::default()),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn PathProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn extracts_dir(&self) -> &Path {
        &self.extracts_dir
    }

    /// Private extraction directory of `archive`.
    pub fn extract_dir(&self, archive: &Path) -> PathBuf {
        self.extracts_dir.join(archive_name(archive))
    }

    /// Directory (inside `archive`) of the last entry found there directly.
    pub fn last_valid_subdir(&self, archive: &Path) -> Option<String> {
        self.state
            .lock()
            .last_valid_subdir
            .get(&archive_name(archive))
            .cloned()
            .flatten()
    }

    /// Returns the extracted file for `entry` in `archive`.
    ///
    /// The returned path may not exist: that is the "not in this archive" signal.
    pub fn get_file(&self, archive: &Path, entry: &str) -> PathBuf {
        let name = archive_name(archive);
        let extract_dir = self.extracts_dir.join(&name);
        tracing::debug!(
            target = "xsltgen.archive",
            entry,
            archive = %archive.display(),
            "getting file from archive"
        );

        // `None` when the request climbs above the archive root. Such a
        // request can only be served by the retry below.
        let direct = normalize_entry(entry);
        if direct.as_deref() == Some("") {
            return below_archive(archive, entry);
        }
        if direct.is_none() {
            tracing::debug!(
                target = "xsltgen.archive",
                entry,
                "entry path escapes the archive root"
            );
        }
        let key = (
            name.clone(),
            direct.clone().unwrap_or_else(|| entry.replace('\\', "/")),
        );

        let previous = self.state.lock().records.get(&key).cloned();
        if let Some(record) = &previous {
            if record.found && self.probe.exists(&record.path) {
                return record.path.clone();
            }
        }

        let miss = match &direct {
            Some(direct) => {
                let candidate = join_rel(&extract_dir, direct);
                if self.direct_hit(archive, direct, &extract_dir, &candidate, previous.as_ref()) {
                    let subdir = parent_entry(direct);
                    tracing::debug!(
                        target = "xsltgen.archive",
                        archive = %name,
                        subdir = subdir.as_deref().unwrap_or(""),
                        "storing last valid subdir"
                    );
                    let mut state = self.state.lock();
                    state.last_valid_subdir.insert(name, subdir);
                    state.records.insert(
                        key,
                        ExtractionRecord {
                            path: candidate.clone(),
                            found: true,
                            fallback_subdir: None,
                        },
                    );
                    return candidate;
                }
                candidate
            }
            None => below_archive(archive, entry),
        };

        // The request may be relative to the directory the caller last found a
        // sibling in. Retry once under that directory.
        let subdir = self.last_valid_subdir(archive);
        if let Some(record) = &previous {
            if !record.found && record.fallback_subdir == subdir {
                return record.path.clone();
            }
        }
        let Some(retry_entry) = subdir
            .as_deref()
            .and_then(|dir| join_entry(dir, entry))
            .filter(|retry_entry| !retry_entry.is_empty())
        else {
            self.record_miss(key, miss.clone(), None);
            return miss;
        };

        let retry = join_rel(&extract_dir, &retry_entry);
        tracing::debug!(
            target = "xsltgen.archive",
            entry = %retry_entry,
            archive = %name,
            "retrying relative to last valid subdir"
        );
        let found = self.probe.exists(&retry)
            || (self.extract(archive, &retry_entry, &extract_dir) && self.probe.exists(&retry));
        if found {
            self.state.lock().records.insert(
                key,
                ExtractionRecord {
                    path: retry.clone(),
                    found: true,
                    fallback_subdir: subdir,
                },
            );
        } else {
            self.record_miss(key, retry.clone(), subdir);
        }
        retry
    }

    /// Direct lookup: warm extraction directory first, then the archive. The
    /// archive is not asked again for a name it already did not contain.
    fn direct_hit(
        &self,
        archive: &Path,
        entry: &str,
        extract_dir: &Path,
        candidate: &Path,
        previous: Option<&ExtractionRecord>,
    ) -> bool {
        let missed_before =
            previous.is_some_and(|record| !record.found || record.fallback_subdir.is_some());
        self.probe.exists(candidate)
            || (!missed_before
                && self.extract(archive, entry, extract_dir)
                && self.probe.exists(candidate))
    }

    fn record_miss(&self, key: (String, String), path: PathBuf, fallback_subdir: Option<String>) {
        self.state.lock().records.insert(
            key,
            ExtractionRecord {
                path,
                found: false,
                fallback_subdir,
            },
        );
    }

    fn extract(&self, archive: &Path, entry: &str, extract_dir: &Path) -> bool {
        tracing::debug!(
            target = "xsltgen.archive",
            entry,
            archive = %archive.display(),
            dest = %extract_dir.display(),
            "extracting"
        );
        match self.extractor.extract_entry(archive, entry, extract_dir) {
            Ok(extracted) => extracted,
            Err(err) => {
                tracing::warn!(
                    target = "xsltgen.archive",
                    archive = %archive.display(),
                    error = %err,
                    "error unpacking file"
                );
                false
            }
        }
    }
}

/// Miss path for requests with no place inside the extraction directory.
/// The archive is a regular file, so nothing below it exists.
fn below_archive(archive: &Path, entry: &str) -> PathBuf {
    let segments: Vec<&str> = entry
        .split(['/', '\\'])
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect();
    if segments.is_empty() {
        archive.join("-")
    } else {
        join_rel(archive, &segments.join("/"))
    }
}

fn archive_name(archive: &Path) -> String {
    archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive.to_string_lossy().into_owned())
}
