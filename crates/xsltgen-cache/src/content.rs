use std::io;
use std::path::{Path, PathBuf};

use xsltgen_core::{canonicalize_if_possible, TextEncoding};

use crate::error::CacheError;
use crate::layout::BuildLayout;
use crate::util::atomic_write;

/// Stores the processed (filtered) text of source files so each file is
/// processed at most once.
///
/// Entries are keyed by the source's canonical path relative to the rebase
/// root and stored at the same relative path under the store directory. Files
/// outside the rebase root have no key and are never cached.
#[derive(Clone, Debug)]
pub struct ContentCache {
    rebase_root: PathBuf,
    store_at: PathBuf,
    encoding: TextEncoding,
}

impl ContentCache {
    pub fn new(
        rebase_root: impl Into<PathBuf>,
        store_at: impl Into<PathBuf>,
        encoding: TextEncoding,
    ) -> Self {
        Self {
            rebase_root: rebase_root.into(),
            store_at: store_at.into(),
            encoding,
        }
    }

    /// Cache rooted at the build output directory, storing under `filtered/`.
    pub fn for_layout(layout: &BuildLayout, encoding: TextEncoding) -> Self {
        Self::new(layout.build_dir(), layout.filtered_dir(), encoding)
    }

    pub fn rebase_root(&self) -> &Path {
        &self.rebase_root
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_at
    }

    /// Where the processed content of `source` is stored, or `None` if `source`
    /// cannot be rebased.
    pub fn cache_path(&self, source: &Path) -> Option<PathBuf> {
        let source = match std::fs::canonicalize(source) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(
                    target = "xsltgen.cache",
                    path = %source.display(),
                    error = %err,
                    "cannot canonicalize source; content not cacheable"
                );
                return None;
            }
        };
        let root = match canonicalize_if_possible(&self.rebase_root) {
            Ok(root) => root,
            Err(err) => {
                tracing::debug!(
                    target = "xsltgen.cache",
                    path = %self.rebase_root.display(),
                    error = %err,
                    "cannot canonicalize rebase root"
                );
                return None;
            }
        };

        let relative = source.strip_prefix(&root).ok()?;
        if relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.store_at.join(relative))
    }

    /// Returns the cached content for `source`, if any.
    pub fn retrieve(&self, source: &Path) -> Result<Option<String>, CacheError> {
        let Some(stored) = self.cache_path(source) else {
            return Ok(None);
        };
        let bytes = match std::fs::read(&stored) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(CacheError::io(stored, err)),
        };
        tracing::debug!(
            target = "xsltgen.cache",
            path = %stored.display(),
            "retrieving content from file cache"
        );
        self.encoding
            .decode(&bytes)
            .map(Some)
            .map_err(|source| CacheError::Decode {
                path: stored,
                source,
            })
    }

    /// Stores processed content for `source`. Returns `false` when `source`
    /// lies outside the rebase root and nothing was written.
    pub fn store(&self, source: &Path, content: &str) -> Result<bool, CacheError> {
        let Some(stored) = self.cache_path(source) else {
            tracing::debug!(
                target = "xsltgen.cache",
                path = %source.display(),
                "file cannot be rebased, content not stored"
            );
            return Ok(false);
        };
        let bytes = self
            .encoding
            .encode(content)
            .map_err(|err| CacheError::Encode {
                path: stored.clone(),
                source: err,
            })?;
        tracing::debug!(
            target = "xsltgen.cache",
            path = %stored.display(),
            "storing content in file cache"
        );
        atomic_write(&stored, &bytes)?;
        Ok(true)
    }

    /// Returns the cached content for `source`, computing and storing it on a miss.
    ///
    /// `compute` runs at most once per call. A failure to persist the computed
    /// content is logged and does not fail the call.
    pub fn get_or_compute<E>(
        &self,
        source: &Path,
        compute: impl FnOnce() -> Result<String, E>,
    ) -> Result<String, E>
    where
        E: From<CacheError>,
    {
        if let Some(cached) = self.retrieve(source)? {
            return Ok(cached);
        }

        let content = compute()?;
        if let Err(err) = self.store(source, &content) {
            tracing::error!(
                target = "xsltgen.cache",
                path = %source.display(),
                error = %err,
                "cannot store content in file cache"
            );
        }
        Ok(content)
    }
}
