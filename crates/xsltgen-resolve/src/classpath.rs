use std::path::{Path, PathBuf};
use std::sync::Arc;

use xsltgen_archive::ArchiveEntryCache;
use xsltgen_core::{join_rel, LocalProbe, PathProbe};

use crate::file::Resolution;

/// One element of the compile classpath.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClasspathEntry {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl ClasspathEntry {
    /// A regular file is an archive; anything else (including a path that
    /// does not exist yet) is a directory.
    pub fn classify(path: impl Into<PathBuf>, probe: &dyn PathProbe) -> Self {
        let path = path.into();
        if probe.is_file(&path) {
            Self::Archive(path)
        } else {
            Self::Directory(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive(path) => path,
        }
    }
}

/// Finds relative paths in an ordered list of classpath entries. The first
/// entry containing the path wins.
#[derive(Debug)]
pub struct ClasspathResolver {
    entries: Vec<ClasspathEntry>,
    archives: ArchiveEntryCache,
    probe: Arc<dyn PathProbe>,
}

impl ClasspathResolver {
    pub fn new(entries: Vec<ClasspathEntry>, archives: ArchiveEntryCache) -> Self {
        Self {
            entries,
            archives,
            probe: Arc::new(LocalProbe),
        }
    }

    /// Classifies each path on the local file system.
    pub fn from_paths<I, P>(paths: I, archives: ArchiveEntryCache) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let entries = paths
            .into_iter()
            .map(|path| ClasspathEntry::classify(path, &LocalProbe))
            .collect();
        Self::new(entries, archives)
    }

    /// Also used by the archive cache for extracted candidates.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn PathProbe>) -> Self {
        self.archives = self.archives.with_probe(probe.clone());
        self.probe = probe;
        self
    }

    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }

    pub fn archives(&self) -> &ArchiveEntryCache {
        &self.archives
    }

    /// Looks `rel` up in every entry, in order.
    ///
    /// Returns `None` for an empty classpath; otherwise the first existing
    /// candidate, or the last one tried.
    pub fn resolve(&self, rel: &str) -> Option<Resolution> {
        let mut last = None;
        for entry in &self.entries {
            let candidate = match entry {
                ClasspathEntry::Directory(dir) => join_rel(dir, rel),
                ClasspathEntry::Archive(archive) => self.archives.get_file(archive, rel),
            };
            tracing::debug!(
                target = "xsltgen.resolve",
                path = %candidate.display(),
                "trying candidate"
            );
            if self.probe.exists(&candidate) {
                tracing::debug!(
                    target = "xsltgen.resolve",
                    path = %candidate.display(),
                    "resolved"
                );
                return Some(Resolution::found(candidate));
            }
            last = Some(candidate);
        }
        last.map(Resolution::missing)
    }
}
