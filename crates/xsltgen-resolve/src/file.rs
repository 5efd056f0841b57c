use std::path::{Path, PathBuf};
use std::sync::Arc;

use xsltgen_archive::ArchiveEntryCache;
use xsltgen_cache::BuildLayout;
use xsltgen_config::XsltGenConfig;
use xsltgen_core::{join_rel, LocalProbe, PathProbe};

use crate::classpath::ClasspathResolver;

/// Result of a layered lookup: the matching path, or the last path tried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    path: PathBuf,
    found: bool,
}

impl Resolution {
    pub fn found(path: PathBuf) -> Self {
        Self { path, found: true }
    }

    pub fn missing(path: PathBuf) -> Self {
        Self { path, found: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// The path, if it was found.
    pub fn into_found(self) -> Option<PathBuf> {
        self.found.then_some(self.path)
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Resolves a `/`-separated path as absolute, then under the project root,
/// then on the classpath.
#[derive(Debug)]
pub struct FileResolver {
    project_root: PathBuf,
    classpath: ClasspathResolver,
    probe: Arc<dyn PathProbe>,
}

impl FileResolver {
    pub fn new(project_root: impl Into<PathBuf>, classpath: ClasspathResolver) -> Self {
        Self {
            project_root: project_root.into(),
            classpath,
            probe: Arc::new(LocalProbe),
        }
    }

    /// Project root and classpath from `config`, with archives extracted
    /// under the configured build directory.
    pub fn from_config(config: &XsltGenConfig) -> Self {
        let layout = BuildLayout::new(config.build_dir());
        let archives = ArchiveEntryCache::new(layout.extracts_dir());
        let classpath = ClasspathResolver::from_paths(
            config
                .classpath
                .iter()
                .map(|entry| join_rel_or_absolute(&config.project_root, entry)),
            archives,
        );
        Self::new(&config.project_root, classpath)
    }

    /// Replaces the probe for every lookup step, classpath and archives
    /// included.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn PathProbe>) -> Self {
        self.classpath = self.classpath.with_probe(probe.clone());
        self.probe = probe;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn classpath(&self) -> &ClasspathResolver {
        &self.classpath
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        tracing::debug!(
            target = "xsltgen.resolve",
            path,
            "resolving as absolute, project root or classpath"
        );

        let direct = Path::new(path);
        if direct.is_absolute() && self.probe_candidate(direct) {
            return Resolution::found(direct.to_path_buf());
        }

        let under_root = join_rel(&self.project_root, path);
        if self.probe_candidate(&under_root) {
            return Resolution::found(under_root);
        }

        let resolution = self
            .classpath
            .resolve(path)
            .unwrap_or_else(|| Resolution::missing(under_root));
        if !resolution.is_found() {
            tracing::debug!(
                target = "xsltgen.resolve",
                path,
                last = %resolution.path().display(),
                "not resolved"
            );
        }
        resolution
    }

    /// Logs and checks one candidate.
    pub(crate) fn probe_candidate(&self, candidate: &Path) -> bool {
        tracing::debug!(
            target = "xsltgen.resolve",
            path = %candidate.display(),
            "trying candidate"
        );
        let exists = self.probe.exists(candidate);
        if exists {
            tracing::debug!(
                target = "xsltgen.resolve",
                path = %candidate.display(),
                "resolved"
            );
        }
        exists
    }
}

fn join_rel_or_absolute(root: &Path, entry: &Path) -> PathBuf {
    if entry.is_absolute() {
        entry.to_path_buf()
    } else {
        root.join(entry)
    }
}
