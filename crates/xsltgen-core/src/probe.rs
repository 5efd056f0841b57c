use std::fmt;
use std::path::Path;

/// Existence checks used by every resolution step.
///
/// Resolution never mutates the file system through this trait; it only asks
/// whether a candidate is there. Tests substitute their own implementation to
/// observe which candidates were tried.
pub trait PathProbe: fmt::Debug + Send + Sync {
    /// Returns whether a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Returns whether a path is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Local OS file system probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProbe;

impl PathProbe for LocalProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
