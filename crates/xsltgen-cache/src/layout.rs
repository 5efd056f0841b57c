use std::path::{Path, PathBuf};

/// Tool namespace directory under the build output root.
pub const TOOL_NAMESPACE: &str = "xslt-generator-maven-plugin";
/// Extraction cache directory, relative to the build output root.
pub const EXTRACTS_DIR: &str = "xslt-generator-maven-plugin/extracts";
/// Filtered content cache directory, relative to the build output root.
pub const FILTERED_DIR: &str = "filtered";
pub const PREPARED_TIMESTAMP_FILENAME: &str = "prepared-timestamp";
pub const TIMESTAMP_FILENAME: &str = "timestamp";

/// Paths of all persisted state, rooted at the build output directory.
///
/// Nothing is created on construction; each component creates what it writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildLayout {
    build_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn tool_dir(&self) -> PathBuf {
        self.build_dir.join(TOOL_NAMESPACE)
    }

    pub fn timestamp_file(&self) -> PathBuf {
        self.tool_dir().join(TIMESTAMP_FILENAME)
    }

    pub fn prepared_timestamp_file(&self) -> PathBuf {
        self.tool_dir().join(PREPARED_TIMESTAMP_FILENAME)
    }

    pub fn extracts_dir(&self) -> PathBuf {
        self.build_dir.join(EXTRACTS_DIR)
    }

    pub fn filtered_dir(&self) -> PathBuf {
        self.build_dir.join(FILTERED_DIR)
    }
}
