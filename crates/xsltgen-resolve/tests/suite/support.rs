use std::io::Write;
use std::path::{Path, PathBuf};

use xsltgen_config::XsltGenConfig;
use zip::write::SimpleFileOptions;

/// A throwaway project directory with a `target/` build dir.
pub struct Project {
    pub tmp: tempfile::TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("project");
        std::fs::create_dir_all(&root).unwrap();
        Self { tmp, root }
    }

    /// A path outside the project root.
    pub fn outside(&self, rel: &str) -> PathBuf {
        self.tmp.path().join(rel)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join("target")
    }

    pub fn config(&self) -> XsltGenConfig {
        let mut config = XsltGenConfig::new(&self.root);
        config.source_encoding = Some("UTF-8".to_string());
        config.default_locale = Some("en".to_string());
        config
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        write_file(&self.root.join(rel), contents.as_bytes())
    }
}

pub fn write_file(path: &Path, bytes: &[u8]) -> PathBuf {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
    path.to_path_buf()
}

pub fn write_jar(path: &Path, entries: &[(&str, &str)]) -> PathBuf {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut jar = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    for (name, contents) in entries {
        jar.start_file(*name, SimpleFileOptions::default()).unwrap();
        jar.write_all(contents.as_bytes()).unwrap();
    }
    jar.finish().unwrap();
    path.to_path_buf()
}
