//! Forward-slash relative paths.
//!
//! Requests (include paths, bundle names) and archive entry names are always
//! `/`-separated regardless of platform. These helpers keep them in that form
//! until they are joined onto a real directory.

use std::path::{Path, PathBuf};

/// Normalizes an archive entry name: `\` becomes `/`, leading separators, empty
/// segments and `.` segments are dropped, and `..` pops the previous segment.
///
/// Returns `None` when `..` would climb above the archive root.
pub fn normalize_entry(entry: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in entry.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Returns the parent directory of an entry name, or `None` for a bare name.
pub fn parent_entry(entry: &str) -> Option<String> {
    let entry = normalize_entry(entry)?;
    let (parent, _) = entry.rsplit_once('/')?;
    Some(parent.to_string())
}

/// Interprets `rel` relative to the entry directory `dir`.
pub fn join_entry(dir: &str, rel: &str) -> Option<String> {
    if dir.is_empty() {
        return normalize_entry(rel);
    }
    normalize_entry(&format!("{dir}/{rel}"))
}

/// Joins a `/`-separated relative path onto `base`.
///
/// Unlike [`Path::join`], a leading `/` in `rel` does not replace `base`: the
/// result always stays rooted at `base` (`..` segments are kept and left for
/// the OS to interpret).
pub fn join_rel(base: &Path, rel: &str) -> PathBuf {
    let mut out = base.to_path_buf();
    for segment in rel.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            other => out.push(other),
        }
    }
    out
}
