use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::CacheError;

/// Writes `bytes` to `path` through a temp file in the same directory, creating
/// parent directories as needed.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    atomic_write_with(path, |file| file.write_all(bytes))
}

/// Like [`atomic_write`], but lets the caller stream into the temp file.
///
/// The destination only appears once `write` has succeeded; on error the temp
/// file is removed and `path` is left untouched.
pub fn atomic_write_with(
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> io::Result<()>,
) -> Result<(), CacheError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| CacheError::io(parent, err))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".xsltgen-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|err| CacheError::io(parent, err))?;

    write(tmp.as_file_mut())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|err| CacheError::io(path, err))?;

    tmp.persist(path)
        .map_err(|err| CacheError::io(path, err.error))?;
    Ok(())
}
