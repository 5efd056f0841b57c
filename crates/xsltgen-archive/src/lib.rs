//! Extraction of single entries from classpath archives (JARs and zips), with
//! an on-disk extraction cache.
//!
//! [`ArchiveExtractor`] only knows how to pull one entry out of an archive.
//! [`ArchiveEntryCache`] decides where extracted entries live, serves repeated
//! requests from disk, and retries misses relative to the directory of the
//! last entry that was found in the same archive.

mod entry_cache;
mod extract;

pub use entry_cache::ArchiveEntryCache;
pub use extract::{ArchiveError, ArchiveExtractor, ZipExtractor, ZIP_ARCHIVE_EXTENSIONS};
