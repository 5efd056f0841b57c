//! On-disk state of an xsltgen build.
//!
//! ## On-disk layout
//!
//! Everything lives under the build output root (see [`BuildLayout`]):
//! - `xslt-generator-maven-plugin/prepared-timestamp`, `.../timestamp`:
//!   build timestamp markers (see `xsltgen-build`)
//! - `xslt-generator-maven-plugin/extracts/<archive-name>/...`:
//!   entries extracted from classpath archives (see `xsltgen-archive`)
//! - `filtered/<rebased-path>`:
//!   filtered source content, see [`ContentCache`]
//!
//! No locking is done around these directories. Individual files are written
//! through a temp file plus rename, so concurrent builds sharing one output
//! root can only lose writes, never observe a half-written file.

mod content;
mod error;
mod layout;
mod util;

pub use content::ContentCache;
pub use error::CacheError;
pub use layout::{
    BuildLayout, EXTRACTS_DIR, FILTERED_DIR, PREPARED_TIMESTAMP_FILENAME, TIMESTAMP_FILENAME,
    TOOL_NAMESPACE,
};
pub use util::{atomic_write, atomic_write_with};

pub type Result<T> = std::result::Result<T, CacheError>;
