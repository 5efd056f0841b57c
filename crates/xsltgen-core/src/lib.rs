//! Shared primitives for the xsltgen resolution layer.
//!
//! - [`PathProbe`]: the existence check every resolution step goes through
//! - forward-slash relative paths ([`join_rel`], [`join_entry`], [`parent_entry`])
//! - [`TextEncoding`] for reading and writing template/bundle text
//! - [`Locale`] for layered bundle lookup

mod encoding;
mod fs;
mod locale;
mod probe;
mod rel_path;

pub use encoding::{EncodingError, TextEncoding};
pub use fs::{canonicalize_if_possible, modified_time};
pub use locale::Locale;
pub use probe::{LocalProbe, PathProbe};
pub use rel_path::{join_entry, join_rel, normalize_entry, parent_entry};
