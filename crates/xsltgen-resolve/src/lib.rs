//! Layered lookup of templates, includes and resource bundles.
//!
//! [`FileResolver`] searches an absolute path, the project root and then the
//! classpath (directories and archives, see [`ClasspathResolver`]).
//! [`UriResolver`] adds base-URI-relative lookup and optional content
//! filtering backed by a [`xsltgen_cache::ContentCache`];
//! [`SourceDirResolver`] tries a source directory before all of that.
//!
//! Filters are looked up by name in a [`FilterRegistry`]. The built-in
//! [`TranslatingFilter`] replaces `#token#` placeholders from a locale-layered
//! resource bundle.

mod classpath;
mod error;
mod file;
pub mod filter;
mod source;

pub use classpath::{ClasspathEntry, ClasspathResolver};
pub use error::{ResolveError, Result};
pub use file::{FileResolver, Resolution};
pub use filter::{
    translate_text, BundleLoader, Filter, FilterContext, FilterError, FilterFactory,
    FilterRegistry, TranslatingFilter, TRANSLATING_FILTER,
};
pub use source::{SourceDirResolver, SourceResolver, TextSource, UriResolver};
