//! Pluggable content filters applied to resolved sources.

mod bundle;
mod translating;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use xsltgen_core::{EncodingError, Locale, TextEncoding};

use crate::file::FileResolver;

pub use bundle::BundleLoader;
pub use translating::{translate_text, TranslatingFilter, TRANSLATING_FILTER};

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter {name:?} (known filters: {known})")]
    UnknownFilter { name: String, known: String },

    #[error("invalid filter parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid encoding in filter parameter {name}: {source}")]
    Encoding {
        name: String,
        #[source]
        source: EncodingError,
    },

    #[error("bundle cannot be loaded: {bundle}")]
    BundleNotLoaded { bundle: String },

    #[error("failed to decode bundle file {path}: {source}")]
    BundleDecode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },
}

/// What a filter may use while initializing.
#[derive(Clone, Copy, Debug)]
pub struct FilterContext<'a> {
    /// For loading auxiliary files (bundles) the same way sources are found.
    pub resolver: &'a FileResolver,
    pub source_encoding: TextEncoding,
    pub default_locale: &'a Locale,
}

/// A text transformation applied to every resolved source.
///
/// A filter is created from the registry, configured with its parameters,
/// initialized once and then asked to transform any number of texts.
pub trait Filter: fmt::Debug + Send + Sync {
    fn configure(&mut self, parameters: &BTreeMap<String, String>) -> Result<(), FilterError>;

    fn initialize(&mut self, context: &FilterContext<'_>) -> Result<(), FilterError>;

    /// Transforms `text`; `name` identifies the source for diagnostics.
    fn transform(&self, text: &str, name: &str) -> Result<String, FilterError>;
}

pub type FilterFactory = Arc<dyn Fn() -> Box<dyn Filter> + Send + Sync>;

/// Maps configuration names to filter constructors.
#[derive(Clone)]
pub struct FilterRegistry {
    factories: HashMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// A registry without any filter.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(TRANSLATING_FILTER, || {
            Box::new(TranslatingFilter::default()) as Box<dyn Filter>
        });
        registry
    }

    /// Registers `factory` under `name`, replacing any previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Filter> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn factory(&self, name: &str) -> Result<FilterFactory, FilterError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| FilterError::UnknownFilter {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Filter>, FilterError> {
        self.factory(name).map(|factory| factory())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
