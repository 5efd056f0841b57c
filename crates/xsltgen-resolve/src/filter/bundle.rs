use std::collections::HashMap;

use xsltgen_core::{Locale, TextEncoding};

use crate::file::FileResolver;
use crate::filter::FilterError;

/// Loads a resource bundle as one merged key/value map.
///
/// Bundle files are found through a [`FileResolver`], so they may live in the
/// project, a classpath directory or an archive. For each locale in the chain
/// (requested, then default) the variants `name_ll_CC_variant`, `name_ll_CC`,
/// `name_ll` and `name` are tried, each with a `.properties` extension. Keys
/// from earlier files are never overwritten by later ones.
#[derive(Clone, Debug)]
pub struct BundleLoader {
    bundle: String,
    encoding: TextEncoding,
}

impl BundleLoader {
    pub fn new(bundle: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            bundle: bundle.into(),
            encoding,
        }
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Fails with [`FilterError::BundleNotLoaded`] when no variant exists.
    pub fn load(
        &self,
        resolver: &FileResolver,
        requested: &Locale,
        default: &Locale,
    ) -> Result<HashMap<String, String>, FilterError> {
        let mut resources = HashMap::new();
        let mut loaded = false;
        for locale in [requested, default] {
            for suffix in locale.bundle_suffixes() {
                let name = format!("{}{suffix}.properties", self.bundle);
                loaded |= self.load_file(resolver, &name, &mut resources)?;
            }
        }

        if !loaded {
            return Err(FilterError::BundleNotLoaded {
                bundle: self.bundle.clone(),
            });
        }
        Ok(resources)
    }

    fn load_file(
        &self,
        resolver: &FileResolver,
        name: &str,
        resources: &mut HashMap<String, String>,
    ) -> Result<bool, FilterError> {
        let resolution = resolver.resolve(name);
        let bytes = match std::fs::read(resolution.path()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(
                    target = "xsltgen.filter",
                    path = %resolution.path().display(),
                    error = %err,
                    "cannot load properties"
                );
                return Ok(false);
            }
        };
        let text = self
            .encoding
            .decode(&bytes)
            .map_err(|source| FilterError::BundleDecode {
                path: resolution.path().to_path_buf(),
                source,
            })?;

        for (key, value) in xsltgen_properties::parse(&text).into_map() {
            resources.entry(key).or_insert(value);
        }
        tracing::debug!(
            target = "xsltgen.filter",
            path = %resolution.path().display(),
            "loaded properties"
        );
        Ok(true)
    }
}
