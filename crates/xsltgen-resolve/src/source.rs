use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use url::Url;
use xsltgen_cache::{BuildLayout, ContentCache};
use xsltgen_config::{FilterConfig, XsltGenConfig};
use xsltgen_core::{canonicalize_if_possible, join_rel, Locale, TextEncoding};

use crate::file::{FileResolver, Resolution};
use crate::filter::{Filter, FilterContext, FilterError, FilterFactory, FilterRegistry};
use crate::{ResolveError, Result};

/// Resolved, filtered text together with the identity of the file it came
/// from. The identity serves as the base URI for the includes of this text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSource {
    path: PathBuf,
    system_id: Url,
    text: String,
}

impl TextSource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `file:` URL of the resolved file.
    pub fn system_id(&self) -> &Url {
        &self.system_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Resolution of `href` references as found in templates.
pub trait SourceResolver {
    /// Resolves `href`, relative to `base` when given.
    ///
    /// `Ok(None)` means nothing was found; callers decide whether that is an
    /// error.
    fn resolve(&self, href: &str, base: Option<&str>) -> Result<Option<TextSource>>;
}

/// The configured filter, created and initialized on first use.
struct FilterSlot {
    name: String,
    parameters: BTreeMap<String, String>,
    factory: FilterFactory,
    default_locale: Locale,
    instance: Mutex<Option<Box<dyn Filter>>>,
}

impl FilterSlot {
    fn error(&self, source: FilterError) -> ResolveError {
        ResolveError::Filter {
            filter: self.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSlot")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("default_locale", &self.default_locale)
            .field("initialized", &self.instance.lock().is_some())
            .finish()
    }
}

/// Resolves references relative to a base URI first, then through a
/// [`FileResolver`]. Found files are decoded and passed through the
/// configured filter; filtered text is cached in a [`ContentCache`].
#[derive(Debug)]
pub struct UriResolver {
    files: FileResolver,
    encoding: TextEncoding,
    content: ContentCache,
    filter: Option<FilterSlot>,
}

impl UriResolver {
    pub fn new(files: FileResolver, encoding: TextEncoding, content: ContentCache) -> Self {
        Self {
            files,
            encoding,
            content,
            filter: None,
        }
    }

    /// Builds the resolver for a project: classpath, encoding, content cache
    /// under the build directory and the configured filter.
    ///
    /// An unknown filter name fails here rather than on first use.
    pub fn from_config(config: &XsltGenConfig, registry: &FilterRegistry) -> Result<Self> {
        let encoding = config.source_encoding()?;
        let layout = BuildLayout::new(config.build_dir());
        let resolver = Self::new(
            FileResolver::from_config(config),
            encoding,
            ContentCache::for_layout(&layout, encoding),
        );
        match &config.filter {
            Some(filter) => resolver.with_filter(registry, filter, config.default_locale()),
            None => Ok(resolver),
        }
    }

    pub fn with_filter(
        mut self,
        registry: &FilterRegistry,
        config: &FilterConfig,
        default_locale: Locale,
    ) -> Result<Self> {
        let factory = registry
            .factory(&config.name)
            .map_err(|source| ResolveError::Filter {
                filter: config.name.clone(),
                source,
            })?;
        self.filter = Some(FilterSlot {
            name: config.name.clone(),
            parameters: config.parameters.clone(),
            factory,
            default_locale,
            instance: Mutex::new(None),
        });
        Ok(self)
    }

    #[must_use]
    pub fn with_content_cache(mut self, content: ContentCache) -> Self {
        self.content = content;
        self
    }

    pub fn file_resolver(&self) -> &FileResolver {
        &self.files
    }

    pub fn content_cache(&self) -> &ContentCache {
        &self.content
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn resolve_file(&self, path: &str) -> Resolution {
        self.files.resolve(path)
    }

    /// Resolves a template that must exist.
    pub fn resolve_as_source(&self, path: &str) -> Result<TextSource> {
        let resolution = self.files.resolve(path);
        if !resolution.is_found() {
            return Err(ResolveError::NotFound {
                path: resolution.into_path(),
            });
        }
        self.create_source(resolution.path())
    }

    /// Reads and filters an existing file.
    pub fn create_source(&self, path: &Path) -> Result<TextSource> {
        let text = self.filtered_text(path)?;
        let canonical = canonicalize_if_possible(path).map_err(|source| ResolveError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let system_id = Url::from_file_path(&canonical).map_err(|()| ResolveError::SystemId {
            path: canonical.clone(),
        })?;
        Ok(TextSource {
            path: path.to_path_buf(),
            system_id,
            text,
        })
    }

    /// `href` next to the file named by `base`, if `base` is a file URI.
    fn relative_to_base(&self, href: &str, base: &str) -> Option<PathBuf> {
        let url = match Url::parse(base) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    target = "xsltgen.resolve",
                    base,
                    error = %err,
                    "unable to parse base URI"
                );
                return None;
            }
        };
        let Ok(base_file) = url.to_file_path() else {
            tracing::warn!(
                target = "xsltgen.resolve",
                base,
                "base URI does not name a local file"
            );
            return None;
        };
        base_file.parent().map(|dir| join_rel(dir, href))
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|source| ResolveError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.encoding
            .decode(&bytes)
            .map_err(|source| ResolveError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }

    fn filtered_text(&self, path: &Path) -> Result<String> {
        let Some(slot) = &self.filter else {
            return self.read_text(path);
        };
        self.content.get_or_compute(path, || {
            let text = self.read_text(path)?;
            self.apply_filter(slot, &text, path)
        })
    }

    fn apply_filter(&self, slot: &FilterSlot, text: &str, path: &Path) -> Result<String> {
        let mut instance = slot.instance.lock();
        let filter = match instance.take() {
            Some(filter) => filter,
            None => self.create_filter(slot)?,
        };
        tracing::debug!(
            target = "xsltgen.filter",
            filter = %slot.name,
            path = %path.display(),
            "applying filter"
        );
        let filtered = filter.transform(text, &path.display().to_string());
        *instance = Some(filter);
        filtered.map_err(|source| slot.error(source))
    }

    fn create_filter(&self, slot: &FilterSlot) -> Result<Box<dyn Filter>> {
        tracing::debug!(target = "xsltgen.filter", filter = %slot.name, "initializing filter");
        let mut filter = (slot.factory)();
        let context = FilterContext {
            resolver: &self.files,
            source_encoding: self.encoding,
            default_locale: &slot.default_locale,
        };
        filter
            .configure(&slot.parameters)
            .and_then(|()| filter.initialize(&context))
            .map_err(|source| slot.error(source))?;
        Ok(filter)
    }
}

impl SourceResolver for UriResolver {
    fn resolve(&self, href: &str, base: Option<&str>) -> Result<Option<TextSource>> {
        tracing::debug!(
            target = "xsltgen.resolve",
            href,
            base = base.unwrap_or(""),
            "resolving at base"
        );
        let from_base = base
            .and_then(|base| self.relative_to_base(href, base))
            .filter(|candidate| self.files.probe_candidate(candidate));
        let path = match from_base {
            Some(path) => path,
            None => match self.files.resolve(href).into_found() {
                Some(path) => path,
                None => return Ok(None),
            },
        };
        self.create_source(&path).map(Some)
    }
}

/// Tries a source directory before falling back to a [`UriResolver`].
#[derive(Debug)]
pub struct SourceDirResolver {
    src_dir: PathBuf,
    inner: UriResolver,
}

impl SourceDirResolver {
    pub fn new(src_dir: impl Into<PathBuf>, inner: UriResolver) -> Self {
        Self {
            src_dir: src_dir.into(),
            inner,
        }
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    pub fn inner(&self) -> &UriResolver {
        &self.inner
    }

    pub fn into_inner(self) -> UriResolver {
        self.inner
    }
}

impl SourceResolver for SourceDirResolver {
    fn resolve(&self, href: &str, base: Option<&str>) -> Result<Option<TextSource>> {
        tracing::debug!(
            target = "xsltgen.resolve",
            href,
            src_dir = %self.src_dir.display(),
            "resolving at source dir"
        );
        let candidate = join_rel(&self.src_dir, href);
        if self.inner.files.probe_candidate(&candidate) {
            return self.inner.create_source(&candidate).map(Some);
        }
        self.inner.resolve(href, base)
    }
}
