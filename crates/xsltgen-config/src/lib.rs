//! Configuration for the xsltgen resolution layer.
//!
//! The generation pipeline either builds an [`XsltGenConfig`] directly or loads
//! it from a TOML file:
//!
//! ```toml
//! project_root = "."
//! build_dir = "target"
//! classpath = ["target/classes", "lib/templates.jar"]
//! source_encoding = "UTF-8"
//! force = false
//!
//! [filter]
//! name = "translating"
//! parameters = { bundle = "i18n/Messages", startToken = "${", endToken = "}" }
//!
//! [logging]
//! level = "debug"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xsltgen_core::{EncodingError, Locale, TextEncoding};

mod logging;

pub use logging::{init_tracing, LoggingConfig};

/// Default build output directory name, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "target";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid source encoding: {0}")]
    Encoding(#[from] EncodingError),

    #[error("filter name must not be empty")]
    EmptyFilterName,
}

/// Which filter to apply to resolved sources, and its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Registered filter name (for example `translating`).
    pub name: String,

    /// Filter-specific parameters. See the filter for the keys it reads.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl FilterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XsltGenConfig {
    /// Project base directory. Relative requests resolve against it.
    pub project_root: PathBuf,

    /// Build output root (extraction cache, filtered content, timestamps).
    ///
    /// Defaults to `<project_root>/target`; relative values are resolved
    /// against `project_root`.
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Ordered classpath entries. Regular files are treated as archives,
    /// everything else as directories.
    #[serde(default)]
    pub classpath: Vec<PathBuf>,

    /// Encoding of templates, sources and bundles.
    #[serde(default)]
    pub source_encoding: Option<String>,

    /// Regenerate every output regardless of timestamps.
    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub filter: Option<FilterConfig>,

    /// Overrides the process locale used as the fallback bundle chain.
    #[serde(default)]
    pub default_locale: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl XsltGenConfig {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            build_dir: None,
            classpath: Vec::new(),
            source_encoding: None,
            force: false,
            filter: None,
            default_locale: None,
            logging: LoggingConfig::default(),
        }
    }

    /// Loads and validates a TOML config file. A relative `project_root` is
    /// resolved against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&text, base_dir)
    }

    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text)?;
        if config.project_root.is_relative() {
            config.project_root = base_dir.join(&config.project_root);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.source_encoding {
            TextEncoding::from_name(name)?;
        }
        if let Some(filter) = &self.filter {
            if filter.name.trim().is_empty() {
                return Err(ConfigError::EmptyFilterName);
            }
        }
        Ok(())
    }

    pub fn build_dir(&self) -> PathBuf {
        match &self.build_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.project_root.join(dir),
            None => self.project_root.join(DEFAULT_BUILD_DIR),
        }
    }

    /// The configured source encoding, or the platform default with a warning
    /// when none is configured.
    pub fn source_encoding(&self) -> Result<TextEncoding, ConfigError> {
        match self.source_encoding.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(TextEncoding::from_name(name)?),
            _ => {
                let encoding = TextEncoding::PLATFORM_DEFAULT;
                tracing::warn!(
                    target = "xsltgen.config",
                    encoding = %encoding,
                    "source encoding has not been set, using platform encoding; build is platform dependent"
                );
                Ok(encoding)
            }
        }
    }

    pub fn default_locale(&self) -> Locale {
        match &self.default_locale {
            Some(tag) => Locale::parse(tag),
            None => Locale::from_env(),
        }
    }
}
