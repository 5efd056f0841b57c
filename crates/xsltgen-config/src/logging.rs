use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// `[logging]` table of the project config.
///
/// ```toml
/// [logging]
/// level = "xsltgen.archive=debug,info"
/// json = false
/// stderr = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level name (`warn`, `debug`, ...) or `EnvFilter` directives keyed by
    /// the `xsltgen.*` targets.
    pub level: String,

    pub json: bool,

    /// When off, events are still filtered but go nowhere.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_owned(),
            json: false,
            stderr: true,
        }
    }
}

const DEFAULT_LEVEL: &str = "info";

impl LoggingConfig {
    /// Directives for `level`: level names are accepted in any case (and
    /// `warning` means `warn`), anything else is passed through as is.
    pub(crate) fn level_directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return DEFAULT_LEVEL.to_owned();
        }
        if level.eq_ignore_ascii_case("warning") {
            return "warn".to_owned();
        }
        match level.parse::<tracing::Level>() {
            Ok(parsed) if !level.starts_with(|c: char| c.is_ascii_digit()) => {
                parsed.to_string().to_ascii_lowercase()
            }
            _ => level.to_owned(),
        }
    }

    /// The filter for [`init_tracing`]. A non-empty `RUST_LOG` is appended to
    /// the configured directives, so it can raise or lower single targets.
    ///
    /// Unparseable directives fall back to `RUST_LOG` alone, then to the
    /// configured level, then to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = self.level_directives();
        let from_env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let mut attempts = Vec::with_capacity(3);
        if let Some(from_env) = from_env {
            attempts.push(format!("{configured},{from_env}"));
            attempts.push(from_env);
        }
        attempts.push(configured);
        attempts
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

/// Install the global tracing subscriber described by `config`.
///
/// Only the first call per process has an effect; later calls (and hosts that
/// already installed their own subscriber) are left alone.
pub fn init_tracing(config: &LoggingConfig) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.set(()).is_err() {
        return;
    }

    let writer = if config.stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::sink)
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(writer)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        tracing::debug!(
            target = "xsltgen.config",
            error = %err,
            "tracing subscriber already installed"
        );
    }
}
