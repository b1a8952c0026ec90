//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The subscriber is installed once, with the filter behind a reload layer
//! so [`set_enabled`] can silence and restore output at runtime (the
//! `logging_enabled` side of the configuration).
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .directive("graft_framework=debug")
//!     .init();
//! ```

use std::sync::OnceLock;

use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, reload};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line compact output.
    #[default]
    Compact,
    /// The default multi-field format.
    Full,
}

/// Installed filter handle plus the directive string it was built from,
/// kept so [`set_enabled`] can restore the original filter.
struct FilterToggle {
    handle: reload::Handle<EnvFilter, Registry>,
    directives: String,
}

static TOGGLE: OnceLock<FilterToggle> = OnceLock::new();

/// Silences or restores log output globally.
///
/// A no-op before the subscriber was initialized through
/// [`LoggingBuilder`].
pub fn set_enabled(enabled: bool) {
    let Some(toggle) = TOGGLE.get() else {
        return;
    };
    let filter = if enabled {
        EnvFilter::new(&toggle.directives)
    } else {
        EnvFilter::new("off")
    };
    let _ = toggle.handle.reload(filter);
}

/// A builder for configuring logging.
///
/// # Example
///
/// ```rust,ignore
/// use graft_runtime::logging::{LogFormat, LoggingBuilder};
///
/// LoggingBuilder::new()
///     .with_level(tracing::Level::DEBUG)
///     .format(LogFormat::Full)
///     .with_thread_ids(true)
///     .init();
/// ```
#[derive(Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    format: LogFormat,
    with_target: bool,
    with_thread_ids: bool,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Add a filter directive.
    ///
    /// ```rust,ignore
    /// builder.directive("graft_framework=debug")
    ///        .directive("graft_core=trace")
    /// ```
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Include thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// The effective filter directive string, `RUST_LOG` taking precedence
    /// over the configured level.
    fn filter_directives(&self) -> String {
        let base = match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(env) if !env.is_empty() => env,
            _ => self
                .level
                .unwrap_or(tracing::Level::INFO)
                .to_string()
                .to_lowercase(),
        };
        let mut directives = vec![base];
        directives.extend(self.directives.iter().cloned());
        directives.join(",")
    }

    /// Initialize the logging system.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let directives = self.filter_directives();
        let (filter, handle) = reload::Layer::new(EnvFilter::new(&directives));

        let result = match self.format {
            LogFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(self.with_target)
                        .with_thread_ids(self.with_thread_ids),
                )
                .try_init(),
            LogFormat::Full => tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(self.with_target)
                        .with_thread_ids(self.with_thread_ids),
                )
                .try_init(),
        };

        if result.is_ok() {
            let _ = TOGGLE.set(FilterToggle { handle, directives });
        }
        result
    }
}
