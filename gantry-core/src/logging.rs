//! Logging setup for Gantry.
//!
//! Thin configuration layer over `tracing-subscriber`. Defaults to compact
//! output on STDERR filtered by `RUST_LOG`; applications that want JSON or
//! pretty output opt in through [`LogConfig`].
//!
//! ```no_run
//! use gantry_core::logging::{LogConfig, LogFormat, LogLevel};
//!
//! LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .init();
//! ```

use tracing_subscriber::EnvFilter;

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};

/// Log level used when `RUST_LOG` is not set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Structured JSON, one event per line
    Json,
    /// Colored, multi-line output for development
    Pretty,
    /// Single-line output (default)
    #[default]
    Compact,
}

/// Logging configuration builder
#[derive(Debug, Clone)]
pub struct LogConfig {
    level: LogLevel,
    format: LogFormat,
    stdout: bool,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            stdout: false,
        }
    }

    /// Set the default log level (overridden by `RUST_LOG`)
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the output format
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to STDOUT instead of STDERR
    pub fn to_stdout(mut self) -> Self {
        self.stdout = true;
        self
    }

    /// Install the global subscriber.
    ///
    /// Safe to call more than once; later calls are ignored, so tests can
    /// initialize logging without coordinating.
    pub fn init(self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()));

        let builder = tracing_subscriber::fmt().with_env_filter(filter);

        let result = match (self.format, self.stdout) {
            (LogFormat::Json, true) => builder.json().try_init(),
            (LogFormat::Json, false) => builder.json().with_writer(std::io::stderr).try_init(),
            (LogFormat::Pretty, true) => builder.pretty().try_init(),
            (LogFormat::Pretty, false) => builder.pretty().with_writer(std::io::stderr).try_init(),
            (LogFormat::Compact, true) => builder.compact().try_init(),
            (LogFormat::Compact, false) => {
                builder.compact().with_writer(std::io::stderr).try_init()
            }
        };
        if result.is_err() {
            trace!("global subscriber already installed");
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}
