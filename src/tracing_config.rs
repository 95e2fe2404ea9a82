//! Tracing configuration for the command-line tool
//!
//! The library only emits events; the binary installs the subscriber. Events are
//! written to stderr so that stdout carries nothing but report lines.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// How log lines on stderr are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Colored single-line events
    Console,
    /// Plain single-line events, for CI logs
    Compact,
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Log settings taken from `-v`, `--log-format` and `RUST_LOG`
#[derive(Debug)]
pub struct TracingConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    pub format: TracingFormat,
    /// `EnvFilter` directives; when set, `verbosity` is ignored
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            format: TracingFormat::Console,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Take the filter from `RUST_LOG` when it is set and non-empty
    pub fn with_env_filter_from_env(self) -> Self {
        match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(filter) if !filter.trim().is_empty() => self.with_env_filter(filter),
            _ => self,
        }
    }

    /// Level for the number of `-v` flags: a clean run logs nothing by default,
    /// `-v` adds the run summary, `-vv` one event per file, `-vvv` tool invocations
    pub fn verbosity_to_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Install the global subscriber, writing to stderr
    ///
    /// Fails when the filter directives do not parse or a subscriber is
    /// already installed.
    pub fn init(self) -> anyhow::Result<()> {
        use tracing_subscriber::fmt;

        let directives = self
            .env_filter
            .as_deref()
            .unwrap_or_else(|| self.verbosity_to_filter());
        let registry = Registry::default().with(EnvFilter::try_new(directives)?);

        match self.format {
            TracingFormat::Console | TracingFormat::Compact => {
                let fmt_layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(self.format == TracingFormat::Console)
                    .with_target(false)
                    .compact();
                registry.with(fmt_layer).try_init()?;
            },
            #[cfg(feature = "tracing-json")]
            TracingFormat::Json => {
                let fmt_layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(true);
                registry.with(fmt_layer).try_init()?;
            },
        }

        Ok(())
    }
}
