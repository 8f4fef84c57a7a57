//! Subscriber setup.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from
//! [`LogConfig::default_directive`]. Decision logs from `leydeudo_auth` are
//! emitted at `debug`, so `RUST_LOG=leydeudo_auth=debug` surfaces every
//! denied route check.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "info";

/// Env var selecting the output format (`json` or `pretty`).
pub const LOG_FORMAT_VAR: &str = "LEYDEUDO_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to JSON.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub default_directive: String,
    pub format: LogFormat,
    /// Route output through the test writer so `cargo test` captures it.
    pub test_writer: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: DEFAULT_DIRECTIVE.to_string(),
            format: std::env::var(LOG_FORMAT_VAR)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            test_writer: false,
        }
    }
}

impl LogConfig {
    pub fn for_tests() -> Self {
        Self {
            default_directive: "leydeudo=debug,warn".to_string(),
            format: LogFormat::Pretty,
            test_writer: true,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Install the global subscriber. Returns `false` when one was already set.
pub fn init(config: &LogConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(true);

    let result = match (config.format, config.test_writer) {
        (LogFormat::Json, false) => builder.json().try_init(),
        (LogFormat::Json, true) => builder.json().with_test_writer().try_init(),
        (LogFormat::Pretty, false) => builder.try_init(),
        (LogFormat::Pretty, true) => builder.with_test_writer().try_init(),
    };
    result.is_ok()
}
