//! Process-wide logging setup for LeyDeudo binaries and test harnesses.

/// Initialize logging with defaults (`RUST_LOG`, else `info`; JSON lines).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init(&LogConfig::default());
}

pub use self::tracing::{LogConfig, LogFormat};

/// Subscriber construction (filters, output format).
pub mod tracing;
