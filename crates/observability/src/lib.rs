//! Tracing and logging setup shared by binaries and tests.

pub mod config;

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
pub use self::tracing::{init, init_with};
