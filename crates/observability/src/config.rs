//! Environment-driven observability settings.

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Parse a format name; anything unrecognized falls back to JSON.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Tracing setup, read from the process environment.
///
/// - `RUST_LOG`: filter directives (default `info`)
/// - `ORDERFLOW_LOG_FORMAT`: `json` (default) or `pretty`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl ObservabilityConfig {
    pub const FILTER_VAR: &'static str = "RUST_LOG";
    pub const FORMAT_VAR: &'static str = "ORDERFLOW_LOG_FORMAT";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let filter = lookup(Self::FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.filter);
        let format = lookup(Self::FORMAT_VAR)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(defaults.format);
        Self { filter, format }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ObservabilityConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ObservabilityConfig::default());
    }

    #[test]
    fn reads_filter_and_format() {
        let cfg = ObservabilityConfig::from_lookup(lookup(&[
            ("RUST_LOG", "orderflow_orders=debug"),
            ("ORDERFLOW_LOG_FORMAT", "Pretty"),
        ]));
        assert_eq!(cfg.filter, "orderflow_orders=debug");
        assert_eq!(cfg.format, LogFormat::Pretty);
    }

    #[test]
    fn blank_filter_and_unknown_format_fall_back() {
        let cfg = ObservabilityConfig::from_lookup(lookup(&[
            ("RUST_LOG", "  "),
            ("ORDERFLOW_LOG_FORMAT", "xml"),
        ]));
        assert_eq!(cfg.filter, "info");
        assert_eq!(cfg.format, LogFormat::Json);
    }
}
