//! Tracing conventions and optional subscriber setup.
//!
//! The controller emits `tracing` events on every dispatch decision. This
//! module pins down the target prefix and structured field names so that
//! consumers can filter and query them consistently, and offers a one-call
//! subscriber bootstrap for embeddings that do not configure
//! `tracing-subscriber` themselves. It is entirely optional: bring your own
//! subscriber if you have one.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Target prefix shared by all typeahead tracing events.
///
/// Filter with, for example:
/// ```text
/// RUST_LOG=typeahead=debug
/// ```
pub const TARGET_PREFIX: &str = "typeahead";

/// Structured field names used in tracing events.
///
/// Consistent names enable structured log queries across the dispatch
/// pipeline. Note that raw query text is never logged, only lengths.
pub mod field_names {
    pub const QUERY_LEN: &str = "query_len";
    pub const DEBOUNCE_MS: &str = "debounce_ms";
    pub const TICKET: &str = "ticket";
    pub const RESULT_COUNT: &str = "result_count";
    pub const PREFIX_LEN: &str = "prefix_len";
}

/// Parse a log level string (case-insensitive).
///
/// Recognized values: `trace`, `debug`, `info`, `warn`, `error`.
#[must_use]
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Recommended level for the current environment.
///
/// Checks `TYPEAHEAD_LOG_LEVEL`, falling back to the provided default.
#[must_use]
pub fn level_from_env(default: Level) -> Level {
    std::env::var("TYPEAHEAD_LOG_LEVEL")
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(default)
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// Directive priority: `RUST_LOG` if set, otherwise `typeahead=<default>`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{TARGET_PREFIX}={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_prefix_is_typeahead() {
        assert_eq!(TARGET_PREFIX, "typeahead");
    }

    #[test]
    fn parse_level_recognizes_valid_levels() {
        assert_eq!(parse_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("info"), Some(Level::INFO));
        assert_eq!(parse_level("warn"), Some(Level::WARN));
        assert_eq!(parse_level("error"), Some(Level::ERROR));
    }

    #[test]
    fn parse_level_is_case_insensitive() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("Warn"), Some(Level::WARN));
    }

    #[test]
    fn parse_level_rejects_unknown_values() {
        assert_eq!(parse_level("verbose"), None);
        assert_eq!(parse_level(""), None);
        assert_eq!(parse_level(" info"), None);
    }

    #[test]
    fn field_names_are_non_empty() {
        for field in [
            field_names::QUERY_LEN,
            field_names::DEBOUNCE_MS,
            field_names::TICKET,
            field_names::RESULT_COUNT,
            field_names::PREFIX_LEN,
        ] {
            assert!(!field.is_empty());
        }
    }

    #[test]
    fn level_from_env_falls_back_to_default() {
        // The variable is unset in the test environment.
        fn level_from_custom_key(key: &str, default: Level) -> Level {
            std::env::var(key)
                .ok()
                .and_then(|s| parse_level(&s))
                .unwrap_or(default)
        }
        assert_eq!(
            level_from_custom_key("TYPEAHEAD_NEVER_SET_98765", Level::WARN),
            Level::WARN
        );
    }
}
