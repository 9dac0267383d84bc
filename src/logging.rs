//! Logging setup
//!
//! Progress goes through `tracing` to stderr so that linter and test output on stdout stays
//! readable. `RUST_LOG`, when set, replaces the default filter entirely.

use std::env;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// Include the module target (e.g. `pkgdev::container::image`) in each line.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    /// Level from an explicit `--log-level`, else DEBUG for `--verbose`, else INFO.
    pub fn from_cli(log_level: Option<&str>, verbose: bool) -> Self {
        let level = match log_level {
            Some(level_str) => parse_level(level_str),
            None if verbose => Level::DEBUG,
            None => Level::INFO,
        };
        Self {
            level,
            include_target: level >= Level::DEBUG,
        }
    }
}

/// Parse a level name, case-insensitively. Unknown names fall back to INFO.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("pkgdev={}", config.level))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(config.include_target)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("Warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_from_cli() {
        assert_eq!(LoggingConfig::from_cli(None, false).level, Level::INFO);
        assert_eq!(LoggingConfig::from_cli(None, true).level, Level::DEBUG);
        assert_eq!(
            LoggingConfig::from_cli(Some("warn"), true).level,
            Level::WARN
        );
        assert!(LoggingConfig::from_cli(None, true).include_target);
        assert!(!LoggingConfig::default().include_target);
    }
}
