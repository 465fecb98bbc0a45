//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, before the config is loaded, so loader
//! diagnostics are captured. Output goes to stderr; stdout is reserved for
//! the operator-facing reports.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Level used when neither CLI flags nor the environment pick one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Environment variable with a fallback log level.
pub const LEVEL_ENV_VAR: &str = "SENTINEL_LOG_LEVEL";

/// Install the stderr subscriber.
///
/// Precedence is `-v` flags, then `RUST_LOG`, then `SENTINEL_LOG_LEVEL`, then
/// [`DEFAULT_LEVEL`]. `main` folds the flag and `SENTINEL_LOG_LEVEL` choices
/// into `level`; `from_cli` says whether `level` came from the flags and must
/// win over `RUST_LOG`.
pub fn init(level: &str, from_cli: bool) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, from_cli)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

fn build_filter(level: &str, from_cli: bool) -> Result<EnvFilter, AppError> {
    let from_level =
        || EnvFilter::try_new(level).map_err(|e| AppError::Logger(format!("bad level '{level}': {e}")));
    if from_cli {
        return from_level();
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => from_level(),
    }
}

/// Parse a log level string into a [`LevelFilter`], returning an error on
/// unrecognised values.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

/// Map repeated `-v` flags to a level: one tier per flag.
pub fn level_for_verbosity(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_levels_parse() {
        for l in &["error", "warn", "info", "debug", "trace"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
    }

    #[test]
    fn invalid_level_errors() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
        assert!(parse_level("INFO_LEVEL").is_err());
    }

    #[test]
    fn verbosity_tiers() {
        assert_eq!(level_for_verbosity(0), None);
        assert_eq!(level_for_verbosity(1), Some("info"));
        assert_eq!(level_for_verbosity(2), Some("debug"));
        assert_eq!(level_for_verbosity(9), Some("trace"));
    }

    #[test]
    fn cli_level_builds_filter() {
        let filter = build_filter("debug", true).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn malformed_cli_level_is_logger_error() {
        match build_filter("sentinel=loud", true) {
            Err(AppError::Logger(msg)) => assert!(msg.contains("sentinel=loud")),
            other => panic!("expected logger error, got {other:?}"),
        }
    }

    #[test]
    fn init_succeeds_or_already_init() {
        // Another test in this process may have installed the subscriber first.
        match init(DEFAULT_LEVEL, false) {
            Ok(()) => {}
            Err(AppError::Logger(msg)) if msg.contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
