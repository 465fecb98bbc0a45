//! Loading logic: path resolution, read, parse, validate, build.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml::Table;
use tracing::debug;

use crate::error::{ConfigError, Violation};

use super::schema::{self, Validated};
use super::types::{Config, Mode};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "SENTINEL_CONFIG";

/// Load config from `path`, else `$SENTINEL_CONFIG`, else `./config.toml`.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let env_override = env::var(CONFIG_ENV_VAR).ok();
    let resolved = resolve_path(path, env_override.as_deref());
    load_from(&resolved)
}

/// Pick the config file location. Tests pass the env value directly instead
/// of mutating process env vars.
pub fn resolve_path(explicit: Option<&Path>, env_override: Option<&str>) -> PathBuf {
    match (explicit, env_override) {
        (Some(path), _) => expand_home(&path.to_string_lossy()),
        (None, Some(from_env)) if !from_env.is_empty() => expand_home(from_env),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Read, parse and validate the file at `path`. All-or-nothing: a `Config`
/// is only returned when every field checks out.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "reading config");

    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound { path: path.to_path_buf() },
        _ => ConfigError::Read { path: path.to_path_buf(), source },
    })?;

    let table: Table = toml::from_str(&raw).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_col(&raw, span.start))
            .unwrap_or((1, 1));
        ConfigError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            message: e
                .message()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
        }
    })?;

    let validated = schema::validate(&table, schema::CONFIG_SCHEMA).map_err(|violations| {
        ConfigError::Invalid { path: path.to_path_buf(), violations }
    })?;

    build(validated).map_err(|violation| ConfigError::Invalid {
        path: path.to_path_buf(),
        violations: vec![violation],
    })
}

fn build(mut fields: Validated) -> Result<Config, Violation> {
    let root_server = fields.take_str("root_server")?;
    let node_servers = fields.take_list("node_servers")?;
    let mode = fields
        .take_str("mode")?
        .parse::<Mode>()
        .map_err(|e| Violation::new("mode", e))?;
    Ok(Config::new(root_server, node_servers, mode))
}

/// 1-based line and column of byte `offset` in `text`.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
