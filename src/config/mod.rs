//! Startup configuration loading.
//!
//! Reads `config.toml` (working directory by default, overridable with
//! `-f/--config` or `SENTINEL_CONFIG`), validates it and returns an
//! immutable [`Config`].
//!
//! # Module layout
//!
//! - **types** — `Config` and `Mode`, the validated values consumers see.
//! - **schema** — Declarative field schema and the collecting validator.
//! - **load** — Path resolution, `load`, `load_from`, `expand_home`.

mod load;
pub mod schema;
mod types;

pub use load::{expand_home, load, load_from, resolve_path, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
pub use types::*;
