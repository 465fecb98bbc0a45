//! Validated configuration types handed to the rest of the process.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Deployment mode. Absent from the file means [`Mode::Dev`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Mode {
    #[default]
    Dev,
    Prod,
}

impl Mode {
    /// Spellings accepted in `config.toml`, in declaration order.
    pub const ALLOWED: &'static [&'static str] = &["Dev", "Prod"];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Dev => "Dev",
            Mode::Prod => "Prod",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dev" => Ok(Mode::Dev),
            "Prod" => Ok(Mode::Prod),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

/// Fully-validated startup configuration.
///
/// Built once by [`super::load`] and never mutated; fields are exposed
/// through accessors only. Serializes back into `config.toml` shape;
/// reading always goes through the schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    root_server: String,
    node_servers: Vec<String>,
    mode: Mode,
}

impl Config {
    pub(crate) fn new(root_server: String, node_servers: Vec<String>, mode: Mode) -> Self {
        Self { root_server, node_servers, mode }
    }

    /// Base URL of the coordinating root server.
    pub fn root_server(&self) -> &str {
        &self.root_server
    }

    /// Participant node URLs, in file order.
    pub fn node_servers(&self) -> &[String] {
        &self.node_servers
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Serialize back into `config.toml` syntax.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root Server:")?;
        writeln!(f, "  {}", self.root_server)?;
        writeln!(f)?;
        writeln!(f, "Nodes ({}):", self.node_servers.len())?;
        for node in &self.node_servers {
            writeln!(f, "  {node}")?;
        }
        writeln!(f, "Mode: {}", self.mode)
    }
}
