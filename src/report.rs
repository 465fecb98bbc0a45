//! Operator-facing diagnostics for configuration failures.
//!
//! These texts are printed to stdout verbatim by the binary before it exits
//! with status 1; they are part of the observable contract.

use crate::error::{ConfigError, Violation};

/// Example file shown on every failure path.
pub const EXAMPLE_CONFIG: &str = r#"root_server = "http://localhost:8080"

node_servers = [
  "http://student1.example.com",
  "http://student2.example.com",
  "http://student3.example.com"
]

mode = "Dev""#;

/// Render the stdout report for `err`.
///
/// Returns `None` for failures that have no instructional template (an
/// unreadable file); callers fall back to the plain error line.
pub fn render(err: &ConfigError) -> Option<String> {
    match err {
        ConfigError::NotFound { .. } => Some(not_found()),
        ConfigError::Invalid { violations, .. } => Some(invalid(violations)),
        ConfigError::Parse { line, column, message, .. } => Some(invalid(&[Violation::new(
            format!("line {line}, column {column}"),
            message.as_str(),
        )])),
        ConfigError::Read { .. } => None,
    }
}

fn not_found() -> String {
    format!(
        "\n## config.toml not found\n\n\
         Create a config.toml file in the project root.\n\n\
         Example:\n\n\
         {EXAMPLE_CONFIG}\n\n"
    )
}

fn invalid(violations: &[Violation]) -> String {
    let mut out = format!(
        "\n## Invalid config.toml format\n\n\
         Your config.toml is missing required fields or has invalid values.\n\n\
         Required format:\n\n\
         {EXAMPLE_CONFIG}\n\n\
         Details:\n"
    );
    for v in violations {
        out.push_str(&format!("  - {}: {}\n", v.path, v.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_found_report() {
        let text = render(&ConfigError::NotFound { path: PathBuf::from("config.toml") }).unwrap();
        assert!(text.starts_with("\n## config.toml not found\n"));
        assert!(text.contains("Create a config.toml file in the project root."));
        assert!(text.contains(EXAMPLE_CONFIG));
        assert!(!text.contains("Details:"));
    }

    #[test]
    fn invalid_report_lists_each_violation() {
        let err = ConfigError::Invalid {
            path: PathBuf::from("config.toml"),
            violations: vec![
                Violation::new("node_servers", "Field required"),
                Violation::new("mode", "Input should be 'Dev' or 'Prod'"),
            ],
        };
        let text = render(&err).unwrap();
        assert!(text.starts_with("\n## Invalid config.toml format\n"));
        assert!(text.contains(EXAMPLE_CONFIG));
        assert!(text.ends_with(
            "Details:\n  - node_servers: Field required\n  - mode: Input should be 'Dev' or 'Prod'\n"
        ));
    }

    #[test]
    fn parse_report_uses_invalid_framing() {
        let err = ConfigError::Parse {
            path: PathBuf::from("config.toml"),
            line: 2,
            column: 16,
            message: "invalid array".into(),
        };
        let text = render(&err).unwrap();
        assert!(text.contains("## Invalid config.toml format"));
        assert!(text.contains("  - line 2, column 16: invalid array\n"));
    }

    #[test]
    fn read_failure_has_no_template() {
        let err = ConfigError::Read {
            path: PathBuf::from("config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(render(&err).is_none());
    }

    #[test]
    fn example_block_is_itself_valid_toml() {
        let table: toml::Table = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(table["mode"].as_str(), Some("Dev"));
        assert_eq!(table["node_servers"].as_array().map(Vec::len), Some(3));
    }
}
