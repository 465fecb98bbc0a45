//! Declarative schema for `config.toml` and the validator that walks it.
//!
//! The validator never stops at the first problem: every violation is
//! collected so the operator can fix the whole file in one pass. Field errors
//! come first in schema order, followed by keys the schema does not know in
//! the order they appear in the file.

use std::collections::BTreeMap;

use toml::{Table, Value};

use crate::error::Violation;

pub const MSG_REQUIRED: &str = "Field required";
pub const MSG_STRING: &str = "Input should be a valid string";
pub const MSG_LIST: &str = "Input should be a valid list";
pub const MSG_EXTRA: &str = "Extra inputs are not permitted";

/// Expected shape of one field value.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Str,
    StrList,
    /// A string restricted to the listed spellings.
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub enum Presence {
    Required,
    /// Optional; the given value is used when the key is absent.
    Default(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

/// Field shape of [`super::Config`], in declaration order.
pub const CONFIG_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "root_server", kind: FieldKind::Str, presence: Presence::Required },
    FieldSpec { name: "node_servers", kind: FieldKind::StrList, presence: Presence::Required },
    FieldSpec {
        name: "mode",
        kind: FieldKind::OneOf(super::Mode::ALLOWED),
        presence: Presence::Default("Dev"),
    },
];

/// A field value that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    List(Vec<String>),
}

/// Output of a successful [`validate`]: every schema field, defaults applied.
#[derive(Debug, Default)]
pub struct Validated {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Validated {
    /// Remove a string field. A missing or mistyped entry becomes a violation
    /// so callers can propagate it instead of panicking.
    pub fn take_str(&mut self, name: &str) -> Result<String, Violation> {
        match self.values.remove(name) {
            Some(FieldValue::Str(s)) => Ok(s),
            Some(FieldValue::List(_)) => Err(Violation::new(name, MSG_STRING)),
            None => Err(Violation::new(name, MSG_REQUIRED)),
        }
    }

    pub fn take_list(&mut self, name: &str) -> Result<Vec<String>, Violation> {
        match self.values.remove(name) {
            Some(FieldValue::List(items)) => Ok(items),
            Some(FieldValue::Str(_)) => Err(Violation::new(name, MSG_LIST)),
            None => Err(Violation::new(name, MSG_REQUIRED)),
        }
    }
}

/// Check `table` against `schema`, collecting every violation.
pub fn validate(table: &Table, schema: &[FieldSpec]) -> Result<Validated, Vec<Violation>> {
    let mut violations = Vec::new();
    let mut validated = Validated::default();

    for spec in schema {
        let value = match (table.get(spec.name), spec.presence) {
            (Some(value), _) => value,
            (None, Presence::Default(default)) => {
                validated.values.insert(spec.name, FieldValue::Str(default.to_string()));
                continue;
            }
            (None, Presence::Required) => {
                violations.push(Violation::new(spec.name, MSG_REQUIRED));
                continue;
            }
        };

        match check_field(spec, value) {
            Ok(v) => {
                validated.values.insert(spec.name, v);
            }
            Err(mut errs) => violations.append(&mut errs),
        }
    }

    for key in table.keys() {
        if !schema.iter().any(|spec| spec.name == key.as_str()) {
            violations.push(Violation::new(key.as_str(), MSG_EXTRA));
        }
    }

    if violations.is_empty() {
        Ok(validated)
    } else {
        Err(violations)
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<FieldValue, Vec<Violation>> {
    match spec.kind {
        FieldKind::Str => match value {
            Value::String(s) => Ok(FieldValue::Str(s.clone())),
            _ => Err(vec![Violation::new(spec.name, MSG_STRING)]),
        },
        FieldKind::OneOf(allowed) => match value {
            Value::String(s) if allowed.contains(&s.as_str()) => Ok(FieldValue::Str(s.clone())),
            _ => Err(vec![Violation::new(spec.name, one_of_message(allowed))]),
        },
        FieldKind::StrList => {
            let Value::Array(items) = value else {
                return Err(vec![Violation::new(spec.name, MSG_LIST)]);
            };
            let mut out = Vec::with_capacity(items.len());
            let mut errs = Vec::new();
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    _ => errs.push(Violation::new(format!("{}.{i}", spec.name), MSG_STRING)),
                }
            }
            if errs.is_empty() { Ok(FieldValue::List(out)) } else { Err(errs) }
        }
    }
}

/// `Input should be 'A', 'B' or 'C'`.
fn one_of_message(allowed: &[&str]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|a| format!("'{a}'")).collect();
    let listed = match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    };
    format!("Input should be {listed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> Table {
        toml::from_str(src).unwrap()
    }

    fn paths(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn valid_table_applies_default_mode() {
        let t = table(r#"root_server = "x"
node_servers = ["y"]"#);
        let mut v = validate(&t, CONFIG_SCHEMA).unwrap();
        assert_eq!(v.take_str("mode").unwrap(), "Dev");
        assert_eq!(v.take_list("node_servers").unwrap(), vec!["y".to_string()]);
    }

    #[test]
    fn missing_required_fields_reported_in_schema_order() {
        let errs = validate(&table(""), CONFIG_SCHEMA).unwrap_err();
        assert_eq!(paths(&errs), vec!["root_server", "node_servers"]);
        assert!(errs.iter().all(|v| v.message == MSG_REQUIRED));
    }

    #[test]
    fn wrong_types_reported() {
        let t = table(r#"root_server = 8080
node_servers = "http://a""#);
        let errs = validate(&t, CONFIG_SCHEMA).unwrap_err();
        assert_eq!(errs[0], Violation::new("root_server", MSG_STRING));
        assert_eq!(errs[1], Violation::new("node_servers", MSG_LIST));
    }

    #[test]
    fn list_elements_addressed_by_index() {
        let t = table(r#"root_server = "x"
node_servers = ["ok", 3, "ok", true]"#);
        let errs = validate(&t, CONFIG_SCHEMA).unwrap_err();
        assert_eq!(paths(&errs), vec!["node_servers.1", "node_servers.3"]);
    }

    #[test]
    fn mode_outside_allowed_set() {
        let t = table(r#"root_server = "x"
node_servers = ["y"]
mode = "Staging""#);
        let errs = validate(&t, CONFIG_SCHEMA).unwrap_err();
        assert_eq!(errs, vec![Violation::new("mode", "Input should be 'Dev' or 'Prod'")]);
    }

    #[test]
    fn non_string_mode_rejected() {
        let t = table(r#"root_server = "x"
node_servers = []
mode = 1"#);
        let errs = validate(&t, CONFIG_SCHEMA).unwrap_err();
        assert_eq!(paths(&errs), vec!["mode"]);
    }

    #[test]
    fn extra_keys_reported_after_fields() {
        let t = table(r#"zeta = 1
node_servers = ["y"]
alpha = "a""#);
        let errs = validate(&t, CONFIG_SCHEMA).unwrap_err();
        assert_eq!(paths(&errs), vec!["root_server", "zeta", "alpha"]);
        assert_eq!(errs[1].message, MSG_EXTRA);
    }

    #[test]
    fn extra_keys_keep_file_order_after_valid_fields() {
        let t = table(r#"root_server = "x"
node_servers = []
zeta = 1
alpha = 2"#);
        let errs = validate(&t, CONFIG_SCHEMA).unwrap_err();
        assert_eq!(paths(&errs), vec!["zeta", "alpha"]);
        assert!(errs.iter().all(|v| v.message == MSG_EXTRA));
    }

    #[test]
    fn empty_strings_and_lists_accepted() {
        let t = table(r#"root_server = ""
node_servers = []"#);
        let mut v = validate(&t, CONFIG_SCHEMA).unwrap();
        assert_eq!(v.take_str("root_server").unwrap(), "");
        assert!(v.take_list("node_servers").unwrap().is_empty());
    }

    #[test]
    fn take_reports_missing_entries() {
        let mut v = Validated::default();
        assert_eq!(v.take_str("root_server").unwrap_err().message, MSG_REQUIRED);
        assert_eq!(v.take_list("node_servers").unwrap_err().message, MSG_REQUIRED);
    }

    #[test]
    fn one_of_message_joins_options() {
        assert_eq!(one_of_message(&["A"]), "Input should be 'A'");
        assert_eq!(one_of_message(&["A", "B", "C"]), "Input should be 'A', 'B' or 'C'");
    }
}
