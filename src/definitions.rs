//! Table definitions supplied through `TABLE_DEFINITION_*` variables.

use std::collections::HashMap;
use std::ffi::OsString;
use tracing::{debug, warn};

use crate::dynamodb::TableDefinition;
use crate::error::{DefinitionError, ParseError};

/// Substring that marks a variable as a serialized table definition.
pub const DEFINITION_MARKER: &str = "TABLE_DEFINITION_";

/// Converts raw environment pairs to UTF-8, sorted by key.
///
/// # Arguments
///
/// * `vars` - Raw `(key, value)` pairs, usually `std::env::vars_os()`.
///
/// # Returns
///
/// The pairs as strings, or `DefinitionError::NotUnicode` when a definition
/// entry (key containing [`DEFINITION_MARKER`]) is not valid UTF-8. Other
/// non-UTF-8 variables are skipped.
pub fn environment(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> Result<Vec<(String, String)>, DefinitionError> {
    let mut converted = Vec::new();

    for (key, value) in vars {
        let is_definition = key.to_string_lossy().contains(DEFINITION_MARKER);
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => converted.push((key, value)),
            (key, _) if is_definition => {
                let key = key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                return Err(DefinitionError::NotUnicode { key });
            }
            (key, _) => {
                let key = key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                warn!(key = %key, "skipping non UTF-8 environment variable");
            }
        }
    }

    converted.sort();
    Ok(converted)
}

/// Keeps the `(key, value)` pairs whose key contains [`DEFINITION_MARKER`], in input order.
pub fn entries(vars: &[(String, String)]) -> Vec<(&str, &str)> {
    vars.iter()
        .filter(|(key, _)| key.contains(DEFINITION_MARKER))
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

/// Parses every definition entry in `vars`.
///
/// Stops at the first entry that is malformed, invalid, or names a table
/// already defined by an earlier entry.
pub fn load(vars: &[(String, String)]) -> Result<Vec<TableDefinition>, DefinitionError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut definitions = Vec::new();

    for (key, raw) in entries(vars) {
        let definition = TableDefinition::parse(raw).map_err(|e| match e {
            ParseError::Json(source) => DefinitionError::Malformed {
                key: key.to_string(),
                source,
            },
            ParseError::Schema(source) => DefinitionError::Invalid {
                key: key.to_string(),
                source,
            },
        })?;

        if let Some(first_key) = seen.insert(definition.name().to_string(), key) {
            return Err(DefinitionError::DuplicateTable {
                name: definition.name().to_string(),
                first_key: first_key.to_string(),
                key: key.to_string(),
            });
        }

        debug!(key, table = definition.name(), "loaded table definition");
        definitions.push(definition);
    }

    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    fn users(name: &str) -> String {
        format!(
            r#"{{"TableName": "{name}",
                "AttributeDefinitions": [{{"AttributeName": "id", "AttributeType": "S"}}],
                "KeySchema": [{{"AttributeName": "id", "KeyType": "HASH"}}]}}"#
        )
    }

    fn vars(pairs: &[(&str, String)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn selects_marked_entries_in_order() {
        let vars = vars(&[
            ("PATH", "/usr/bin".into()),
            ("APP_TABLE_DEFINITION_B", users("B")),
            ("TABLE_DEFINITION_A", users("A")),
            ("TABLE_DEFINITIONS", "not one".into()),
        ]);

        let keys: Vec<&str> = entries(&vars).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["APP_TABLE_DEFINITION_B", "TABLE_DEFINITION_A"]);

        let names: Vec<String> = load(&vars)
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn no_entries_is_an_empty_batch() {
        assert!(load(&vars(&[("HOME", "/root".into())])).unwrap().is_empty());
    }

    #[test]
    fn malformed_entry_reports_its_key() {
        let err = load(&vars(&[
            ("TABLE_DEFINITION_USERS", users("Users")),
            ("TABLE_DEFINITION_BROKEN", "{\"TableName\": ".into()),
        ]))
        .unwrap_err();

        assert!(matches!(err, DefinitionError::Malformed { .. }));
        assert_eq!(err.key(), "TABLE_DEFINITION_BROKEN");
    }

    #[test]
    fn invalid_entry_reports_schema_error() {
        let raw = r#"{"TableName": "T", "AttributeDefinitions": [],
                      "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}]}"#;
        let err = load(&vars(&[("TABLE_DEFINITION_T", raw.into())])).unwrap_err();

        match err {
            DefinitionError::Invalid { key, source } => {
                assert_eq!(key, "TABLE_DEFINITION_T");
                assert_eq!(
                    source,
                    SchemaError::UndefinedKeyAttribute {
                        owner: "T".into(),
                        attribute: "id".into()
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    fn os(bytes: &[u8]) -> OsString {
        use std::os::unix::ffi::OsStringExt;
        OsString::from_vec(bytes.to_vec())
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_definition_is_fatal() {
        let err = environment(vec![
            (os(b"TABLE_DEFINITION_USERS"), os(users("Users").as_bytes())),
            (os(b"TABLE_DEFINITION_CAFE"), os(b"{\"TableName\": \"Caf\xe9\"}")),
        ])
        .unwrap_err();

        assert!(matches!(err, DefinitionError::NotUnicode { .. }));
        assert_eq!(err.key(), "TABLE_DEFINITION_CAFE");
    }

    #[cfg(unix)]
    #[test]
    fn unrelated_non_unicode_variables_are_skipped() {
        let vars = environment(vec![
            (os(b"TABLE_DEFINITION_USERS"), os(users("Users").as_bytes())),
            (os(b"LEGACY_\xff"), os(b"x")),
            (os(b"OTHER"), os(b"\xfe")),
            (os(b"DB_TABLE_PREFIX"), os(b"dev-")),
        ])
        .unwrap();

        let keys: Vec<&str> = vars.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["DB_TABLE_PREFIX", "TABLE_DEFINITION_USERS"]);
        assert_eq!(load(&vars).unwrap()[0].name(), "Users");
    }

    #[test]
    fn duplicate_table_names_are_rejected() {
        let err = load(&vars(&[
            ("TABLE_DEFINITION_1", users("Users")),
            ("TABLE_DEFINITION_2", users("Users")),
        ]))
        .unwrap_err();

        match err {
            DefinitionError::DuplicateTable {
                name,
                first_key,
                key,
            } => {
                assert_eq!(name, "Users");
                assert_eq!(first_key, "TABLE_DEFINITION_1");
                assert_eq!(key, "TABLE_DEFINITION_2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
