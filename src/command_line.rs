use clap::Parser;

use crate::error::ConfigError;

pub const ENDPOINT_VAR: &str = "DB_ENDPOINT";
pub const TABLE_PREFIX_VAR: &str = "DB_TABLE_PREFIX";

/// Command-line flags.
///
/// Everything else is read from the environment: `DB_ENDPOINT`,
/// `DB_TABLE_PREFIX` and one `*TABLE_DEFINITION_*` variable per table.
#[derive(Parser, Debug)]
#[command(name = "dynamo-bootstrap", about = "Creates DynamoDB tables from environment definitions")]
pub struct Cli {
    /// Allows running without DB_ENDPOINT and DB_TABLE_PREFIX
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,
}

/// Endpoint and table prefix for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    endpoint: String,
    table_prefix: String,
}

impl Config {
    /// Reads `DB_ENDPOINT` and `DB_TABLE_PREFIX` from `vars`.
    ///
    /// # Arguments
    ///
    /// * `vars` - Environment as `(key, value)` pairs.
    /// * `unsafe_mode` - When set, either setting may be missing or empty.
    ///
    /// # Returns
    ///
    /// The resolved `Config`, or a `ConfigError` listing the missing settings.
    pub fn resolve(vars: &[(String, String)], unsafe_mode: bool) -> Result<Self, ConfigError> {
        let lookup = |name: &str| {
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };

        let config = Self {
            endpoint: lookup(ENDPOINT_VAR),
            table_prefix: lookup(TABLE_PREFIX_VAR),
        };

        if !unsafe_mode {
            let missing: Vec<&'static str> = [
                (TABLE_PREFIX_VAR, &config.table_prefix),
                (ENDPOINT_VAR, &config.endpoint),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();

            if !missing.is_empty() {
                return Err(ConfigError { missing });
            }
        }

        Ok(config)
    }

    /// Endpoint override, `None` when the SDK should resolve it.
    pub fn endpoint(&self) -> Option<&str> {
        (!self.endpoint.is_empty()).then_some(self.endpoint.as_str())
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn requires_endpoint_and_prefix() {
        let err = Config::resolve(&vars(&[]), false).unwrap_err();
        assert_eq!(err.missing, vec![TABLE_PREFIX_VAR, ENDPOINT_VAR]);
        assert_eq!(
            err.to_string(),
            "must provide DB_TABLE_PREFIX and DB_ENDPOINT"
        );

        let err = Config::resolve(&vars(&[(TABLE_PREFIX_VAR, "dev-"), (ENDPOINT_VAR, "")]), false)
            .unwrap_err();
        assert_eq!(err.missing, vec![ENDPOINT_VAR]);
    }

    #[test]
    fn resolves_both_settings() {
        let config = Config::resolve(
            &vars(&[
                (ENDPOINT_VAR, "http://localhost:8000"),
                (TABLE_PREFIX_VAR, "dev-"),
            ]),
            false,
        )
        .unwrap();
        assert_eq!(config.endpoint(), Some("http://localhost:8000"));
        assert_eq!(config.table_prefix(), "dev-");
    }

    #[test]
    fn unsafe_mode_allows_empty_settings() {
        let config = Config::resolve(&vars(&[]), true).unwrap();
        assert_eq!(config.endpoint(), None);
        assert_eq!(config.table_prefix(), "");
    }

    #[test]
    fn parses_unsafe_flag() {
        assert!(!Cli::try_parse_from(["dynamo-bootstrap"]).unwrap().unsafe_mode);
        assert!(Cli::try_parse_from(["dynamo-bootstrap", "--unsafe"]).unwrap().unsafe_mode);
        assert!(Cli::try_parse_from(["dynamo-bootstrap", "--endpoint", "x"]).is_err());
    }
}
