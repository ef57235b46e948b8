//! Error types for the bootstrap run.
//!
//! Everything except [`AdminError::AlreadyExists`] is fatal: the binary logs it
//! and exits non-zero without touching the remaining definitions.

use thiserror::Error;

use crate::dynamodb::ProvisioningRequest;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Required settings were missing and `--unsafe` was not given.
#[derive(Debug, Error)]
#[error("must provide {}", missing.join(" and "))]
pub struct ConfigError {
    pub missing: Vec<&'static str>,
}

/// A parsed table definition that the service could never accept.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table name is empty")]
    EmptyTableName,
    #[error("index name is empty")]
    EmptyIndexName,
    #[error("index '{0}' is defined more than once")]
    DuplicateIndex(String),
    #[error("{owner}: key schema needs exactly one HASH key, found {found}")]
    PartitionKeyCount { owner: String, found: usize },
    #[error("{owner}: key schema allows at most one RANGE key, found {found}")]
    SortKeyCount { owner: String, found: usize },
    #[error("{owner}: key attribute '{attribute}' is missing from AttributeDefinitions")]
    UndefinedKeyAttribute { owner: String, attribute: String },
}

/// Why a raw definition was rejected.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A Definition Source entry that could not become a table definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("error unmarshalling table definition {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid table definition {key}: {source}")]
    Invalid {
        key: String,
        #[source]
        source: SchemaError,
    },
    #[error("table definition {key} is not valid UTF-8")]
    NotUnicode { key: String },
    #[error("table '{name}' is defined by both {first_key} and {key}")]
    DuplicateTable {
        name: String,
        first_key: String,
        key: String,
    },
}

impl DefinitionError {
    /// Definition Source key of the offending entry.
    pub fn key(&self) -> &str {
        match self {
            DefinitionError::Malformed { key, .. }
            | DefinitionError::Invalid { key, .. }
            | DefinitionError::NotUnicode { key }
            | DefinitionError::DuplicateTable { key, .. } => key,
        }
    }
}

/// The two outcomes a failed `create_table` call can have.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("table already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(BoxError),
}

/// A creation failure that aborts the batch.
#[derive(Debug, Error)]
#[error("unable to create table '{table}': {source}")]
pub struct ProvisionError {
    pub table: String,
    pub request: Box<ProvisioningRequest>,
    #[source]
    pub source: BoxError,
}

/// The storage client could not be built.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no AWS region configured; set AWS_REGION or a profile region")]
    MissingRegion,
}
