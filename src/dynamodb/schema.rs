use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{ParseError, SchemaError};

/// Scalar type of a key attribute.
///
/// DynamoDB only accepts string, number and binary attributes in key schemas,
/// so anything else is rejected when the definition is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AttributeType {
    #[serde(rename = "S")]
    String,
    #[serde(rename = "N")]
    Number,
    #[serde(rename = "B")]
    Binary,
}

/// Role of an attribute inside a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum KeyType {
    /// Partition key.
    #[serde(rename = "HASH")]
    Hash,
    /// Sort key.
    #[serde(rename = "RANGE")]
    Range,
}

/// Which attributes a secondary index carries alongside its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProjectionType {
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "KEYS_ONLY")]
    KeysOnly,
    #[serde(rename = "INCLUDE")]
    Include,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeDefinition {
    #[serde(rename = "AttributeName")]
    pub name: String,
    #[serde(rename = "AttributeType")]
    pub attribute_type: AttributeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeySchemaElement {
    #[serde(rename = "AttributeName")]
    pub name: String,
    #[serde(rename = "KeyType")]
    pub key_type: KeyType,
}

/// A local or global secondary index as written in a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexDefinition {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Projection")]
    pub projection: ProjectionType,
    #[serde(rename = "KSchema")]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(rename = "NonKeyAttributes", default)]
    pub non_key_attributes: Vec<String>,
}

/// Declarative description of one table.
///
/// Decoded from the JSON stored in a `TABLE_DEFINITION_*` entry:
///
/// ```json
/// {
///   "TableName": "Users",
///   "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
///   "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
///   "LSI": [],
///   "GI": []
/// }
/// ```
///
/// Instances only come out of [`TableDefinition::parse`], so every one of
/// them has passed [`TableDefinition::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDefinition {
    #[serde(rename = "TableName")]
    name: String,
    #[serde(rename = "AttributeDefinitions")]
    attribute_definitions: Vec<AttributeDefinition>,
    #[serde(rename = "KeySchema")]
    key_schema: Vec<KeySchemaElement>,
    #[serde(rename = "LSI", default)]
    local_indexes: Vec<IndexDefinition>,
    #[serde(rename = "GI", default)]
    global_indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Decodes and validates one serialized definition.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let definition: TableDefinition = serde_json::from_str(raw)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_definitions(&self) -> &[AttributeDefinition] {
        &self.attribute_definitions
    }

    pub fn key_schema(&self) -> &[KeySchemaElement] {
        &self.key_schema
    }

    pub fn local_indexes(&self) -> &[IndexDefinition] {
        &self.local_indexes
    }

    pub fn global_indexes(&self) -> &[IndexDefinition] {
        &self.global_indexes
    }

    /// Checks the structural rules DynamoDB enforces on key schemas.
    ///
    /// Local index key schemas are not compared against the table's
    /// partition key; they are forwarded as written.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }

        let defined: HashSet<&str> = self
            .attribute_definitions
            .iter()
            .map(|a| a.name.as_str())
            .collect();

        check_key_schema(&self.name, &self.key_schema, &defined)?;

        let mut index_names = HashSet::new();
        for index in self.local_indexes.iter().chain(&self.global_indexes) {
            if index.name.is_empty() {
                return Err(SchemaError::EmptyIndexName);
            }
            if !index_names.insert(index.name.as_str()) {
                return Err(SchemaError::DuplicateIndex(index.name.clone()));
            }
            check_key_schema(&index.name, &index.key_schema, &defined)?;
        }

        Ok(())
    }
}

fn check_key_schema(
    owner: &str,
    key_schema: &[KeySchemaElement],
    defined: &HashSet<&str>,
) -> Result<(), SchemaError> {
    let count = |role: KeyType| key_schema.iter().filter(|k| k.key_type == role).count();

    let hash = count(KeyType::Hash);
    if hash != 1 {
        return Err(SchemaError::PartitionKeyCount {
            owner: owner.to_string(),
            found: hash,
        });
    }

    let range = count(KeyType::Range);
    if range > 1 {
        return Err(SchemaError::SortKeyCount {
            owner: owner.to_string(),
            found: range,
        });
    }

    if let Some(missing) = key_schema
        .iter()
        .find(|k| !defined.contains(k.name.as_str()))
    {
        return Err(SchemaError::UndefinedKeyAttribute {
            owner: owner.to_string(),
            attribute: missing.name.clone(),
        });
    }

    Ok(())
}
