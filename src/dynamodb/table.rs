use crate::dynamodb::{
    AttributeDefinition, IndexDefinition, KeySchemaElement, ProjectionType, TableDefinition,
};

/// Read/write capacity attached to every table and global index.
///
/// # Capacity Modes
///
/// Tables are created in provisioned mode with the smallest allowed
/// throughput. Local indexes have no capacity of their own and consume the
/// table's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl Throughput {
    pub const MINIMAL: Throughput = Throughput {
        read_capacity_units: 1,
        write_capacity_units: 1,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub projection_type: ProjectionType,
    pub non_key_attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIndexRequest {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalIndexRequest {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    pub provisioned_throughput: Throughput,
}

/// Service-ready description of one table to create.
///
/// Built by [`translate`], handed to a [`TableAdmin`](crate::dynamodb::TableAdmin)
/// and dropped once the call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub provisioned_throughput: Throughput,
    pub local_secondary_indexes: Vec<LocalIndexRequest>,
    pub global_secondary_indexes: Vec<GlobalIndexRequest>,
}

/// Maps a table definition onto a creation request named `prefix + name`.
///
/// Attributes, key schemas and indexes are copied in their original order.
///
/// # Arguments
///
/// * `definition` - A parsed and validated table definition.
/// * `prefix` - Prepended to the table name; may be empty.
///
/// # Returns
///
/// A `ProvisioningRequest` with minimal throughput on the table and on every
/// global index.
pub fn translate(definition: &TableDefinition, prefix: &str) -> ProvisioningRequest {
    ProvisioningRequest {
        table_name: format!("{prefix}{}", definition.name()),
        attribute_definitions: definition.attribute_definitions().to_vec(),
        key_schema: definition.key_schema().to_vec(),
        provisioned_throughput: Throughput::MINIMAL,
        local_secondary_indexes: definition
            .local_indexes()
            .iter()
            .map(|index| LocalIndexRequest {
                index_name: index.name.clone(),
                key_schema: index.key_schema.clone(),
                projection: projection(index),
            })
            .collect(),
        global_secondary_indexes: definition
            .global_indexes()
            .iter()
            .map(|index| GlobalIndexRequest {
                index_name: index.name.clone(),
                key_schema: index.key_schema.clone(),
                projection: projection(index),
                provisioned_throughput: Throughput::MINIMAL,
            })
            .collect(),
    }
}

fn projection(index: &IndexDefinition) -> Projection {
    Projection {
        projection_type: index.projection,
        non_key_attributes: index.non_key_attributes.clone(),
    }
}
