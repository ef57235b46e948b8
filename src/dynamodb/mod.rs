//! # DynamoDB Module
//!
//! Table definitions, their translation into creation requests, and the
//! client that submits those requests.
//!
//! ## Components
//!
//! - `TableDefinition`: Declarative description of a table, parsed from JSON.
//! - `translate`: Maps a definition onto a `ProvisioningRequest` with a name prefix
//!   and minimal provisioned throughput.
//! - `TableAdmin`: The administrative calls the provisioner needs from the service.
//! - `DynamoDb`: `TableAdmin` backed by `aws_sdk_dynamodb::Client`.
//!
//! ## Usage
//!
//! The client reads the usual AWS environment:
//!
//! - `AWS_ACCESS_KEY_ID`: Your AWS access key ID.
//! - `AWS_SECRET_ACCESS_KEY`: Your AWS secret access key.
//! - `AWS_REGION`: The AWS region where the tables are created.
//!
//! Optionally, you can also set:
//! - `AWS_SESSION_TOKEN`: If you're using temporary credentials.
//!
//! ## Example
//!
//! ```rust,ignore
//! let definition = TableDefinition::parse(r#"{
//!     "TableName": "Users",
//!     "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
//!     "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}]
//! }"#)?;
//!
//! let request = translate(&definition, "dev-");
//! assert_eq!(request.table_name, "dev-Users");
//!
//! let ddb = DynamoDb::connect(&config).await?;
//! ddb.create_table(&request).await?;
//! ```

mod client;
mod schema;
mod table;

pub use client::{DynamoDb, TableAdmin};
pub use schema::{
    AttributeDefinition, AttributeType, IndexDefinition, KeySchemaElement, KeyType,
    ProjectionType, TableDefinition,
};
pub use table::{translate, Projection, ProvisioningRequest, Throughput};
