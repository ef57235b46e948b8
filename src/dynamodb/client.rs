use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::Builder as ConfigBuilder,
    error::{BuildError, SdkError},
    operation::create_table::CreateTableError,
    types::{
        AttributeDefinition as SdkAttributeDefinition, BillingMode,
        GlobalSecondaryIndex, KeySchemaElement as SdkKeySchemaElement, KeyType as SdkKeyType,
        LocalSecondaryIndex, Projection as SdkProjection, ProjectionType as SdkProjectionType,
        ProvisionedThroughput, ScalarAttributeType,
    },
    Client,
};
use tracing::debug;

use crate::command_line::Config;
use crate::dynamodb::{
    AttributeDefinition, AttributeType, KeySchemaElement, KeyType, Projection, ProjectionType,
    ProvisioningRequest, Throughput,
};
use crate::error::{AdminError, ClientError};

/// Administrative side of the storage service.
///
/// Implementations report a failed creation as one of two cases:
/// [`AdminError::AlreadyExists`] when a table with that name is already
/// present, [`AdminError::Other`] for everything else.
#[async_trait]
pub trait TableAdmin {
    async fn create_table(&self, request: &ProvisioningRequest) -> Result<(), AdminError>;
}

/// DynamoDB client wrapper used by the bootstrap run.
///
/// # Configuration
///
/// Credentials and region come from the standard AWS chain
/// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`, profiles,
/// instance roles). A non-empty `DB_ENDPOINT` replaces the resolved service
/// endpoint, e.g. `http://localhost:8000` for DynamoDB Local.
#[derive(Debug)]
pub struct DynamoDb {
    client: Client,
}

impl DynamoDb {
    /// Creates a new `DynamoDb` instance from an already loaded SDK config.
    pub fn new(sdk_config: &aws_config::SdkConfig, endpoint: Option<&str>) -> Self {
        let mut builder = ConfigBuilder::from(sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    /// Loads the SDK config from the environment and builds the client.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration; its endpoint, when set, overrides the SDK default.
    ///
    /// # Returns
    ///
    /// A ready client, or `ClientError::MissingRegion` if the AWS chain resolves no region.
    pub async fn connect(config: &Config) -> Result<Self, ClientError> {
        let sdk_config = aws_config::load_from_env().await;
        if sdk_config.region().is_none() {
            return Err(ClientError::MissingRegion);
        }
        debug!(endpoint = ?config.endpoint(), region = ?sdk_config.region(), "storage client configured");
        Ok(Self::new(&sdk_config, config.endpoint()))
    }
}

#[async_trait]
impl TableAdmin for DynamoDb {
    async fn create_table(&self, request: &ProvisioningRequest) -> Result<(), AdminError> {
        let invalid = |e: BuildError| AdminError::Other(e.into());

        let attribute_definitions = request
            .attribute_definitions
            .iter()
            .map(to_attribute_definition)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let key_schema = to_key_schema(&request.key_schema).map_err(invalid)?;
        let local_indexes = request
            .local_secondary_indexes
            .iter()
            .map(|index| {
                LocalSecondaryIndex::builder()
                    .index_name(&index.index_name)
                    .set_key_schema(Some(to_key_schema(&index.key_schema)?))
                    .projection(to_projection(&index.projection))
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let global_indexes = request
            .global_secondary_indexes
            .iter()
            .map(|index| {
                GlobalSecondaryIndex::builder()
                    .index_name(&index.index_name)
                    .set_key_schema(Some(to_key_schema(&index.key_schema)?))
                    .projection(to_projection(&index.projection))
                    .provisioned_throughput(to_throughput(index.provisioned_throughput)?)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let throughput = to_throughput(request.provisioned_throughput).map_err(invalid)?;

        // DynamoDB rejects empty index lists, so they are left unset instead.
        let output = self
            .client
            .create_table()
            .table_name(&request.table_name)
            .billing_mode(BillingMode::Provisioned)
            .set_attribute_definitions(Some(attribute_definitions))
            .set_key_schema(Some(key_schema))
            .provisioned_throughput(throughput)
            .set_local_secondary_indexes(non_empty(local_indexes))
            .set_global_secondary_indexes(non_empty(global_indexes))
            .send()
            .await;

        let output = output.map_err(classify)?;
        if let Some(description) = output.table_description() {
            debug!(
                table = ?description.table_name(),
                status = ?description.table_status(),
                "table status"
            );
        }
        Ok(())
    }
}

/// `ResourceInUseException` means the table is already there; anything else is fatal.
fn classify<R>(err: SdkError<CreateTableError, R>) -> AdminError
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let in_use = err
        .as_service_error()
        .is_some_and(|e| e.is_resource_in_use_exception());
    if in_use {
        AdminError::AlreadyExists
    } else {
        AdminError::Other(err.into())
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn to_attribute_definition(
    attribute: &AttributeDefinition,
) -> Result<SdkAttributeDefinition, BuildError> {
    let attribute_type = match attribute.attribute_type {
        AttributeType::String => ScalarAttributeType::S,
        AttributeType::Number => ScalarAttributeType::N,
        AttributeType::Binary => ScalarAttributeType::B,
    };
    SdkAttributeDefinition::builder()
        .attribute_name(&attribute.name)
        .attribute_type(attribute_type)
        .build()
}

fn to_key_schema(keys: &[KeySchemaElement]) -> Result<Vec<SdkKeySchemaElement>, BuildError> {
    keys.iter()
        .map(|key| {
            let key_type = match key.key_type {
                KeyType::Hash => SdkKeyType::Hash,
                KeyType::Range => SdkKeyType::Range,
            };
            SdkKeySchemaElement::builder()
                .attribute_name(&key.name)
                .key_type(key_type)
                .build()
        })
        .collect()
}

fn to_projection(projection: &Projection) -> SdkProjection {
    let projection_type = match projection.projection_type {
        ProjectionType::All => SdkProjectionType::All,
        ProjectionType::KeysOnly => SdkProjectionType::KeysOnly,
        ProjectionType::Include => SdkProjectionType::Include,
    };
    SdkProjection::builder()
        .projection_type(projection_type)
        .set_non_key_attributes(non_empty(projection.non_key_attributes.clone()))
        .build()
}

fn to_throughput(throughput: Throughput) -> Result<ProvisionedThroughput, BuildError> {
    ProvisionedThroughput::builder()
        .read_capacity_units(throughput.read_capacity_units)
        .write_capacity_units(throughput.write_capacity_units)
        .build()
}
