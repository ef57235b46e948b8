//! Sequential, idempotent table creation.

use tracing::{error, info};

use crate::dynamodb::{ProvisioningRequest, TableAdmin};
use crate::error::{AdminError, ProvisionError};

/// Terminal success states of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
}

/// Per-table results of a batch that ran to completion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<(String, Outcome)>,
}

impl BatchReport {
    pub fn created(&self) -> usize {
        self.count(Outcome::Created)
    }

    pub fn already_existed(&self) -> usize {
        self.count(Outcome::AlreadyExists)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Submits `requests` one at a time, in order.
///
/// A table that already exists counts as success. Any other failure stops
/// the batch: later requests are never submitted.
///
/// # Arguments
///
/// * `requests` - Tables to create, in submission order.
/// * `admin` - The storage service's administrative client.
///
/// # Returns
///
/// A `BatchReport` with one outcome per request, or a `ProvisionError` naming
/// the table whose creation failed.
pub async fn create_all<A>(
    requests: &[ProvisioningRequest],
    admin: &A,
) -> Result<BatchReport, ProvisionError>
where
    A: TableAdmin + ?Sized,
{
    let mut report = BatchReport::default();

    for request in requests {
        info!(name = %request.table_name, "creating table");

        let outcome = match admin.create_table(request).await {
            Ok(()) => {
                info!(name = %request.table_name, "table created");
                Outcome::Created
            }
            Err(AdminError::AlreadyExists) => {
                info!(name = %request.table_name, "table already exists");
                Outcome::AlreadyExists
            }
            Err(AdminError::Other(source)) => {
                error!(
                    name = %request.table_name,
                    input = ?request,
                    error = %source,
                    "unable to create table"
                );
                return Err(ProvisionError {
                    table: request.table_name.clone(),
                    request: Box::new(request.clone()),
                    source,
                });
            }
        };

        report.outcomes.push((request.table_name.clone(), outcome));
    }

    info!(
        created = report.created(),
        already_existed = report.already_existed(),
        "all tables provisioned"
    );
    Ok(report)
}
