mod command_line;
mod definitions;
mod dynamodb;
mod error;
mod logging;
mod provisioner;


use anyhow::Result;
use clap::Parser;
use std::env;
use std::process::ExitCode;
use tracing::{error, info};

use crate::command_line::{Cli, Config};
use crate::dynamodb::{translate, DynamoDb, ProvisioningRequest};
use crate::error::DefinitionError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    if let Err(e) = logging::init_logging() {
        eprintln!("failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => {
            info!("finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "table provisioning aborted");
            ExitCode::FAILURE
        }
    }
}

/// Validates configuration and definitions up front, then creates the tables.
async fn run(cli: &Cli) -> Result<()> {
    let vars = definitions::environment(env::vars_os()).inspect_err(report_rejected)?;
    let (config, requests) = prepare(cli, &vars)?;
    let ddb = DynamoDb::connect(&config).await?;
    provisioner::create_all(&requests, &ddb).await?;
    Ok(())
}

/// Resolves the configuration and turns every definition into a request.
///
/// Runs before any network activity, so a bad setting or definition never
/// leaves a partially provisioned batch behind.
fn prepare(cli: &Cli, vars: &[(String, String)]) -> Result<(Config, Vec<ProvisioningRequest>)> {
    let config = Config::resolve(vars, cli.unsafe_mode)?;
    let definitions = definitions::load(vars).inspect_err(report_rejected)?;

    let requests = definitions
        .iter()
        .map(|definition| translate(definition, config.table_prefix()))
        .collect();
    Ok((config, requests))
}

fn report_rejected(e: &DefinitionError) {
    error!(envar = e.key(), "rejected table definition");
}
