//! Describe command implementation.

use crate::cli::DescribeArgs;
use crate::error::{CliError, Result};
use crate::output::{DescriptionRow, Formatter};
use bpred_gatekeeper::PredictionService;

/// Describe one structure without predicting.
pub fn describe_row(service: &PredictionService, smiles: &str) -> Result<DescriptionRow> {
    service
        .describe(smiles)
        .map(|description| DescriptionRow::new(smiles, &description))
        .map_err(|reason| CliError::InvalidInput(service.rejection_message(reason)))
}

/// Execute the describe command.
pub fn execute_describe(
    args: DescribeArgs,
    service: &PredictionService,
    formatter: &Formatter,
) -> Result<()> {
    let row = describe_row(service, &args.smiles)?;
    println!("{}", formatter.format_description(&row)?);
    Ok(())
}
