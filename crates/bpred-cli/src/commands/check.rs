//! Check command implementation.

use crate::cli::CheckArgs;
use crate::error::Result;
use crate::output::{CheckRow, Formatter};
use bpred_gatekeeper::PredictionService;

/// Execute the check command.
pub fn execute_check(
    args: CheckArgs,
    service: &PredictionService,
    formatter: &Formatter,
) -> Result<()> {
    let rows: Vec<CheckRow> = args
        .smiles
        .iter()
        .map(|smiles| CheckRow::new(smiles, service.check(smiles)))
        .collect();
    println!("{}", formatter.format_checks(&rows)?);
    Ok(())
}
