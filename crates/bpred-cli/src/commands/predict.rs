//! Predict command implementation.

use crate::cli::PredictArgs;
use crate::error::Result;
use crate::output::{Formatter, PredictionRow};
use bpred_gatekeeper::PredictionService;
use tracing::debug;

/// Predict every structure, in the order given.
///
/// Rejections are reported per row; they are not errors.
pub fn predict_rows(service: &PredictionService, inputs: &[String]) -> Vec<PredictionRow> {
    debug!(count = inputs.len(), model = service.model_name(), "Predicting structures");
    inputs
        .iter()
        .map(|smiles| PredictionRow::new(smiles, &service.submit(smiles), service))
        .collect()
}

/// Execute the predict command.
pub fn execute_predict(
    args: PredictArgs,
    service: &PredictionService,
    formatter: &Formatter,
) -> Result<()> {
    let rows = predict_rows(service, &args.smiles);
    println!("{}", formatter.format_predictions(&rows)?);
    Ok(())
}
