//! Gatekeeper error types

use bpred_model::ModelError;
use thiserror::Error;

/// Errors that can occur while building a prediction service
///
/// Per-request problems are never errors; they come back as
/// `PredictionOutcome::Rejected`.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// The model artifact could not be loaded
    #[error("Model unavailable: {0}")]
    Model(#[from] ModelError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
