//! Prediction outcome module

use crate::{FeatureVector, Prediction, Warning};

/// Why a submitted structure did not produce a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// Nothing was submitted
    EmptyQuery,
    /// Submission longer than the configured limit
    InputTooLong,
    /// The structure string is not a valid molecule
    Unparseable,
    /// The molecule contains elements outside the training allowlist
    DisallowedAtoms,
    /// The model produced no finite value for the molecule's features
    PredictionUnavailable,
}

impl RejectionReason {
    /// Stable machine-readable code
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::EmptyQuery => "empty_query",
            RejectionReason::InputTooLong => "input_too_long",
            RejectionReason::Unparseable => "unparseable",
            RejectionReason::DisallowedAtoms => "disallowed_atoms",
            RejectionReason::PredictionUnavailable => "prediction_unavailable",
        }
    }

    /// Fixed user-facing explanation
    ///
    /// The `DisallowedAtoms` text names the default allowlist; callers with a
    /// custom allowlist build their own message.
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::EmptyQuery => "No search query was entered.",
            RejectionReason::InputTooLong => {
                "The structure you provided is too long to be processed."
            }
            RejectionReason::Unparseable => {
                "The structure you provided could not be interpreted. \
                 Please ensure that your structure is chemically valid."
            }
            RejectionReason::DisallowedAtoms => {
                "The model is currently only trained on molecules containing H, C, O, and N. \
                 Other heteroatoms are currently outside the scope of its predictive capacity."
            }
            RejectionReason::PredictionUnavailable => {
                "A boiling point could not be predicted for this structure; \
                 molecules without carbon atoms are outside the scope of the model."
            }
        }
    }

    /// Parse a reason from its code
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "empty_query" => Some(RejectionReason::EmptyQuery),
            "input_too_long" => Some(RejectionReason::InputTooLong),
            "unparseable" => Some(RejectionReason::Unparseable),
            "disallowed_atoms" => Some(RejectionReason::DisallowedAtoms),
            "prediction_unavailable" => Some(RejectionReason::PredictionUnavailable),
            _ => None,
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything produced for an accepted structure
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    /// Predicted boiling point
    pub prediction: Prediction,
    /// Caveats in evaluation order
    pub warnings: Vec<Warning>,
    /// Descriptors the prediction was made from
    pub features: FeatureVector,
    /// Molecular formula in Hill order
    pub formula: String,
}

/// Result of running one structure through the prediction pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// No prediction was made
    Rejected(RejectionReason),
    /// Prediction with caveats
    Success(PredictionReport),
}

impl PredictionOutcome {
    /// Rejection reason, if any
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            PredictionOutcome::Rejected(reason) => Some(*reason),
            PredictionOutcome::Success(_) => None,
        }
    }

    /// Report, if the structure was accepted
    pub fn report(&self) -> Option<&PredictionReport> {
        match self {
            PredictionOutcome::Rejected(_) => None,
            PredictionOutcome::Success(report) => Some(report),
        }
    }
}
