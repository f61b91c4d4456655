//! Bpred Domain Layer
//!
//! Value objects and trait interfaces for boiling-point prediction. Like the
//! rest of the core, it has no third-party runtime dependencies; parsing,
//! model loading and transport live in other crates.
//!
//! ## Key Concepts
//!
//! - **FeatureVector**: the four descriptors fed to the regression pipeline,
//!   in the fixed order the pipeline was trained on
//! - **Prediction**: boiling point in Kelvin, rounded to the nearest integer
//! - **Warning**: a caveat attached to a prediction that is likely inaccurate
//! - **WarningPolicy**: the fixed thresholds that produce warnings
//! - **PredictionOutcome**: either a rejection reason or a prediction report
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Every entity is a request-scoped value object
//! - The pretrained model is reached through the [`traits::BoilingPointModel`] trait

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod features;
pub mod outcome;
pub mod prediction;
pub mod traits;
pub mod warning;

// Re-exports for convenience
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use outcome::{PredictionOutcome, PredictionReport, RejectionReason};
pub use prediction::Prediction;
pub use traits::BoilingPointModel;
pub use warning::{Warning, WarningCode, WarningPolicy};
