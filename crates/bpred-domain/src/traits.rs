//! Trait definitions for external interactions
//!
//! The pretrained regression pipeline is an opaque collaborator. Its
//! implementations live in `bpred-model`.

use crate::FeatureVector;

/// A pretrained boiling-point regressor
///
/// Implementations are loaded once and shared read-only across requests,
/// so `predict` takes `&self` and the trait requires `Send + Sync`.
pub trait BoilingPointModel: Send + Sync {
    /// Predict a boiling point in Kelvin from a fixed-order feature vector
    ///
    /// NaN features are passed through unchanged; the return value may be
    /// non-finite when they are.
    fn predict(&self, features: &FeatureVector) -> f64;

    /// Short identifier for logs and health reports
    fn name(&self) -> &str;
}
