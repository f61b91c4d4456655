//! Bpred Model Layer
//!
//! Implementations of the `BoilingPointModel` trait from `bpred-domain`.
//!
//! # Models
//!
//! - `PipelineModel`: the pretrained regression pipeline, loaded once from
//!   a JSON artifact and shared read-only
//! - `MockModel`: fixed output with a call counter, for tests
//!
//! # Examples
//!
//! ```
//! use bpred_model::MockModel;
//! use bpred_domain::{BoilingPointModel, FeatureVector};
//!
//! let model = MockModel::new(351.0);
//! assert_eq!(model.predict(&FeatureVector::zeroed()), 351.0);
//! assert_eq!(model.call_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod pipeline;

use bpred_domain::{BoilingPointModel, FeatureVector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub use pipeline::{PipelineModel, DEFAULT_ARTIFACT_PATH};

/// Errors raised while loading a model artifact
///
/// Every variant means the model is unavailable; callers treat them as fatal.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Artifact file could not be read
    #[error("Failed to read model artifact {path}: {reason}")]
    Read {
        /// Path that was tried
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// Artifact is not valid JSON for the pipeline schema
    #[error("Failed to parse model artifact: {0}")]
    Parse(String),

    /// Artifact was trained on a different feature order
    #[error("Feature order mismatch: expected {expected:?}, found {found:?}")]
    FeatureOrder {
        /// Order the extractor produces
        expected: Vec<String>,
        /// Order stored in the artifact
        found: Vec<String>,
    },

    /// A parameter vector has the wrong length or an unusable value
    #[error("Invalid {component}: {reason}")]
    InvalidParameters {
        /// Step or estimator at fault
        component: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A decision tree is malformed
    #[error("Invalid tree {tree}: {reason}")]
    InvalidTree {
        /// Index of the tree in the ensemble
        tree: usize,
        /// What is wrong with it
        reason: String,
    },
}

/// Mock model for deterministic testing
///
/// Returns a fixed value for every feature vector and counts calls. Clones
/// share the counter, so a test can hand one clone to a service and read the
/// count from the other.
#[derive(Debug, Clone)]
pub struct MockModel {
    output: f64,
    call_count: Arc<AtomicUsize>,
}

impl MockModel {
    /// Create a mock that always predicts `output`
    pub fn new(output: f64) -> Self {
        Self {
            output,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times predict was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new(400.0)
    }
}

impl BoilingPointModel for MockModel {
    fn predict(&self, _features: &FeatureVector) -> f64 {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.output
    }

    fn name(&self) -> &str {
        "mock"
    }
}
