//! Pretrained regression pipeline
//!
//! The artifact is a JSON document holding the feature order the pipeline
//! was trained on, a list of preprocessing steps and a final estimator:
//!
//! ```json
//! {
//!   "name": "bp-linear-v1",
//!   "features": ["branch_fraction", "h_bond_donors", "mol_wt", "rings_aromatic"],
//!   "steps": [{ "type": "standard_scaler", "mean": [0, 0, 0, 0], "scale": [1, 1, 1, 1] }],
//!   "estimator": { "type": "linear", "coefficients": [0, 0, 0, 0], "intercept": 300 }
//! }
//! ```
//!
//! Tree ensembles use `{"type": "tree_ensemble", "aggregate": "sum" | "mean",
//! "base_score": f64, "trees": [{"nodes": [...]}]}` where each node is a
//! `split` (`feature`, `threshold`, `left`, `right`, `missing_left`) or a
//! `leaf` (`value`). Children always come after their parent.
//!
//! NaN features pass through the scaler and linear estimator unchanged;
//! trees send them down the `missing_left` branch.

use crate::ModelError;
use bpred_domain::{BoilingPointModel, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Where the server and CLI look for the artifact unless configured otherwise
pub const DEFAULT_ARTIFACT_PATH: &str = "model/full_pipe.json";

#[derive(Debug, Clone, Deserialize)]
struct Artifact {
    name: String,
    features: Vec<String>,
    #[serde(default)]
    steps: Vec<Step>,
    estimator: Estimator,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Step {
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Estimator {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        aggregate: Aggregate,
        #[serde(default)]
        base_score: f64,
        trees: Vec<Tree>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Aggregate {
    Sum,
    Mean,
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        value: f64,
    },
}

fn default_missing_left() -> bool {
    true
}

impl Step {
    fn apply(&self, x: &mut [f64; FEATURE_COUNT]) {
        match self {
            Step::StandardScaler { mean, scale } => {
                for (i, value) in x.iter_mut().enumerate() {
                    *value = (*value - mean[i]) / scale[i];
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Step::StandardScaler { mean, scale } => {
                check_len("standard_scaler", "mean", mean)?;
                check_len("standard_scaler", "scale", scale)?;
                if let Some(bad) = scale.iter().find(|s| **s == 0.0 || !s.is_finite()) {
                    return Err(ModelError::InvalidParameters {
                        component: "standard_scaler",
                        reason: format!("scale must be finite and non-zero, found {bad}"),
                    });
                }
                Ok(())
            }
        }
    }
}

impl Tree {
    fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let value = x[*feature];
                    let go_left = if value.is_nan() {
                        *missing_left
                    } else {
                        value < *threshold
                    };
                    index = if go_left { *left } else { *right };
                }
            }
        }
    }

    /// Every split refers to a valid feature and to children stored after it,
    /// so evaluation always reaches a leaf.
    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::InvalidTree { tree, reason };
        if self.nodes.is_empty() {
            return Err(invalid("tree has no nodes".to_string()));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(invalid(format!("node {index} splits on feature {feature}")));
                }
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(invalid(format!("node {index} has child {child} out of range")));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Estimator {
    fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        match self {
            Estimator::Linear {
                coefficients,
                intercept,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(x)
                        .map(|(c, v)| c * v)
                        .sum::<f64>()
            }
            Estimator::TreeEnsemble {
                aggregate,
                base_score,
                trees,
            } => {
                let total: f64 = trees.iter().map(|t| t.evaluate(x)).sum();
                match aggregate {
                    Aggregate::Sum => base_score + total,
                    Aggregate::Mean => base_score + total / trees.len() as f64,
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Estimator::Linear { coefficients, .. } => check_len("linear", "coefficients", coefficients),
            Estimator::TreeEnsemble { trees, .. } => {
                if trees.is_empty() {
                    return Err(ModelError::InvalidParameters {
                        component: "tree_ensemble",
                        reason: "ensemble has no trees".to_string(),
                    });
                }
                trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, tree)| tree.validate(i))
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Estimator::Linear { .. } => "linear",
            Estimator::TreeEnsemble { .. } => "tree_ensemble",
        }
    }
}

fn check_len(component: &'static str, field: &str, values: &[f64]) -> Result<(), ModelError> {
    if values.len() != FEATURE_COUNT {
        return Err(ModelError::InvalidParameters {
            component,
            reason: format!(
                "{field} has {} values, expected {FEATURE_COUNT}",
                values.len()
            ),
        });
    }
    Ok(())
}

/// The pretrained boiling point regressor
///
/// Immutable after loading; share it behind an `Arc` across requests.
#[derive(Debug, Clone)]
pub struct PipelineModel {
    artifact: Artifact,
}

impl PipelineModel {
    /// Load and validate an artifact from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ModelError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let model = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            name = model.name(),
            estimator = model.artifact.estimator.kind(),
            steps = model.artifact.steps.len(),
            "Loaded model artifact"
        );
        Ok(model)
    }

    /// Parse and validate an artifact from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: Artifact =
            serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))?;

        if artifact.features.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelError::FeatureOrder {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: artifact.features,
            });
        }
        artifact.steps.iter().try_for_each(Step::validate)?;
        artifact.estimator.validate()?;

        Ok(Self { artifact })
    }

    /// Number of preprocessing steps before the estimator
    pub fn step_count(&self) -> usize {
        self.artifact.steps.len()
    }
}

impl BoilingPointModel for PipelineModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let mut x = features.to_array();
        for step in &self.artifact.steps {
            step.apply(&mut x);
        }
        self.artifact.estimator.evaluate(&x)
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &str = r#"{
        "name": "linear-test",
        "features": ["branch_fraction", "h_bond_donors", "mol_wt", "rings_aromatic"],
        "estimator": { "type": "linear", "coefficients": [-60.0, 40.0, 1.35, 20.0], "intercept": 250.0 }
    }"#;

    const SCALED: &str = r#"{
        "name": "scaled-test",
        "features": ["branch_fraction", "h_bond_donors", "mol_wt", "rings_aromatic"],
        "steps": [{ "type": "standard_scaler", "mean": [0.0, 1.0, 100.0, 0.0], "scale": [1.0, 2.0, 50.0, 1.0] }],
        "estimator": { "type": "linear", "coefficients": [0.0, 10.0, 100.0, 0.0], "intercept": 400.0 }
    }"#;

    const TREES: &str = r#"{
        "name": "tree-test",
        "features": ["branch_fraction", "h_bond_donors", "mol_wt", "rings_aromatic"],
        "estimator": {
            "type": "tree_ensemble",
            "aggregate": "sum",
            "base_score": 300.0,
            "trees": [
                { "nodes": [
                    { "type": "split", "feature": 2, "threshold": 100.0, "left": 1, "right": 2 },
                    { "type": "leaf", "value": 10.0 },
                    { "type": "leaf", "value": 100.0 }
                ] },
                { "nodes": [
                    { "type": "split", "feature": 0, "threshold": 0.5, "left": 1, "right": 2, "missing_left": false },
                    { "type": "leaf", "value": 1.0 },
                    { "type": "leaf", "value": -1.0 }
                ] }
            ]
        }
    }"#;

    fn ethanol() -> FeatureVector {
        FeatureVector::new(0.0, 1, 46.041864812, 0)
    }

    #[test]
    fn test_linear_prediction() {
        let model = PipelineModel::from_json(LINEAR).unwrap();
        let expected = 250.0 + 40.0 + 1.35 * 46.041864812;
        assert!((model.predict(&ethanol()) - expected).abs() < 1e-9);
        assert_eq!(model.name(), "linear-test");
        assert_eq!(model.step_count(), 0);
    }

    #[test]
    fn test_scaler_then_linear() {
        let model = PipelineModel::from_json(SCALED).unwrap();
        let features = FeatureVector::new(0.5, 3, 150.0, 1);
        // (3 - 1) / 2 = 1, (150 - 100) / 50 = 1
        assert!((model.predict(&features) - 510.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_propagates_through_linear() {
        let model = PipelineModel::from_json(LINEAR).unwrap();
        let water = FeatureVector::new(f64::NAN, 0, 18.0106, 0);
        assert!(model.predict(&water).is_nan());
    }

    #[test]
    fn test_tree_ensemble() {
        let model = PipelineModel::from_json(TREES).unwrap();
        assert_eq!(model.predict(&ethanol()), 300.0 + 10.0 + 1.0);
        assert_eq!(
            model.predict(&FeatureVector::new(0.75, 0, 150.0, 0)),
            300.0 + 100.0 - 1.0
        );
        // NaN follows missing_left = false
        assert_eq!(
            model.predict(&FeatureVector::new(f64::NAN, 0, 150.0, 0)),
            300.0 + 100.0 - 1.0
        );
    }

    #[test]
    fn test_rejects_wrong_feature_order() {
        let json = LINEAR.replace(
            r#"["branch_fraction", "h_bond_donors", "mol_wt", "rings_aromatic"]"#,
            r#"["mol_wt", "h_bond_donors", "branch_fraction", "rings_aromatic"]"#,
        );
        assert!(matches!(
            PipelineModel::from_json(&json),
            Err(ModelError::FeatureOrder { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_vector_length() {
        let json = LINEAR.replace("[-60.0, 40.0, 1.35, 20.0]", "[-60.0, 40.0, 1.35]");
        assert!(matches!(
            PipelineModel::from_json(&json),
            Err(ModelError::InvalidParameters { component: "linear", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let json = SCALED.replace("[1.0, 2.0, 50.0, 1.0]", "[1.0, 0.0, 50.0, 1.0]");
        assert!(matches!(
            PipelineModel::from_json(&json),
            Err(ModelError::InvalidParameters { component: "standard_scaler", .. })
        ));
    }

    #[test]
    fn test_rejects_backward_tree_edge() {
        let json = TREES.replace(r#""left": 1, "right": 2 }"#, r#""left": 0, "right": 2 }"#);
        assert!(matches!(
            PipelineModel::from_json(&json),
            Err(ModelError::InvalidTree { tree: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            PipelineModel::from_json("{ not json"),
            Err(ModelError::Parse(_))
        ));
        assert!(matches!(
            PipelineModel::from_json(r#"{"name": "x", "features": []}"#),
            Err(ModelError::Parse(_))
        ));
    }
}
