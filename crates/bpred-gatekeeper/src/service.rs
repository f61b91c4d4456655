//! Prediction orchestration

use crate::{AtomAllowlist, GatekeeperError, PolicyConfig};
use bpred_chem::{FeatureExtractor, Molecule, StructureParser};
use bpred_domain::{
    BoilingPointModel, FeatureVector, Prediction, PredictionOutcome, PredictionReport,
    RejectionReason, WarningPolicy,
};
use bpred_model::PipelineModel;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Descriptors of a parsed structure, without a prediction
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDescription {
    /// Model features in fixed order
    pub features: FeatureVector,
    /// Molecular formula in Hill order
    pub formula: String,
    /// Distinct element symbols
    pub elements: Vec<&'static str>,
    /// Heavy (non-hydrogen) atom count
    pub heavy_atoms: usize,
    /// Elements outside the allowlist
    pub disallowed: Vec<&'static str>,
}

/// Validity of a structure string against the parser and the allowlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureCheck {
    /// Whether the string is a valid molecule
    pub parses: bool,
    /// Parser error, when it is not
    pub parse_error: Option<String>,
    /// Whether every element is on the allowlist (false when unparseable)
    pub allowed: bool,
    /// Elements outside the allowlist
    pub disallowed: Vec<&'static str>,
}

/// Runs structures through parse, allowlist, features, model and warnings
///
/// Holds only read-only state, so one instance can serve concurrent requests
/// behind an `Arc` without locking.
pub struct PredictionService {
    model: Arc<dyn BoilingPointModel>,
    allowlist: AtomAllowlist,
    max_input_length: usize,
}

impl PredictionService {
    /// Create a service around an already loaded model
    pub fn new(
        model: Arc<dyn BoilingPointModel>,
        config: PolicyConfig,
    ) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self {
            model,
            allowlist: AtomAllowlist::new(config.allowed_elements),
            max_input_length: config.max_input_length,
        })
    }

    /// Load the pipeline artifact once and build a service around it
    ///
    /// A missing or corrupt artifact is fatal; there is no fallback model.
    pub fn from_artifact(
        path: impl AsRef<Path>,
        config: PolicyConfig,
    ) -> Result<Self, GatekeeperError> {
        let model = PipelineModel::from_file(path)?;
        Self::new(Arc::new(model), config)
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// The configured allowlist
    pub fn allowlist(&self) -> &AtomAllowlist {
        &self.allowlist
    }

    /// Longest submission the caller guard accepts
    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    /// Handle a raw submission: apply the caller guard, then [`Self::run`].
    ///
    /// Surrounding whitespace is dropped. Empty (or whitespace-only) and
    /// oversized submissions are rejected before the parser sees them.
    pub fn submit(&self, raw: &str) -> PredictionOutcome {
        match self.guard(raw) {
            Ok(input) => self.run(input),
            Err(reason) => PredictionOutcome::Rejected(reason),
        }
    }

    fn guard<'a>(&self, raw: &'a str) -> Result<&'a str, RejectionReason> {
        let input = raw.trim();
        if input.is_empty() {
            warn!("Rejected empty submission");
            return Err(RejectionReason::EmptyQuery);
        }
        if input.len() > self.max_input_length {
            warn!(
                length = input.len(),
                limit = self.max_input_length,
                "Rejected oversized submission"
            );
            return Err(RejectionReason::InputTooLong);
        }
        Ok(input)
    }

    /// Predict a boiling point for a structure string
    ///
    /// Short-circuits on the first failing stage: parse, allowlist, then the
    /// model. Never panics or errors on malformed input.
    pub fn run(&self, input: &str) -> PredictionOutcome {
        let molecule = match StructureParser::parse(input) {
            Ok(molecule) => molecule,
            Err(err) => {
                warn!(error = %err, "Rejected unparseable structure");
                return PredictionOutcome::Rejected(RejectionReason::Unparseable);
            }
        };

        if !self.allowlist.allowed(&molecule) {
            warn!(
                disallowed = ?self.allowlist.disallowed(&molecule),
                "Rejected structure with disallowed atoms"
            );
            return PredictionOutcome::Rejected(RejectionReason::DisallowedAtoms);
        }

        let features = FeatureExtractor::extract(&molecule);
        debug!(?features, "Extracted features");

        let raw = self.model.predict(&features);
        let Some(prediction) = Prediction::from_model_output(raw) else {
            warn!(raw, ?features, "Model produced no finite prediction");
            return PredictionOutcome::Rejected(RejectionReason::PredictionUnavailable);
        };

        let warnings = WarningPolicy::evaluate(&features, &prediction);
        debug!(
            kelvin = prediction.kelvin(),
            warnings = warnings.len(),
            "Predicted boiling point"
        );

        PredictionOutcome::Success(PredictionReport {
            prediction,
            warnings,
            features,
            formula: molecule.formula(),
        })
    }

    /// Features and composition of a structure, without calling the model
    pub fn describe(&self, input: &str) -> Result<StructureDescription, RejectionReason> {
        let molecule = self.parse_guarded(input)?;
        Ok(StructureDescription {
            features: FeatureExtractor::extract(&molecule),
            formula: molecule.formula(),
            elements: molecule.element_symbols().into_iter().collect(),
            heavy_atoms: molecule.heavy_atom_count(),
            disallowed: self.allowlist.disallowed(&molecule),
        })
    }

    /// Whether a structure parses and passes the allowlist
    pub fn check(&self, input: &str) -> StructureCheck {
        match StructureParser::parse(input.trim()) {
            Ok(molecule) => {
                let disallowed = self.allowlist.disallowed(&molecule);
                StructureCheck {
                    parses: true,
                    parse_error: None,
                    allowed: disallowed.is_empty(),
                    disallowed,
                }
            }
            Err(err) => StructureCheck {
                parses: false,
                parse_error: Some(err.to_string()),
                allowed: false,
                disallowed: Vec::new(),
            },
        }
    }

    /// User-facing text for a rejection; the disallowed-atoms message names
    /// the configured allowlist.
    pub fn rejection_message(&self, reason: RejectionReason) -> String {
        match reason {
            RejectionReason::DisallowedAtoms => format!(
                "The model is currently only trained on molecules containing {}. \
                 Other heteroatoms are currently outside the scope of its predictive capacity.",
                self.allowlist.describe()
            ),
            other => other.message().to_string(),
        }
    }

    fn parse_guarded(&self, raw: &str) -> Result<Molecule, RejectionReason> {
        let input = self.guard(raw)?;
        StructureParser::parse(input).map_err(|_| RejectionReason::Unparseable)
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("model", &self.model.name())
            .field("allowlist", &self.allowlist.symbols())
            .field("max_input_length", &self.max_input_length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpred_domain::WarningCode;
    use bpred_model::MockModel;

    fn service_with(output: f64) -> (PredictionService, MockModel) {
        let model = MockModel::new(output);
        let service =
            PredictionService::new(Arc::new(model.clone()), PolicyConfig::default()).unwrap();
        (service, model)
    }

    #[test]
    fn test_success_carries_report() {
        let (service, model) = service_with(500.4);
        let outcome = service.run("CCCCCCCCO");
        let report = outcome.report().expect("success");
        assert_eq!(report.prediction.kelvin(), 500);
        assert_eq!(report.formula, "C8H18O");
        assert!(report.warnings.is_empty());
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_low_prediction_warns() {
        let (service, _) = service_with(351.0);
        let report = service.run("CCO").report().cloned().unwrap();
        let codes: Vec<_> = report.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![WarningCode::MolWt, WarningCode::PredBpLow]);
    }

    #[test]
    fn test_non_finite_output_is_rejected() {
        let (service, model) = service_with(f64::NAN);
        assert_eq!(
            service.run("CCO").rejection(),
            Some(RejectionReason::PredictionUnavailable)
        );
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_guard_rejects_oversized_input() {
        let model = MockModel::new(400.0);
        let config = PolicyConfig {
            max_input_length: 10,
            ..PolicyConfig::default()
        };
        let service = PredictionService::new(Arc::new(model.clone()), config).unwrap();
        assert_eq!(
            service.submit("CCCCCCCCCCCC").rejection(),
            Some(RejectionReason::InputTooLong)
        );
        assert!(service.submit("CCCCCCCCCC").report().is_some());
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_guard_trims_surrounding_whitespace() {
        let (service, model) = service_with(400.0);
        assert!(service.submit(" CCO").report().is_some());
        assert!(service.submit("\tCCO\n").report().is_some());
        assert_eq!(service.submit(" CCO"), service.submit("CCO"));
        assert!(service.describe("  CCO ").is_ok());
        assert_eq!(model.call_count(), 4);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PolicyConfig::with_elements(["C", "Zz"]);
        let result = PredictionService::new(Arc::new(MockModel::default()), config);
        assert!(matches!(result, Err(GatekeeperError::Config(_))));
    }

    #[test]
    fn test_describe() {
        let (service, model) = service_with(400.0);
        let description = service.describe("OCC(Cl)C").unwrap();
        assert_eq!(description.formula, "C3H7ClO");
        assert_eq!(description.elements, vec!["C", "Cl", "O"]);
        assert_eq!(description.disallowed, vec!["Cl"]);
        assert_eq!(description.heavy_atoms, 5);
        assert_eq!(description.features.h_bond_donors, 1);
        assert_eq!(model.call_count(), 0);

        assert_eq!(service.describe(""), Err(RejectionReason::EmptyQuery));
        assert_eq!(service.describe("C1CC"), Err(RejectionReason::Unparseable));
    }

    #[test]
    fn test_check() {
        let (service, _) = service_with(400.0);

        let ok = service.check("CCN");
        assert!(ok.parses && ok.allowed);

        let chlorinated = service.check("CCCl");
        assert!(chlorinated.parses);
        assert!(!chlorinated.allowed);
        assert_eq!(chlorinated.disallowed, vec!["Cl"]);

        let garbled = service.check("not_a_structure");
        assert!(!garbled.parses);
        assert!(garbled.parse_error.is_some());
    }

    #[test]
    fn test_rejection_message_follows_allowlist() {
        let (service, _) = service_with(400.0);
        assert_eq!(
            service.rejection_message(RejectionReason::DisallowedAtoms),
            RejectionReason::DisallowedAtoms.message()
        );

        let custom = PredictionService::new(
            Arc::new(MockModel::default()),
            PolicyConfig::with_elements(["C", "H", "Cl"]),
        )
        .unwrap();
        assert!(custom
            .rejection_message(RejectionReason::DisallowedAtoms)
            .contains("C, H, and Cl"));
        assert_eq!(
            custom.rejection_message(RejectionReason::EmptyQuery),
            "No search query was entered."
        );
    }
}
