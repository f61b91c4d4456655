//! Orchestration scenarios for the prediction service

use bpred_domain::{PredictionOutcome, RejectionReason, WarningCode};
use bpred_gatekeeper::{GatekeeperError, PolicyConfig, PredictionService};
use bpred_model::{MockModel, DEFAULT_ARTIFACT_PATH};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

fn mock_service(output: f64) -> (PredictionService, MockModel) {
    let model = MockModel::new(output);
    let service =
        PredictionService::new(Arc::new(model.clone()), PolicyConfig::default()).unwrap();
    (service, model)
}

fn shipped_artifact() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(DEFAULT_ARTIFACT_PATH)
}

#[test]
fn test_scenario_ethanol() {
    let (service, model) = mock_service(351.0);

    let outcome = service.submit("CCO");
    let report = outcome.report().expect("ethanol is predicted");

    assert!((report.features.mol_wt - 46.04).abs() < 0.01);
    assert_eq!(report.features.h_bond_donors, 1);
    assert_eq!(report.prediction.kelvin(), 351);
    let codes: Vec<_> = report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::MolWt, WarningCode::PredBpLow]);
    assert_eq!(model.call_count(), 1);
}

#[test]
fn test_scenario_empty_input() {
    let (service, model) = mock_service(400.0);

    assert_eq!(
        service.submit("").rejection(),
        Some(RejectionReason::EmptyQuery)
    );
    assert_eq!(
        service.submit("   ").rejection(),
        Some(RejectionReason::EmptyQuery)
    );
    assert_eq!(
        RejectionReason::EmptyQuery.message(),
        "No search query was entered."
    );
    assert_eq!(model.call_count(), 0);
}

#[test]
fn test_scenario_chlorine() {
    let (service, model) = mock_service(400.0);

    for input in ["CCCl", "ClC(Cl)Cl", "c1ccccc1Cl"] {
        assert_eq!(
            service.submit(input),
            PredictionOutcome::Rejected(RejectionReason::DisallowedAtoms)
        );
    }
    assert_eq!(model.call_count(), 0);
}

#[test]
fn test_scenario_garbled() {
    let (service, model) = mock_service(400.0);

    for input in ["not_a_structure", "C1CC", "c1cccc1", "C(C)(C)(C)(C)C", "[Cl"] {
        assert_eq!(
            service.submit(input).rejection(),
            Some(RejectionReason::Unparseable),
            "{input:?}"
        );
    }
    assert_eq!(model.call_count(), 0);
}

#[test]
fn test_run_is_idempotent() {
    let (service, model) = mock_service(437.6);

    let first = service.run("CC(C)CC(C)(C)C");
    let second = service.run("CC(C)CC(C)(C)C");

    assert_eq!(first, second);
    assert_eq!(model.call_count(), 2);
}

#[test]
fn test_zero_carbon_molecule_reaches_model_with_nan() {
    let (service, model) = mock_service(373.0);

    // the mock ignores its input, so the NaN branch fraction still predicts
    let report = service.run("O").report().cloned().expect("success");
    assert!(report.features.branch_fraction.is_nan());
    assert_eq!(model.call_count(), 1);
}

#[test]
fn test_concurrent_requests_share_one_service() {
    let model = MockModel::new(450.0);
    let service = Arc::new(
        PredictionService::new(Arc::new(model.clone()), PolicyConfig::default()).unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let input = "C".repeat(i + 1);
                service.submit(&input).report().map(|r| r.prediction.kelvin())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(450));
    }
    assert_eq!(model.call_count(), 8);
}

#[test]
fn test_shipped_artifact_predictions() {
    let service = PredictionService::from_artifact(shipped_artifact(), PolicyConfig::default())
        .unwrap();
    assert_eq!(service.model_name(), "bp-linear-v1");

    let ethanol = service.submit("CCO");
    assert_eq!(ethanol.report().unwrap().prediction.kelvin(), 352);

    // water has no carbon: NaN branch fraction makes the linear model NaN
    assert_eq!(
        service.submit("O").rejection(),
        Some(RejectionReason::PredictionUnavailable)
    );
}

#[test]
fn test_missing_artifact_is_fatal() {
    let result = PredictionService::from_artifact("/nonexistent/model.json", PolicyConfig::default());
    assert!(matches!(result, Err(GatekeeperError::Model(_))));
}

#[test]
fn test_corrupt_artifact_is_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"name\": \"broken\"").unwrap();

    let result = PredictionService::from_artifact(file.path(), PolicyConfig::default());
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Model unavailable"));
}
