//! Integration tests for the HTTP server

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bpred_gatekeeper::{PolicyConfig, PredictionService};
use bpred_model::{MockModel, DEFAULT_ARTIFACT_PATH};
use bpred_server::{
    build_state,
    config::ServerConfig,
    handlers::{
        create_router, AppState, ErrorResponse, HealthCheckResponse, IndexResponse,
        PredictResponse, GET_UNSUPPORTED_MESSAGE, NOT_FOUND_MESSAGE,
    },
};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

/// Helper to create test application state around a fixed-output model
fn create_test_state(output: f64) -> AppState {
    let service = PredictionService::new(Arc::new(MockModel::new(output)), PolicyConfig::default())
        .unwrap();
    AppState {
        service: Arc::new(service),
    }
}

fn post_results(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/results")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send<T: DeserializeOwned>(app: Router, request: Request<Body>) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(create_test_state(400.0));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, health): (_, HealthCheckResponse) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.model, "mock");
}

#[tokio::test]
async fn test_index_lists_policy() {
    let app = create_router(create_test_state(400.0));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, index): (_, IndexResponse) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(index.allowed_elements, vec!["H", "C", "O", "N"]);
    assert_eq!(index.max_input_length, 500);
    assert!(index.endpoints.iter().any(|e| e == "POST /results"));
}

#[tokio::test]
async fn test_predict_ethanol() {
    let app = create_router(create_test_state(351.0));

    let (status, result): (_, PredictResponse) =
        send(app, post_results(r#"{"mol_struct": "CCO"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.smiles, "CCO");
    assert_eq!(result.bp_pred, 351);
    assert_eq!(result.formula, "C2H6O");
    assert_eq!(result.features.h_bond_donors, 1);
    assert_eq!(result.features.branch_fraction, Some(0.0));
    let codes: Vec<_> = result.warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(codes, vec!["mol_wt", "pred_bp_low"]);
}

#[tokio::test]
async fn test_predict_water_has_null_branch_fraction() {
    let app = create_router(create_test_state(373.0));

    let (status, result): (_, PredictResponse) =
        send(app, post_results(r#"{"mol_struct": "O"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.features.branch_fraction, None);
}

#[tokio::test]
async fn test_empty_query_is_bad_request() {
    for body in [r#"{"mol_struct": ""}"#, r#"{"mol_struct": "   "}"#, "{}"] {
        let app = create_router(create_test_state(400.0));
        let (status, error): (_, ErrorResponse) = send(app, post_results(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error.reason, "empty_query");
        assert_eq!(error.error, "No search query was entered.");
    }
}

#[tokio::test]
async fn test_disallowed_atoms_are_unprocessable() {
    let app = create_router(create_test_state(400.0));

    let (status, error): (_, ErrorResponse) =
        send(app, post_results(r#"{"mol_struct": "CCCl"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error.reason, "disallowed_atoms");
    assert!(error.error.contains("H, C, O, and N"));
}

#[tokio::test]
async fn test_unparseable_is_unprocessable() {
    let app = create_router(create_test_state(400.0));

    let (status, error): (_, ErrorResponse) =
        send(app, post_results(r#"{"mol_struct": "not_a_structure"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error.reason, "unparseable");
}

#[tokio::test]
async fn test_oversized_input_is_rejected() {
    let app = create_router(create_test_state(400.0));
    let body = format!(r#"{{"mol_struct": "{}"}}"#, "C".repeat(501));

    let (status, error): (_, ErrorResponse) = send(app, post_results(&body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error.reason, "input_too_long");
}

#[tokio::test]
async fn test_non_finite_prediction_is_unprocessable() {
    let app = create_router(create_test_state(f64::NAN));

    let (status, error): (_, ErrorResponse) =
        send(app, post_results(r#"{"mol_struct": "CCO"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error.reason, "prediction_unavailable");
}

#[tokio::test]
async fn test_malformed_body_keeps_error_shape() {
    let app = create_router(create_test_state(400.0));
    let (status, error): (_, ErrorResponse) =
        send(app, post_results(r#"{"mol_struct": "CCO""#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.reason, "invalid_body");
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_form_body_is_rejected_as_json() {
    let app = create_router(create_test_state(400.0));
    let request = Request::builder()
        .method("POST")
        .uri("/results")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("mol_struct=CCO"))
        .unwrap();

    let (status, error): (_, ErrorResponse) = send(app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error.reason, "invalid_body");
}

#[tokio::test]
async fn test_get_results_is_method_not_allowed() {
    let app = create_router(create_test_state(400.0));

    let request = Request::builder()
        .method("GET")
        .uri("/results")
        .body(Body::empty())
        .unwrap();

    let (status, error): (_, ErrorResponse) = send(app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(error.error, GET_UNSUPPORTED_MESSAGE);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = create_router(create_test_state(400.0));

    let request = Request::builder()
        .uri("/nowhere")
        .body(Body::empty())
        .unwrap();

    let (status, error): (_, ErrorResponse) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error.error, NOT_FOUND_MESSAGE);
}

#[tokio::test]
async fn test_state_from_shipped_artifact() {
    let mut config = ServerConfig::default_test_config();
    config.model_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(DEFAULT_ARTIFACT_PATH)
        .to_string_lossy()
        .into_owned();

    let app = create_router(build_state(&config).unwrap());

    let (status, result): (_, PredictResponse) =
        send(app, post_results(r#"{"mol_struct": "CCO"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.bp_pred, 352);
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        bind_address = "0.0.0.0"
        bind_port = 8080
        allowed_elements = ["C", "H"]
        "#
    )
    .unwrap();

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    assert_eq!(config.policy().allowed_elements, vec!["C", "H"]);
    assert_eq!(config.model_path, DEFAULT_ARTIFACT_PATH);
}
