//! HTTP request handlers for the prediction service.
//!
//! Implements the service index, prediction, health check and fallback
//! endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use bpred_domain::{FeatureVector, PredictionOutcome, PredictionReport, RejectionReason};
use bpred_gatekeeper::PredictionService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Message for GET requests to the prediction endpoint
pub const GET_UNSUPPORTED_MESSAGE: &str =
    "You tried to access this page via a GET request, which is unsupported.";

/// Message for unknown paths
pub const NOT_FOUND_MESSAGE: &str = "Sorry, but there is nothing at that path.";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read-only prediction pipeline, shared by every request
    pub service: Arc<PredictionService>,
}

/// Prediction request
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Structure string; a missing field counts as an empty query
    #[serde(default)]
    pub mol_struct: String,
}

/// One prediction caveat
#[derive(Debug, Serialize, Deserialize)]
pub struct WarningBody {
    /// Stable warning code
    pub code: String,
    /// User-facing explanation
    pub message: String,
}

/// Descriptors the prediction was made from
///
/// `branch_fraction` is `null` when the molecule has no carbon.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeaturesBody {
    /// Fraction of carbons that are branch points
    pub branch_fraction: Option<f64>,
    /// Hydrogen bond donors
    pub h_bond_donors: u32,
    /// Exact molecular weight
    pub mol_wt: f64,
    /// Aromatic rings
    pub rings_aromatic: u32,
}

impl From<&FeatureVector> for FeaturesBody {
    fn from(features: &FeatureVector) -> Self {
        Self {
            branch_fraction: Some(features.branch_fraction).filter(|v| v.is_finite()),
            h_bond_donors: features.h_bond_donors,
            mol_wt: features.mol_wt,
            rings_aromatic: features.rings_aromatic,
        }
    }
}

/// Successful prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Structure string as submitted
    pub smiles: String,
    /// Predicted boiling point, rounded Kelvin
    pub bp_pred: i64,
    /// Predicted boiling point in degrees Celsius
    pub bp_pred_celsius: f64,
    /// Caveats in evaluation order
    pub warnings: Vec<WarningBody>,
    /// Model inputs
    pub features: FeaturesBody,
    /// Molecular formula
    pub formula: String,
}

impl PredictResponse {
    fn new(smiles: String, report: &PredictionReport) -> Self {
        Self {
            smiles,
            bp_pred: report.prediction.kelvin(),
            bp_pred_celsius: report.prediction.celsius(),
            warnings: report
                .warnings
                .iter()
                .map(|w| WarningBody {
                    code: w.code.as_str().to_string(),
                    message: w.message.to_string(),
                })
                .collect(),
            features: FeaturesBody::from(&report.features),
            formula: report.formula.clone(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Name of the loaded model
    pub model: String,
}

/// Endpoint listing served at the root
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Service name
    pub service: String,
    /// Available routes
    pub endpoints: Vec<String>,
    /// Elements a structure may contain
    pub allowed_elements: Vec<String>,
    /// Longest accepted structure string
    pub max_input_length: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable reason code
    pub reason: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Submission rejected by the prediction service
    Rejected {
        /// Why
        reason: RejectionReason,
        /// User-facing message
        message: String,
    },
    /// Request body is not a JSON prediction request
    InvalidBody {
        /// Status chosen by the JSON extractor
        status: StatusCode,
        /// Extractor message
        message: String,
    },
    /// Prediction endpoint reached with GET
    MethodNotAllowed,
    /// Unknown path
    NotFound,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Rejected { reason, .. } => match reason {
                RejectionReason::EmptyQuery => StatusCode::BAD_REQUEST,
                RejectionReason::InputTooLong => StatusCode::PAYLOAD_TOO_LARGE,
                RejectionReason::Unparseable
                | RejectionReason::DisallowedAtoms
                | RejectionReason::PredictionUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            },
            AppError::InvalidBody { status, .. } => *status,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, reason) = match self {
            AppError::Rejected { reason, message } => (message, reason.as_str()),
            AppError::InvalidBody { message, .. } => (message, "invalid_body"),
            AppError::MethodNotAllowed => {
                (GET_UNSUPPORTED_MESSAGE.to_string(), "method_not_allowed")
            }
            AppError::NotFound => (NOT_FOUND_MESSAGE.to_string(), "not_found"),
        };

        let body = Json(ErrorResponse {
            error: message,
            reason: reason.to_string(),
        });
        (status, body).into_response()
    }
}

/// GET / - Service index
async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        service: "bpred".to_string(),
        endpoints: vec![
            "POST /results".to_string(),
            "GET /health".to_string(),
        ],
        allowed_elements: state.service.allowlist().symbols().to_vec(),
        max_input_length: state.service.max_input_length(),
    })
}

/// POST /results - Predict a boiling point
async fn predict(
    State(state): State<AppState>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(request) = request?;
    match state.service.submit(&request.mol_struct) {
        PredictionOutcome::Success(report) => {
            info!(
                smiles = %request.mol_struct,
                kelvin = report.prediction.kelvin(),
                "Served prediction"
            );
            Ok(Json(PredictResponse::new(request.mol_struct, &report)))
        }
        PredictionOutcome::Rejected(reason) => Err(AppError::Rejected {
            reason,
            message: state.service.rejection_message(reason),
        }),
    }
}

/// GET /results - Only reachable by POST
async fn results_get() -> AppError {
    AppError::MethodNotAllowed
}

/// GET /health - Health check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        model: state.service.model_name().to_string(),
    })
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(index))
        .route("/results", get(results_get).post(predict))
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bpred_gatekeeper::PolicyConfig;
    use bpred_model::MockModel;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let model = Arc::new(MockModel::new(500.0));
        let service = PredictionService::new(model, PolicyConfig::default()).unwrap();
        AppState {
            service: Arc::new(service),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/results")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"mol_struct": "CCCCCCCCO"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_rejection_status_codes() {
        let rejected = |reason| AppError::Rejected {
            reason,
            message: String::new(),
        };
        assert_eq!(
            rejected(RejectionReason::EmptyQuery).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejected(RejectionReason::DisallowedAtoms).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_nan_branch_fraction_serializes_as_null() {
        let body = FeaturesBody::from(&FeatureVector::new(f64::NAN, 0, 18.0, 0));
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["branch_fraction"].is_null());
    }
}
