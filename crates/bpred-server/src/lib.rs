//! bpred Server
//!
//! HTTP front end for boiling point prediction. Loads the pipeline artifact
//! once at startup and serves predictions from a shared, read-only service.

#![warn(missing_docs)]

pub mod args;
pub mod config;
pub mod handlers;

use bpred_gatekeeper::{GatekeeperError, PredictionService};
use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Model artifact or policy could not be loaded
    #[error("Startup failed: {0}")]
    Gatekeeper(#[from] GatekeeperError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honours `RUST_LOG`, defaulting to `info`. Does nothing if a subscriber
/// is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load the model artifact and build the shared application state
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let service = PredictionService::from_artifact(&config.model_path, config.policy())?;
    Ok(AppState {
        service: Arc::new(service),
    })
}

/// Start the HTTP server
///
/// A missing or corrupt model artifact aborts startup before binding.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting bpred server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model artifact: {}", config.model_path);
    info!("Allowed elements: {}", config.allowed_elements.join(", "));

    let state = build_state(&config)?;
    info!("Loaded model {}", state.service.model_name());

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
