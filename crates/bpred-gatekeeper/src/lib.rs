//! Bpred Gatekeeper
//!
//! Decides whether a submitted structure gets a prediction, and produces it.
//!
//! The Gatekeeper provides:
//! - The caller guard (empty and oversized submissions)
//! - Structure parsing and the atom allowlist check
//! - Feature extraction, the model call and warning evaluation
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use bpred_gatekeeper::{PolicyConfig, PredictionService};
//! use bpred_model::MockModel;
//! use bpred_domain::RejectionReason;
//!
//! let service = PredictionService::new(Arc::new(MockModel::new(350.0)), PolicyConfig::default())
//!     .unwrap();
//!
//! let outcome = service.submit("CCCl");
//! assert_eq!(outcome.rejection(), Some(RejectionReason::DisallowedAtoms));
//! ```

#![warn(missing_docs)]

mod allowlist;
mod config;
mod error;
mod service;

pub use allowlist::AtomAllowlist;
pub use config::{PolicyConfig, DEFAULT_ALLOWED_ELEMENTS, DEFAULT_MAX_INPUT_LENGTH};
pub use error::GatekeeperError;
pub use service::{PredictionService, StructureCheck, StructureDescription};
