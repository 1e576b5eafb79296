#![forbid(unsafe_code)]

//! Core domain model and sequencing logic for the Vinyasa flow system.
//!
//! This crate provides:
//! - Domain types (poses, relations, risks, verdicts)
//! - Catalog management and preset flows
//! - Next-pose suggestion engine
//! - Transition risk analysis and sequence repair
//! - Advisory note integration with timeout and fallback

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod suggest;
pub mod safety;
pub mod repair;
pub mod advisory;
pub mod validate;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, find_preset, get_default_catalog, Catalog, PRESET_FLOWS};
pub use config::Config;
pub use suggest::suggest_next;
pub use safety::{aggregate_safety, analyze_transitions};
pub use repair::repair_sequence;
pub use advisory::{AdvisoryService, OfflineAdvisor};
pub use validate::{load_request, validate_sequence, ValidationRequest};
