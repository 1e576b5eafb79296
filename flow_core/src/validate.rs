//! Full-sequence validation: risk analysis, verdict, advisory notes, and
//! the safer alternative when one is warranted.

use crate::advisory::{describe_sequence, notes_with_timeout, AdvisoryService};
use crate::config::Config;
use crate::repair::repair_sequence;
use crate::safety::{aggregate_safety, analyze_transitions};
use crate::{Catalog, Error, Result, SafetyVerdict, SequenceValidation};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A sequence submitted for validation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Pose ids in practice order
    pub flow: Vec<String>,
    /// Optional planned duration, informational only
    #[serde(default)]
    pub total_seconds: Option<u32>,
}

/// Read a validation request from a JSON file
pub fn load_request(path: &Path) -> Result<ValidationRequest> {
    let contents = std::fs::read_to_string(path)?;
    let request: ValidationRequest = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidFlow(e.to_string()))?;
    Ok(request)
}

/// Validate a sequence end to end
///
/// Risk analysis and the verdict are purely local and always run. The
/// advisory service is consulted under the configured timeout and can
/// only ever add notes, never change the verdict. A safer alternative is
/// attached whenever the verdict is not safe.
pub fn validate_sequence(
    catalog: &Catalog,
    config: &Config,
    advisor: Arc<dyn AdvisoryService>,
    request: &ValidationRequest,
) -> SequenceValidation {
    tracing::info!("Validating sequence of {} poses", request.flow.len());
    if let Some(seconds) = request.total_seconds {
        tracing::debug!("Planned duration: {}s", seconds);
    }

    let risks = analyze_transitions(catalog, &request.flow);

    let description = describe_sequence(catalog, &request.flow);
    let advisories = notes_with_timeout(advisor, description, config.advisory.timeout());

    let overall_safety = aggregate_safety(&risks);
    let safer_alternative = if overall_safety != SafetyVerdict::Safe {
        Some(repair_sequence(
            catalog,
            &config.repair,
            &request.flow,
            &risks,
        ))
    } else {
        None
    };

    tracing::info!(
        "Verdict: {} ({} findings)",
        overall_safety.as_str(),
        risks.len()
    );

    SequenceValidation {
        overall_safety,
        transition_risks: risks,
        advisories,
        safer_alternative,
    }
}
