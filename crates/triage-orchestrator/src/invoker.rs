//! Triage invocation

use crate::error::OrchestratorError;
use tracing::{info, warn};
use triage_domain::traits::TriageService;
use triage_domain::{ClinicalPayload, TriageResponse};

/// Submit a payload to the reasoning collaborator
///
/// One request, no retry. Any failure, including an undecodable body, ends
/// the run.
pub async fn invoke<T>(service: &T, payload: &ClinicalPayload) -> Result<TriageResponse, OrchestratorError>
where
    T: TriageService + Sync,
{
    info!(
        transcript = payload.transcript_text.is_some(),
        lab = payload.lab_text.is_some(),
        imaging = payload.imaging.is_some(),
        "Submitting triage payload"
    );

    match service.assess(payload).await {
        Ok(response) => {
            info!(
                risk_level = %response.risk_level,
                alerts = response.emergency_alerts.len(),
                "Triage response received"
            );
            Ok(response)
        }
        Err(e) => {
            warn!(error = %e, "Triage call failed");
            Err(OrchestratorError::Triage(Box::new(e)))
        }
    }
}
