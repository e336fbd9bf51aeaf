//! Mock collaborators for deterministic testing
//!
//! Returns pre-configured replies without making any network calls, and
//! records every call so tests can assert on call counts, concurrency and the
//! exact payload submitted for triage.

use crate::error::ClientError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use triage_domain::traits::{ExtractionService, TriageService};
use triage_domain::{
    Artifact, ClinicalPayload, ImageExtraction, Modality, TextExtraction, TriageResponse,
};

/// Scripted failure for one collaborator
#[derive(Debug, Clone)]
enum Failure {
    Server { status: u16, body: String },
    Network(String),
    Decode(String),
}

impl Failure {
    fn to_error(&self) -> ClientError {
        match self {
            Failure::Server { status, body } => ClientError::Server {
                status: *status,
                body: body.clone(),
            },
            Failure::Network(msg) => ClientError::Network(msg.clone()),
            Failure::Decode(msg) => ClientError::Decode(msg.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    transcript: TextExtraction,
    document: TextExtraction,
    image: ImageExtraction,
    triage: Option<TriageResponse>,
    failures: HashMap<Modality, Failure>,
    triage_failure: Option<Failure>,
    delays: HashMap<Modality, Duration>,
    triage_delay: Option<Duration>,
    calls: Vec<Modality>,
    preview_requests: Vec<bool>,
    payloads: Vec<ClinicalPayload>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Mock implementation of every collaborator
///
/// Clones share state, so a clone handed to an orchestrator can be inspected
/// from the test afterwards.
///
/// # Examples
///
/// ```
/// use triage_client::MockCollaborators;
/// use triage_domain::{Modality, TriageResponse};
///
/// let mock = MockCollaborators::new()
///     .with_transcript("I have chest pain")
///     .with_triage(TriageResponse::new("high", vec!["chest_pain".to_string()]))
///     .with_server_failure(Modality::Document, 422, "corrupt file");
///
/// assert_eq!(mock.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCollaborators {
    state: Arc<Mutex<MockState>>,
}

impl MockCollaborators {
    /// Create a mock that returns empty extractions and a "low" triage
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the speech recognition transcript
    pub fn with_transcript(self, text: impl Into<String>) -> Self {
        self.state().transcript = TextExtraction::from_text(text);
        self
    }

    /// Set the document extraction text
    pub fn with_document_text(self, text: impl Into<String>) -> Self {
        self.state().document = TextExtraction::from_text(text);
        self
    }

    /// Set the image analysis reply
    pub fn with_image(self, metrics: serde_json::Value, preview: Option<&str>) -> Self {
        self.state().image = ImageExtraction {
            metrics: Some(metrics),
            preview_b64: preview.map(str::to_string),
        };
        self
    }

    /// Set the triage reply
    pub fn with_triage(self, response: TriageResponse) -> Self {
        self.state().triage = Some(response);
        self
    }

    /// Make one extraction collaborator answer with a non-success status
    pub fn with_server_failure(
        self,
        modality: Modality,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.state().failures.insert(
            modality,
            Failure::Server {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Make one extraction collaborator fail at the transport level
    pub fn with_network_failure(self, modality: Modality, message: impl Into<String>) -> Self {
        self.state()
            .failures
            .insert(modality, Failure::Network(message.into()));
        self
    }

    /// Make the triage collaborator return an undecodable body
    pub fn with_triage_decode_failure(self, message: impl Into<String>) -> Self {
        self.state().triage_failure = Some(Failure::Decode(message.into()));
        self
    }

    /// Delay one extraction collaborator's reply
    pub fn with_delay(self, modality: Modality, delay: Duration) -> Self {
        self.state().delays.insert(modality, delay);
        self
    }

    /// Delay the triage reply
    pub fn with_triage_delay(self, delay: Duration) -> Self {
        self.state().triage_delay = Some(delay);
        self
    }

    /// Number of extraction calls made
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Modalities called, in call order
    pub fn calls(&self) -> Vec<Modality> {
        self.state().calls.clone()
    }

    /// Preview flags passed to image analysis, in call order
    pub fn preview_requests(&self) -> Vec<bool> {
        self.state().preview_requests.clone()
    }

    /// Number of triage calls made
    pub fn triage_count(&self) -> usize {
        self.state().payloads.len()
    }

    /// Payloads submitted for triage, in call order
    pub fn payloads(&self) -> Vec<ClinicalPayload> {
        self.state().payloads.clone()
    }

    /// Highest number of extraction calls that were in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.state().max_in_flight
    }

    /// Reset recorded calls, keeping the scripted replies
    pub fn reset_calls(&self) {
        let mut state = self.state();
        state.calls.clear();
        state.preview_requests.clear();
        state.payloads.clear();
        state.max_in_flight = 0;
    }

    /// Record the start of an extraction call and look up its delay
    fn begin(&self, modality: Modality) -> Option<Duration> {
        let mut state = self.state();
        state.calls.push(modality);
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
        state.delays.get(&modality).copied()
    }

    /// Record the end of an extraction call and return its scripted failure
    fn finish(&self, modality: Modality) -> Option<ClientError> {
        let mut state = self.state();
        state.in_flight -= 1;
        state.failures.get(&modality).map(Failure::to_error)
    }

    async fn settle(&self, modality: Modality) -> Result<(), ClientError> {
        if let Some(delay) = self.begin(modality) {
            tokio::time::sleep(delay).await;
        }
        match self.finish(modality) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ExtractionService for MockCollaborators {
    type Error = ClientError;

    async fn transcribe(&self, _audio: &Artifact) -> Result<TextExtraction, ClientError> {
        self.settle(Modality::Audio).await?;
        Ok(self.state().transcript.clone())
    }

    async fn read_document(&self, _document: &Artifact) -> Result<TextExtraction, ClientError> {
        self.settle(Modality::Document).await?;
        Ok(self.state().document.clone())
    }

    async fn analyze_image(
        &self,
        _image: &Artifact,
        preview: bool,
    ) -> Result<ImageExtraction, ClientError> {
        self.state().preview_requests.push(preview);
        self.settle(Modality::Image).await?;
        Ok(self.state().image.clone())
    }
}

impl TriageService for MockCollaborators {
    type Error = ClientError;

    async fn assess(&self, payload: &ClinicalPayload) -> Result<TriageResponse, ClientError> {
        let delay = {
            let mut state = self.state();
            state.payloads.push(payload.clone());
            state.triage_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if let Some(failure) = &state.triage_failure {
            return Err(failure.to_error());
        }
        Ok(state
            .triage
            .clone()
            .unwrap_or_else(|| TriageResponse::new("low", vec![])))
    }
}
