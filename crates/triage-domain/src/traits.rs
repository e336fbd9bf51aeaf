//! Trait definitions for external collaborators
//!
//! These traits define the boundary between the intake workflow and the
//! services it calls. Implementations live in other crates (triage-client).

use crate::{Artifact, ClinicalPayload, ImageExtraction, TextExtraction, TriageResponse};
use std::future::Future;

/// Modality-specific extraction collaborators
///
/// Each call is one request; implementations must not retry.
pub trait ExtractionService {
    /// Error type for extraction calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Speech recognition of an audio recording
    fn transcribe(
        &self,
        audio: &Artifact,
    ) -> impl Future<Output = Result<TextExtraction, Self::Error>> + Send;

    /// Text extraction from a document
    fn read_document(
        &self,
        document: &Artifact,
    ) -> impl Future<Output = Result<TextExtraction, Self::Error>> + Send;

    /// Image analysis, optionally asking for an inline preview
    fn analyze_image(
        &self,
        image: &Artifact,
        preview: bool,
    ) -> impl Future<Output = Result<ImageExtraction, Self::Error>> + Send;
}

/// Reasoning collaborator that classifies a merged payload
pub trait TriageService {
    /// Error type for triage calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit a payload and decode the structured response
    fn assess(
        &self,
        payload: &ClinicalPayload,
    ) -> impl Future<Output = Result<TriageResponse, Self::Error>> + Send;
}
