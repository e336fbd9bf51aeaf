//! Concurrent extraction fan-out
//!
//! One request per present artifact, all in flight at once. Absent slots are
//! skipped without a call. The fan-out is all-or-nothing: it waits for every
//! launched request to settle, then either returns the full result set or the
//! first failure in completion order.

use crate::error::OrchestratorError;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};
use triage_domain::traits::ExtractionService;
use triage_domain::{ExtractionSet, ImageExtraction, InputSet, Modality, TextExtraction};

/// A launched task tagged with its modality
pub type Task<'a, T, E> = BoxFuture<'a, (Modality, Result<T, E>)>;

/// Drive every task to settlement and keep the first failure
///
/// Unlike a short-circuiting join, no task is dropped early: the combinator
/// returns only after all tasks have settled. On failure, the error of the
/// task that failed first is returned and all successful outputs are dropped.
pub async fn join_settled<'a, T, E>(
    tasks: Vec<Task<'a, T, E>>,
) -> Result<Vec<(Modality, T)>, (Modality, E)> {
    let mut pending: FuturesUnordered<_> = tasks.into_iter().collect();
    let mut settled = Vec::with_capacity(pending.len());
    let mut first_failure = None;

    while let Some((modality, result)) = pending.next().await {
        match result {
            Ok(value) => {
                debug!(modality = %modality, "Extraction settled");
                settled.push((modality, value));
            }
            Err(e) => {
                if first_failure.is_none() {
                    first_failure = Some((modality, e));
                } else {
                    debug!(modality = %modality, "Additional extraction failure ignored");
                }
            }
        }
    }

    match first_failure {
        Some(failure) => Err(failure),
        None => Ok(settled),
    }
}

/// Output of one modality's extraction
enum Extracted {
    Audio(TextExtraction),
    Document(TextExtraction),
    Image(ImageExtraction),
}

/// Run the extraction fan-out over an input snapshot
///
/// The image request always asks for an inline preview.
pub async fn fan_out<S>(service: &S, inputs: &InputSet) -> Result<ExtractionSet, OrchestratorError>
where
    S: ExtractionService + Sync,
{
    let mut tasks: Vec<Task<'_, Extracted, S::Error>> = Vec::new();

    if let Some(audio) = &inputs.audio {
        tasks.push(Box::pin(async move {
            let result = service.transcribe(audio).await.map(Extracted::Audio);
            (Modality::Audio, result)
        }));
    }
    if let Some(document) = &inputs.document {
        tasks.push(Box::pin(async move {
            let result = service.read_document(document).await.map(Extracted::Document);
            (Modality::Document, result)
        }));
    }
    if let Some(image) = &inputs.image {
        tasks.push(Box::pin(async move {
            let result = service.analyze_image(image, true).await.map(Extracted::Image);
            (Modality::Image, result)
        }));
    }

    if tasks.is_empty() {
        debug!("No artifacts selected, skipping extraction");
        return Ok(ExtractionSet::default());
    }

    info!(requests = tasks.len(), "Launching extraction fan-out");

    let settled = join_settled(tasks).await.map_err(|(modality, e)| {
        warn!(modality = %modality, error = %e, "Extraction fan-out failed");
        OrchestratorError::Extraction {
            modality,
            source: Box::new(e),
        }
    })?;

    let mut extraction = ExtractionSet::default();
    for (_, output) in settled {
        match output {
            Extracted::Audio(text) => extraction.audio = Some(text),
            Extracted::Document(text) => extraction.document = Some(text),
            Extracted::Image(image) => extraction.image = Some(image),
        }
    }

    Ok(extraction)
}
