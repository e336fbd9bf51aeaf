//! Input collection and media-kind filtering

use crate::error::InputError;
use std::path::Path;
use tracing::debug;
use triage_domain::{Artifact, InputSet, Modality};

/// Holds the currently selected artifacts
///
/// Every selection replaces the whole [`InputSet`] value, so a snapshot taken
/// by a run is never affected by later selections.
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    inputs: InputSet,
}

impl InputCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot for a modality
    ///
    /// `None` clears the slot. The only check is that the artifact's media
    /// type is accepted for the modality.
    pub fn select(
        &mut self,
        modality: Modality,
        artifact: Option<Artifact>,
    ) -> Result<(), InputError> {
        if let Some(artifact) = &artifact {
            if !modality.accepts(&artifact.media_type) {
                return Err(InputError::MediaKind {
                    modality,
                    media_type: artifact.media_type.clone(),
                });
            }
            debug!(
                modality = %modality,
                file = %artifact.file_name,
                bytes = artifact.len(),
                "Artifact selected"
            );
        }

        self.inputs = self.inputs.with(modality, artifact);
        Ok(())
    }

    /// Clear every slot
    pub fn clear(&mut self) {
        self.inputs = InputSet::new();
    }

    /// Snapshot of the current selection
    pub fn snapshot(&self) -> InputSet {
        self.inputs.clone()
    }
}

/// Guess a media type from a file name
///
/// Falls back to `application/octet-stream`, which no modality accepts.
pub fn guess_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read a file into an artifact for a modality
///
/// The media type is checked before the file is read.
pub async fn load_artifact(modality: Modality, path: &Path) -> Result<Artifact, InputError> {
    let media_type = guess_media_type(path);
    if !modality.accepts(&media_type) {
        return Err(InputError::MediaKind {
            modality,
            media_type,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| modality.as_str().to_string());

    Ok(Artifact::new(file_name, media_type, bytes))
}
