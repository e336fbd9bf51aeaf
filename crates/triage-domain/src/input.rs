//! Input module - user-selected artifacts for one intake run

use crate::modality::Modality;
use std::fmt;
use std::sync::Arc;

/// A binary artifact with a declared media kind
///
/// Contents are shared, so snapshotting an [`InputSet`] at run start does not
/// copy the underlying bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name sent with the multipart upload
    pub file_name: String,

    /// Declared media type (e.g. "audio/wav")
    pub media_type: String,

    /// Raw contents
    pub bytes: Arc<[u8]>,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the contents in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact has no contents
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The currently selected artifacts, one optional slot per modality
///
/// Values are immutable: selecting a new artifact produces a new set via
/// [`InputSet::with`], so a snapshot taken at run start never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSet {
    /// Audio recording slot
    pub audio: Option<Artifact>,

    /// Document slot
    pub document: Option<Artifact>,

    /// Image slot
    pub image: Option<Artifact>,
}

impl InputSet {
    /// Create an empty input set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the artifact in a modality's slot
    pub fn get(&self, modality: Modality) -> Option<&Artifact> {
        match modality {
            Modality::Audio => self.audio.as_ref(),
            Modality::Document => self.document.as_ref(),
            Modality::Image => self.image.as_ref(),
        }
    }

    /// Return a copy of this set with one slot replaced
    ///
    /// # Examples
    ///
    /// ```
    /// use triage_domain::{Artifact, InputSet, Modality};
    ///
    /// let audio = Artifact::new("cough.wav", "audio/wav", vec![1u8, 2, 3]);
    /// let inputs = InputSet::new().with(Modality::Audio, Some(audio));
    /// assert_eq!(inputs.present_count(), 1);
    ///
    /// let cleared = inputs.with(Modality::Audio, None);
    /// assert!(cleared.is_empty());
    /// ```
    pub fn with(&self, modality: Modality, artifact: Option<Artifact>) -> Self {
        let mut next = self.clone();
        match modality {
            Modality::Audio => next.audio = artifact,
            Modality::Document => next.document = artifact,
            Modality::Image => next.image = artifact,
        }
        next
    }

    /// Modalities whose slot holds an artifact
    pub fn present(&self) -> Vec<Modality> {
        Modality::ALL
            .into_iter()
            .filter(|m| self.get(*m).is_some())
            .collect()
    }

    /// Number of present slots
    pub fn present_count(&self) -> usize {
        self.present().len()
    }

    /// Whether every slot is absent
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.document.is_none() && self.image.is_none()
    }
}
