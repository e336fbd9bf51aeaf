//! Extraction module - per-modality outputs of the extraction collaborators

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output of speech recognition or document text extraction
///
/// Unknown response fields are kept so the raw artifact can be shown as
/// returned by the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextExtraction {
    /// Extracted text, if the collaborator produced any
    #[serde(default)]
    pub text: Option<String>,

    /// Any other fields returned by the collaborator
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextExtraction {
    /// Create an extraction holding only text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extra: Map::new(),
        }
    }
}

/// Output of image analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageExtraction {
    /// Structured measurements of the image
    #[serde(default)]
    pub metrics: Option<Value>,

    /// Inline preview (typically a base64 data URL)
    #[serde(default, alias = "previewData")]
    pub preview_b64: Option<String>,
}

/// Results of one fan-out, one optional entry per modality
///
/// An entry is `None` when the slot was absent; it is never a partial result
/// of a failed fan-out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSet {
    /// Speech recognition output
    pub audio: Option<TextExtraction>,

    /// Document text extraction output
    pub document: Option<TextExtraction>,

    /// Image analysis output
    pub image: Option<ImageExtraction>,
}

impl ExtractionSet {
    /// Inline preview returned by image analysis, if any
    pub fn preview(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.preview_b64.as_deref())
    }
}
