//! Payload module - the merged request for the reasoning collaborator

use crate::extraction::ExtractionSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body submitted to the triage endpoint
///
/// A field is non-null iff the corresponding input slot was present and its
/// extraction produced a value. Absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalPayload {
    /// Transcript of the audio recording
    pub transcript_text: Option<String>,

    /// Text extracted from the lab document
    pub lab_text: Option<String>,

    /// Image analysis metrics
    pub imaging: Option<Value>,
}

impl ClinicalPayload {
    /// Whether every field is null
    pub fn is_empty(&self) -> bool {
        self.transcript_text.is_none() && self.lab_text.is_none() && self.imaging.is_none()
    }
}

/// Merge fan-out results into a payload
///
/// Pure and infallible; absence of any field is legal.
///
/// # Examples
///
/// ```
/// use triage_domain::{build_payload, ExtractionSet, TextExtraction};
///
/// let extraction = ExtractionSet {
///     audio: Some(TextExtraction::from_text("cough")),
///     ..Default::default()
/// };
/// let payload = build_payload(&extraction);
/// assert_eq!(payload.transcript_text.as_deref(), Some("cough"));
/// assert!(payload.lab_text.is_none());
/// assert!(payload.imaging.is_none());
/// ```
pub fn build_payload(extraction: &ExtractionSet) -> ClinicalPayload {
    ClinicalPayload {
        transcript_text: extraction.audio.as_ref().and_then(|a| a.text.clone()),
        lab_text: extraction.document.as_ref().and_then(|d| d.text.clone()),
        imaging: extraction.image.as_ref().and_then(|i| i.metrics.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{ImageExtraction, TextExtraction};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_audio_only_payload() {
        let extraction = ExtractionSet {
            audio: Some(TextExtraction::from_text("cough")),
            document: None,
            image: None,
        };

        let payload = build_payload(&extraction);
        assert_eq!(
            payload,
            ClinicalPayload {
                transcript_text: Some("cough".to_string()),
                lab_text: None,
                imaging: None,
            }
        );
    }

    #[test]
    fn test_wire_format_keeps_nulls() {
        let payload = ClinicalPayload {
            transcript_text: None,
            lab_text: Some("Hb 9.1 g/dL".to_string()),
            imaging: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"transcript_text": null, "lab_text": "Hb 9.1 g/dL", "imaging": null})
        );
    }

    #[test]
    fn test_empty_extraction_gives_empty_payload() {
        let payload = build_payload(&ExtractionSet::default());
        assert!(payload.is_empty());
    }

    #[test]
    fn test_image_without_metrics() {
        let extraction = ExtractionSet {
            image: Some(ImageExtraction {
                metrics: None,
                preview_b64: Some("data:x".to_string()),
            }),
            ..Default::default()
        };
        assert!(build_payload(&extraction).imaging.is_none());
    }

    proptest! {
        #[test]
        fn prop_field_present_iff_extracted(
            transcript in proptest::option::of(".*"),
            lab in proptest::option::of(".*"),
            opacity in proptest::option::of(0.0f64..1.0),
        ) {
            let extraction = ExtractionSet {
                audio: transcript.clone().map(TextExtraction::from_text),
                document: lab.clone().map(TextExtraction::from_text),
                image: opacity.map(|o| ImageExtraction {
                    metrics: Some(json!({"opacity": o})),
                    preview_b64: None,
                }),
            };

            let payload = build_payload(&extraction);
            prop_assert_eq!(payload.transcript_text, transcript);
            prop_assert_eq!(payload.lab_text, lab);
            prop_assert_eq!(payload.imaging.is_some(), opacity.is_some());
        }
    }
}
