//! Session module - display-ready outcome of one completed run

use crate::extraction::{ExtractionSet, TextExtraction};
use crate::response::{RiskLevel, TriageResponse};
use crate::run_state::RunId;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Triage response merged with the raw extraction artifacts
///
/// Serializes as one flat object: the response fields, then `asr`, `ocr` and
/// `preview_b64`. The merged keys take precedence over response fields of the
/// same name.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    /// Run that produced this result
    pub run_id: RunId,

    /// Decoded reasoning response
    pub response: TriageResponse,

    /// Raw speech recognition output
    pub asr: Option<TextExtraction>,

    /// Raw document extraction output
    pub ocr: Option<TextExtraction>,

    /// Inline image preview, carried through unchanged
    pub preview_b64: Option<String>,
}

impl SessionResult {
    /// Risk level as returned by the reasoning collaborator
    pub fn risk_level(&self) -> &str {
        &self.response.risk_level
    }

    /// Interpreted risk level
    pub fn risk(&self) -> RiskLevel {
        self.response.risk()
    }

    /// Emergency alerts, in the order returned
    pub fn emergency_alerts(&self) -> &[String] {
        &self.response.emergency_alerts
    }

    /// Inline preview, if image analysis returned one
    pub fn preview(&self) -> Option<&str> {
        self.preview_b64.as_deref()
    }

    /// Flat JSON view used for raw display and export
    pub fn to_json(&self) -> Value {
        let mut map = self.response.extra.clone();
        map.insert(
            "risk_level".to_string(),
            Value::String(self.response.risk_level.clone()),
        );
        map.insert(
            "emergency_alerts".to_string(),
            self.response
                .emergency_alerts
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        );
        map.insert("asr".to_string(), json_or_null(&self.asr));
        map.insert("ocr".to_string(), json_or_null(&self.ocr));
        map.insert(
            "preview_b64".to_string(),
            self.preview_b64.clone().map(Value::String).unwrap_or(Value::Null),
        );
        Value::Object(map)
    }
}

impl Serialize for SessionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn json_or_null(extraction: &Option<TextExtraction>) -> Value {
    let Some(extraction) = extraction else {
        return Value::Null;
    };
    let mut map = extraction.extra.clone();
    map.insert(
        "text".to_string(),
        extraction.text.clone().map(Value::String).unwrap_or(Value::Null),
    );
    Value::Object(map)
}

/// Merge a triage response with the raw extraction artifacts
///
/// No validation beyond the two documented response fields; the preview is
/// taken from the image extraction as-is.
pub fn present(run_id: RunId, response: TriageResponse, extraction: ExtractionSet) -> SessionResult {
    let preview_b64 = extraction.preview().map(str::to_string);

    SessionResult {
        run_id,
        response,
        asr: extraction.audio,
        ocr: extraction.document,
        preview_b64,
    }
}
