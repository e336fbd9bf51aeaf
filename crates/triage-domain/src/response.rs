//! Response module - structured output of the reasoning collaborator

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Decoded triage response
///
/// Only `risk_level` and `emergency_alerts` are interpreted. Every other
/// field is carried through opaquely for raw display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResponse {
    /// Risk classification as returned (e.g. "high")
    pub risk_level: String,

    /// Emergency alerts, in the order returned; missing or null means none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub emergency_alerts: Vec<String>,

    /// Remaining fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TriageResponse {
    /// Create a response with no opaque fields
    pub fn new(risk_level: impl Into<String>, emergency_alerts: Vec<String>) -> Self {
        Self {
            risk_level: risk_level.into(),
            emergency_alerts,
            extra: Map::new(),
        }
    }

    /// Interpreted risk level
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::parse(&self.risk_level)
    }

    /// Whether any emergency alert was raised
    pub fn has_alerts(&self) -> bool {
        !self.emergency_alerts.is_empty()
    }
}

/// Interpreted risk level, ordered from least to most urgent
///
/// `Unknown` sorts lowest so an unrecognized value never outranks a known one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    /// Value not recognized
    Unknown,
    /// Low risk
    Low,
    /// Moderate risk
    Moderate,
    /// High risk
    High,
    /// Critical / emergency
    Critical,
}

impl RiskLevel {
    /// Parse a risk level from its wire representation (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "moderate" | "medium" => RiskLevel::Moderate,
            "high" => RiskLevel::High,
            "critical" | "emergency" => RiskLevel::Critical,
            _ => RiskLevel::Unknown,
        }
    }

    /// Get the risk level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Whether the level warrants immediate attention
    pub fn is_urgent(&self) -> bool {
        *self >= RiskLevel::High
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
