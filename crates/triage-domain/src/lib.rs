//! Triage Domain Layer
//!
//! This crate contains the data model of the multimodal intake workflow and
//! the pure steps of the pipeline. It performs no I/O: network collaborators
//! are described by the traits in [`traits`] and implemented elsewhere.
//!
//! ## Key Concepts
//!
//! - **InputSet**: up to three optional artifacts (audio, document, image)
//! - **ExtractionSet**: per-modality outputs of the extraction collaborators
//! - **ClinicalPayload**: the merged request sent to the reasoning collaborator
//! - **TriageResponse**: risk level and alerts, everything else opaque
//! - **SessionResult**: response merged with raw extraction artifacts
//! - **RunState**: `Idle` or `Running`
//!
//! ## Pipeline
//!
//! ```text
//! InputSet → ExtractionSet → ClinicalPayload → TriageResponse → SessionResult
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extraction;
pub mod input;
pub mod modality;
pub mod payload;
pub mod response;
pub mod run_state;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use extraction::{ExtractionSet, ImageExtraction, TextExtraction};
pub use input::{Artifact, InputSet};
pub use modality::Modality;
pub use payload::{build_payload, ClinicalPayload};
pub use response::{RiskLevel, TriageResponse};
pub use run_state::{RunId, RunState};
pub use session::{present, SessionResult};
