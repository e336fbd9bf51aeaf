//! Triage Orchestrator
//!
//! Runs the multimodal intake workflow: collect up to three artifacts, extract
//! each one concurrently, merge the results into a clinical payload, submit it
//! for triage and present or export the outcome.
//!
//! # Architecture
//!
//! ```text
//! InputCollector → fan_out → build_payload → invoke → present → ReportExporter
//! ```
//!
//! # Run protocol
//!
//! - A run is rejected while another is in progress
//! - Starting a run clears the previous session result
//! - Any failure ends the run with no result
//! - The run state always returns to `Idle`
//!
//! # Example Usage
//!
//! ```no_run
//! use triage_client::MockCollaborators;
//! use triage_domain::{Artifact, Modality, TriageResponse};
//! use triage_orchestrator::Orchestrator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mock = MockCollaborators::new()
//!     .with_transcript("I have chest pain")
//!     .with_triage(TriageResponse::new("high", vec!["chest_pain".to_string()]));
//! let orchestrator = Orchestrator::new(mock.clone(), mock);
//!
//! orchestrator.select(
//!     Modality::Audio,
//!     Some(Artifact::new("note.wav", "audio/wav", vec![0u8; 16])),
//! )?;
//! let result = orchestrator.run().await?;
//! assert_eq!(result.risk_level(), "high");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
pub mod export;
pub mod fanout;
mod input;
mod invoker;
mod orchestrator;

pub use error::{InputError, OrchestratorError};
pub use export::{
    ExportStatus, FileSurfaceFactory, ReportExporter, ReportFormat, ReportSurface,
    StdoutSurfaceFactory, SurfaceFactory,
};
pub use fanout::{fan_out, join_settled};
pub use input::{guess_media_type, load_artifact, InputCollector};
pub use invoker::invoke;
pub use orchestrator::Orchestrator;
