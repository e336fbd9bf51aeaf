//! Triage Client
//!
//! Collaborator implementations for the intake workflow.
//!
//! # Collaborators
//!
//! - `HttpCollaborators`: speech, document, imaging and triage services over HTTP
//! - `MockCollaborators`: deterministic mock for testing
//!
//! # Example
//!
//! ```no_run
//! use triage_client::{HttpCollaborators, ServiceConfig};
//! use triage_domain::traits::TriageService;
//! use triage_domain::ClinicalPayload;
//!
//! # async fn example() -> Result<(), triage_client::ClientError> {
//! let client = HttpCollaborators::new(ServiceConfig::default())?;
//! let payload = ClinicalPayload {
//!     transcript_text: Some("I have chest pain".to_string()),
//!     ..Default::default()
//! };
//! let response = client.assess(&payload).await?;
//! println!("risk: {}", response.risk_level);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod http;
mod mock;

pub use config::{ServiceConfig, API_KEY_HEADER, DEFAULT_API_KEY, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use http::{HealthStatus, HttpCollaborators};
pub use mock::MockCollaborators;
