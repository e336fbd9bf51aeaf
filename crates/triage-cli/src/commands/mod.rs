//! Command implementations.

pub mod health;
pub mod profile;
pub mod run;

pub use self::health::execute_health;
pub use self::profile::execute_profile;
pub use self::run::execute_run;

use crate::error::Result;
use triage_client::{HttpCollaborators, ServiceConfig};
use triage_orchestrator::Orchestrator;

/// Orchestrator backed by the HTTP collaborators.
pub type HttpOrchestrator = Orchestrator<HttpCollaborators, HttpCollaborators>;

/// Build an orchestrator talking to the configured services.
pub fn connect(service: ServiceConfig) -> Result<HttpOrchestrator> {
    let client = HttpCollaborators::new(service)?;
    Ok(Orchestrator::new(client.clone(), client))
}
