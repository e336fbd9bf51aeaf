//! Health command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use triage_client::{HttpCollaborators, ServiceConfig};

/// Execute the health command.
pub async fn execute_health(service: ServiceConfig, formatter: &Formatter) -> Result<()> {
    let client = HttpCollaborators::new(service)?;
    let base_url = client.config().base_url.clone();
    let health = client.health().await?;

    println!("{}", formatter.format_health(&base_url, &health));

    if health.ok {
        Ok(())
    } else {
        Err(CliError::Unhealthy(base_url))
    }
}
