//! Run command implementation.

use crate::cli::RunArgs;
use crate::error::Result;
use crate::output::Formatter;
use tracing::debug;
use triage_client::ServiceConfig;
use triage_domain::traits::{ExtractionService, TriageService};
use triage_domain::{Modality, SessionResult};
use triage_orchestrator::{
    ExportStatus, FileSurfaceFactory, Orchestrator, ReportExporter, ReportFormat,
};

/// Execute the run command.
pub async fn execute_run(args: RunArgs, service: ServiceConfig, formatter: &Formatter) -> Result<()> {
    eprintln!("{}", formatter.disclaimer());

    let orchestrator = super::connect(service)?;
    let result = run_intake(&orchestrator, &args).await?;

    println!("{}", formatter.format_result(&result)?);

    if let Some(path) = &args.export {
        let format = if args.json_report {
            ReportFormat::Json
        } else {
            ReportFormat::Html
        };
        let exporter = ReportExporter::new(FileSurfaceFactory::new(path)).with_format(format);
        if orchestrator.export(&exporter) == ExportStatus::Printed {
            eprintln!(
                "{}",
                formatter.success(&format!("Report written to {}", path.display()))
            );
        }
    }

    Ok(())
}

/// Select the given files and run one triage.
pub async fn run_intake<E, T>(orchestrator: &Orchestrator<E, T>, args: &RunArgs) -> Result<SessionResult>
where
    E: ExtractionService + Sync,
    T: TriageService + Sync,
{
    let selections = [
        (Modality::Audio, &args.audio),
        (Modality::Document, &args.document),
        (Modality::Image, &args.image),
    ];

    for (modality, path) in selections {
        if let Some(path) = path {
            orchestrator.select_path(modality, path).await?;
        }
    }

    debug!(artifacts = orchestrator.inputs().present_count(), "Inputs selected");
    Ok(orchestrator.run().await?)
}
