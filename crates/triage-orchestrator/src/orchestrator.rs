//! Top-level run protocol
//!
//! Owns the input selection, the run state machine and the current session
//! result. Locks guard only synchronous sections and are never held across a
//! collaborator call.

use crate::error::{InputError, OrchestratorError};
use crate::export::{ExportStatus, ReportExporter, SurfaceFactory};
use crate::fanout::fan_out;
use crate::input::{load_artifact, InputCollector};
use crate::invoker::invoke;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info};
use triage_domain::traits::{ExtractionService, TriageService};
use triage_domain::{build_payload, present, Artifact, InputSet, Modality, RunId, RunState, SessionResult};

#[derive(Debug, Default)]
struct Session {
    /// Identifier of the latest run; only this run may publish
    current: RunId,
    result: Option<SessionResult>,
}

/// Returns the run state to `Idle` when dropped
struct RunGuard<'a> {
    state: &'a watch::Sender<RunState>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(RunState::Idle);
    }
}

/// Multimodal intake orchestrator
///
/// # Examples
///
/// ```no_run
/// use triage_client::{HttpCollaborators, ServiceConfig};
/// use triage_orchestrator::Orchestrator;
/// use triage_domain::Modality;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpCollaborators::new(ServiceConfig::default())?;
/// let orchestrator = Orchestrator::new(client.clone(), client);
///
/// orchestrator.select_path(Modality::Audio, Path::new("complaint.wav")).await?;
/// let result = orchestrator.run().await?;
/// println!("risk: {}", result.risk_level());
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<E, T> {
    extraction: E,
    triage: T,
    inputs: Mutex<InputCollector>,
    session: Mutex<Session>,
    state: watch::Sender<RunState>,
}

impl<E, T> Orchestrator<E, T>
where
    E: ExtractionService + Sync,
    T: TriageService + Sync,
{
    /// Create an orchestrator over its collaborators
    pub fn new(extraction: E, triage: T) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            extraction,
            triage,
            inputs: Mutex::new(InputCollector::new()),
            session: Mutex::new(Session::default()),
            state,
        }
    }

    fn inputs_lock(&self) -> MutexGuard<'_, InputCollector> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace one input slot; `None` clears it
    pub fn select(&self, modality: Modality, artifact: Option<Artifact>) -> Result<(), InputError> {
        self.inputs_lock().select(modality, artifact)
    }

    /// Read a file and select it for a modality
    pub async fn select_path(&self, modality: Modality, path: &Path) -> Result<(), InputError> {
        let artifact = load_artifact(modality, path).await?;
        self.select(modality, Some(artifact))
    }

    /// Clear every input slot
    pub fn clear_inputs(&self) {
        self.inputs_lock().clear();
    }

    /// Snapshot of the current selection
    pub fn inputs(&self) -> InputSet {
        self.inputs_lock().snapshot()
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Read-only view of the run state for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Current session result, if the last run completed
    pub fn session_result(&self) -> Option<SessionResult> {
        self.session_lock().result.clone()
    }

    /// Discard the session view
    ///
    /// Clears the result and invalidates any in-flight run, whose result will
    /// be dropped when it settles.
    pub fn discard_session(&self) {
        let mut session = self.session_lock();
        session.current = session.current.next();
        session.result = None;
        debug!(current = %session.current, "Session discarded");
    }

    /// Export the current session result
    ///
    /// Exports are refused while a run is in progress.
    pub fn export<F: SurfaceFactory>(&self, exporter: &ReportExporter<F>) -> ExportStatus {
        if self.state() == RunState::Running {
            return ExportStatus::Skipped;
        }
        let result = self.session_result();
        exporter.export(result.as_ref())
    }

    /// Run the intake pipeline over the current selection
    ///
    /// # Errors
    ///
    /// - `Busy` if a run is already in progress
    /// - `Extraction` if any extraction call failed
    /// - `Triage` if the triage call or its decoding failed
    /// - `Superseded` if the session was discarded while running
    ///
    /// The run state is back to `Idle` when this returns, on every path.
    pub async fn run(&self) -> Result<SessionResult, OrchestratorError> {
        let started = self.state.send_if_modified(|state| {
            if state.can_start() {
                *state = RunState::Running;
                true
            } else {
                false
            }
        });
        if !started {
            debug!("Run rejected, another run is in progress");
            return Err(OrchestratorError::Busy);
        }
        let _guard = RunGuard { state: &self.state };

        let run_id = {
            let mut session = self.session_lock();
            session.current = session.current.next();
            session.result = None;
            session.current
        };
        let inputs = self.inputs();

        info!(run = %run_id, artifacts = inputs.present_count(), "Triage run started");

        match self.execute(run_id, &inputs).await {
            Ok(result) => self.publish(result),
            Err(e) => {
                error!(run = %run_id, error = %e, "Triage run failed");
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        run_id: RunId,
        inputs: &InputSet,
    ) -> Result<SessionResult, OrchestratorError> {
        let extraction = fan_out(&self.extraction, inputs).await?;
        let payload = build_payload(&extraction);
        let response = invoke(&self.triage, &payload).await?;
        Ok(present(run_id, response, extraction))
    }

    /// Store a result if its run is still current
    fn publish(&self, result: SessionResult) -> Result<SessionResult, OrchestratorError> {
        let mut session = self.session_lock();
        if session.current != result.run_id {
            info!(run = %result.run_id, current = %session.current, "Discarding stale run result");
            return Err(OrchestratorError::Superseded(result.run_id));
        }

        info!(
            run = %result.run_id,
            risk_level = %result.risk_level(),
            alerts = result.emergency_alerts().len(),
            "Triage run completed"
        );
        session.result = Some(result.clone());
        Ok(result)
    }
}
