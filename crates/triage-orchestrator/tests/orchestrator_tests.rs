//! Run protocol tests against mock collaborators

use serde_json::json;
use std::time::Duration;
use triage_client::MockCollaborators;
use triage_domain::{Artifact, ClinicalPayload, Modality, RunState, TriageResponse};
use triage_orchestrator::{
    ExportStatus, Orchestrator, OrchestratorError, ReportExporter, ReportSurface, SurfaceFactory,
};

fn orchestrator(mock: &MockCollaborators) -> Orchestrator<MockCollaborators, MockCollaborators> {
    Orchestrator::new(mock.clone(), mock.clone())
}

fn audio() -> Artifact {
    Artifact::new("complaint.wav", "audio/wav", vec![1u8; 32])
}

fn document() -> Artifact {
    Artifact::new("labs.pdf", "application/pdf", vec![2u8; 32])
}

fn image() -> Artifact {
    Artifact::new("xray.png", "image/png", vec![3u8; 32])
}

fn select_all(orchestrator: &Orchestrator<MockCollaborators, MockCollaborators>) {
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();
    orchestrator.select(Modality::Document, Some(document())).unwrap();
    orchestrator.select(Modality::Image, Some(image())).unwrap();
}

#[tokio::test]
async fn test_audio_only_run() {
    let mock = MockCollaborators::new()
        .with_transcript("I have chest pain")
        .with_triage(TriageResponse::new("high", vec!["chest_pain".to_string()]));
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();

    let result = orchestrator.run().await.unwrap();

    assert_eq!(mock.calls(), vec![Modality::Audio]);
    assert_eq!(
        mock.payloads(),
        vec![ClinicalPayload {
            transcript_text: Some("I have chest pain".to_string()),
            lab_text: None,
            imaging: None,
        }]
    );
    assert_eq!(result.risk_level(), "high");
    assert_eq!(result.emergency_alerts(), ["chest_pain".to_string()]);
    assert_eq!(
        result.asr.as_ref().and_then(|a| a.text.as_deref()),
        Some("I have chest pain")
    );
    assert!(result.ocr.is_none());
    assert!(result.preview().is_none());

    assert_eq!(orchestrator.session_result(), Some(result));
    assert_eq!(orchestrator.state(), RunState::Idle);
}

#[tokio::test]
async fn test_document_failure_aborts_run() {
    let mock = MockCollaborators::new()
        .with_transcript("short of breath")
        .with_image(json!({"opacity": 0.4}), Some("data:image/png;base64,AAAA"))
        .with_server_failure(Modality::Document, 422, "corrupt file");
    let orchestrator = orchestrator(&mock);
    select_all(&orchestrator);

    let err = orchestrator.run().await.unwrap_err();

    match &err {
        OrchestratorError::Extraction { modality, .. } => assert_eq!(*modality, Modality::Document),
        other => panic!("Expected extraction failure, got {other:?}"),
    }
    assert!(err.to_string().contains("corrupt file"));
    assert_eq!(mock.call_count(), 3);
    assert_eq!(mock.triage_count(), 0);
    assert!(orchestrator.session_result().is_none());
    assert_eq!(orchestrator.state(), RunState::Idle);
}

#[tokio::test]
async fn test_image_only_run_carries_preview() {
    let preview = "data:image/png;base64,iVBORw0KGgo=";
    let mock = MockCollaborators::new()
        .with_image(json!({"fracture_probability": 0.91}), Some(preview))
        .with_triage(TriageResponse::new("moderate", vec![]));
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Image, Some(image())).unwrap();

    let result = orchestrator.run().await.unwrap();

    assert_eq!(mock.preview_requests(), vec![true]);
    let payload = &mock.payloads()[0];
    assert!(payload.transcript_text.is_none());
    assert!(payload.lab_text.is_none());
    assert_eq!(payload.imaging, Some(json!({"fracture_probability": 0.91})));

    assert_eq!(result.preview(), Some(preview));
    assert_eq!(result.to_json()["preview_b64"], preview);
}

#[tokio::test]
async fn test_transcript_only_payload() {
    let mock = MockCollaborators::new().with_transcript("cough");
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();

    orchestrator.run().await.unwrap();

    let body = serde_json::to_value(&mock.payloads()[0]).unwrap();
    assert_eq!(
        body,
        json!({"transcript_text": "cough", "lab_text": null, "imaging": null})
    );
}

#[tokio::test]
async fn test_empty_selection_submits_empty_payload() {
    let mock = MockCollaborators::new();
    let orchestrator = orchestrator(&mock);

    let result = orchestrator.run().await.unwrap();

    assert_eq!(mock.call_count(), 0);
    assert_eq!(mock.payloads(), vec![ClinicalPayload::default()]);
    assert_eq!(result.risk_level(), "low");
}

#[tokio::test]
async fn test_one_call_per_present_slot() {
    let mock = MockCollaborators::new();
    let orchestrator = orchestrator(&mock);

    orchestrator.select(Modality::Document, Some(document())).unwrap();
    orchestrator.run().await.unwrap();
    assert_eq!(mock.calls(), vec![Modality::Document]);

    mock.reset_calls();
    select_all(&orchestrator);
    orchestrator.select(Modality::Document, None).unwrap();
    orchestrator.run().await.unwrap();

    let mut calls = mock.calls();
    calls.sort();
    assert_eq!(calls, vec![Modality::Audio, Modality::Image]);
}

#[tokio::test]
async fn test_extractions_run_concurrently() {
    let delay = Duration::from_millis(40);
    let mock = MockCollaborators::new()
        .with_delay(Modality::Audio, delay)
        .with_delay(Modality::Document, delay)
        .with_delay(Modality::Image, delay);
    let orchestrator = orchestrator(&mock);
    select_all(&orchestrator);

    orchestrator.run().await.unwrap();

    assert_eq!(mock.max_in_flight(), 3);
}

#[tokio::test]
async fn test_failure_reports_failing_modality() {
    let mock = MockCollaborators::new()
        .with_network_failure(Modality::Audio, "connection reset")
        .with_delay(Modality::Audio, Duration::from_millis(5))
        .with_delay(Modality::Document, Duration::from_millis(30))
        .with_delay(Modality::Image, Duration::from_millis(30));
    let orchestrator = orchestrator(&mock);
    select_all(&orchestrator);

    let err = orchestrator.run().await.unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::Extraction {
            modality: Modality::Audio,
            ..
        }
    ));
    assert_eq!(mock.max_in_flight(), 3);
    assert_eq!(mock.triage_count(), 0);
}

#[tokio::test]
async fn test_triage_decode_failure_leaves_no_result() {
    let mock = MockCollaborators::new()
        .with_transcript("dizzy")
        .with_triage_decode_failure("missing field `risk_level`");
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();

    let err = orchestrator.run().await.unwrap_err();

    assert!(matches!(err, OrchestratorError::Triage(_)));
    assert!(err.collaborator_error().is_some());
    assert!(orchestrator.session_result().is_none());
    assert_eq!(orchestrator.state(), RunState::Idle);
}

#[tokio::test]
async fn test_failed_run_clears_previous_result() {
    let mock = MockCollaborators::new();
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();
    orchestrator.run().await.unwrap();
    assert!(orchestrator.session_result().is_some());

    let failing = mock.with_server_failure(Modality::Audio, 500, "asr down");
    assert!(orchestrator.run().await.is_err());
    assert!(orchestrator.session_result().is_none());
    assert_eq!(failing.call_count(), 2);
}

#[tokio::test]
async fn test_second_run_rejected_while_running() {
    let mock = MockCollaborators::new().with_delay(Modality::Audio, Duration::from_millis(50));
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();

    let (first, second) = tokio::join!(orchestrator.run(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(orchestrator.state(), RunState::Running);
        orchestrator.run().await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(OrchestratorError::Busy)));
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.triage_count(), 1);
    assert_eq!(orchestrator.state(), RunState::Idle);
}

#[tokio::test]
async fn test_state_changes_are_published() {
    let mock = MockCollaborators::new().with_delay(Modality::Audio, Duration::from_millis(20));
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();
    let mut state = orchestrator.subscribe();
    assert_eq!(*state.borrow(), RunState::Idle);

    let (result, seen) = tokio::join!(orchestrator.run(), async {
        state.changed().await.unwrap();
        *state.borrow_and_update()
    });

    assert!(result.is_ok());
    assert_eq!(seen, RunState::Running);
    assert_eq!(*state.borrow(), RunState::Idle);
}

#[tokio::test]
async fn test_selection_during_run_does_not_affect_it() {
    let mock = MockCollaborators::new()
        .with_transcript("headache")
        .with_delay(Modality::Audio, Duration::from_millis(40));
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();

    let (result, _) = tokio::join!(orchestrator.run(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        orchestrator.select(Modality::Image, Some(image())).unwrap();
    });

    result.unwrap();
    assert_eq!(mock.calls(), vec![Modality::Audio]);
    assert!(mock.payloads()[0].imaging.is_none());
    assert!(orchestrator.inputs().image.is_some());
}

#[tokio::test]
async fn test_discarded_session_drops_stale_result() {
    let mock = MockCollaborators::new().with_triage_delay(Duration::from_millis(40));
    let orchestrator = orchestrator(&mock);
    orchestrator.select(Modality::Audio, Some(audio())).unwrap();

    let (result, _) = tokio::join!(orchestrator.run(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        orchestrator.discard_session();
    });

    assert!(matches!(result, Err(OrchestratorError::Superseded(_))));
    assert!(orchestrator.session_result().is_none());
    assert_eq!(orchestrator.state(), RunState::Idle);

    // A fresh run after the discard publishes normally
    assert!(orchestrator.run().await.is_ok());
    assert!(orchestrator.session_result().is_some());
}

#[tokio::test]
async fn test_media_kind_rejected() {
    let mock = MockCollaborators::new();
    let orchestrator = orchestrator(&mock);

    let err = orchestrator.select(Modality::Audio, Some(document())).unwrap_err();
    assert!(err.to_string().contains("application/pdf"));
    assert!(orchestrator.inputs().is_empty());
}

#[tokio::test]
async fn test_select_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.jpg");
    std::fs::write(&path, [0xFFu8, 0xD8, 0xFF]).unwrap();

    let mock = MockCollaborators::new();
    let orchestrator = orchestrator(&mock);
    orchestrator.select_path(Modality::Image, &path).await.unwrap();

    let selected = orchestrator.inputs().image.unwrap();
    assert_eq!(selected.media_type, "image/jpeg");
    assert_eq!(selected.len(), 3);
}

struct CountingFactory(std::cell::Cell<usize>);

struct NullSurface;

impl ReportSurface for NullSurface {
    fn write(&mut self, _content: &str) -> std::io::Result<()> {
        Ok(())
    }

    fn print(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SurfaceFactory for CountingFactory {
    type Surface = NullSurface;

    fn open(&self) -> Option<NullSurface> {
        self.0.set(self.0.get() + 1);
        Some(NullSurface)
    }
}

#[tokio::test]
async fn test_export_without_result_is_noop() {
    let mock = MockCollaborators::new();
    let orchestrator = orchestrator(&mock);
    let exporter = ReportExporter::new(CountingFactory(std::cell::Cell::new(0)));

    assert_eq!(orchestrator.export(&exporter), ExportStatus::Skipped);

    orchestrator.run().await.unwrap();
    assert_eq!(orchestrator.export(&exporter), ExportStatus::Printed);

    orchestrator.discard_session();
    assert_eq!(orchestrator.export(&exporter), ExportStatus::Skipped);
}
