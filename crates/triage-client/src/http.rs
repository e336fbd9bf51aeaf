//! HTTP collaborator implementation
//!
//! Talks to the speech, document, imaging and triage services over HTTP.
//!
//! # Endpoints
//!
//! - `POST /asr` - multipart `file`, returns `{text}`
//! - `POST /ocr` - multipart `file`, returns `{text}`
//! - `POST /imaging` - multipart `file` + `preview`, returns `{metrics, preview_b64}`
//! - `POST /triage` - JSON payload, returns `{risk_level, emergency_alerts, ...}`
//! - `GET /health` - returns `{ok, version, time}`
//!
//! Every request carries the `X-API-Key` header. There is no retry.

use crate::config::{ServiceConfig, API_KEY_HEADER};
use crate::error::ClientError;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use triage_domain::traits::{ExtractionService, TriageService};
use triage_domain::{Artifact, ClinicalPayload, ImageExtraction, TextExtraction, TriageResponse};

/// Speech recognition path
pub const ASR_PATH: &str = "asr";

/// Document text extraction path
pub const OCR_PATH: &str = "ocr";

/// Image analysis path
pub const IMAGING_PATH: &str = "imaging";

/// Triage reasoning path
pub const TRIAGE_PATH: &str = "triage";

/// Health check path
pub const HEALTH_PATH: &str = "health";

/// Health check response
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    /// Whether the service reports itself healthy
    pub ok: bool,
    /// Service version
    #[serde(default)]
    pub version: Option<String>,
    /// Server time (seconds since Unix epoch)
    #[serde(default)]
    pub time: Option<i64>,
}

/// HTTP client for all collaborators
#[derive(Debug, Clone)]
pub struct HttpCollaborators {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl HttpCollaborators {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the configuration is invalid or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Check the service health endpoint
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.config.endpoint(HEALTH_PATH);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// POST a multipart form and decode a successful response
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "Dispatching extraction request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to parse {} response: {}", path, e)))
    }
}

/// Single `file` part carrying the artifact
fn file_part(artifact: &Artifact) -> Result<Part, ClientError> {
    Part::bytes(artifact.bytes.to_vec())
        .file_name(artifact.file_name.clone())
        .mime_str(&artifact.media_type)
        .map_err(|e| {
            ClientError::InvalidArtifact(format!(
                "{}: bad media type '{}': {}",
                artifact.file_name, artifact.media_type, e
            ))
        })
}

impl ExtractionService for HttpCollaborators {
    type Error = ClientError;

    async fn transcribe(&self, audio: &Artifact) -> Result<TextExtraction, ClientError> {
        let form = Form::new().part("file", file_part(audio)?);
        self.post_form(ASR_PATH, form).await
    }

    async fn read_document(&self, document: &Artifact) -> Result<TextExtraction, ClientError> {
        let form = Form::new().part("file", file_part(document)?);
        self.post_form(OCR_PATH, form).await
    }

    async fn analyze_image(
        &self,
        image: &Artifact,
        preview: bool,
    ) -> Result<ImageExtraction, ClientError> {
        let mut form = Form::new().part("file", file_part(image)?);
        if preview {
            form = form.text("preview", "true");
        }
        self.post_form(IMAGING_PATH, form).await
    }
}

impl TriageService for HttpCollaborators {
    type Error = ClientError;

    /// Submit the payload and decode the body whatever the status code
    async fn assess(&self, payload: &ClinicalPayload) -> Result<TriageResponse, ClientError> {
        let url = self.config.endpoint(TRIAGE_PATH);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Triage endpoint returned non-success status");
        }

        serde_json::from_str(&body).map_err(|e| {
            ClientError::Decode(format!(
                "Failed to parse triage response (HTTP {}): {}: {}",
                status.as_u16(),
                e,
                body
            ))
        })
    }
}
