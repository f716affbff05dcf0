//! Verification Service Client
//!
//! HTTP client for the external forensic verification service. All
//! permissive wire parsing stays inside this file: the rest of the core
//! only ever sees `ExternalVerdict` or a tagged `VerifyError`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::constants;
use crate::logic::sample::MediaSample;

/// Verification service configuration
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub base_url: String,
    pub api_key: String,
    /// Per-request timeout (connect + response), not the session budget
    pub request_timeout_secs: u64,
    pub poll_initial_secs: u64,
    pub poll_max_secs: u64,
    pub poll_max_attempts: u32,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_verify_url(),
            api_key: constants::get_verify_api_key(),
            request_timeout_secs: 30,
            poll_initial_secs: constants::VERIFY_POLL_INITIAL_SECS,
            poll_max_secs: constants::VERIFY_POLL_MAX_SECS,
            poll_max_attempts: constants::VERIFY_POLL_MAX_ATTEMPTS,
        }
    }
}

// ============================================================================
// VERDICT TYPES
// ============================================================================

/// Terminal conclusion reported by the external service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExternalStatus {
    Authentic,
    Manipulated,
    Error,
    Unavailable,
}

/// One per-model sub-result from the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: String,
    pub score: Option<f32>,
    pub status: String,
}

/// The external analysis conclusion for one sample. Scores are passed
/// through raw; numeric hygiene happens once, in fusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalVerdict {
    pub status: ExternalStatus,
    pub score: Option<f32>,
    pub models: Vec<ModelResult>,
    pub request_id: Option<String>,
}

impl ExternalVerdict {
    /// Conclusive means the service actually decided, one way or the other.
    pub fn is_conclusive(&self) -> bool {
        matches!(self.status, ExternalStatus::Authentic | ExternalStatus::Manipulated)
    }

    /// Marker verdict for a service that never produced a result.
    pub fn unavailable() -> Self {
        Self {
            status: ExternalStatus::Unavailable,
            score: None,
            models: Vec::new(),
            request_id: None,
        }
    }
}

// ============================================================================
// WIRE TYPES (never leave this module)
// ============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct ResultResponse {
    status: String,
    score: Option<f64>,
    #[serde(default)]
    models: Vec<WireModel>,
}

#[derive(Debug, Deserialize)]
struct WireModel {
    name: String,
    score: Option<f64>,
    status: Option<String>,
}

/// Poll-loop view of a wire status string.
enum WireStatus {
    Pending,
    Terminal(ExternalStatus),
}

fn parse_wire_status(raw: &str) -> WireStatus {
    match raw.to_ascii_uppercase().as_str() {
        "AUTHENTIC" => WireStatus::Terminal(ExternalStatus::Authentic),
        "MANIPULATED" | "FAKE" => WireStatus::Terminal(ExternalStatus::Manipulated),
        "ANALYZING" | "PROCESSING" | "PENDING" | "QUEUED" => WireStatus::Pending,
        // Unknown vocabulary collapses to an inconclusive error result
        _ => WireStatus::Terminal(ExternalStatus::Error),
    }
}

fn translate(body: ResultResponse, status: ExternalStatus, request_id: &str) -> ExternalVerdict {
    ExternalVerdict {
        status,
        score: body.score.map(|s| s as f32),
        models: body
            .models
            .into_iter()
            .map(|m| ModelResult {
                name: m.name,
                score: m.score.map(|s| s as f32),
                status: m.status.unwrap_or_else(|| "UNKNOWN".to_string()),
            })
            .collect(),
        request_id: Some(request_id.to_string()),
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Adapter failure. Every kind is non-fatal to the session: the
/// orchestrator downgrades it to "external verdict unavailable".
#[derive(Debug, Clone)]
pub enum VerifyError {
    Network(String),
    Server { status: u16, detail: Option<String> },
    Auth,
    Timeout,
    Unsupported(String),
    MissingCredentials,
    Parse(String),
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(detail) => write!(f, "Network error: {}", detail),
            Self::Server { status, detail } => match detail {
                Some(d) => write!(f, "Service error {}: {}", status, d),
                None => write!(f, "Service error {}", status),
            },
            Self::Auth => write!(f, "Authentication rejected"),
            Self::Timeout => write!(f, "Verification timed out"),
            Self::Unsupported(detail) => write!(f, "Sample not supported: {}", detail),
            Self::MissingCredentials => write!(f, "No API key configured"),
            Self::Parse(detail) => write!(f, "Unreadable service response: {}", detail),
        }
    }
}

impl std::error::Error for VerifyError {}

fn map_transport_error(e: reqwest::Error) -> VerifyError {
    if e.is_timeout() {
        VerifyError::Timeout
    } else if e.is_connect() {
        VerifyError::Network(format!("could not connect: {}", e))
    } else {
        VerifyError::Network(e.to_string())
    }
}

/// Map a non-2xx response to the error taxonomy.
async fn triage_response(response: reqwest::Response) -> VerifyError {
    let status = response.status().as_u16();
    let detail = response.text().await.ok().filter(|t| !t.is_empty()).map(|t| {
        // Body may be JSON {"error": ...} or plain text; keep it short
        serde_json::from_str::<serde_json::Value>(&t)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| t.chars().take(200).collect())
    });

    match status {
        401 | 403 => VerifyError::Auth,
        413 | 415 | 422 => {
            VerifyError::Unsupported(detail.unwrap_or_else(|| format!("rejected ({})", status)))
        }
        _ => VerifyError::Server { status, detail },
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// Client for one verification service endpoint.
pub struct VerificationClient {
    config: VerifyConfig,
    http_client: reqwest::Client,
}

impl VerificationClient {
    pub fn new(config: VerifyConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Check if credentials are present (no network round trip).
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Submit a sample and wait for a terminal result within `budget`.
    pub async fn verify(
        &self,
        sample: &MediaSample,
        budget: Duration,
    ) -> Result<ExternalVerdict, VerifyError> {
        if !self.is_configured() {
            return Err(VerifyError::MissingCredentials);
        }

        let deadline = Instant::now() + budget;
        log::info!("Submitting {} for external verification", sample.describe());

        let request_id = self.upload(sample).await?;
        log::debug!("External verification request accepted: {}", request_id);

        self.poll_result(&request_id, deadline).await
    }

    /// Upload the sample, returning the service-side request id.
    async fn upload(&self, sample: &MediaSample) -> Result<String, VerifyError> {
        let url = format!("{}/api/v1/media", self.config.base_url);

        let part = reqwest::multipart::Part::bytes(sample.bytes.clone())
            .file_name(sample.filename.clone())
            .mime_str(&sample.mime_type)
            .map_err(|e| VerifyError::Unsupported(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(triage_response(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| VerifyError::Parse(e.to_string()))?;
        Ok(body.request_id)
    }

    /// Poll for the result with exponential backoff (1s, 2s, 4s, 8s,
    /// capped at 10s) until a terminal status or the deadline.
    async fn poll_result(
        &self,
        request_id: &str,
        deadline: Instant,
    ) -> Result<ExternalVerdict, VerifyError> {
        let url = format!(
            "{}/api/v1/media/{}/result",
            self.config.base_url, request_id
        );
        let mut delay = Duration::from_secs(self.config.poll_initial_secs);

        for attempt in 0..self.config.poll_max_attempts {
            let response = self
                .http_client
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .send()
                .await
                .map_err(map_transport_error)?;

            if !response.status().is_success() {
                return Err(triage_response(response).await);
            }

            let body: ResultResponse = response
                .json()
                .await
                .map_err(|e| VerifyError::Parse(e.to_string()))?;

            match parse_wire_status(&body.status) {
                WireStatus::Terminal(status) => {
                    log::info!(
                        "External verification finished: {:?} (request {})",
                        status,
                        request_id
                    );
                    return Ok(translate(body, status, request_id));
                }
                WireStatus::Pending => {
                    let now = Instant::now();
                    if now + delay >= deadline {
                        log::warn!(
                            "External verification exceeded budget after {} polls",
                            attempt + 1
                        );
                        return Err(VerifyError::Timeout);
                    }
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(self.config.poll_max_secs));
                }
            }
        }

        Err(VerifyError::Timeout)
    }
}

// ============================================================================
// TESTS
// ============================================================================
