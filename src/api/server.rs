//! HTTP Boundary
//!
//! Thin layer over the analysis core: multipart extraction, the type/size
//! invariant, response shaping. No analysis logic lives here.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::constants;
use crate::logic::fusion::FusedVerdict;
use crate::logic::model::{self, LocalVerdict};
use crate::logic::sample::MediaSample;
use crate::logic::session::AnalysisSession;
use crate::logic::verify::{ExternalVerdict, VerificationClient};

use super::error::{ApiError, ApiResult};

/// Shared handler state: one verification client for all sessions.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<VerificationClient>,
}

/// Build the boundary router.
pub fn router(state: AppState) -> Router {
    // Multipart framing overhead on top of the sample cap
    let body_limit = constants::MAX_SAMPLE_BYTES + 64 * 1024;

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    services: ServiceFlags,
}

#[derive(Serialize)]
struct ServiceFlags {
    anomaly_model: bool,
    external_verification: bool,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub filename: String,
    pub session_id: Uuid,
    pub verdict: FusedVerdict,
    pub local: Option<LocalVerdict>,
    #[serde(rename = "reality_defender")]
    pub external: Option<ExternalVerdict>,
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: constants::APP_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        services: ServiceFlags {
            anomaly_model: model::is_loaded(),
            external_verification: state.verifier.is_configured(),
        },
    })
}

/// Analyze one uploaded sample end to end.
async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let sample = read_sample(multipart).await?;
    sample.validate()?;

    let filename = sample.filename.clone();
    let session = AnalysisSession::new();
    let budget = Duration::from_secs(constants::get_verify_timeout_secs());

    let outcome = session.run(sample, state.verifier.as_ref(), budget).await?;

    Ok(Json(AnalyzeResponse {
        status: "success",
        filename,
        session_id: outcome.session_id,
        verdict: outcome.verdict,
        local: outcome.local,
        external: outcome.external,
    }))
}

/// Pull the `file` part out of the multipart body.
async fn read_sample(mut multipart: Multipart) -> ApiResult<MediaSample> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("sample").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Upload interrupted: {}", e)))?;

        return Ok(MediaSample::new(bytes.to_vec(), mime_type, filename));
    }

    Err(ApiError::BadRequest(
        "Missing multipart field 'file'".to_string(),
    ))
}
