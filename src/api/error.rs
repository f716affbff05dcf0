//! Boundary error handling
//!
//! Converts core failures into categorized HTTP responses. The caller
//! always gets a message distinguishing "timed out", "upstream error with
//! status" and "could not connect"; raw internal error text of foreign
//! services never leaks through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logic::sample::ValidationError;
use crate::logic::session::SessionError;
use crate::logic::verify::VerifyError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    // Rejected before the core
    UnsupportedMediaType(String),
    PayloadTooLarge(String),
    BadRequest(String),

    // No-verdict failures, categorized by the external cause
    AnalysisTimedOut,
    UpstreamError { status: u16, detail: Option<String> },
    ConnectivityError,
    NoVerdict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::UnsupportedMediaType(msg) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.clone())
            }
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::AnalysisTimedOut => (
                StatusCode::GATEWAY_TIMEOUT,
                "Verification timed out and no local verdict was available".to_string(),
            ),
            ApiError::UpstreamError { status, detail } => {
                log::error!("Upstream verification error {}: {:?}", status, detail);
                let msg = match detail {
                    Some(d) => format!("Upstream verification error (status {}): {}", status, d),
                    None => format!("Upstream verification error (status {})", status),
                };
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::ConnectivityError => (
                StatusCode::BAD_GATEWAY,
                "Could not connect to the verification service and no local verdict was available"
                    .to_string(),
            ),
            ApiError::NoVerdict(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnsupportedType(_) => Self::UnsupportedMediaType(err.to_string()),
            ValidationError::TooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            ValidationError::Empty => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let SessionError::NoVerdict {
            local_failure,
            external_failure,
        } = err;

        // The external cause decides the category; local detail rides along
        match external_failure {
            Some(VerifyError::Timeout) => Self::AnalysisTimedOut,
            Some(VerifyError::Server { status, detail }) => Self::UpstreamError { status, detail },
            Some(VerifyError::Network(_)) => Self::ConnectivityError,
            _ => {
                let detail = local_failure
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "no analysis source available".to_string());
                Self::NoVerdict(format!("Analysis produced no verdict: {}", detail))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::session::LocalFailure;

    #[test]
    fn test_validation_mapping() {
        let err: ApiError = ValidationError::UnsupportedType("text/plain".to_string()).into();
        assert!(matches!(err, ApiError::UnsupportedMediaType(_)));

        let err: ApiError = ValidationError::TooLarge {
            size: 20,
            limit: 10,
        }
        .into();
        assert!(matches!(err, ApiError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_session_timeout_maps_to_timed_out() {
        let err: ApiError = SessionError::NoVerdict {
            local_failure: None,
            external_failure: Some(VerifyError::Timeout),
        }
        .into();
        assert!(matches!(err, ApiError::AnalysisTimedOut));
    }

    #[test]
    fn test_session_server_error_keeps_status() {
        let err: ApiError = SessionError::NoVerdict {
            local_failure: None,
            external_failure: Some(VerifyError::Server {
                status: 503,
                detail: Some("maintenance".to_string()),
            }),
        }
        .into();
        match err {
            ApiError::UpstreamError { status, detail } => {
                assert_eq!(status, 503);
                assert_eq!(detail.as_deref(), Some("maintenance"));
            }
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_session_network_error_maps_to_connectivity() {
        let err: ApiError = SessionError::NoVerdict {
            local_failure: None,
            external_failure: Some(VerifyError::Network("refused".to_string())),
        }
        .into();
        assert!(matches!(err, ApiError::ConnectivityError));
    }

    #[test]
    fn test_session_without_external_cause_reports_local_detail() {
        let err: ApiError = SessionError::NoVerdict {
            local_failure: Some(LocalFailure::Task("panic".to_string())),
            external_failure: Some(VerifyError::MissingCredentials),
        }
        .into();
        match err {
            ApiError::NoVerdict(msg) => assert!(msg.contains("no verdict")),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
