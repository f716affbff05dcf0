//! Analysis Session
//!
//! One session per submitted sample: drives extraction and scoring on the
//! blocking pool, the external verification call under its timeout budget
//! on the async runtime, then fuses whatever settled. Phase transitions
//! are published on a watch channel a caller can poll or subscribe to;
//! they are a coarse approximation, not a progress protocol.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::logic::features::{self, ExtractError};
use crate::logic::fusion::{self, FusedVerdict};
use crate::logic::model::{self, LocalVerdict, ModelUnavailableError};
use crate::logic::sample::MediaSample;
use crate::logic::verify::{ExternalVerdict, Verifier, VerifyError};

// ============================================================================
// PHASES
// ============================================================================

/// Session lifecycle phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Created,
    Uploading,
    LocalAnalysis,
    ExternalVerification,
    Finalizing,
    Done,
    Failed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "CREATED",
            Self::Uploading => "UPLOADING",
            Self::LocalAnalysis => "LOCAL_ANALYSIS",
            Self::ExternalVerification => "EXTERNAL_VERIFICATION",
            Self::Finalizing => "FINALIZING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

// ============================================================================
// RESULTS AND ERRORS
// ============================================================================

/// Everything a completed session hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub session_id: Uuid,
    pub local: Option<LocalVerdict>,
    pub external: Option<ExternalVerdict>,
    pub verdict: FusedVerdict,
}

/// Why the local branch produced no verdict.
#[derive(Debug, Clone)]
pub enum LocalFailure {
    Extract(ExtractError),
    Model(ModelUnavailableError),
    Task(String),
}

impl std::fmt::Display for LocalFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract(e) => write!(f, "{}", e),
            Self::Model(e) => write!(f, "{}", e),
            Self::Task(detail) => write!(f, "Local analysis task failed: {}", detail),
        }
    }
}

/// Session-level failure. Component errors below the orchestrator are
/// downgraded; only the no-verdict case surfaces here.
#[derive(Debug, Clone)]
pub enum SessionError {
    NoVerdict {
        local_failure: Option<LocalFailure>,
        external_failure: Option<VerifyError>,
    },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVerdict { .. } => {
                write!(f, "Analysis produced no verdict from either source")
            }
        }
    }
}

impl std::error::Error for SessionError {}

// ============================================================================
// SESSION
// ============================================================================

/// The bounded unit of work for analyzing exactly one sample.
pub struct AnalysisSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    phase_tx: watch::Sender<Phase>,
    phase_rx: watch::Receiver<Phase>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        let (phase_tx, phase_rx) = watch::channel(Phase::Created);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            phase_tx,
            phase_rx,
        }
    }

    /// Current phase (poll interface).
    pub fn phase(&self) -> Phase {
        *self.phase_rx.borrow()
    }

    /// Subscribe to phase transitions (watch interface).
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    fn set_phase(&self, phase: Phase) {
        log::debug!("session {}: phase {}", self.id, phase);
        let _ = self.phase_tx.send(phase);
    }

    /// Run the full pipeline for one sample.
    ///
    /// The local and external branches run concurrently and settle
    /// independently; a failure on either side is downgraded to an absent
    /// verdict. Only fusion with both sides absent fails the session.
    pub async fn run<V: Verifier>(
        &self,
        sample: MediaSample,
        verifier: &V,
        budget: Duration,
    ) -> Result<AnalysisOutcome, SessionError> {
        log::info!("session {}: analyzing {}", self.id, sample.describe());
        self.set_phase(Phase::Uploading);

        // The sample is fully buffered by the boundary before submission
        let sample = Arc::new(sample);
        self.set_phase(Phase::LocalAnalysis);

        let local_sample = Arc::clone(&sample);
        let local_task = tokio::task::spawn_blocking(move || -> Result<LocalVerdict, LocalFailure> {
            let vector = features::extract(&local_sample).map_err(LocalFailure::Extract)?;
            model::score(&vector).map_err(LocalFailure::Model)
        });

        let external_branch = async {
            match tokio::time::timeout(budget, verifier.verify(&sample, budget)).await {
                Ok(result) => result,
                Err(_) => Err(VerifyError::Timeout),
            }
        };

        let local_branch = async {
            let result = local_task.await;
            // Local work settled; the external call may still be in flight
            self.set_phase(Phase::ExternalVerification);
            result
        };

        let (local_result, external_result) = tokio::join!(local_branch, external_branch);

        let mut local_failure = None;
        let local = match local_result {
            Ok(Ok(verdict)) => {
                log::info!(
                    "session {}: local verdict prediction={} confidence={:.2}",
                    self.id,
                    verdict.prediction,
                    verdict.confidence
                );
                Some(verdict)
            }
            Ok(Err(failure)) => {
                log::warn!("session {}: local analysis unavailable: {}", self.id, failure);
                local_failure = Some(failure);
                None
            }
            Err(join_error) => {
                log::error!("session {}: local analysis task died: {}", self.id, join_error);
                local_failure = Some(LocalFailure::Task(join_error.to_string()));
                None
            }
        };

        let mut external_failure = None;
        let external = match external_result {
            Ok(verdict) => {
                log::info!("session {}: external verdict {:?}", self.id, verdict.status);
                Some(verdict)
            }
            Err(error) => {
                log::warn!(
                    "session {}: external verification unavailable: {}",
                    self.id,
                    error
                );
                external_failure = Some(error);
                None
            }
        };

        self.set_phase(Phase::Finalizing);

        match fusion::fuse(local.as_ref(), external.as_ref()) {
            Ok(verdict) => {
                self.set_phase(Phase::Done);
                log::info!(
                    "session {}: done (manipulated={}, confidence={:.2})",
                    self.id,
                    verdict.is_manipulated,
                    verdict.confidence
                );
                Ok(AnalysisOutcome {
                    session_id: self.id,
                    local,
                    external,
                    verdict,
                })
            }
            Err(_) => {
                self.set_phase(Phase::Failed);
                Err(SessionError::NoVerdict {
                    local_failure,
                    external_failure,
                })
            }
        }
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::test_support::{noisy_image, png_sample, solid_image};
    use crate::logic::verify::{ExternalStatus, ModelResult};

    /// Verifier returning a fixed result.
    struct StaticVerifier(Result<ExternalVerdict, VerifyError>);

    impl Verifier for StaticVerifier {
        async fn verify(
            &self,
            _sample: &MediaSample,
            _budget: Duration,
        ) -> Result<ExternalVerdict, VerifyError> {
            self.0.clone()
        }
    }

    /// Verifier slower than any test budget.
    struct SlowVerifier;

    impl Verifier for SlowVerifier {
        async fn verify(
            &self,
            _sample: &MediaSample,
            _budget: Duration,
        ) -> Result<ExternalVerdict, VerifyError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(ExternalVerdict::unavailable())
        }
    }

    fn manipulated_external(score: f32) -> ExternalVerdict {
        ExternalVerdict {
            status: ExternalStatus::Manipulated,
            score: Some(score),
            models: vec![ModelResult {
                name: "deepfake-ensemble".to_string(),
                score: Some(score),
                status: "COMPLETE".to_string(),
            }],
            request_id: Some("req-42".to_string()),
        }
    }

    fn budget() -> Duration {
        Duration::from_millis(200)
    }

    #[tokio::test]
    async fn test_engineered_anomaly_with_failing_adapter() {
        model::init().expect("model init");
        let session = AnalysisSession::new();
        // White noise sits far off every reference feature
        let sample = png_sample(noisy_image(96, 96, 77));
        let verifier =
            StaticVerifier(Err(VerifyError::Network("could not connect".to_string())));

        let outcome = session.run(sample, &verifier, budget()).await.expect("run");

        let local = outcome.local.as_ref().expect("local verdict");
        assert!(local.prediction);
        assert!(local.confidence >= local.decision_threshold);

        assert!(outcome.verdict.is_manipulated);
        assert_eq!(outcome.verdict.confidence, local.confidence);
        assert!(outcome.verdict.raw_external.is_none());
        assert!(outcome.external.is_none());
        assert_eq!(session.phase(), Phase::Done);
    }

    #[tokio::test]
    async fn test_adapter_timeout_yields_local_only_verdict() {
        model::init().expect("model init");
        let session = AnalysisSession::new();
        let sample = png_sample(noisy_image(64, 64, 5));

        let outcome = session
            .run(sample, &SlowVerifier, Duration::from_millis(50))
            .await
            .expect("run");

        assert!(outcome.external.is_none());
        assert!(outcome.verdict.raw_external.is_none());
        assert!(outcome.local.is_some());
        assert_eq!(session.phase(), Phase::Done);
    }

    #[tokio::test]
    async fn test_conclusive_external_decides() {
        model::init().expect("model init");
        let session = AnalysisSession::new();
        let sample = png_sample(solid_image(64, 64, [120, 120, 120]));
        let verifier = StaticVerifier(Ok(manipulated_external(0.87)));

        let outcome = session.run(sample, &verifier, budget()).await.expect("run");

        assert!(outcome.verdict.is_manipulated);
        assert_eq!(outcome.verdict.confidence, 0.87);
        assert!(outcome.verdict.description.contains("87%"));
        assert!(outcome.verdict.raw_external.is_some());
    }

    #[tokio::test]
    async fn test_video_sample_runs_external_only() {
        model::init().expect("model init");
        let session = AnalysisSession::new();
        let sample = MediaSample::new(vec![0u8; 256], "video/mp4", "clip.mp4");
        let verifier = StaticVerifier(Ok(ExternalVerdict {
            status: ExternalStatus::Authentic,
            score: Some(0.95),
            models: Vec::new(),
            request_id: Some("req-7".to_string()),
        }));

        let outcome = session.run(sample, &verifier, budget()).await.expect("run");

        assert!(outcome.local.is_none());
        assert!(!outcome.verdict.is_manipulated);
        assert_eq!(outcome.verdict.confidence, 0.95);
    }

    #[tokio::test]
    async fn test_both_branches_failing_fails_session() {
        model::init().expect("model init");
        let session = AnalysisSession::new();
        // Undecodable bytes kill the local branch
        let sample = MediaSample::new(vec![0xAB; 64], "image/png", "junk.png");
        let verifier = StaticVerifier(Err(VerifyError::Timeout));

        let error = session.run(sample, &verifier, budget()).await.unwrap_err();

        match error {
            SessionError::NoVerdict {
                local_failure,
                external_failure,
            } => {
                assert!(matches!(local_failure, Some(LocalFailure::Extract(_))));
                assert!(matches!(external_failure, Some(VerifyError::Timeout)));
            }
        }
        assert_eq!(session.phase(), Phase::Failed);
    }

    #[tokio::test]
    async fn test_phase_subscription_sees_terminal_state() {
        model::init().expect("model init");
        let session = AnalysisSession::new();
        let mut phases = session.subscribe();
        assert_eq!(*phases.borrow(), Phase::Created);

        let sample = png_sample(solid_image(32, 32, [10, 20, 30]));
        let verifier = StaticVerifier(Ok(manipulated_external(0.5)));
        session.run(sample, &verifier, budget()).await.expect("run");

        assert!(phases.has_changed().unwrap());
        assert_eq!(*phases.borrow_and_update(), Phase::Done);
    }
}
