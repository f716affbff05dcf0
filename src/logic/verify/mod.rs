//! External Verification Module
//!
//! Opaque adapter around the third-party forensic service. The session
//! depends on the `Verifier` trait, so tests (and alternative providers)
//! can stand in for the HTTP client.

pub mod client;

use std::future::Future;
use std::time::Duration;

use crate::logic::sample::MediaSample;

pub use client::{
    ExternalStatus, ExternalVerdict, ModelResult, VerificationClient, VerifyConfig, VerifyError,
};

/// The one operation the core consumes from the external service.
pub trait Verifier: Send + Sync {
    fn verify(
        &self,
        sample: &MediaSample,
        budget: Duration,
    ) -> impl Future<Output = Result<ExternalVerdict, VerifyError>> + Send;
}

impl Verifier for VerificationClient {
    async fn verify(
        &self,
        sample: &MediaSample,
        budget: Duration,
    ) -> Result<ExternalVerdict, VerifyError> {
        VerificationClient::verify(self, sample, budget).await
    }
}
