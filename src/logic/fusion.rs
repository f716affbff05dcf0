//! Verdict Fusion
//!
//! Deterministic priority rule merging the local and external verdicts
//! into the one conclusion shown to the caller. This module is also the
//! single numeric-hygiene point: confidence values are coerced into
//! [0,1] exactly once, on entry, and nowhere else.

use serde::Serialize;

use crate::logic::model::LocalVerdict;
use crate::logic::verify::{ExternalStatus, ExternalVerdict};

/// Source label used when the local analyzer decides the verdict
pub const LOCAL_SOURCE_LABEL: &str = "local-forensics";

/// Source label used when the external service decides but reports no
/// per-model breakdown
pub const EXTERNAL_SOURCE_LABEL: &str = "external-verification";

/// The authoritative conclusion for one session.
#[derive(Debug, Clone, Serialize)]
pub struct FusedVerdict {
    pub is_manipulated: bool,
    pub confidence: f32,
    pub description: String,
    pub source_models: Vec<String>,
    pub raw_external: Option<ExternalVerdict>,
}

/// Fusion failure: both sources absent.
#[derive(Debug, Clone)]
pub struct NoVerdictError;

impl std::fmt::Display for NoVerdictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No verdict available: local analysis and external verification both failed"
        )
    }
}

impl std::error::Error for NoVerdictError {}

/// Coerce a confidence-like value into a finite number in [0,1].
///
/// Anything absent, non-finite or out of range becomes 0.0. Every
/// confidence consumed below passes through here before it participates
/// in decisions or percentage formatting.
pub fn normalize_confidence(raw: Option<f32>) -> f32 {
    match raw {
        Some(v) if v.is_finite() && (0.0..=1.0).contains(&v) => v,
        _ => 0.0,
    }
}

/// Merge the two verdicts under the fixed priority rule:
///
/// 1. A conclusive external verdict (AUTHENTIC/MANIPULATED) decides.
/// 2. Otherwise the local verdict decides.
/// 3. Otherwise the degenerate authentic/zero fallback.
///
/// Fails only when both inputs are absent.
pub fn fuse(
    local: Option<&LocalVerdict>,
    external: Option<&ExternalVerdict>,
) -> Result<FusedVerdict, NoVerdictError> {
    if local.is_none() && external.is_none() {
        return Err(NoVerdictError);
    }

    let (is_manipulated, confidence, source_models) = match external {
        Some(ext) if ext.is_conclusive() => {
            let manipulated = ext.status == ExternalStatus::Manipulated;
            let confidence = normalize_confidence(ext.score);
            let sources = if ext.models.is_empty() {
                vec![EXTERNAL_SOURCE_LABEL.to_string()]
            } else {
                ext.models.iter().map(|m| m.name.clone()).collect()
            };
            (manipulated, confidence, sources)
        }
        _ => match local {
            Some(loc) => (
                loc.prediction,
                normalize_confidence(Some(loc.confidence)),
                vec![LOCAL_SOURCE_LABEL.to_string()],
            ),
            // External present but inconclusive, no local verdict
            None => (false, 0.0, Vec::new()),
        },
    };

    let description = describe(local, external, is_manipulated, confidence);

    Ok(FusedVerdict {
        is_manipulated,
        confidence,
        description,
        source_models,
        raw_external: external.cloned(),
    })
}

/// Description follows the same priority as the decision.
fn describe(
    local: Option<&LocalVerdict>,
    external: Option<&ExternalVerdict>,
    is_manipulated: bool,
    confidence: f32,
) -> String {
    let external_decided = external.map(|e| e.is_conclusive()).unwrap_or(false);

    if external_decided && is_manipulated {
        return format!(
            "External verification flagged this sample as manipulated with {:.0}% confidence.",
            confidence * 100.0
        );
    }
    if let Some(loc) = local {
        return loc.risk.description.clone();
    }
    "Insufficient data to assess this sample.".to_string()
}

// ============================================================================
// TESTS
// ============================================================================
