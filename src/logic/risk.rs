//! Risk Assessment
//!
//! Maps a manipulation confidence to a qualitative level plus a
//! human-readable description naming the dominant forensic signal.

use serde::{Deserialize, Serialize};

/// Qualitative risk level, a step function of confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Fixed breakpoints for the step function
pub const MEDIUM_BREAKPOINT: f32 = 0.5;
pub const HIGH_BREAKPOINT: f32 = 0.7;
pub const CRITICAL_BREAKPOINT: f32 = 0.85;

impl RiskLevel {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= CRITICAL_BREAKPOINT {
            Self::Critical
        } else if confidence >= HIGH_BREAKPOINT {
            Self::High
        } else if confidence >= MEDIUM_BREAKPOINT {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Level plus templated explanation for display.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub description: String,
    pub recommendations: &'static [&'static str],
}

/// Build the assessment for a confidence and the feature that deviated
/// furthest from the authentic reference.
pub fn assess(confidence: f32, dominant_feature: &str) -> RiskAssessment {
    let level = RiskLevel::from_confidence(confidence);
    let signal = dominant_feature.replace('_', " ");

    let description = match level {
        RiskLevel::Critical => format!(
            "Strong indicators of manipulation detected. The {} measurement deviates far outside the authentic reference range.",
            signal
        ),
        RiskLevel::High => format!(
            "Likely manipulation detected. The {} measurement is the dominant anomaly signal.",
            signal
        ),
        RiskLevel::Medium => format!(
            "Some suspicious patterns detected. The sample may have been manipulated, with {} deviating most.",
            signal
        ),
        RiskLevel::Low => {
            "The sample appears to be authentic with no strong indicators of manipulation."
                .to_string()
        }
    };

    let recommendations: &'static [&'static str] = match level {
        RiskLevel::Critical => &[
            "Treat this sample as synthetic until proven otherwise",
            "Escalate for manual forensic review",
            "Check the source and context carefully",
        ],
        RiskLevel::High => &[
            "Exercise extreme caution before trusting this sample",
            "Consider additional verification methods",
            "Check the source and context carefully",
        ],
        RiskLevel::Medium => &[
            "Verify the source of the sample",
            "Look for additional evidence of authenticity",
            "Consider the context and plausibility",
        ],
        RiskLevel::Low => &[
            "Sample appears legitimate based on analysis",
            "Standard verification practices still apply",
        ],
    };

    RiskAssessment {
        level,
        description,
        recommendations,
    }
}

// ============================================================================
// TESTS
// ============================================================================
