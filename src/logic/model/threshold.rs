//! Decision Configuration
//!
//! The decision threshold and the distance-to-confidence scale are fixed
//! at model-build time. Logic never hardcodes them.

use serde::{Deserialize, Serialize};

/// Decision parameters for the anomaly scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Confidence at or above which a sample is predicted manipulated
    pub decision_threshold: f32,

    /// Anomaly-distance scale in `confidence = 1 - exp(-d / scale)`
    pub confidence_scale: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            decision_threshold: 0.60,
            confidence_scale: 1.5,
        }
    }
}

impl DecisionConfig {
    pub fn new(decision_threshold: f32) -> Self {
        Self {
            decision_threshold,
            ..Default::default()
        }
    }

    /// High sensitivity (lower threshold, flags more samples)
    pub fn high_sensitivity() -> Self {
        Self::new(0.45)
    }

    /// Low sensitivity (higher threshold, flags fewer samples)
    pub fn low_sensitivity() -> Self {
        Self::new(0.80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let config = DecisionConfig::default();
        assert_eq!(config.decision_threshold, 0.60);
        assert!(config.confidence_scale > 0.0);
    }

    #[test]
    fn test_sensitivity_presets_ordered() {
        assert!(
            DecisionConfig::high_sensitivity().decision_threshold
                < DecisionConfig::low_sensitivity().decision_threshold
        );
    }
}
