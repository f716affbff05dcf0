//! Reference Statistics
//!
//! Per-feature distribution of authentic media, fixed offline from a
//! reference corpus and embedded here. Positional with FEATURE_LAYOUT;
//! any layout change invalidates these tables (see layout.rs rules).

use serde::{Deserialize, Serialize};

use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};

/// Mean of each feature over the authentic reference corpus
pub const REFERENCE_MEANS: [f32; FEATURE_COUNT] = [
    0.35, // noise_pattern
    0.30, // noise_energy
    0.15, // edge_consistency
    0.25, // edge_density
    0.45, // texture_uniformity
    0.20, // texture_energy
    0.08, // compression_artifacts
    0.55, // compression_consistency
    0.85, // color_distribution
    0.80, // color_correlation
];

/// Standard deviation of each feature over the reference corpus
pub const REFERENCE_SIGMAS: [f32; FEATURE_COUNT] = [
    0.15, // noise_pattern
    0.15, // noise_energy
    0.10, // edge_consistency
    0.12, // edge_density
    0.18, // texture_uniformity
    0.10, // texture_energy
    0.06, // compression_artifacts
    0.20, // compression_consistency
    0.10, // color_distribution
    0.12, // color_correlation
];

// Deviation weights focused on manipulation impact
// 1.0 = standard, higher = stronger forensic signal when off-reference
pub const FEATURE_WEIGHTS: [f32; FEATURE_COUNT] = [
    1.3, // noise_pattern (denoised GAN output risk)
    1.1, // noise_energy
    1.2, // edge_consistency (synthetic texture coherence)
    1.0, // edge_density
    1.2, // texture_uniformity (over-smooth generated skin)
    1.0, // texture_energy
    1.4, // compression_artifacts (double-compression seams)
    1.0, // compression_consistency
    1.1, // color_distribution
    1.0, // color_correlation
];

/// Reference distribution, either embedded or loaded from a stats file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceStats {
    pub means: Vec<f32>,
    pub sigmas: Vec<f32>,
    pub weights: Vec<f32>,
}

impl Default for ReferenceStats {
    fn default() -> Self {
        Self {
            means: REFERENCE_MEANS.to_vec(),
            sigmas: REFERENCE_SIGMAS.to_vec(),
            weights: FEATURE_WEIGHTS.to_vec(),
        }
    }
}

impl ReferenceStats {
    /// Check the tables against the current layout: full length, finite
    /// values, strictly positive sigmas and non-negative weights.
    pub fn validate(&self) -> Result<(), String> {
        if self.means.len() != FEATURE_COUNT
            || self.sigmas.len() != FEATURE_COUNT
            || self.weights.len() != FEATURE_COUNT
        {
            return Err(format!(
                "reference tables must have {} entries (layout: {:?})",
                FEATURE_COUNT, FEATURE_LAYOUT
            ));
        }
        if self.means.iter().any(|v| !v.is_finite()) {
            return Err("non-finite reference mean".to_string());
        }
        if self.sigmas.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err("reference sigma must be finite and positive".to_string());
        }
        if self.weights.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err("reference weight must be finite and non-negative".to_string());
        }
        if self.weights.iter().sum::<f32>() <= 0.0 {
            return Err("reference weights must not all be zero".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_are_valid() {
        assert!(ReferenceStats::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_short_tables() {
        let stats = ReferenceStats {
            means: vec![0.5; 3],
            ..Default::default()
        };
        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sigma() {
        let mut stats = ReferenceStats::default();
        stats.sigmas[2] = 0.0;
        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_mean() {
        let mut stats = ReferenceStats::default();
        stats.means[0] = f32::NAN;
        assert!(stats.validate().is_err());
    }
}
