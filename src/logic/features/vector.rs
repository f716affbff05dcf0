//! Feature Vector - Versioned container for forensic measurements
//!
//! Uses the centralized layout from `layout.rs` for consistent ordering,
//! version tracking and a layout hash for compatibility checks. Every
//! value is a scalar in [0,1]; the extractors are responsible for the
//! normalization.

use serde::{Deserialize, Serialize};

use super::layout::{
    layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};

/// Versioned feature vector. Produced once per sample, immutable after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Check that every value sits in the contract range [0,1]
    pub fn in_range(&self) -> bool {
        self.values.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_stamps_layout() {
        let vector = FeatureVector::from_values([0.5; FEATURE_COUNT]);
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
        assert!(vector.validate().is_ok());
    }

    #[test]
    fn test_get_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 0.25;
        let vector = FeatureVector::from_values(values);

        assert_eq!(vector.get_by_name("noise_pattern"), Some(0.25));
        assert_eq!(vector.get_by_name("nonexistent"), None);
    }

    #[test]
    fn test_in_range() {
        assert!(FeatureVector::from_values([0.0; FEATURE_COUNT]).in_range());
        assert!(FeatureVector::from_values([1.0; FEATURE_COUNT]).in_range());

        let mut values = [0.5; FEATURE_COUNT];
        values[3] = 1.5;
        assert!(!FeatureVector::from_values(values).in_range());

        values[3] = f32::NAN;
        assert!(!FeatureVector::from_values(values).in_range());
    }

    #[test]
    fn test_to_log_entry() {
        let vector = FeatureVector::from_values([0.5; FEATURE_COUNT]);
        let log = vector.to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert!(log["named_values"]["noise_pattern"].as_f64().is_some());
    }
}
