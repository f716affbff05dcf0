//! Anomaly Scorer
//!
//! Unsupervised scoring against reference statistics of authentic media:
//! a weighted z-score distance mapped monotonically into a manipulation
//! confidence. The reference tables are embedded (`reference.rs`) and can
//! be overridden from a JSON stats file; they are loaded once into shared
//! state and never mutated afterwards.

pub mod reference;
pub mod threshold;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::features::{feature_name, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::risk::{self, RiskAssessment};

pub use reference::ReferenceStats;
pub use threshold::DecisionConfig;

// ============================================================================
// STATE
// ============================================================================

/// Loaded model (reference stats + decision config)
static MODEL: RwLock<Option<AnomalyModel>> = RwLock::new(None);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// The scoring model: reference distribution plus decision parameters.
#[derive(Debug, Clone)]
pub struct AnomalyModel {
    pub stats: ReferenceStats,
    pub config: DecisionConfig,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// Model metadata for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub source: String,
    pub feature_count: usize,
    pub decision_threshold: f32,
    pub loaded_at: DateTime<Utc>,
}

/// The local analysis conclusion for one sample.
#[derive(Debug, Clone, Serialize)]
pub struct LocalVerdict {
    pub prediction: bool,
    pub confidence: f32,
    pub anomaly_distance: f32,
    pub decision_threshold: f32,
    pub dominant_feature: &'static str,
    pub features: FeatureVector,
    pub risk: RiskAssessment,
}

/// On-disk stats file (JSON): reference tables plus optional decision
/// parameter overrides.
#[derive(Debug, Deserialize)]
struct ModelFile {
    means: Vec<f32>,
    sigmas: Vec<f32>,
    weights: Vec<f32>,
    decision_threshold: Option<f32>,
    confidence_scale: Option<f32>,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone)]
pub struct ModelUnavailableError(pub String);

impl std::fmt::Display for ModelUnavailableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Anomaly model unavailable: {}", self.0)
    }
}

impl std::error::Error for ModelUnavailableError {}

// ============================================================================
// MODEL LOADING
// ============================================================================

/// Build the model from the embedded reference tables.
pub fn build_embedded() -> Result<AnomalyModel, ModelUnavailableError> {
    let stats = ReferenceStats::default();
    stats.validate().map_err(ModelUnavailableError)?;

    Ok(AnomalyModel {
        stats,
        config: DecisionConfig::default(),
        source: "<embedded>".to_string(),
        loaded_at: Utc::now(),
    })
}

/// Build the model from a JSON stats file.
pub fn build_from_file(path: &str) -> Result<AnomalyModel, ModelUnavailableError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ModelUnavailableError(format!("failed to read stats file: {}", e)))?;

    let file: ModelFile = serde_json::from_str(&content)
        .map_err(|e| ModelUnavailableError(format!("failed to parse stats file: {}", e)))?;

    let stats = ReferenceStats {
        means: file.means,
        sigmas: file.sigmas,
        weights: file.weights,
    };
    stats.validate().map_err(ModelUnavailableError)?;

    let mut config = DecisionConfig::default();
    if let Some(t) = file.decision_threshold {
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(ModelUnavailableError(format!(
                "decision_threshold out of range: {}",
                t
            )));
        }
        config.decision_threshold = t;
    }
    if let Some(s) = file.confidence_scale {
        if !s.is_finite() || s <= 0.0 {
            return Err(ModelUnavailableError(format!(
                "confidence_scale must be positive: {}",
                s
            )));
        }
        config.confidence_scale = s;
    }

    Ok(AnomalyModel {
        stats,
        config,
        source: path.to_string(),
        loaded_at: Utc::now(),
    })
}

/// Initialize the scorer: stats file from the environment when
/// configured, embedded defaults otherwise. A broken override file is
/// logged and replaced by the embedded tables.
pub fn init() -> Result<(), ModelUnavailableError> {
    let model = match crate::constants::get_model_path() {
        Some(path) => match build_from_file(&path) {
            Ok(model) => {
                log::info!("Anomaly model loaded from: {}", path);
                model
            }
            Err(e) => {
                log::warn!("Stats file rejected ({}), using embedded reference", e);
                build_embedded()?
            }
        },
        None => build_embedded()?,
    };

    log::info!(
        "Anomaly scorer ready (source: {}, threshold: {:.2}, {} features)",
        model.source,
        model.config.decision_threshold,
        FEATURE_COUNT
    );
    *MODEL.write() = Some(model);
    Ok(())
}

/// Check if a model is loaded
pub fn is_loaded() -> bool {
    MODEL.read().is_some()
}

/// Get model metadata
pub fn metadata() -> Option<ModelMetadata> {
    MODEL.read().as_ref().map(|m| ModelMetadata {
        source: m.source.clone(),
        feature_count: FEATURE_COUNT,
        decision_threshold: m.config.decision_threshold,
        loaded_at: m.loaded_at,
    })
}

// ============================================================================
// SCORING
// ============================================================================

impl AnomalyModel {
    /// Score one feature vector against the reference distribution.
    pub fn score(&self, vector: &FeatureVector) -> LocalVerdict {
        let mut weighted_sq = 0.0f32;
        let mut weight_sum = 0.0f32;
        let mut max_abs_z = -1.0f32;
        let mut dominant_feature = FEATURE_LAYOUT[0];

        for i in 0..FEATURE_COUNT {
            let z = (vector.values[i] - self.stats.means[i]) / self.stats.sigmas[i];
            let abs_z = z.abs();
            if abs_z > max_abs_z {
                max_abs_z = abs_z;
                dominant_feature = feature_name(i).unwrap_or("unknown");
            }
            weighted_sq += self.stats.weights[i] * z * z;
            weight_sum += self.stats.weights[i];
        }

        let anomaly_distance = (weighted_sq / weight_sum).sqrt();
        // Monotone map into [0,1): saturating exponential of the distance
        let confidence =
            (1.0 - (-anomaly_distance / self.config.confidence_scale).exp()).clamp(0.0, 1.0);
        let prediction = confidence >= self.config.decision_threshold;

        LocalVerdict {
            prediction,
            confidence,
            anomaly_distance,
            decision_threshold: self.config.decision_threshold,
            dominant_feature,
            features: vector.clone(),
            risk: risk::assess(confidence, dominant_feature),
        }
    }
}

/// Score against the loaded model.
pub fn score(vector: &FeatureVector) -> Result<LocalVerdict, ModelUnavailableError> {
    let guard = MODEL.read();
    let model = guard
        .as_ref()
        .ok_or_else(|| ModelUnavailableError("no reference statistics loaded".to_string()))?;

    vector
        .validate()
        .map_err(|e| ModelUnavailableError(e.to_string()))?;

    Ok(model.score(vector))
}

// ============================================================================
// TESTS
// ============================================================================
