//! Extraction Entry Point
//!
//! Decodes a sample once and runs every category extractor over the
//! resulting raster. Pure with respect to the sample bytes: identical
//! input produces an identical vector.

use crate::logic::sample::MediaSample;

use super::raster::{self, ExtractError};
use super::vector::FeatureVector;
use super::{color, compression, edges, noise, texture};

/// Derive the full feature vector for one sample.
pub fn extract(sample: &MediaSample) -> Result<FeatureVector, ExtractError> {
    let raster = raster::decode(sample)?;

    let (noise_pattern, noise_energy) = noise::extract(&raster.gray);
    let (edge_consistency, edge_density) = edges::extract(&raster.gray);
    let (texture_uniformity, texture_energy) = texture::extract(&raster.gray);
    let (compression_artifacts, compression_consistency) = compression::extract(&raster.gray);
    let (color_distribution, color_correlation) = color::extract(&raster.channels);

    // Order must match FEATURE_LAYOUT
    let vector = FeatureVector::from_values([
        noise_pattern,
        noise_energy,
        edge_consistency,
        edge_density,
        texture_uniformity,
        texture_energy,
        compression_artifacts,
        compression_consistency,
        color_distribution,
        color_correlation,
    ]);

    debug_assert!(vector.in_range());
    log::debug!("extracted features for {}: {}", sample.describe(), vector.to_log_entry());

    Ok(vector)
}
