//! Texture Features
//!
//! Generated faces are often locally too smooth. Patch-wise variance
//! (8x8 box statistics) and mean gradient energy capture that.

use ndarray::Array2;

use super::filters;

/// Box window for local statistics
const PATCH_SIZE: usize = 8;

/// Mean local variance (fraction of 255²) at which the raster no longer
/// counts as uniform
const TEXTURE_VAR_SCALE: f32 = 0.02;

/// Returns `(texture_uniformity, texture_energy)`, both in [0,1].
pub fn extract(gray: &Array2<f32>) -> (f32, f32) {
    let local_var = local_variance(gray);
    let mean_var = filters::mean_of(&local_var) / (255.0 * 255.0);
    // High when patches are uniformly smooth
    let uniformity = 1.0 - (mean_var / TEXTURE_VAR_SCALE).clamp(0.0, 1.0);

    let energy_plane = filters::gradient_magnitude(gray);
    let energy = (filters::mean_of(&energy_plane) / 255.0).clamp(0.0, 1.0);

    (uniformity, energy)
}

/// Patch-wise variance via box means, clamped against numerical noise.
pub(super) fn local_variance(gray: &Array2<f32>) -> Array2<f32> {
    let local_mean = filters::box_mean(gray, PATCH_SIZE);
    let squared = gray.mapv(|v| v * v);
    let local_sq_mean = filters::box_mean(&squared, PATCH_SIZE);

    let mut out = local_sq_mean - &local_mean.mapv(|v| v * v);
    out.mapv_inplace(|v| v.max(0.0));
    out
}
