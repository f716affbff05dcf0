//! Noise Features
//!
//! Synthetic generators tend to leave residual noise that is either too
//! clean or spectrally unlike sensor noise. Measured as the residual
//! against a Gaussian-blurred copy plus Laplacian high-frequency variance.

use ndarray::Array2;

use super::filters;

/// Residual noise std that saturates `noise_pattern` (fraction of 255)
const NOISE_STD_SCALE: f32 = 0.08;

/// Laplacian variance (fraction of 255²) that saturates `noise_energy`
const HIGH_FREQ_SCALE: f32 = 0.05;

/// Blur width used for the noise residual
const RESIDUAL_SIGMA: f32 = 1.0;

/// Returns `(noise_pattern, noise_energy)`, both in [0,1].
pub fn extract(gray: &Array2<f32>) -> (f32, f32) {
    let blurred = filters::gaussian_blur(gray, RESIDUAL_SIGMA);
    let residual = gray - &blurred;

    let noise_std = filters::std_of(&residual) / 255.0;
    let noise_pattern = (noise_std / NOISE_STD_SCALE).clamp(0.0, 1.0);

    let lap = filters::laplacian(gray);
    let high_freq = filters::variance_of(&lap) / (255.0 * 255.0);
    let noise_energy = (high_freq / HIGH_FREQ_SCALE).clamp(0.0, 1.0);

    (noise_pattern, noise_energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_flat_plane_has_no_noise() {
        let plane = Array2::from_elem((64, 64), 128.0);
        let (pattern, energy) = extract(&plane);
        assert!(pattern < 1e-3);
        assert!(energy < 1e-3);
    }

    #[test]
    fn test_checkerboard_scores_high() {
        let mut plane = Array2::zeros((64, 64));
        for y in 0..64 {
            for x in 0..64 {
                if (x + y) % 2 == 0 {
                    plane[(y, x)] = 255.0;
                }
            }
        }
        let (pattern, energy) = extract(&plane);
        assert!(pattern > 0.5);
        assert!(energy > 0.5);
    }

    #[test]
    fn test_scores_in_range() {
        let mut plane = Array2::zeros((32, 32));
        for y in 0..32 {
            for x in 0..32 {
                plane[(y, x)] = ((x * 7 + y * 13) % 256) as f32;
            }
        }
        let (pattern, energy) = extract(&plane);
        assert!((0.0..=1.0).contains(&pattern));
        assert!((0.0..=1.0).contains(&energy));
    }
}
