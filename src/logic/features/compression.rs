//! Compression Features
//!
//! Re-encoded or composited media shows inconsistent compression history:
//! 8-pixel blocking seams from JPEG-family codecs and uneven local
//! variance where regions went through different pipelines.

use ndarray::{s, Array2};

use super::filters;
use super::texture::local_variance;

/// JPEG-family block size
const BLOCK_SIZE: usize = 8;

/// Variance-of-local-variance scale for the consistency metric
const CONSISTENCY_SCALE: f32 = 10_000.0;

/// Returns `(compression_artifacts, compression_consistency)`, both in [0,1].
pub fn extract(gray: &Array2<f32>) -> (f32, f32) {
    let local_var = local_variance(gray);
    let consistency =
        (1.0 / (1.0 + filters::variance_of(&local_var) / CONSISTENCY_SCALE)).clamp(0.0, 1.0);

    (blocking_artifacts(gray), consistency)
}

/// Mean luminance discontinuity across 8-pixel block boundaries.
fn blocking_artifacts(gray: &Array2<f32>) -> f32 {
    let (h, w) = gray.dim();
    if h < 2 * BLOCK_SIZE || w < 2 * BLOCK_SIZE {
        return 0.0;
    }

    let mut sum = 0.0f32;
    let mut count = 0usize;

    let mut p = BLOCK_SIZE;
    while p < h {
        let upper = gray.slice(s![p, ..]);
        let lower = gray.slice(s![p - 1, ..]);
        for (a, b) in upper.iter().zip(lower.iter()) {
            sum += (a - b).abs();
            count += 1;
        }
        p += BLOCK_SIZE;
    }

    let mut p = BLOCK_SIZE;
    while p < w {
        let right = gray.slice(s![.., p]);
        let left = gray.slice(s![.., p - 1]);
        for (a, b) in right.iter().zip(left.iter()) {
            sum += (a - b).abs();
            count += 1;
        }
        p += BLOCK_SIZE;
    }

    if count == 0 {
        return 0.0;
    }

    (sum / count as f32 / 255.0).clamp(0.0, 1.0)
}
