//! Edge Features
//!
//! Splices and generated regions disturb edge statistics: blended seams
//! lower gradient density, and GAN textures produce unnaturally coherent
//! gradient orientations.

use ndarray::Array2;

use super::filters;

/// Sobel magnitude above which a pixel counts as an edge
const EDGE_THRESHOLD: f32 = 50.0;

/// Returns `(edge_consistency, edge_density)`, both in [0,1].
pub fn extract(gray: &Array2<f32>) -> (f32, f32) {
    let gx = filters::sobel_rows(gray);
    let gy = filters::sobel_cols(gray);

    let total = gray.len() as f32;
    let mut edge_pixels = 0usize;
    let mut cos_sum = 0.0f64;
    let mut sin_sum = 0.0f64;

    for (x, y) in gx.iter().zip(gy.iter()) {
        let magnitude = (x * x + y * y).sqrt();
        if magnitude > EDGE_THRESHOLD {
            edge_pixels += 1;
        }
        // Orientation doubled so opposite gradients reinforce
        let angle = 2.0 * (*y).atan2(*x);
        cos_sum += angle.cos() as f64;
        sin_sum += angle.sin() as f64;
    }

    let cos_mean = cos_sum / total as f64;
    let sin_mean = sin_sum / total as f64;
    let consistency = ((cos_mean * cos_mean + sin_mean * sin_mean).sqrt() as f32).clamp(0.0, 1.0);
    let density = (edge_pixels as f32 / total).clamp(0.0, 1.0);

    (consistency, density)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_flat_plane_has_no_edges() {
        let plane = Array2::from_elem((32, 32), 200.0);
        let (_, density) = extract(&plane);
        assert!(density < 1e-6);
    }

    #[test]
    fn test_vertical_stripes_are_coherent() {
        let mut plane = Array2::zeros((64, 64));
        for y in 0..64 {
            for x in 0..64 {
                if (x / 4) % 2 == 0 {
                    plane[(y, x)] = 255.0;
                }
            }
        }
        let (consistency, density) = extract(&plane);
        // All gradients share one orientation
        assert!(consistency > 0.9);
        assert!(density > 0.1);
    }

    #[test]
    fn test_scores_in_range() {
        let mut plane = Array2::zeros((48, 48));
        for y in 0..48 {
            for x in 0..48 {
                plane[(y, x)] = ((x * 31 + y * 17) % 256) as f32;
            }
        }
        let (consistency, density) = extract(&plane);
        assert!((0.0..=1.0).contains(&consistency));
        assert!((0.0..=1.0).contains(&density));
    }
}
