//! Color Features
//!
//! Generators and heavy post-processing flatten color statistics: channel
//! histograms lose entropy and the RGB channels become unusually
//! correlated or decorrelated relative to camera output.

use ndarray::Array2;

/// Histogram bins per channel
const HIST_BINS: usize = 32;

/// Returns `(color_distribution, color_correlation)`, both in [0,1].
pub fn extract(channels: &[Array2<f32>; 3]) -> (f32, f32) {
    let max_entropy = (HIST_BINS as f32).ln();
    let mean_entropy =
        channels.iter().map(|c| channel_entropy(c)).sum::<f32>() / channels.len() as f32;
    let distribution = (mean_entropy / max_entropy).clamp(0.0, 1.0);

    let rg = correlation(&channels[0], &channels[1]);
    let rb = correlation(&channels[0], &channels[2]);
    let gb = correlation(&channels[1], &channels[2]);
    let mean_correlation = ((rg + rb + gb) / 3.0).clamp(0.0, 1.0);

    (distribution, mean_correlation)
}

/// Shannon entropy of a 32-bin intensity histogram.
fn channel_entropy(channel: &Array2<f32>) -> f32 {
    let mut hist = [0u32; HIST_BINS];
    for &v in channel.iter() {
        let bin = ((v / 256.0 * HIST_BINS as f32) as usize).min(HIST_BINS - 1);
        hist[bin] += 1;
    }

    let total = channel.len() as f32 + 1e-7;
    let mut entropy = 0.0f32;
    for &count in hist.iter() {
        let p = count as f32 / total;
        entropy -= p * (p + 1e-7).ln();
    }
    entropy
}

/// Absolute Pearson correlation; constant channels yield 0.
fn correlation(a: &Array2<f32>, b: &Array2<f32>) -> f32 {
    let n = a.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let mean_a = a.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }

    let r = (cov / denom).abs() as f32;
    if r.is_finite() {
        r.min(1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn gradient_channel(scale: f32) -> Array2<f32> {
        let mut plane = Array2::zeros((32, 32));
        for y in 0..32 {
            for x in 0..32 {
                plane[(y, x)] = (x as f32 * scale) % 256.0;
            }
        }
        plane
    }

    #[test]
    fn test_solid_color_has_low_entropy_and_zero_correlation() {
        let channels = [
            Array2::from_elem((32, 32), 255.0),
            Array2::from_elem((32, 32), 0.0),
            Array2::from_elem((32, 32), 0.0),
        ];
        let (distribution, correlation) = extract(&channels);
        assert!(distribution < 0.05);
        // Constant channels carry no correlation signal
        assert_eq!(correlation, 0.0);
    }

    #[test]
    fn test_identical_gradients_fully_correlated() {
        let channels = [
            gradient_channel(8.0),
            gradient_channel(8.0),
            gradient_channel(8.0),
        ];
        let (distribution, correlation) = extract(&channels);
        assert!(distribution > 0.5);
        assert!(correlation > 0.99);
    }

    #[test]
    fn test_scores_in_range() {
        let channels = [
            gradient_channel(3.0),
            gradient_channel(7.0),
            gradient_channel(11.0),
        ];
        let (distribution, correlation) = extract(&channels);
        assert!((0.0..=1.0).contains(&distribution));
        assert!((0.0..=1.0).contains(&correlation));
    }
}
