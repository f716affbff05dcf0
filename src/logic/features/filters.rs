//! Raster Filters
//!
//! Small spatial filters the extractors share: Gaussian blur, Sobel
//! gradients, Laplacian and box mean. All operate on `Array2<f32>`
//! grayscale planes with replicated borders.

use ndarray::Array2;

/// Convolve along one axis with a 1-D kernel, replicating edge pixels.
fn convolve_axis(input: &Array2<f32>, kernel: &[f32], axis: usize) -> Array2<f32> {
    let (h, w) = input.dim();
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array2::zeros((h, w));

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let offset = k as isize - radius;
                let (sy, sx) = if axis == 0 {
                    ((y as isize + offset).clamp(0, h as isize - 1) as usize, x)
                } else {
                    (y, (x as isize + offset).clamp(0, w as isize - 1) as usize)
                };
                acc += input[(sy, sx)] * weight;
            }
            out[(y, x)] = acc;
        }
    }

    out
}

/// Separable Gaussian blur. Kernel radius is 3·sigma.
pub fn gaussian_blur(input: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let radius = (3.0 * sigma).ceil().max(1.0) as isize;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    for i in -radius..=radius {
        let x = i as f32;
        kernel.push((-x * x / (2.0 * sigma * sigma)).exp());
    }
    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }

    let rows = convolve_axis(input, &kernel, 0);
    convolve_axis(&rows, &kernel, 1)
}

/// Sobel derivative along rows (axis 0), smoothed along columns.
pub fn sobel_rows(input: &Array2<f32>) -> Array2<f32> {
    let d = convolve_axis(input, &[-1.0, 0.0, 1.0], 0);
    convolve_axis(&d, &[1.0, 2.0, 1.0], 1)
}

/// Sobel derivative along columns (axis 1), smoothed along rows.
pub fn sobel_cols(input: &Array2<f32>) -> Array2<f32> {
    let d = convolve_axis(input, &[-1.0, 0.0, 1.0], 1);
    convolve_axis(&d, &[1.0, 2.0, 1.0], 0)
}

/// Per-pixel gradient magnitude from the two Sobel responses.
pub fn gradient_magnitude(input: &Array2<f32>) -> Array2<f32> {
    let gx = sobel_rows(input);
    let gy = sobel_cols(input);
    let mut out = Array2::zeros(input.dim());
    for ((o, x), y) in out.iter_mut().zip(gx.iter()).zip(gy.iter()) {
        *o = (x * x + y * y).sqrt();
    }
    out
}

/// Five-point Laplacian (sum of second differences along both axes).
pub fn laplacian(input: &Array2<f32>) -> Array2<f32> {
    let second = [1.0, -2.0, 1.0];
    &convolve_axis(input, &second, 0) + &convolve_axis(input, &second, 1)
}

/// Box mean over a square window (separable).
pub fn box_mean(input: &Array2<f32>, size: usize) -> Array2<f32> {
    let kernel = vec![1.0 / size as f32; size];
    let rows = convolve_axis(input, &kernel, 0);
    convolve_axis(&rows, &kernel, 1)
}

/// Arithmetic mean of a plane.
pub fn mean_of(input: &Array2<f32>) -> f32 {
    if input.is_empty() {
        return 0.0;
    }
    input.sum() / input.len() as f32
}

/// Population variance of a plane.
pub fn variance_of(input: &Array2<f32>) -> f32 {
    if input.is_empty() {
        return 0.0;
    }
    let mean = mean_of(input);
    input.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / input.len() as f32
}

/// Population standard deviation of a plane.
pub fn std_of(input: &Array2<f32>) -> f32 {
    variance_of(input).sqrt()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(value: f32) -> Array2<f32> {
        Array2::from_elem((16, 16), value)
    }

    #[test]
    fn test_blur_preserves_flat_plane() {
        let blurred = gaussian_blur(&flat(100.0), 1.0);
        for v in blurred.iter() {
            assert!((v - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_sobel_zero_on_flat_plane() {
        let gx = sobel_rows(&flat(42.0));
        let gy = sobel_cols(&flat(42.0));
        assert!(gx.iter().all(|v| v.abs() < 1e-4));
        assert!(gy.iter().all(|v| v.abs() < 1e-4));
    }

    #[test]
    fn test_sobel_detects_vertical_step() {
        let mut plane = Array2::zeros((8, 8));
        for y in 0..8 {
            for x in 4..8 {
                plane[(y, x)] = 255.0;
            }
        }
        let gy = sobel_cols(&plane);
        // Step between columns 3 and 4 must dominate
        assert!(gy[(4, 4)].abs() > 100.0);
        assert!(gy[(4, 0)].abs() < 1e-4);
    }

    #[test]
    fn test_laplacian_zero_on_linear_ramp() {
        let mut ramp = Array2::zeros((12, 12));
        for y in 0..12 {
            for x in 0..12 {
                ramp[(y, x)] = x as f32;
            }
        }
        let lap = laplacian(&ramp);
        // Second derivative of a ramp vanishes away from the borders
        for y in 2..10 {
            for x in 2..10 {
                assert!(lap[(y, x)].abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_box_mean_of_flat_plane() {
        let mean = box_mean(&flat(7.0), 8);
        for v in mean.iter() {
            assert!((v - 7.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_stats() {
        let plane = flat(3.0);
        assert!((mean_of(&plane) - 3.0).abs() < 1e-6);
        assert!(variance_of(&plane).abs() < 1e-6);
        assert!(std_of(&plane).abs() < 1e-6);
    }
}
