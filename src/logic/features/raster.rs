//! Raster Decoding
//!
//! Turns sample bytes into the working planes the extractors consume:
//! three RGB channel planes plus a luminosity grayscale, downscaled to a
//! bounding box for consistent processing. Decoding is the only side
//! effect in the extraction pipeline.

use image::{imageops::FilterType, ImageFormat};
use ndarray::Array2;

use crate::constants::MAX_RASTER_DIM;
use crate::logic::sample::MediaSample;

/// Image formats the local pipeline decodes.
///
/// `video/*` samples are outside this set: they are still valid input for
/// the external verification path, but local analysis reports them as
/// unsupported rather than sampling frames.
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

/// Decoded working raster. All planes share dimensions (rows, cols).
pub struct Raster {
    /// Luminosity grayscale, values in 0..=255
    pub gray: Array2<f32>,
    /// R, G, B channel planes, values in 0..=255
    pub channels: [Array2<f32>; 3],
}

impl Raster {
    pub fn height(&self) -> usize {
        self.gray.nrows()
    }

    pub fn width(&self) -> usize {
        self.gray.ncols()
    }
}

/// Local pipeline failure: the sample never becomes a raster.
#[derive(Debug, Clone)]
pub enum ExtractError {
    /// Bytes cannot be decoded as an image frame
    Decode(String),
    /// Format outside the locally accepted set (includes all video)
    UnsupportedFormat(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(detail) => write!(f, "Decode error: {}", detail),
            Self::UnsupportedFormat(detail) => write!(f, "Unsupported format: {}", detail),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Decode a sample into the working raster.
///
/// Deterministic for identical bytes. Larger images are downscaled into a
/// `MAX_RASTER_DIM` bounding box with Lanczos resampling, preserving
/// aspect ratio.
pub fn decode(sample: &MediaSample) -> Result<Raster, ExtractError> {
    if sample.is_video() {
        return Err(ExtractError::UnsupportedFormat(format!(
            "{}: video decoding is handled by the external service only",
            sample.mime_type
        )));
    }

    let format = image::guess_format(&sample.bytes)
        .map_err(|e| ExtractError::Decode(format!("unrecognized image container: {}", e)))?;

    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(ExtractError::UnsupportedFormat(format!("{:?}", format)));
    }

    let mut img = image::load_from_memory(&sample.bytes)
        .map_err(|e| ExtractError::Decode(e.to_string()))?;

    if img.width() > MAX_RASTER_DIM || img.height() > MAX_RASTER_DIM {
        img = img.resize(MAX_RASTER_DIM, MAX_RASTER_DIM, FilterType::Lanczos3);
    }

    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    if width == 0 || height == 0 {
        return Err(ExtractError::Decode("empty raster".to_string()));
    }

    let mut r = Array2::zeros((height, width));
    let mut g = Array2::zeros((height, width));
    let mut b = Array2::zeros((height, width));
    let mut gray = Array2::zeros((height, width));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (yy, xx) = (y as usize, x as usize);
        let [pr, pg, pb] = pixel.0;
        r[(yy, xx)] = pr as f32;
        g[(yy, xx)] = pg as f32;
        b[(yy, xx)] = pb as f32;
        // Standard luminosity formula
        gray[(yy, xx)] = 0.2989 * pr as f32 + 0.5870 * pg as f32 + 0.1140 * pb as f32;
    }

    Ok(Raster {
        gray,
        channels: [r, g, b],
    })
}

// ============================================================================
// TESTS
// ============================================================================
