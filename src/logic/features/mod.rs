//! Features Module - Forensic Feature Extraction
//!
//! One file per feature category; `extract` ties them together over a
//! single decoded raster. Adding a category means touching `layout.rs`
//! first (see the versioning rules there).

pub mod color;
pub mod compression;
pub mod edges;
pub mod extract;
pub mod filters;
pub mod layout;
pub mod noise;
pub mod raster;
pub mod texture;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use extract::extract;
pub use layout::{feature_index, feature_name, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use raster::ExtractError;
pub use vector::FeatureVector;

#[cfg(test)]
pub(crate) mod test_support {
    //! Deterministic sample builders shared by feature tests.

    use std::io::Cursor;

    use image::{DynamicImage, Rgb, RgbImage};

    use crate::logic::sample::MediaSample;

    pub fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    /// Pseudo-random texture from a fixed linear congruential generator,
    /// so tests stay deterministic without pulling in a rand dependency.
    pub fn noisy_image(width: u32, height: u32, seed: u32) -> RgbImage {
        let mut state = seed.wrapping_mul(2891336453).wrapping_add(1);
        let mut next = move || {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8
        };
        RgbImage::from_fn(width, height, |_, _| Rgb([next(), next(), next()]))
    }

    pub fn png_sample(img: RgbImage) -> MediaSample {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .expect("encode test png");
        MediaSample::new(buf.into_inner(), "image/png", "test.png")
    }
}
