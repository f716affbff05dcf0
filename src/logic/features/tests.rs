//! Cross-category feature tests: range and determinism contracts over
//! whole encoded samples.

use super::test_support::{noisy_image, png_sample, solid_image};
use super::{extract, FEATURE_COUNT};

#[test]
fn test_all_features_in_unit_range() {
    let samples = [
        png_sample(solid_image(64, 64, [128, 128, 128])),
        png_sample(solid_image(300, 200, [255, 0, 0])),
        png_sample(noisy_image(64, 64, 7)),
        png_sample(noisy_image(200, 120, 1234)),
    ];

    for sample in &samples {
        let vector = extract(sample).expect("extract");
        assert_eq!(vector.values.len(), FEATURE_COUNT);
        assert!(
            vector.in_range(),
            "out-of-range feature in {:?}",
            vector.values
        );
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let sample = png_sample(noisy_image(96, 96, 42));

    let first = extract(&sample).expect("extract");
    let second = extract(&sample).expect("extract");

    assert_eq!(first, second);
}

#[test]
fn test_identical_bytes_different_name_same_vector() {
    let a = png_sample(noisy_image(48, 48, 9));
    let mut b = a.clone();
    b.filename = "renamed.png".to_string();

    assert_eq!(extract(&a).unwrap(), extract(&b).unwrap());
}

#[test]
fn test_noisy_and_solid_samples_differ() {
    let solid = extract(&png_sample(solid_image(64, 64, [90, 90, 90]))).unwrap();
    let noisy = extract(&png_sample(noisy_image(64, 64, 5))).unwrap();

    // Noise level separates the two regimes
    let solid_noise = solid.get_by_name("noise_pattern").unwrap();
    let noisy_noise = noisy.get_by_name("noise_pattern").unwrap();
    assert!(noisy_noise > solid_noise + 0.2);

    // And a solid frame is maximally uniform
    assert!(solid.get_by_name("texture_uniformity").unwrap() > 0.99);
}
