//! Seeded synthetic image set

use super::InMemoryDataset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Labelled images where class `c` lights up the `c`-th horizontal band.
///
/// Labels cycle through the classes so every class is present once
/// `samples >= num_classes`. Pixel noise is drawn from `seed`.
///
/// # Panics
///
/// Panics if `num_classes` is zero or exceeds the image height.
pub fn synthetic_dataset(
    samples: usize,
    num_classes: usize,
    shape: (usize, usize, usize),
    seed: u64,
) -> InMemoryDataset {
    let (channels, height, width) = shape;
    assert!(
        num_classes > 0 && num_classes <= height,
        "Need 1..={height} classes for a {height}-row image"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pixels = Vec::with_capacity(samples * channels * height * width);
    let mut labels = Vec::with_capacity(samples);

    for i in 0..samples {
        let label = i % num_classes;
        let band = label * height / num_classes..(label + 1) * height / num_classes;
        for _ in 0..channels {
            for row in 0..height {
                let base: u8 = if band.contains(&row) { 200 } else { 30 };
                for _ in 0..width {
                    pixels.push(base.saturating_add(rng.random_range(0..40)));
                }
            }
        }
        labels.push(label);
    }

    InMemoryDataset::new(pixels, labels, shape, num_classes)
}
