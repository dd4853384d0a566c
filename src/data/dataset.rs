//! Dataset trait and in-memory storage

use ndarray::Array3;

/// Indexed collection of labelled images
pub trait Dataset: Send + Sync {
    /// Number of samples
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Image `(C, H, W)` scaled to `[0, 1]` and its label
    fn get(&self, index: usize) -> (Array3<f32>, usize);

    fn num_classes(&self) -> usize;
}

/// Dataset held as raw 8-bit pixels, channel-major per image
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    pixels: Vec<u8>,
    labels: Vec<usize>,
    shape: (usize, usize, usize),
    num_classes: usize,
}

impl InMemoryDataset {
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly one `shape`-sized image per
    /// label, or a label is out of range.
    pub fn new(
        pixels: Vec<u8>,
        labels: Vec<usize>,
        shape: (usize, usize, usize),
        num_classes: usize,
    ) -> Self {
        let (c, h, w) = shape;
        assert_eq!(pixels.len(), labels.len() * c * h * w, "Pixel buffer size mismatch");
        assert!(
            labels.iter().all(|&l| l < num_classes),
            "Labels must be in [0, {num_classes})"
        );
        Self { pixels, labels, shape, num_classes }
    }

    /// Image shape `(C, H, W)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.shape
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    fn image_len(&self) -> usize {
        self.shape.0 * self.shape.1 * self.shape.2
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn get(&self, index: usize) -> (Array3<f32>, usize) {
        let len = self.image_len();
        let raw = &self.pixels[index * len..(index + 1) * len];
        let image = Array3::from_shape_vec(
            self.shape,
            raw.iter().map(|&p| f32::from(p) / 255.0).collect(),
        )
        .expect("image slice matches shape");
        (image, self.labels[index])
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }
}
