//! Image augmentations
//!
//! Transforms take ownership of a `(C, H, W)` image in `[0, 1]` and return
//! the transformed image. Randomness comes from the caller's RNG so a
//! batch can be rebuilt exactly from its seed.

use ndarray::{s, Array1, Array3, Axis};
use rand::rngs::StdRng;
use rand::Rng;

/// Per-image transformation
pub trait Transform: Send + Sync {
    fn apply(&self, image: Array3<f32>, rng: &mut StdRng) -> Array3<f32>;
}

/// Zero-pad every side by `padding`, then crop back to the original size
/// at a random offset.
#[derive(Debug, Clone, Copy)]
pub struct RandomCrop {
    pub padding: usize,
}

impl Transform for RandomCrop {
    fn apply(&self, image: Array3<f32>, rng: &mut StdRng) -> Array3<f32> {
        if self.padding == 0 {
            return image;
        }
        let (c, h, w) = image.dim();
        let p = self.padding;
        let mut padded = Array3::<f32>::zeros((c, h + 2 * p, w + 2 * p));
        padded.slice_mut(s![.., p..p + h, p..p + w]).assign(&image);

        let top = rng.random_range(0..=2 * p);
        let left = rng.random_range(0..=2 * p);
        padded.slice(s![.., top..top + h, left..left + w]).to_owned()
    }
}

/// Mirror left-right with probability `p`
#[derive(Debug, Clone, Copy)]
pub struct RandomHorizontalFlip {
    pub p: f32,
}

impl Transform for RandomHorizontalFlip {
    fn apply(&self, image: Array3<f32>, rng: &mut StdRng) -> Array3<f32> {
        if rng.random::<f32>() < self.p {
            image.slice(s![.., .., ..;-1]).to_owned()
        } else {
            image
        }
    }
}

/// Luma (ITU-R 601) replicated over `output_channels`
#[derive(Debug, Clone, Copy)]
pub struct Grayscale {
    pub output_channels: usize,
}

impl Grayscale {
    const WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
}

impl Transform for Grayscale {
    fn apply(&self, image: Array3<f32>, _rng: &mut StdRng) -> Array3<f32> {
        let (c, h, w) = image.dim();
        let luma = if c == 3 {
            let mut acc = image.index_axis(Axis(0), 0).to_owned() * Self::WEIGHTS[0];
            acc.scaled_add(Self::WEIGHTS[1], &image.index_axis(Axis(0), 1));
            acc.scaled_add(Self::WEIGHTS[2], &image.index_axis(Axis(0), 2));
            acc
        } else {
            image.index_axis(Axis(0), 0).to_owned()
        };

        let mut out = Array3::<f32>::zeros((self.output_channels, h, w));
        for mut channel in out.outer_iter_mut() {
            channel.assign(&luma);
        }
        out
    }
}

/// Gaussian blur with a standard deviation drawn uniformly from
/// `[0, max_sigma)` per image. Borders use reflect padding.
#[derive(Debug, Clone, Copy)]
pub struct RandomBlur {
    pub kernel_size: usize,
    pub max_sigma: f32,
}

impl RandomBlur {
    /// # Panics
    ///
    /// Panics if `kernel_size` is even or `max_sigma` is negative.
    pub fn new(kernel_size: usize, max_sigma: f32) -> Self {
        assert!(kernel_size % 2 == 1, "Kernel size must be odd, got {kernel_size}");
        assert!(max_sigma >= 0.0, "Blur SD must be non-negative, got {max_sigma}");
        Self { kernel_size, max_sigma }
    }

    /// Blur `image` with a fixed `sigma`; `sigma <= 0` is the identity
    pub fn blur(&self, image: Array3<f32>, sigma: f32) -> Array3<f32> {
        if sigma <= 0.0 {
            return image;
        }
        let kernel = gaussian_kernel(self.kernel_size, sigma);
        let rows = convolve_axis(&image, &kernel, Axis(1));
        convolve_axis(&rows, &kernel, Axis(2))
    }
}

impl Transform for RandomBlur {
    fn apply(&self, image: Array3<f32>, rng: &mut StdRng) -> Array3<f32> {
        let sigma = rng.random::<f32>() * self.max_sigma;
        self.blur(image, sigma)
    }
}

fn gaussian_kernel(size: usize, sigma: f32) -> Array1<f32> {
    let radius = (size / 2) as f32;
    let kernel = Array1::from_iter(
        (0..size).map(|i| (-(i as f32 - radius).powi(2) / (2.0 * sigma * sigma)).exp()),
    );
    let total = kernel.sum();
    kernel / total
}

/// Mirror an out-of-range index back into `0..n` without repeating the edge
fn reflect(mut i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let last = n as isize - 1;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

fn convolve_axis(image: &Array3<f32>, kernel: &Array1<f32>, axis: Axis) -> Array3<f32> {
    let n = image.len_of(axis);
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array3::<f32>::zeros(image.dim());
    for ((c, y, x), value) in out.indexed_iter_mut() {
        let mut acc = 0.0;
        for (k, weight) in kernel.iter().enumerate() {
            let offset = k as isize - radius;
            let src = if axis == Axis(1) {
                image[[c, reflect(y as isize + offset, n), x]]
            } else {
                image[[c, y, reflect(x as isize + offset, n)]]
            };
            acc += weight * src;
        }
        *value = acc;
    }
    out
}

/// Ordered chain of transforms
#[derive(Default)]
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to the chain
    pub fn then(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Transform for Compose {
    fn apply(&self, image: Array3<f32>, rng: &mut StdRng) -> Array3<f32> {
        self.transforms.iter().fold(image, |img, t| t.apply(img, rng))
    }
}

/// Training chain: crop, flip, grayscale, random blur
pub fn train_transforms(blur_std: f32) -> Compose {
    Compose::new()
        .then(RandomCrop { padding: 4 })
        .then(RandomHorizontalFlip { p: 0.5 })
        .then(Grayscale { output_channels: 3 })
        .then(RandomBlur::new(7, blur_std))
}

/// Held-out chain: grayscale, random blur
pub fn test_transforms(blur_std: f32) -> Compose {
    Compose::new()
        .then(Grayscale { output_channels: 3 })
        .then(RandomBlur::new(7, blur_std))
}
