//! Data loader configuration

/// Batching, shuffling and worker settings for a [`DataLoader`](super::DataLoader)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    batch_size: usize,
    shuffle: bool,
    num_workers: usize,
    prefetch: usize,
    seed: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 128, shuffle: true, num_workers: 4, prefetch: 2, seed: 100 }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "Batch size must be positive");
        self.batch_size = batch_size;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Worker threads; zero builds batches on the calling thread
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Batches each worker may build ahead of the consumer
    pub fn with_prefetch(mut self, prefetch: usize) -> Self {
        self.prefetch = prefetch.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn prefetch(&self) -> usize {
        self.prefetch
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.batch_size(), 128);
        assert!(config.shuffle());
        assert_eq!(config.num_workers(), 4);
        assert_eq!(config.seed(), 100);
    }

    #[test]
    fn test_builder() {
        let config = LoaderConfig::new()
            .with_batch_size(8)
            .with_shuffle(false)
            .with_num_workers(0)
            .with_prefetch(0)
            .with_seed(7);
        assert_eq!(config.batch_size(), 8);
        assert!(!config.shuffle());
        assert_eq!(config.num_workers(), 0);
        assert_eq!(config.prefetch(), 1);
        assert_eq!(config.seed(), 7);
    }

    #[test]
    #[should_panic(expected = "Batch size must be positive")]
    fn test_zero_batch_size_panics() {
        LoaderConfig::new().with_batch_size(0);
    }
}
