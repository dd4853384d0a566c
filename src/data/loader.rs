//! Shuffling, augmenting batch loader

use super::iter::{BatchIter, BatchPlan};
use super::{Compose, Dataset, LoaderConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// Iterates a dataset in batches, once per epoch.
///
/// The sample order of epoch `e` and the augmentation randomness of each
/// batch depend only on the seed, the epoch and the batch index, so the
/// output is the same for any worker count.
#[derive(Clone)]
pub struct DataLoader {
    dataset: Arc<dyn Dataset>,
    transform: Arc<Compose>,
    config: LoaderConfig,
}

impl DataLoader {
    pub fn new(dataset: Arc<dyn Dataset>, transform: Compose, config: LoaderConfig) -> Self {
        Self { dataset, transform: Arc::new(transform), config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Number of batches per epoch; the last one may be short
    pub fn len(&self) -> usize {
        self.dataset.len().div_ceil(self.config.batch_size())
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn num_samples(&self) -> usize {
        self.dataset.len()
    }

    pub fn num_classes(&self) -> usize {
        self.dataset.num_classes()
    }

    /// Sample order for `epoch`
    pub fn epoch_order(&self, epoch: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.config.shuffle() {
            let mut rng = StdRng::seed_from_u64(mix_seed(self.config.seed(), epoch as u64, u64::MAX));
            order.shuffle(&mut rng);
        }
        order
    }

    /// Batches of `epoch`, in order
    pub fn iter_epoch(&self, epoch: usize) -> BatchIter {
        let plan = BatchPlan {
            dataset: Arc::clone(&self.dataset),
            transform: Arc::clone(&self.transform),
            order: Arc::new(self.epoch_order(epoch)),
            batch_size: self.config.batch_size(),
            seed: mix_seed(self.config.seed(), epoch as u64, 0),
        };
        BatchIter::new(plan, self.config.num_workers(), self.config.prefetch())
    }
}

/// Derive a stream seed from `(seed, a, b)`
pub(crate) fn mix_seed(seed: u64, a: u64, b: u64) -> u64 {
    let mut z = seed
        ^ a.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ b.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{synthetic_dataset, test_transforms, train_transforms, Batch};

    fn loader(samples: usize, batch: usize, workers: usize) -> DataLoader {
        let ds = synthetic_dataset(samples, 2, (3, 8, 8), 4);
        DataLoader::new(
            Arc::new(ds),
            train_transforms(0.9),
            LoaderConfig::new().with_batch_size(batch).with_num_workers(workers).with_seed(11),
        )
    }

    #[test]
    fn test_batch_count_and_sizes() {
        let loader = loader(10, 4, 0);
        assert_eq!(loader.len(), 3);
        let sizes: Vec<usize> = loader.iter_epoch(0).map(|b| b.size()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_every_sample_once_per_epoch() {
        let loader = loader(10, 3, 0);
        let mut order = loader.epoch_order(2);
        order.sort_unstable();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_epochs_shuffle_differently() {
        let loader = loader(64, 8, 0);
        assert_ne!(loader.epoch_order(0), loader.epoch_order(1));
        assert_eq!(loader.epoch_order(3), loader.epoch_order(3));
    }

    #[test]
    fn test_no_shuffle_keeps_order() {
        let ds = synthetic_dataset(5, 2, (1, 4, 4), 0);
        let loader = DataLoader::new(
            Arc::new(ds),
            test_transforms(0.0),
            LoaderConfig::new().with_shuffle(false).with_batch_size(2).with_num_workers(0),
        );
        let labels: Vec<usize> = loader.iter_epoch(0).flat_map(|b| b.labels).collect();
        assert_eq!(labels, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_workers_match_inline() {
        let inline: Vec<Batch> = loader(21, 4, 0).iter_epoch(1).collect();
        let pooled: Vec<Batch> = loader(21, 4, 3).iter_epoch(1).collect();
        assert_eq!(inline.len(), 6);
        assert_eq!(inline, pooled);
    }

    #[test]
    fn test_dropping_iterator_early_stops_workers() {
        let loader = loader(40, 2, 2);
        let mut it = loader.iter_epoch(0);
        assert!(it.next().is_some());
        drop(it);
    }

    /// Dataset with one unreadable record
    struct BrokenRecord {
        inner: crate::data::InMemoryDataset,
        broken: usize,
    }

    impl Dataset for BrokenRecord {
        fn len(&self) -> usize {
            self.inner.len()
        }

        fn get(&self, idx: usize) -> (ndarray::Array3<f32>, usize) {
            assert_ne!(idx, self.broken, "corrupt record {idx}");
            self.inner.get(idx)
        }

        fn num_classes(&self) -> usize {
            self.inner.num_classes()
        }
    }

    fn broken_loader(workers: usize) -> DataLoader {
        let ds = BrokenRecord { inner: synthetic_dataset(8, 2, (1, 4, 4), 0), broken: 5 };
        DataLoader::new(
            Arc::new(ds),
            test_transforms(0.0),
            LoaderConfig::new().with_shuffle(false).with_batch_size(2).with_num_workers(workers),
        )
    }

    #[test]
    #[should_panic(expected = "corrupt record 5")]
    fn test_worker_panic_reaches_consumer() {
        let loader = broken_loader(2);
        let batches = loader.iter_epoch(0).count();
        unreachable!("epoch ended after {batches} batches");
    }

    #[test]
    #[should_panic(expected = "corrupt record 5")]
    fn test_inline_panic_reaches_consumer() {
        broken_loader(0).iter_epoch(0).for_each(drop);
    }

    #[test]
    fn test_mix_seed_separates_streams() {
        assert_ne!(mix_seed(1, 0, 0), mix_seed(1, 1, 0));
        assert_ne!(mix_seed(1, 0, 1), mix_seed(1, 1, 0));
        assert_eq!(mix_seed(5, 2, 3), mix_seed(5, 2, 3));
    }
}
