//! Epoch batch iterator with an optional worker pool

use super::{Batch, Compose, Dataset, Transform};
use super::loader::mix_seed;
use ndarray::{s, Array4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::panic;
use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Everything needed to build any batch of one epoch
#[derive(Clone)]
pub(crate) struct BatchPlan {
    pub(crate) dataset: Arc<dyn Dataset>,
    pub(crate) transform: Arc<Compose>,
    pub(crate) order: Arc<Vec<usize>>,
    pub(crate) batch_size: usize,
    pub(crate) seed: u64,
}

impl BatchPlan {
    fn len(&self) -> usize {
        self.order.len().div_ceil(self.batch_size)
    }

    /// Load, augment and stack batch `index`
    fn build(&self, index: usize) -> Batch {
        let start = index * self.batch_size;
        let end = (start + self.batch_size).min(self.order.len());
        let mut rng = StdRng::seed_from_u64(mix_seed(self.seed, index as u64, 1));

        let mut images: Option<Array4<f32>> = None;
        let mut labels = Vec::with_capacity(end - start);
        for (row, &sample) in self.order[start..end].iter().enumerate() {
            let (image, label) = self.dataset.get(sample);
            let image = self.transform.apply(image, &mut rng);
            let (c, h, w) = image.dim();
            let batch = images.get_or_insert_with(|| Array4::zeros((end - start, c, h, w)));
            batch.slice_mut(s![row, .., .., ..]).assign(&image);
            labels.push(label);
        }
        Batch::new(images.unwrap_or_else(|| Array4::zeros((0, 0, 0, 0))), labels)
    }
}

struct Worker {
    receiver: Receiver<Batch>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Wait for a worker whose channel closed before its last batch and
    /// re-raise its panic on the consuming thread.
    fn rethrow(&mut self) -> ! {
        match self.handle.take().map(JoinHandle::join) {
            Some(Err(payload)) => panic::resume_unwind(payload),
            _ => panic!("Loader worker stopped before finishing its batches"),
        }
    }
}

/// Batches of one epoch in shuffled order.
///
/// With workers, worker `w` builds batches `w, w + n, ...` into its own
/// bounded channel and the iterator reads the channels round-robin. A
/// worker panic is re-raised by the call that would have returned its batch,
/// or by `drop` if the batch is never requested.
pub struct BatchIter {
    plan: BatchPlan,
    next: usize,
    workers: Vec<Worker>,
}

impl BatchIter {
    pub(crate) fn new(plan: BatchPlan, num_workers: usize, prefetch: usize) -> Self {
        let total = plan.len();
        let workers = (0..num_workers.min(total))
            .map(|w| {
                let (sender, receiver) = sync_channel(prefetch);
                let plan = plan.clone();
                let stride = num_workers.min(total);
                let handle = thread::spawn(move || {
                    for index in (w..total).step_by(stride) {
                        if sender.send(plan.build(index)).is_err() {
                            break;
                        }
                    }
                });
                Worker { receiver, handle: Some(handle) }
            })
            .collect();
        Self { plan, next: 0, workers }
    }
}

impl Iterator for BatchIter {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.next >= self.plan.len() {
            return None;
        }
        let batch = if self.workers.is_empty() {
            Some(self.plan.build(self.next))
        } else {
            let slot = self.next % self.workers.len();
            let worker = &mut self.workers[slot];
            match worker.receiver.recv() {
                Ok(batch) => Some(batch),
                Err(_) => worker.rethrow(),
            }
        };
        self.next += 1;
        batch
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BatchIter {}

impl Drop for BatchIter {
    fn drop(&mut self) {
        // Closing the receivers unblocks any worker waiting on a full channel
        let handles: Vec<JoinHandle<()>> = self.workers.drain(..).filter_map(|w| w.handle).collect();
        for handle in handles {
            if let Err(payload) = handle.join() {
                if !thread::panicking() {
                    panic::resume_unwind(payload);
                }
            }
        }
    }
}
