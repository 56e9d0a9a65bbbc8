// File: src/loader.rs
use crate::core::reader::GntReader;
use crate::core::types::Sample;
use crate::sampling::SubsetRandomSampler;

/// Batching options. Carried as-is; only `batch_size` and `drop_last`
/// affect this loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub batch_size: usize,
    pub drop_last: bool,
    pub num_workers: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 1, drop_last: false, num_workers: 0 }
    }
}

/// Groups samples drawn by a sampler into batches, one pass per `iter` call.
pub struct DataLoader<'a> {
    dataset: &'a GntReader,
    sampler: SubsetRandomSampler,
    config: LoaderConfig,
}

impl<'a> DataLoader<'a> {
    pub fn new(dataset: &'a GntReader, sampler: SubsetRandomSampler, config: LoaderConfig) -> Self {
        Self { dataset, sampler, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn sampler(&self) -> &SubsetRandomSampler {
        &self.sampler
    }

    /// Number of batches one pass yields.
    pub fn num_batches(&self) -> usize {
        let batch = self.config.batch_size.max(1);
        if self.config.drop_last {
            self.sampler.len() / batch
        } else {
            (self.sampler.len() + batch - 1) / batch
        }
    }

    pub fn iter(&self) -> Batches<'_> {
        Batches {
            dataset: self.dataset,
            order: self.sampler.iter_thread_rng(),
            batch_size: self.config.batch_size.max(1),
            drop_last: self.config.drop_last,
        }
    }
}

pub struct Batches<'a> {
    dataset: &'a GntReader,
    order: std::vec::IntoIter<usize>,
    batch_size: usize,
    drop_last: bool,
}

impl Iterator for Batches<'_> {
    type Item = Vec<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        // Sampler indices come from the same dataset, so `get` only misses
        // if the sampler was built for another one.
        let batch: Vec<Sample> = self
            .order
            .by_ref()
            .take(self.batch_size)
            .filter_map(|i| self.dataset.get(i))
            .collect();
        if batch.is_empty() || (self.drop_last && batch.len() < self.batch_size) {
            return None;
        }
        Some(batch)
    }
}
