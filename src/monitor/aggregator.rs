use crate::error::Result;
use crate::monitor::sample::Sample;
use indexmap::IndexMap;
use tracing::debug;

/// Running totals for one core.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoreAccumulator {
    pub util_sum: f64,
    pub samples: u64,
}

impl CoreAccumulator {
    pub fn add(&mut self, util: f64) {
        self.util_sum += util;
        self.samples += 1;
    }

    /// Average utilization, `None` when nothing was recorded.
    pub fn average(&self) -> Option<f64> {
        if self.samples != 0 {
            Some(self.util_sum / self.samples as f64)
        } else {
            None
        }
    }
}

/// Per-core utilization accumulator, keyed in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    cores: IndexMap<i64, CoreAccumulator>,
    total_samples: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: Sample) {
        let util = sample.utilization();
        self.cores.entry(sample.core).or_default().add(util);
        self.total_samples += 1;
    }

    /// Fold a fallible sample stream, stopping at the first error.
    pub fn consume<I>(&mut self, samples: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Sample>>,
    {
        for sample in samples {
            self.record(sample?);
        }
        debug!(
            cores = self.cores.len(),
            samples = self.total_samples,
            "aggregated samples"
        );
        Ok(())
    }

    pub fn cores(&self) -> &IndexMap<i64, CoreAccumulator> {
        &self.cores
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    pub fn into_cores(self) -> IndexMap<i64, CoreAccumulator> {
        self.cores
    }
}

impl FromIterator<Sample> for Aggregator {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        let mut aggregator = Aggregator::new();
        for sample in iter {
            aggregator.record(sample);
        }
        aggregator
    }
}
