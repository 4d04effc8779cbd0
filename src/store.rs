//! Per-target sample retention
//!
//! The store is a ring buffer sized so that it holds exactly enough samples to
//! cover the longest configured timeframe. Once full, every append evicts the
//! oldest sample.

use std::collections::VecDeque;
use std::time::Duration;

use crate::sample::Sample;

/// Fixed-capacity ring buffer of samples
#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleStore {
    /// Create a store with an explicit capacity (at least one sample)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a store able to cover `retention` worth of samples taken every
    /// `sampling_interval`
    pub fn for_retention(retention: Duration, sampling_interval: Duration) -> Self {
        Self::with_capacity(samples_in(retention, sampling_interval))
    }

    /// Append a sample, evicting the oldest one if the store is full
    pub fn append(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The most recent `n` samples (or fewer), oldest first
    pub fn window(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.range(skip..).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Number of samples taken every `interval` that fit in `span` (at least one)
pub fn samples_in(span: Duration, interval: Duration) -> usize {
    if interval.is_zero() {
        return 1;
    }
    ((span.as_nanos() / interval.as_nanos()) as usize).max(1)
}
