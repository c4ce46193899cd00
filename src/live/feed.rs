//! Fixed-capacity sample buffer behind the scrolling real-time chart.

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use super::TickState;

/// Samples kept on screen.
pub const DEFAULT_FEED_CAPACITY: usize = 20;

/// Token value range of one sample, `[lo, hi)`.
pub const SAMPLE_RANGE: std::ops::Range<u64> = 400..700;

/// One point of the real-time chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedSample {
    pub time: u64,
    pub tokens: u64,
}

/// FIFO buffer that always holds exactly `capacity` samples.
///
/// The buffer is filled at construction with samples `time = 0..capacity`;
/// every tick evicts the oldest sample and appends one with
/// `time = newest.time + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollingFeed {
    capacity: usize,
    samples: VecDeque<FeedSample>,
    /// Samples the buffer starts from; restored by `reset`.
    #[serde(skip)]
    seeded: VecDeque<FeedSample>,
}

impl RollingFeed {
    /// A feed pre-filled with `capacity` random samples. A zero capacity is
    /// raised to 1.
    pub fn new<R: Rng + ?Sized>(capacity: usize, rng: &mut R) -> Self {
        let capacity = capacity.max(1);
        let samples: VecDeque<FeedSample> = (0..capacity as u64)
            .map(|time| FeedSample { time, tokens: rng.gen_range(SAMPLE_RANGE) })
            .collect();
        Self { capacity, seeded: samples.clone(), samples }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &FeedSample> + '_ {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&FeedSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&FeedSample> {
        self.samples.front()
    }

    /// Evict the oldest sample and append a fresh one. Returns the new sample.
    pub fn push_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FeedSample {
        let time = self.samples.back().map_or(0, |s| s.time + 1);
        let sample = FeedSample { time, tokens: rng.gen_range(SAMPLE_RANGE) };
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        sample
    }
}

impl TickState for RollingFeed {
    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.push_next(rng);
    }

    fn reset(&mut self) {
        self.samples = self.seeded.clone();
    }
}
