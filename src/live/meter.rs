//! Running token counter behind the "Live Token Meter" card.

use rand::Rng;
use serde::Serialize;

use super::TickState;

/// Starting value of the meter.
pub const DEFAULT_METER_SEED: u64 = 1_847_293;

/// Per-tick increment range, `[lo, hi)`.
pub const INCREMENT_RANGE: std::ops::Range<u64> = 15..45;

/// A monotonically increasing token count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMeter {
    initial: u64,
    count: u64,
    ticks: u64,
    /// Increment applied by the most recent tick, 0 before the first.
    last_increment: u64,
}

impl TokenMeter {
    pub fn new(initial: u64) -> Self {
        Self { initial, count: initial, ticks: 0, last_increment: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn initial(&self) -> u64 {
        self.initial
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_increment(&self) -> u64 {
        self.last_increment
    }

    /// Add one increment and return it.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        let inc = rng.gen_range(INCREMENT_RANGE);
        self.count = self.count.saturating_add(inc);
        self.ticks += 1;
        self.last_increment = inc;
        inc
    }
}

impl Default for TokenMeter {
    fn default() -> Self {
        Self::new(DEFAULT_METER_SEED)
    }
}

impl TickState for TokenMeter {
    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.advance(rng);
    }

    fn reset(&mut self) {
        *self = Self::new(self.initial);
    }
}
