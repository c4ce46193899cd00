//! # Module: live
//!
//! ## Responsibility
//! Simulates real-time token flow independently of user input: a running
//! token meter (one tick per second) and a fixed-length scrolling sample feed
//! (one tick every two seconds).
//!
//! ## Guarantees
//! - Single timer per ticker: starting a running ticker is a no-op
//! - Bounded: the feed always holds exactly its capacity of samples
//! - Deterministic teardown: after `stop` (or drop) no further mutation
//!
//! ## NOT Responsible For
//! - Rendering (see [`crate::report`])
//! - Any link to the generated dataset; the live figures are independent

pub mod feed;
pub mod meter;
pub mod ticker;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use feed::{FeedSample, RollingFeed};
pub use meter::TokenMeter;
pub use ticker::Ticker;

use crate::config::LiveSettings;
use crate::error::Result;

/// State advanced by a [`Ticker`].
pub trait TickState: Clone + Send + Sync + 'static {
    /// Apply one tick.
    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Return to the initial state.
    fn reset(&mut self);
}

/// Seed offset so the feed never replays the meter's draws.
const FEED_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// The two live widgets of the dashboard, owned by whichever view shows them.
///
/// Both timers stop when the board is dropped.
#[derive(Debug)]
pub struct LiveBoard {
    pub meter: Ticker<TokenMeter>,
    pub feed: Ticker<RollingFeed>,
}

impl LiveBoard {
    /// Build a stopped board from settings.
    pub fn new(settings: &LiveSettings, seed: u64) -> Self {
        let feed_seed = seed ^ FEED_SEED_SALT;
        let mut init_rng = StdRng::seed_from_u64(feed_seed);
        let feed = RollingFeed::new(settings.feed_capacity, &mut init_rng);
        Self {
            meter: Ticker::new(
                "token_meter",
                TokenMeter::new(settings.meter_seed),
                settings.meter_interval(),
                seed,
            ),
            feed: Ticker::new("realtime_feed", feed, settings.feed_interval(), feed_seed.rotate_left(17)),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        self.meter.start()?;
        self.feed.start()
    }

    pub fn stop(&mut self) {
        self.meter.stop();
        self.feed.stop();
    }

    pub fn reset(&self) {
        self.meter.reset();
        self.feed.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_board_from_default_settings() {
        let board = LiveBoard::new(&LiveSettings::default(), 1);
        assert_eq!(board.meter.snapshot().count(), meter::DEFAULT_METER_SEED);
        assert_eq!(board.feed.snapshot().len(), feed::DEFAULT_FEED_CAPACITY);
        assert_eq!(board.meter.period(), Duration::from_millis(1_000));
        assert_eq!(board.feed.period(), Duration::from_millis(2_000));
        assert!(!board.meter.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_board_timers_run_independently() {
        let mut board = LiveBoard::new(&LiveSettings::default(), 1);
        board.start().unwrap();
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        assert_eq!(board.meter.snapshot().ticks(), 4);
        assert_eq!(board.feed.snapshot().latest().unwrap().time, 19 + 2);
        board.stop();
        assert!(!board.meter.is_running());
        assert!(!board.feed.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_board_reset_restores_both() {
        let mut board = LiveBoard::new(&LiveSettings::default(), 5);
        let feed_before = board.feed.snapshot();
        board.start().unwrap();
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        board.reset();
        assert_eq!(board.meter.snapshot().ticks(), 0);
        assert_eq!(board.feed.snapshot(), feed_before);
    }
}
