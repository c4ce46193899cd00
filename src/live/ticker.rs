//! Scoped periodic timer driving a [`TickState`].
//!
//! A [`Ticker`] owns at most one tokio task. `start`, `stop` and `reset` are
//! independent operations:
//!
//! - `start` spawns the task unless one is already running
//! - `stop` cancels it; once `stop` returns the state is never mutated again
//!   by that task
//! - `reset` restores the state's initial value without touching the timer
//!
//! Dropping the ticker is equivalent to `stop`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::TickState;
use crate::error::{PulseError, Result};

/// State shared between the handle and its timer task.
struct Shared<S> {
    state: S,
    rng: StdRng,
    /// Bumped on every start/stop. A task only mutates while its own epoch
    /// is current.
    epoch: u64,
    running: bool,
    tx: watch::Sender<S>,
}

fn lock<S>(shared: &Mutex<Shared<S>>) -> MutexGuard<'_, Shared<S>> {
    // Ticks are plain arithmetic; a poisoned lock still holds a usable state.
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Periodic driver for one piece of live state.
///
/// # Example
/// ```ignore
/// let mut meter = Ticker::new("token_meter", TokenMeter::default(), Duration::from_secs(1), 7);
/// meter.start()?;
/// let mut rx = meter.subscribe();
/// rx.changed().await?;
/// println!("{}", rx.borrow().count());
/// ```
pub struct Ticker<S: TickState> {
    name: &'static str,
    period: Duration,
    shared: Arc<Mutex<Shared<S>>>,
    task: Option<JoinHandle<()>>,
}

impl<S: TickState> Ticker<S> {
    /// Create a stopped ticker. `seed` feeds the per-tick random draws.
    pub fn new(name: &'static str, state: S, period: Duration, seed: u64) -> Self {
        let (tx, _) = watch::channel(state.clone());
        Self {
            name,
            period: period.max(Duration::from_millis(1)),
            shared: Arc::new(Mutex::new(Shared {
                state,
                rng: StdRng::seed_from_u64(seed),
                epoch: 0,
                running: false,
                tx,
            })),
            task: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        lock(&self.shared).running
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> S {
        lock(&self.shared).state.clone()
    }

    /// Receiver that observes every state change (ticks and resets).
    pub fn subscribe(&self) -> watch::Receiver<S> {
        lock(&self.shared).tx.subscribe()
    }

    /// Begin ticking every `period`, first tick one period from now.
    ///
    /// A no-op when already running. Fails with [`PulseError::NoRuntime`]
    /// outside a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| PulseError::NoRuntime)?;

        let epoch = {
            let mut g = lock(&self.shared);
            g.epoch += 1;
            g.running = true;
            g.epoch
        };

        let shared = Arc::clone(&self.shared);
        let period = self.period;
        let name = self.name;
        self.task = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let mut g = lock(&shared);
                if g.epoch != epoch || !g.running {
                    tracing::trace!(target: "pulseboard::live", ticker = name, "stale timer exiting");
                    break;
                }
                let Shared { state, rng, tx, .. } = &mut *g;
                state.tick(rng);
                tx.send_replace(state.clone());
            }
        }));

        tracing::debug!(
            target: "pulseboard::live",
            ticker = self.name,
            period_ms = self.period.as_millis() as u64,
            "ticker started"
        );
        Ok(())
    }

    /// Cancel the timer. Idempotent.
    pub fn stop(&mut self) {
        let was_running = {
            let mut g = lock(&self.shared);
            g.epoch += 1;
            std::mem::replace(&mut g.running, false)
        };
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if was_running {
            tracing::debug!(target: "pulseboard::live", ticker = self.name, "ticker stopped");
        }
    }

    /// Restore the initial state. The run state is unchanged.
    pub fn reset(&self) {
        let mut g = lock(&self.shared);
        let Shared { state, tx, .. } = &mut *g;
        state.reset();
        tx.send_replace(state.clone());
        tracing::debug!(target: "pulseboard::live", ticker = self.name, "ticker reset");
    }

    /// Apply one tick immediately, whether or not the timer runs.
    pub fn step(&self) -> S {
        let mut g = lock(&self.shared);
        let Shared { state, rng, tx, .. } = &mut *g;
        state.tick(rng);
        tx.send_replace(state.clone());
        state.clone()
    }
}

impl<S: TickState> Drop for Ticker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: TickState> std::fmt::Debug for Ticker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("running", &self.is_running())
            .finish()
    }
}
