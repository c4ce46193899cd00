//! # pulseboard
//!
//! Analytics core of an AI-assistant monitoring dashboard: a seeded synthetic
//! dataset, trailing time windows, aggregate KPIs, live token counters and the
//! ranking tables, plus a terminal renderer for every page.
//!
//! ```ignore
//! let data = DatasetGenerator::new(42).generate().shared();
//! let dashboard = Dashboard::new(data, PulseConfig::default());
//! let board = LiveBoard::new(&PulseConfig::default().live, 42);
//! println!("{}", render_page(&dashboard, Page::Tokens, &board, false)?);
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod live;
pub mod ranking;
pub mod report;
pub mod views;
pub mod window;

use std::io::Write;
use std::time::Duration;

use colored::*;
use serde::Serialize;

pub use aggregate::{CostBreakdown, PricingModel, Totals};
pub use config::PulseConfig;
pub use dataset::{Dataset, DatasetGenerator};
pub use error::{PulseError, Result};
pub use live::{LiveBoard, RollingFeed, Ticker, TokenMeter};
pub use report::{render_page, Dashboard, Page};
pub use window::TimeWindow;

// ---------------------------------------------------------------------------
// Live streaming
// ---------------------------------------------------------------------------

/// One observed change of a live widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum LiveEvent {
    TokenMeter { count: u64, increment: u64, ticks: u64 },
    RealtimeFeed { time: u64, tokens: u64 },
}

impl std::fmt::Display for LiveEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiveEvent::TokenMeter { count, increment, .. } => write!(
                f,
                "{} {} (+{})",
                "meter".cyan(),
                report::format_thousands(*count).bold(),
                increment
            ),
            LiveEvent::RealtimeFeed { time, tokens } => {
                write!(f, "{}  t={} tokens {}", "feed".magenta(), time, tokens)
            }
        }
    }
}

/// Start `board`, write one line per observed tick to `out` until `duration`
/// elapses, then stop the board. Returns the number of lines written.
pub async fn stream_live<W: Write>(
    board: &mut LiveBoard,
    duration: Duration,
    json: bool,
    out: &mut W,
) -> Result<usize> {
    let mut meter_rx = board.meter.subscribe();
    let mut feed_rx = board.feed.subscribe();
    board.start()?;
    tracing::info!(target: "pulseboard::live", secs = duration.as_secs_f64(), "live stream started");

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    let mut lines = 0usize;
    loop {
        let event = tokio::select! {
            _ = &mut deadline => break,
            changed = meter_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let m = meter_rx.borrow_and_update().clone();
                LiveEvent::TokenMeter { count: m.count(), increment: m.last_increment(), ticks: m.ticks() }
            }
            changed = feed_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = feed_rx.borrow_and_update().latest().copied();
                match latest {
                    Some(s) => LiveEvent::RealtimeFeed { time: s.time, tokens: s.tokens },
                    None => continue,
                }
            }
        };
        if json {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        } else {
            writeln!(out, "{event}")?;
        }
        lines += 1;
    }

    board.stop();
    tracing::info!(target: "pulseboard::live", lines, "live stream stopped");
    Ok(lines)
}
