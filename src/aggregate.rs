//! # Stage: Aggregator
//!
//! ## Responsibility
//! Reduces a slice of [`DailyMetric`]s into the totals behind the KPI cards
//! and derives the cost breakdown of the tokens & costs page.
//!
//! ## Guarantees
//! - Pure: inputs are borrowed immutably, identical input gives identical output
//! - Non-panicking: empty slices and zero token counts resolve to sentinels
//!   (`Totals::default()`, `None`) instead of dividing by zero
//! - No rounding of sums; only `avg_latency_ms` and the token split are rounded
//!
//! ## Non-authoritative figures
//! The 55/45 prompt/completion split and the per-model multipliers are display
//! placeholders. They are not measured and must not feed real accounting.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{Channel, ChannelStat, DailyMetric};

/// Round `value` to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Summary of a window of daily metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    /// Number of records reduced.
    pub days: usize,
    pub tokens: u64,
    pub responses: u64,
    pub cost: f64,
    /// `round(sum(latency_ms) / days)`, or 0 for an empty slice.
    pub avg_latency_ms: u64,
}

impl Totals {
    /// Reduce `slice`. An empty slice yields the all-zero `Totals`.
    pub fn from_slice(slice: &[DailyMetric]) -> Self {
        if slice.is_empty() {
            return Self::default();
        }
        let mut tokens = 0u64;
        let mut responses = 0u64;
        let mut cost = 0.0f64;
        let mut latency = 0u64;
        for m in slice {
            tokens = tokens.saturating_add(m.tokens);
            responses = responses.saturating_add(m.responses);
            cost += m.cost;
            latency = latency.saturating_add(m.latency_ms);
        }
        Self {
            days: slice.len(),
            tokens,
            responses,
            cost,
            avg_latency_ms: (latency as f64 / slice.len() as f64).round() as u64,
        }
    }
}

// ---------------------------------------------------------------------------
// Token split
// ---------------------------------------------------------------------------

/// Placeholder prompt share of all tokens.
pub const PROMPT_SHARE: f64 = 0.55;
/// Placeholder completion share of all tokens.
pub const COMPLETION_SHARE: f64 = 0.45;

/// Prompt/completion estimate for a token count. Each side is rounded
/// independently, so the halves may differ from `tokens` by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TokenSplit {
    pub prompt: u64,
    pub completion: u64,
}

impl TokenSplit {
    pub fn of(tokens: u64) -> Self {
        Self {
            prompt: (tokens as f64 * PROMPT_SHARE).round() as u64,
            completion: (tokens as f64 * COMPLETION_SHARE).round() as u64,
        }
    }
}

/// One point of the prompt-vs-completion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySplit {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub split: TokenSplit,
}

/// Apply the split to every record of `slice`.
pub fn daily_split(slice: &[DailyMetric]) -> Vec<DailySplit> {
    slice
        .iter()
        .map(|m| DailySplit { date: m.date, split: TokenSplit::of(m.tokens) })
        .collect()
}

/// USD per 1 000 tokens, rounded to four decimals. `None` when `tokens` is 0.
pub fn cost_per_thousand(cost: f64, tokens: u64) -> Option<f64> {
    if tokens == 0 {
        return None;
    }
    Some(round_to(cost / tokens as f64 * 1_000.0, 4))
}

// ---------------------------------------------------------------------------
// Pricing model selector
// ---------------------------------------------------------------------------

/// The models offered by the cost page's model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingModel {
    #[default]
    Gpt4o,
    Claude35,
    GeminiFlash,
}

impl PricingModel {
    pub const ALL: [PricingModel; 3] =
        [PricingModel::Gpt4o, PricingModel::Claude35, PricingModel::GeminiFlash];

    /// Selector identifier, e.g. `"claude-3.5"`.
    pub fn id(&self) -> &'static str {
        match self {
            PricingModel::Gpt4o       => "gpt-4o",
            PricingModel::Claude35    => "claude-3.5",
            PricingModel::GeminiFlash => "gemini-flash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PricingModel::Gpt4o       => "GPT-4o",
            PricingModel::Claude35    => "Claude 3.5",
            PricingModel::GeminiFlash => "Gemini Flash",
        }
    }

    /// Display-only cost scale relative to the recorded spend.
    pub fn multiplier(&self) -> f64 {
        match self {
            PricingModel::Gpt4o       => 1.0,
            PricingModel::Claude35    => 0.8,
            PricingModel::GeminiFlash => 0.4,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL.into_iter().find(|m| m.id().eq_ignore_ascii_case(id))
    }

    /// Resolve `id`, falling back to the neutral 1.0 model for unknown ids.
    pub fn resolve(id: &str) -> Self {
        Self::from_id(id).unwrap_or_else(|| {
            tracing::warn!(
                target: "pulseboard::aggregate",
                model = %id,
                fallback = PricingModel::default().id(),
                "unknown pricing model, using neutral multiplier"
            );
            PricingModel::default()
        })
    }
}

impl std::fmt::Display for PricingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Multiplier for a selector id; 1.0 for anything unrecognised.
pub fn multiplier_for(id: &str) -> f64 {
    PricingModel::resolve(id).multiplier()
}

// ---------------------------------------------------------------------------
// CostBreakdown
// ---------------------------------------------------------------------------

/// Everything the tokens & costs KPI row needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub totals: Totals,
    pub split: TokenSplit,
    /// `None` when the slice carries no tokens.
    pub cost_per_thousand: Option<f64>,
    pub model: PricingModel,
    /// `totals.cost * model.multiplier()`. Approximate, display only.
    pub adjusted_cost: f64,
}

impl CostBreakdown {
    pub fn compute(slice: &[DailyMetric], model: PricingModel) -> Self {
        let totals = Totals::from_slice(slice);
        Self {
            split: TokenSplit::of(totals.tokens),
            cost_per_thousand: cost_per_thousand(totals.cost, totals.tokens),
            adjusted_cost: totals.cost * model.multiplier(),
            model,
            totals,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome rates
// ---------------------------------------------------------------------------

/// Mean success/fallback rates and escalation count over a window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OutcomeRates {
    pub avg_success_rate: f64,
    pub avg_fallback_rate: f64,
    pub escalations: u64,
}

impl OutcomeRates {
    pub fn from_slice(slice: &[DailyMetric]) -> Self {
        if slice.is_empty() {
            return Self::default();
        }
        let n = slice.len() as f64;
        Self {
            avg_success_rate: round_to(slice.iter().map(|m| m.success_rate).sum::<f64>() / n, 1),
            avg_fallback_rate: round_to(slice.iter().map(|m| m.fallback_rate).sum::<f64>() / n, 1),
            escalations: slice.iter().map(|m| m.escalations).sum(),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel shares
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelShare {
    pub channel: Channel,
    pub responses: u64,
    /// Percentage of all responses, one decimal.
    pub share_pct: f64,
}

/// Each channel's share of total responses. Shares are 0 when no channel has
/// any responses.
pub fn channel_shares(stats: &[ChannelStat]) -> Vec<ChannelShare> {
    let total: u64 = stats.iter().map(|s| s.responses).sum();
    stats
        .iter()
        .map(|s| ChannelShare {
            channel: s.channel,
            responses: s.responses,
            share_pct: if total == 0 {
                0.0
            } else {
                round_to(s.responses as f64 / total as f64 * 100.0, 1)
            },
        })
        .collect()
}
