//! Seeded construction of a [`Dataset`].
//!
//! Every random draw comes from one [`StdRng`] seeded by the caller, so the
//! same seed and anchor instant always produce the same dataset.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::records::*;
use super::Dataset;
use crate::aggregate::round_to;

/// Number of days in the generated daily series and CSAT trend.
pub const DEFAULT_DAYS: usize = 30;

/// Number of generated conversations.
pub const DEFAULT_CONVERSATIONS: usize = 30;

const USERS: [&str; 6] = [
    "maria.garcia",
    "john.doe",
    "ana.lopez",
    "carlos.ruiz",
    "emma.wilson",
    "luis.martinez",
];

const STATUSES: [ConversationStatus; 3] = [
    ConversationStatus::Resolved,
    ConversationStatus::Escalated,
    ConversationStatus::NeedsReview,
];

const MS_PER_DAY: f64 = 86_400_000.0;

/// Builds a [`Dataset`] from a seed and an anchor instant.
///
/// # Example
/// ```ignore
/// let ds = DatasetGenerator::new(42).days(30).generate();
/// assert_eq!(ds.daily.len(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    seed: u64,
    days: usize,
    conversations: usize,
    now: DateTime<Utc>,
}

impl DatasetGenerator {
    /// Generator anchored at the current instant.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            days: DEFAULT_DAYS,
            conversations: DEFAULT_CONVERSATIONS,
            now: Utc::now(),
        }
    }

    /// Pin the "current" instant. The daily series ends on `now`'s date.
    pub fn anchored_at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn conversations(mut self, count: usize) -> Self {
        self.conversations = count;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produce the dataset. Pure with respect to `self`.
    pub fn generate(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let anchor = self.now.date_naive();

        let daily = daily_series(&mut rng, anchor, self.days);
        let conversations = conversation_log(&mut rng, self.now, self.conversations);
        let csat_trend = csat_series(&mut rng, anchor, self.days);

        tracing::info!(
            target: "pulseboard::dataset",
            seed = self.seed,
            days = daily.len(),
            conversations = conversations.len(),
            anchor = %anchor,
            "generated synthetic dataset"
        );

        Dataset {
            daily,
            channels: channel_stats(),
            intents: intent_catalog(),
            incidents: incident_log(),
            conversations,
            models: model_deployments(),
            alert_rules: alert_rules(),
            recent_alerts: recent_alerts(),
            quality: QualityMetrics {
                csat: 4.2,
                resolution_rate: 87.5,
                hallucination_reports: 23,
                tool_success_rate: 94.1,
            },
            csat_trend,
            error_types: error_types(),
        }
    }
}

fn day_offset(anchor: NaiveDate, days: usize, i: usize) -> NaiveDate {
    anchor - Duration::days((days - 1 - i) as i64)
}

fn daily_series<R: Rng + ?Sized>(rng: &mut R, anchor: NaiveDate, days: usize) -> Vec<DailyMetric> {
    (0..days)
        .map(|i| {
            let base = 45_000.0 + rng.gen::<f64>() * 25_000.0;
            let latency = 180.0 + rng.gen::<f64>() * 120.0;
            let success = 92.0 + rng.gen::<f64>() * 6.0;
            let fallback = 2.0 + rng.gen::<f64>() * 4.0;
            let escalations = rng.gen::<f64>() * 15.0;
            DailyMetric {
                date: day_offset(anchor, days, i),
                tokens: base.round() as u64,
                responses: (base / 35.0).round() as u64,
                cost: round_to(base * 0.000_025, 2),
                latency_ms: latency.round() as u64,
                success_rate: round_to(success, 1),
                fallback_rate: round_to(fallback, 1),
                escalations: escalations.round() as u64,
            }
        })
        .collect()
}

fn csat_series<R: Rng + ?Sized>(rng: &mut R, anchor: NaiveDate, days: usize) -> Vec<CsatPoint> {
    (0..days)
        .map(|i| CsatPoint {
            date: day_offset(anchor, days, i),
            csat: round_to(3.8 + rng.gen::<f64>() * 0.8, 2),
        })
        .collect()
}

fn conversation_log<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    count: usize,
) -> Vec<Conversation> {
    (0..count)
        .map(|i| {
            let ago_ms = rng.gen::<f64>() * 7.0 * MS_PER_DAY;
            let messages = 3.0 + rng.gen::<f64>() * 20.0;
            let tokens = 500.0 + rng.gen::<f64>() * 5_000.0;
            let cost = 0.01 + rng.gen::<f64>() * 0.15;
            Conversation {
                id: format!("CONV-{:04}", 1000 + i),
                user: USERS[i % USERS.len()].to_string(),
                channel: Channel::ALL[i % Channel::ALL.len()],
                started_at: now - Duration::milliseconds(ago_ms as i64),
                messages: messages.round() as u32,
                tokens: tokens.round() as u64,
                cost: round_to(cost, 3),
                status: STATUSES[i % STATUSES.len()],
            }
        })
        .collect()
}

fn channel_stats() -> Vec<ChannelStat> {
    vec![
        ChannelStat { channel: Channel::WhatsApp, responses: 12_840, tokens: 1_520_000, cost: 38.0 },
        ChannelStat { channel: Channel::Web,      responses: 9_620,  tokens: 1_180_000, cost: 29.5 },
        ChannelStat { channel: Channel::Slack,    responses: 4_310,  tokens: 490_000,   cost: 12.25 },
        ChannelStat { channel: Channel::Api,      responses: 2_780,  tokens: 380_000,   cost: 9.5 },
    ]
}

fn intent_catalog() -> Vec<Intent> {
    [
        ("check_order_status",     3_240, 96.2, 210),
        ("reset_password",         2_810, 94.8, 180),
        ("billing_inquiry",        2_150, 88.3, 340),
        ("product_recommendation", 1_890, 91.5, 420),
        ("schedule_appointment",   1_420, 85.1, 290),
        ("complaint_escalation",     980, 72.4, 510),
        ("faq_general",            4_520, 98.1, 120),
        ("refund_request",         1_650, 82.7, 380),
    ]
    .into_iter()
    .map(|(name, count, success_rate, avg_latency_ms)| Intent {
        name: name.to_string(),
        count,
        success_rate,
        avg_latency_ms,
    })
    .collect()
}

fn incident_log() -> Vec<Incident> {
    use IncidentStatus::*;
    use Severity::*;
    [
        ("2026-02-26 12:45", "Rate Limit",   Warning, Resolved),
        ("2026-02-26 11:20", "Timeout",      Error,   Investigating),
        ("2026-02-26 09:15", "Tool Failure", Error,   Resolved),
        ("2026-02-25 22:30", "High Latency", Warning, Resolved),
        ("2026-02-25 18:05", "Rate Limit",   Warning, Resolved),
        ("2026-02-25 14:12", "Model Error",  Error,   Mitigated),
    ]
    .into_iter()
    .map(|(time, kind, severity, status)| Incident {
        time: time.to_string(),
        kind: kind.to_string(),
        severity,
        status,
    })
    .collect()
}

fn model_deployments() -> Vec<ModelDeployment> {
    use DeploymentStatus::*;
    [
        ("GPT-4o",            "2026-02",  "OpenAI",    Active,   45, "2026-02-20"),
        ("Claude 3.5 Sonnet", "v2",       "Anthropic", Active,   30, "2026-02-18"),
        ("Gemini 2.0 Flash",  "latest",   "Google",    Active,   15, "2026-02-22"),
        ("Llama 3.3 70B",     "instruct", "Meta",      Standby,  10, "2026-02-15"),
        ("Mistral Large",     "2025-01",  "Mistral",   Disabled,  0, "2026-01-30"),
    ]
    .into_iter()
    .map(|(name, version, provider, status, traffic, last_updated)| ModelDeployment {
        name: name.to_string(),
        version: version.to_string(),
        provider: provider.to_string(),
        status,
        traffic,
        last_updated: last_updated.to_string(),
    })
    .collect()
}

fn alert_rules() -> Vec<AlertRule> {
    [
        ("Latency > 500ms",       "500ms", "Slack",         true),
        ("Error rate > 5%",       "5%",    "Email",         true),
        ("Cost > $50/day",        "$50",   "Slack + Email", true),
        ("Escalation rate > 10%", "10%",   "Slack",         false),
        ("CSAT < 3.5",            "3.5",   "Email",         true),
    ]
    .into_iter()
    .map(|(rule, threshold, channel, enabled)| AlertRule {
        rule: rule.to_string(),
        threshold: threshold.to_string(),
        channel: channel.to_string(),
        enabled,
    })
    .collect()
}

fn recent_alerts() -> Vec<AlertEvent> {
    use Severity::*;
    [
        ("2026-02-26 12:45", "Latency > 500ms", "620ms",  Warning),
        ("2026-02-26 11:20", "Error rate > 5%", "7.2%",   Error),
        ("2026-02-25 22:30", "Cost > $50/day",  "$54.20", Warning),
        ("2026-02-25 15:10", "Latency > 500ms", "540ms",  Warning),
    ]
    .into_iter()
    .map(|(time, rule, value, severity)| AlertEvent {
        time: time.to_string(),
        rule: rule.to_string(),
        value: value.to_string(),
        severity,
    })
    .collect()
}

fn error_types() -> Vec<ErrorTypeCount> {
    [
        ("Timeout", 145),
        ("Rate Limit", 89),
        ("Tool Failure", 67),
        ("Model Error", 34),
        ("Context Overflow", 21),
    ]
    .into_iter()
    .map(|(kind, count)| ErrorTypeCount { kind: kind.to_string(), count })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 26, 13, 0, 0).unwrap()
    }

    fn gen(seed: u64) -> Dataset {
        DatasetGenerator::new(seed).anchored_at(fixed_now()).generate()
    }

    #[test]
    fn test_same_seed_same_dataset() {
        assert_eq!(gen(7), gen(7));
    }

    #[test]
    fn test_different_seed_different_daily_series() {
        assert_ne!(gen(1).daily, gen(2).daily);
    }

    #[test]
    fn test_daily_series_one_record_per_day_ascending() {
        let ds = gen(3);
        assert_eq!(ds.daily.len(), DEFAULT_DAYS);
        for pair in ds.daily.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        assert_eq!(ds.daily.last().unwrap().date, fixed_now().date_naive());
    }

    #[test]
    fn test_daily_values_in_range() {
        for m in gen(11).daily {
            assert!((45_000..=70_000).contains(&m.tokens), "tokens={}", m.tokens);
            assert!((180..=300).contains(&m.latency_ms));
            assert!((92.0..=98.0).contains(&m.success_rate));
            assert!((2.0..=6.0).contains(&m.fallback_rate));
            assert!(m.escalations <= 15);
            assert_eq!(m.responses, (m.tokens as f64 / 35.0).round() as u64);
        }
    }

    #[test]
    fn test_conversation_ids_and_cycles() {
        let ds = gen(5);
        assert_eq!(ds.conversations.len(), DEFAULT_CONVERSATIONS);
        assert_eq!(ds.conversations[0].id, "CONV-1000");
        assert_eq!(ds.conversations[29].id, "CONV-1029");
        assert_eq!(ds.conversations[6].user, "maria.garcia");
        assert_eq!(ds.conversations[5].channel, Channel::Web);
        assert_eq!(ds.conversations[2].status, ConversationStatus::NeedsReview);
    }

    #[test]
    fn test_conversations_started_within_last_week() {
        let now = fixed_now();
        for c in gen(9).conversations {
            assert!(c.started_at <= now);
            assert!(now - c.started_at <= Duration::days(7));
            assert!((3..=23).contains(&c.messages));
            assert!(c.cost >= 0.01 && c.cost <= 0.16);
        }
    }

    #[test]
    fn test_csat_trend_bounds() {
        let ds = gen(4);
        assert_eq!(ds.csat_trend.len(), DEFAULT_DAYS);
        assert!(ds.csat_trend.iter().all(|p| (3.8..=4.6).contains(&p.csat)));
    }

    #[test]
    fn test_custom_day_count() {
        let ds = DatasetGenerator::new(1).anchored_at(fixed_now()).days(7).generate();
        assert_eq!(ds.daily.len(), 7);
        assert_eq!(ds.csat_trend.len(), 7);
    }

    #[test]
    fn test_fixed_tables_shapes() {
        let ds = gen(0);
        assert_eq!(ds.channels.len(), 4);
        assert_eq!(ds.intents.len(), 8);
        assert_eq!(ds.incidents.len(), 6);
        assert_eq!(ds.models.len(), 5);
        assert_eq!(ds.alert_rules.len(), 5);
        assert_eq!(ds.recent_alerts.len(), 4);
        assert_eq!(ds.error_types.len(), 5);
    }
}
