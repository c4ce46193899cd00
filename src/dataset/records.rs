//! Record types held by a [`Dataset`](super::Dataset).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Daily series
// ---------------------------------------------------------------------------

/// One calendar day of assistant traffic. Sequences are ascending by `date`
/// with exactly one record per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub tokens: u64,
    pub responses: u64,
    /// Spend in USD.
    pub cost: f64,
    pub latency_ms: u64,
    /// Percentage, 0–100.
    pub success_rate: f64,
    /// Percentage, 0–100.
    pub fallback_rate: f64,
    pub escalations: u64,
}

/// One day of the customer-satisfaction trend (1–5 scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsatPoint {
    pub date: NaiveDate,
    pub csat: f64,
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// The fixed set of messaging channels the assistant answers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    WhatsApp,
    Web,
    Slack,
    #[serde(rename = "API")]
    Api,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::WhatsApp, Channel::Web, Channel::Slack, Channel::Api];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::WhatsApp => "WhatsApp",
            Channel::Web      => "Web",
            Channel::Slack    => "Slack",
            Channel::Api      => "API",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetime totals for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStat {
    pub channel: Channel,
    pub responses: u64,
    pub tokens: u64,
    pub cost: f64,
}

// ---------------------------------------------------------------------------
// Intents, incidents, alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub count: u64,
    /// Percentage, 0–100.
    pub success_rate: f64,
    pub avg_latency_ms: u64,
}

/// Severity shared by incidents and fired alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error   => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Resolved,
    Investigating,
    Mitigated,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Resolved      => write!(f, "resolved"),
            IncidentStatus::Investigating => write!(f, "investigating"),
            IncidentStatus::Mitigated     => write!(f, "mitigated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// `YYYY-MM-DD HH:MM`
    pub time: String,
    pub kind: String,
    pub severity: Severity,
    pub status: IncidentStatus,
}

/// A configured alerting rule. `enabled` is toggled from the alerts view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub rule: String,
    pub threshold: String,
    /// Notification destination, e.g. "Slack + Email".
    pub channel: String,
    pub enabled: bool,
}

/// An alert that already fired. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub time: String,
    pub rule: String,
    pub value: String,
    pub severity: Severity,
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationStatus {
    Resolved,
    Escalated,
    NeedsReview,
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationStatus::Resolved    => write!(f, "resolved"),
            ConversationStatus::Escalated   => write!(f, "escalated"),
            ConversationStatus::NeedsReview => write!(f, "needs-review"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// `CONV-NNNN`
    pub id: String,
    pub user: String,
    pub channel: Channel,
    pub started_at: DateTime<Utc>,
    pub messages: u32,
    pub tokens: u64,
    pub cost: f64,
    pub status: ConversationStatus,
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Active,
    Standby,
    Disabled,
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStatus::Active   => write!(f, "active"),
            DeploymentStatus::Standby  => write!(f, "standby"),
            DeploymentStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// A model the assistant can route to. `status` and `traffic` are edited from
/// the models view on a local copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDeployment {
    pub name: String,
    pub version: String,
    pub provider: String,
    pub status: DeploymentStatus,
    /// Percentage of requests routed here, 0–100.
    pub traffic: u8,
    pub last_updated: String,
}

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub csat: f64,
    pub resolution_rate: f64,
    pub hallucination_reports: u32,
    pub tool_success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTypeCount {
    pub kind: String,
    pub count: u32,
}
