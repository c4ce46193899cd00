//! # Module: dataset
//!
//! ## Responsibility
//! Owns every record the dashboard displays. A [`Dataset`] is generated once
//! per session by [`DatasetGenerator`] and then shared read-only behind an
//! `Arc`. Views that need to edit rows (models, alert rules) take their own
//! copy through [`crate::views`].
//!
//! ## Guarantees
//! - Deterministic: identical seed and anchor produce an identical dataset
//! - Immutable after construction: no interior mutability
//!
//! ## NOT Responsible For
//! - Windowing or aggregation (see [`crate::window`], [`crate::aggregate`])
//! - Persistence: every session regenerates from scratch

pub mod generator;
pub mod records;

use std::sync::Arc;

pub use generator::DatasetGenerator;
pub use records::*;

/// The full synthetic snapshot for one session.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Dataset {
    /// Ascending, one record per day.
    pub daily: Vec<DailyMetric>,
    pub channels: Vec<ChannelStat>,
    pub intents: Vec<Intent>,
    pub incidents: Vec<Incident>,
    pub conversations: Vec<Conversation>,
    pub models: Vec<ModelDeployment>,
    pub alert_rules: Vec<AlertRule>,
    pub recent_alerts: Vec<AlertEvent>,
    pub quality: QualityMetrics,
    pub csat_trend: Vec<CsatPoint>,
    pub error_types: Vec<ErrorTypeCount>,
}

impl Dataset {
    /// Wrap the dataset for sharing across views.
    pub fn shared(self) -> Arc<Dataset> {
        Arc::new(self)
    }
}
