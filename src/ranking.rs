//! Sort-and-slice helpers and search filters used by the tables.
//!
//! All functions are pure: they borrow the dataset and return owned or
//! borrowed rows in display order. Sorts are stable, so rows that compare
//! equal keep their original relative order.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::{Channel, Conversation, Incident, Intent};

/// Rows in the "most expensive conversations" table.
pub const TOP_COSTLIEST: usize = 10;
/// Rows in the "lowest success intents" table.
pub const LOWEST_SUCCESS: usize = 5;
/// Intents shown on the overview.
pub const TOP_INTENTS: usize = 6;
/// Incidents shown on the overview.
pub const RECENT_INCIDENTS: usize = 5;

/// The `n` most expensive conversations, highest cost first.
pub fn top_costliest(conversations: &[Conversation], n: usize) -> Vec<&Conversation> {
    let mut rows: Vec<&Conversation> = conversations.iter().collect();
    rows.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    rows.truncate(n);
    rows
}

/// The `n` intents with the lowest success rate, lowest first.
pub fn lowest_success(intents: &[Intent], n: usize) -> Vec<&Intent> {
    let mut rows: Vec<&Intent> = intents.iter().collect();
    rows.sort_by(|a, b| a.success_rate.total_cmp(&b.success_rate));
    rows.truncate(n);
    rows
}

/// Conversations whose id or user contains `query`, ignoring case.
/// An empty query matches everything.
pub fn search_conversations<'a>(conversations: &'a [Conversation], query: &str) -> Vec<&'a Conversation> {
    let needle = query.trim().to_lowercase();
    conversations
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.id.to_lowercase().contains(&needle)
                || c.user.to_lowercase().contains(&needle)
        })
        .collect()
}

/// The first `n` intents in catalogue order.
pub fn top_intents(intents: &[Intent], n: usize) -> &[Intent] {
    &intents[..n.min(intents.len())]
}

/// The first `n` incidents, newest first as recorded.
pub fn recent_incidents(incidents: &[Incident], n: usize) -> &[Incident] {
    &incidents[..n.min(incidents.len())]
}

// ---------------------------------------------------------------------------
// Success tiers
// ---------------------------------------------------------------------------

/// Colour bucket for a success-rate badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessTier {
    /// >= 90%
    Healthy,
    /// >= 80%
    Degraded,
    Failing,
}

impl SuccessTier {
    pub fn of(success_rate: f64) -> Self {
        if success_rate >= 90.0 {
            SuccessTier::Healthy
        } else if success_rate >= 80.0 {
            SuccessTier::Degraded
        } else {
            SuccessTier::Failing
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Per-user rollup of the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserUsage {
    pub user: String,
    pub conversations: usize,
    pub tokens: u64,
    pub cost: f64,
}

/// Group conversations by user and return the `n` heaviest by tokens.
/// Users keep first-seen order when their token counts tie.
pub fn top_users(conversations: &[Conversation], n: usize) -> Vec<UserUsage> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<UserUsage> = Vec::new();
    for c in conversations {
        let slot = *index.entry(c.user.as_str()).or_insert_with(|| {
            rows.push(UserUsage { user: c.user.clone(), conversations: 0, tokens: 0, cost: 0.0 });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.conversations += 1;
        row.tokens += c.tokens;
        row.cost += c.cost;
    }
    rows.sort_by(|a, b| b.tokens.cmp(&a.tokens));
    rows.truncate(n);
    rows
}

// ---------------------------------------------------------------------------
// Chart palette
// ---------------------------------------------------------------------------

/// Chart palette slot for a channel series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSlot {
    Primary,
    Secondary,
    Tertiary,
    Quaternary,
    /// Used for names outside the known channel set.
    Neutral,
}

impl ChartSlot {
    pub fn for_channel_name(name: &str) -> Self {
        match Channel::from_name(name) {
            Some(channel) => Self::for_channel(channel),
            None => {
                tracing::debug!(target: "pulseboard::ranking", channel = %name, "unknown channel, neutral colour");
                ChartSlot::Neutral
            }
        }
    }

    pub fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Web      => ChartSlot::Primary,
            Channel::Slack    => ChartSlot::Secondary,
            Channel::WhatsApp => ChartSlot::Tertiary,
            Channel::Api      => ChartSlot::Quaternary,
        }
    }
}
