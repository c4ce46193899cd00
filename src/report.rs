//! Page models and terminal rendering.
//!
//! Each dashboard page is a plain `Serialize` struct built from the shared
//! dataset plus the current selections. The same struct is printed either as
//! coloured text or as JSON, so both outputs always carry identical numbers.

use std::fmt::Write as _;
use std::sync::Arc;

use clap::ValueEnum;
use colored::*;
use serde::Serialize;

use crate::aggregate::{
    channel_shares, daily_split, ChannelShare, CostBreakdown, DailySplit, OutcomeRates,
    PricingModel, Totals,
};
use crate::config::{NotificationSettings, OrganizationSettings, PulseConfig};
use crate::dataset::{
    AlertEvent, AlertRule, Channel, Conversation, CsatPoint, DailyMetric, Dataset, ErrorTypeCount,
    Incident, Intent, QualityMetrics, Severity,
};
use crate::error::{PulseError, Result};
use crate::live::{FeedSample, LiveBoard, RollingFeed, TokenMeter};
use crate::ranking::{self, ChartSlot, SuccessTier, UserUsage};
use crate::views::{AlertRuleBook, ModelRoster, TrafficShare};
use crate::window::{self, TimeWindow};

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `1847293` -> `"1,847,293"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` -> `"1.23M"`.
pub fn format_millions(n: u64) -> String {
    format!("{:.2}M", n as f64 / 1e6)
}

pub fn format_usd(amount: f64, decimals: usize) -> String {
    format!("${:.*}", decimals, amount)
}

/// Cost per 1k tokens, `"n/a"` when undefined.
pub fn format_cost_per_thousand(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:.4}"),
        None => "n/a".to_string(),
    }
}

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One block character per value, scaled between the series min and max.
pub fn sparkline(values: &[u64]) -> String {
    let (Some(&lo), Some(&hi)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let span = (hi - lo).max(1) as f64;
    values
        .iter()
        .map(|&v| {
            let idx = ((v - lo) as f64 / span * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

fn tier_badge(rate: f64) -> ColoredString {
    let text = format!("{rate:.1}%");
    match SuccessTier::of(rate) {
        SuccessTier::Healthy  => text.green(),
        SuccessTier::Degraded => text.yellow(),
        SuccessTier::Failing  => text.red(),
    }
}

fn severity_badge(severity: Severity) -> ColoredString {
    match severity {
        Severity::Warning => severity.to_string().yellow(),
        Severity::Error   => severity.to_string().red(),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.bold().cyan());
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Every page the terminal dashboard can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Overview,
    Realtime,
    Channels,
    Users,
    Conversations,
    Tokens,
    Quality,
    Models,
    Alerts,
    Settings,
}

/// Intent row with its badge tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentRow {
    pub name: String,
    pub count: u64,
    pub success_rate: f64,
    pub avg_latency_ms: u64,
    pub tier: SuccessTier,
}

impl From<&Intent> for IntentRow {
    fn from(i: &Intent) -> Self {
        Self {
            name: i.name.clone(),
            count: i.count,
            success_rate: i.success_rate,
            avg_latency_ms: i.avg_latency_ms,
            tier: SuccessTier::of(i.success_rate),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
    pub window: TimeWindow,
    pub totals: Totals,
    pub outcomes: OutcomeRates,
    pub daily: Vec<DailyMetric>,
    pub top_intents: Vec<IntentRow>,
    pub incidents: Vec<Incident>,
    pub live_tokens: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealtimePage {
    pub live_tokens: u64,
    pub samples: Vec<FeedSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelRow {
    pub channel: Channel,
    pub responses: u64,
    pub tokens: u64,
    pub cost: f64,
    pub slot: ChartSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelsPage {
    pub channels: Vec<ChannelRow>,
    pub shares: Vec<ChannelShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersPage {
    pub users: Vec<UserUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationsPage {
    pub query: String,
    pub matches: Vec<Conversation>,
}

/// Who sent a timeline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub speaker: Speaker,
    pub text: &'static str,
}

/// Placeholder transcript lines; the dataset carries no message bodies.
const USER_LINE: &str = "Hi, I need help with my order...";
const ASSISTANT_LINE: &str = "Sure! Let me check the status of your order.";

/// Most timeline entries shown for one conversation.
pub const TIMELINE_LIMIT: usize = 5;

/// Sample transcript of `messages` turns, alternating user and assistant and
/// capped at [`TIMELINE_LIMIT`].
pub fn sample_timeline(messages: u32) -> Vec<TimelineEntry> {
    (0..(messages as usize).min(TIMELINE_LIMIT))
        .map(|i| {
            if i % 2 == 0 {
                TimelineEntry { speaker: Speaker::User, text: USER_LINE }
            } else {
                TimelineEntry { speaker: Speaker::Assistant, text: ASSISTANT_LINE }
            }
        })
        .collect()
}

/// Detail sheet for one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostlyConversation {
    pub id: String,
    pub user: String,
    pub tokens: u64,
    /// Cost scaled by the selected model's multiplier.
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokensPage {
    pub window: TimeWindow,
    pub breakdown: CostBreakdown,
    pub chart: Vec<DailySplit>,
    pub top_conversations: Vec<CostlyConversation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityPage {
    pub window: TimeWindow,
    pub metrics: QualityMetrics,
    pub csat_trend: Vec<CsatPoint>,
    /// Mean of `csat_trend`, two decimals; `None` when the trend is empty.
    pub csat_average: Option<f64>,
    pub error_types: Vec<ErrorTypeCount>,
    pub lowest_success: Vec<IntentRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsPage {
    pub roster: ModelRoster,
    pub active_traffic: u32,
    pub traffic_split: Vec<TrafficShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertsPage {
    pub rules: Vec<AlertRule>,
    pub enabled: usize,
    pub recent: Vec<AlertEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsPage {
    pub organization: OrganizationSettings,
    pub notifications: NotificationSettings,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Read-only view of one session: the shared dataset plus the selector state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    data: Arc<Dataset>,
    pub window: TimeWindow,
    pub model: PricingModel,
    pub search: String,
    /// Conversation id whose detail sheet replaces the list, if any.
    pub selected: Option<String>,
    config: PulseConfig,
}

impl Dashboard {
    pub fn new(data: Arc<Dataset>, config: PulseConfig) -> Self {
        Self {
            window: config.dashboard.window,
            model: PricingModel::resolve(&config.dashboard.model),
            search: String::new(),
            selected: None,
            data,
            config,
        }
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    fn window_slice(&self) -> &[DailyMetric] {
        window::select(&self.data.daily, self.window)
    }

    pub fn overview(&self, meter: &TokenMeter) -> OverviewPage {
        let slice = self.window_slice();
        OverviewPage {
            window: self.window,
            totals: Totals::from_slice(slice),
            outcomes: OutcomeRates::from_slice(slice),
            daily: slice.to_vec(),
            top_intents: ranking::top_intents(&self.data.intents, ranking::TOP_INTENTS)
                .iter()
                .map(IntentRow::from)
                .collect(),
            incidents: ranking::recent_incidents(&self.data.incidents, ranking::RECENT_INCIDENTS)
                .to_vec(),
            live_tokens: meter.count(),
        }
    }

    pub fn realtime(&self, meter: &TokenMeter, feed: &RollingFeed) -> RealtimePage {
        RealtimePage { live_tokens: meter.count(), samples: feed.iter().copied().collect() }
    }

    pub fn channels(&self) -> ChannelsPage {
        ChannelsPage {
            channels: self
                .data
                .channels
                .iter()
                .map(|c| ChannelRow {
                    channel: c.channel,
                    responses: c.responses,
                    tokens: c.tokens,
                    cost: c.cost,
                    slot: ChartSlot::for_channel(c.channel),
                })
                .collect(),
            shares: channel_shares(&self.data.channels),
        }
    }

    pub fn users(&self) -> UsersPage {
        UsersPage { users: ranking::top_users(&self.data.conversations, 5) }
    }

    pub fn conversations(&self) -> ConversationsPage {
        ConversationsPage {
            query: self.search.clone(),
            matches: ranking::search_conversations(&self.data.conversations, &self.search)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Detail sheet for the conversation with id `id`, ignoring case.
    pub fn conversation_detail(&self, id: &str) -> Result<ConversationDetail> {
        let wanted = id.trim();
        let conversation = self
            .data
            .conversations
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PulseError::UnknownConversation(wanted.to_string()))?;
        Ok(ConversationDetail {
            timeline: sample_timeline(conversation.messages),
            conversation: conversation.clone(),
        })
    }

    pub fn tokens(&self) -> TokensPage {
        let slice = self.window_slice();
        let multiplier = self.model.multiplier();
        TokensPage {
            window: self.window,
            breakdown: CostBreakdown::compute(slice, self.model),
            chart: daily_split(slice),
            top_conversations: ranking::top_costliest(&self.data.conversations, ranking::TOP_COSTLIEST)
                .into_iter()
                .map(|c| CostlyConversation {
                    id: c.id.clone(),
                    user: c.user.clone(),
                    tokens: c.tokens,
                    cost: c.cost * multiplier,
                })
                .collect(),
        }
    }

    pub fn quality(&self) -> QualityPage {
        let trend = window::trailing(&self.data.csat_trend, self.window.days()).to_vec();
        let csat_average = if trend.is_empty() {
            None
        } else {
            Some(crate::aggregate::round_to(
                trend.iter().map(|p| p.csat).sum::<f64>() / trend.len() as f64,
                2,
            ))
        };
        QualityPage {
            window: self.window,
            metrics: self.data.quality.clone(),
            csat_trend: trend,
            csat_average,
            error_types: self.data.error_types.clone(),
            lowest_success: ranking::lowest_success(&self.data.intents, ranking::LOWEST_SUCCESS)
                .into_iter()
                .map(IntentRow::from)
                .collect(),
        }
    }

    /// Models page for a roster owned by the caller.
    pub fn models(&self, roster: &ModelRoster) -> ModelsPage {
        ModelsPage {
            roster: roster.clone(),
            active_traffic: roster.active_traffic(),
            traffic_split: roster.traffic_split(),
        }
    }

    /// Fresh editable roster for a models view.
    pub fn model_roster(&self) -> ModelRoster {
        ModelRoster::new(&self.data.models)
    }

    /// Fresh editable rule book for an alerts view.
    pub fn alert_book(&self) -> AlertRuleBook {
        AlertRuleBook::new(&self.data.alert_rules)
    }

    pub fn alerts(&self, book: &AlertRuleBook) -> AlertsPage {
        AlertsPage {
            rules: book.rules().to_vec(),
            enabled: book.enabled_count(),
            recent: self.data.recent_alerts.clone(),
        }
    }

    pub fn settings(&self) -> SettingsPage {
        SettingsPage {
            organization: self.config.organization.clone(),
            notifications: self.config.notifications.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// A page that can print itself for the terminal.
pub trait RenderText {
    fn render_text(&self) -> String;
}

impl RenderText for OverviewPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &format!("Overview · last {}", self.window));
        let t = &self.totals;
        let _ = writeln!(out, "  Tokens        {}", format_thousands(t.tokens).bold());
        let _ = writeln!(out, "  Responses     {}", format_thousands(t.responses).bold());
        let _ = writeln!(out, "  Avg latency   {} ms", t.avg_latency_ms.to_string().bold());
        let _ = writeln!(out, "  Cost          {}", format_usd(t.cost, 2).bold());
        let _ = writeln!(
            out,
            "  Success {}  Fallback {:.1}%  Escalations {}",
            tier_badge(self.outcomes.avg_success_rate),
            self.outcomes.avg_fallback_rate,
            self.outcomes.escalations
        );
        let tokens: Vec<u64> = self.daily.iter().map(|m| m.tokens).collect();
        let _ = writeln!(out, "  Tokens/day    {}", sparkline(&tokens).blue());

        heading(&mut out, "Top intents");
        for i in &self.top_intents {
            let _ = writeln!(out, "  {:<24} {:>6}  {}", i.name, format_thousands(i.count), tier_badge(i.success_rate));
        }

        heading(&mut out, "Live token meter");
        let _ = writeln!(out, "  {}", format_thousands(self.live_tokens).bold().green());

        heading(&mut out, "Recent incidents");
        for inc in &self.incidents {
            let _ = writeln!(
                out,
                "  {}  {:<14} {:<8} {}",
                inc.time,
                inc.kind,
                severity_badge(inc.severity),
                inc.status
            );
        }
        out
    }
}

impl RenderText for RealtimePage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, "Realtime");
        let _ = writeln!(out, "  Live tokens   {}", format_thousands(self.live_tokens).bold().green());
        let values: Vec<u64> = self.samples.iter().map(|s| s.tokens).collect();
        let _ = writeln!(out, "  Tokens/tick   {}", sparkline(&values).blue());
        if let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) {
            let _ = writeln!(out, "  t={}..{}  latest {}", first.time, last.time, last.tokens);
        }
        out
    }
}

impl RenderText for ChannelsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, "Channels");
        for (row, share) in self.channels.iter().zip(&self.shares) {
            let _ = writeln!(
                out,
                "  {:<10} {:>8} resp  {:>6}  {:>10} tokens  {:>9}",
                row.channel.to_string(),
                format_thousands(row.responses),
                format!("{:.1}%", share.share_pct),
                format_thousands(row.tokens),
                format_usd(row.cost, 2)
            );
        }
        out
    }
}

impl RenderText for UsersPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, "Top users");
        for u in &self.users {
            let _ = writeln!(
                out,
                "  {:<16} {:>3} convs  {:>8} tokens  {}",
                u.user,
                u.conversations,
                format_thousands(u.tokens),
                format_usd(u.cost, 2)
            );
        }
        out
    }
}

impl RenderText for ConversationsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let title = if self.query.is_empty() {
            "Conversations".to_string()
        } else {
            format!("Conversations matching '{}'", self.query)
        };
        heading(&mut out, &title);
        if self.matches.is_empty() {
            let _ = writeln!(out, "  {}", "no conversations found".dimmed());
        }
        for c in &self.matches {
            let _ = writeln!(
                out,
                "  {}  {:<14} {:<9} {:>3} msgs {:>6} tokens  {}  {}",
                c.id,
                c.user,
                c.channel.to_string(),
                c.messages,
                format_thousands(c.tokens),
                format_usd(c.cost, 3),
                c.status
            );
        }
        out
    }
}

impl RenderText for ConversationDetail {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let c = &self.conversation;
        heading(&mut out, &c.id);
        let _ = writeln!(out, "  User       {}", c.user);
        let _ = writeln!(out, "  Channel    {}", c.channel);
        let _ = writeln!(out, "  Messages   {}", c.messages);
        let _ = writeln!(out, "  Tokens     {}", format_thousands(c.tokens));
        let _ = writeln!(out, "  Cost       {}", format_usd(c.cost, 3));
        let _ = writeln!(out, "  Status     {}", c.status);
        let _ = writeln!(out, "  Started    {}", c.started_at.format("%Y-%m-%d %H:%M"));

        heading(&mut out, "Message timeline (sample)");
        for entry in &self.timeline {
            let tag = match entry.speaker {
                Speaker::User      => "user".blue(),
                Speaker::Assistant => "bot ".green(),
            };
            let _ = writeln!(out, "  {} {}", tag, entry.text);
        }
        out
    }
}

impl RenderText for TokensPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let b = &self.breakdown;
        heading(&mut out, &format!("Tokens & costs · {} · last {}", b.model.label(), self.window));
        let _ = writeln!(out, "  Total tokens       {}", format_millions(b.totals.tokens).bold());
        let _ = writeln!(out, "  Prompt tokens      {}", format_millions(b.split.prompt));
        let _ = writeln!(out, "  Completion tokens  {}", format_millions(b.split.completion));
        let _ = writeln!(out, "  Total cost         {}", format_usd(b.adjusted_cost, 2).bold());
        let _ = writeln!(out, "  Cost / 1k tokens   {}", format_cost_per_thousand(b.cost_per_thousand));
        let _ = writeln!(out, "  {}", "prompt/completion split and model multiplier are estimates".dimmed());

        heading(&mut out, "Most expensive conversations");
        for c in &self.top_conversations {
            let _ = writeln!(out, "  {}  {:<14} {:>6}  {}", c.id, c.user, format_thousands(c.tokens), format_usd(c.cost, 3));
        }
        out
    }
}

impl RenderText for QualityPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, "Quality");
        let m = &self.metrics;
        let _ = writeln!(out, "  CSAT               {:.1}", m.csat);
        let _ = writeln!(out, "  Resolution rate    {}%", m.resolution_rate);
        let _ = writeln!(out, "  Hallucinations     {}", m.hallucination_reports);
        let _ = writeln!(out, "  Tool success       {}%", m.tool_success_rate);
        if let Some(avg) = self.csat_average {
            let points: Vec<u64> = self.csat_trend.iter().map(|p| (p.csat * 100.0).round() as u64).collect();
            let _ = writeln!(out, "  CSAT last {}      {:.2}  {}", self.window, avg, sparkline(&points).blue());
        }

        heading(&mut out, "Errors by type");
        for e in &self.error_types {
            let _ = writeln!(out, "  {:<18} {:>4}", e.kind, e.count);
        }

        heading(&mut out, "Lowest success intents");
        for i in &self.lowest_success {
            let _ = writeln!(out, "  {:<24} {}", i.name, tier_badge(i.success_rate));
        }
        out
    }
}

impl RenderText for ModelsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, "Models");
        for m in self.roster.models() {
            let _ = writeln!(
                out,
                "  {:<18} {:<9} {:<10} {:<9} {:>3}%  {}",
                m.name, m.version, m.provider, m.status.to_string(), m.traffic, m.last_updated
            );
        }
        let _ = writeln!(out, "  Active traffic: {}%", self.active_traffic);
        for s in &self.traffic_split {
            let _ = writeln!(out, "    {:<18} {:.1}%", s.name, s.share_pct);
        }
        out
    }
}

impl RenderText for AlertsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &format!("Alert rules ({} enabled)", self.enabled));
        for r in &self.rules {
            let state = if r.enabled { "on ".green() } else { "off".dimmed() };
            let _ = writeln!(out, "  [{}] {:<24} {:<6} → {}", state, r.rule, r.threshold, r.channel);
        }
        heading(&mut out, "Recent alerts");
        for a in &self.recent {
            let _ = writeln!(out, "  {}  {:<18} {:>7}  {}", a.time, a.rule, a.value, severity_badge(a.severity));
        }
        out
    }
}

impl RenderText for SettingsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        heading(&mut out, "Settings");
        let _ = writeln!(out, "  Organization   {}", self.organization.name);
        let _ = writeln!(out, "  Contact        {}", self.organization.contact_email);
        let flag = |on: bool| if on { "on".green() } else { "off".dimmed() };
        let n = &self.notifications;
        let _ = writeln!(out, "  Email alerts   {}", flag(n.email_alerts));
        let _ = writeln!(out, "  Slack alerts   {}", flag(n.slack_alerts));
        let _ = writeln!(out, "  Daily summary  {}", flag(n.daily_summary));
        out
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn emit<P: Serialize + RenderText>(page: &P, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(page)?)
    } else {
        Ok(page.render_text())
    }
}

/// Build `page` and print it as text or pretty JSON. Live widgets are read
/// from `board` at call time.
pub fn render_page(dashboard: &Dashboard, page: Page, board: &LiveBoard, json: bool) -> Result<String> {
    let meter = board.meter.snapshot();
    match page {
        Page::Overview      => emit(&dashboard.overview(&meter), json),
        Page::Realtime      => emit(&dashboard.realtime(&meter, &board.feed.snapshot()), json),
        Page::Channels      => emit(&dashboard.channels(), json),
        Page::Users         => emit(&dashboard.users(), json),
        Page::Conversations => match &dashboard.selected {
            Some(id) => emit(&dashboard.conversation_detail(id)?, json),
            None => emit(&dashboard.conversations(), json),
        },
        Page::Tokens        => emit(&dashboard.tokens(), json),
        Page::Quality       => emit(&dashboard.quality(), json),
        Page::Models        => emit(&dashboard.models(&dashboard.model_roster()), json),
        Page::Alerts        => emit(&dashboard.alerts(&dashboard.alert_book()), json),
        Page::Settings      => emit(&dashboard.settings(), json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetGenerator;
    use crate::live::LiveBoard;
    use chrono::{TimeZone, Utc};

    fn dashboard() -> Dashboard {
        colored::control::set_override(false);
        let data = DatasetGenerator::new(17)
            .anchored_at(Utc.with_ymd_and_hms(2026, 2, 26, 13, 0, 0).unwrap())
            .generate()
            .shared();
        Dashboard::new(data, PulseConfig::default())
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_847_293), "1,847,293");
    }

    #[test]
    fn test_format_millions_and_usd() {
        assert_eq!(format_millions(1_234_567), "1.23M");
        assert_eq!(format_usd(54.2, 2), "$54.20");
        assert_eq!(format_cost_per_thousand(Some(0.025)), "$0.0250");
        assert_eq!(format_cost_per_thousand(None), "n/a");
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[1, 8]), "▁█");
        assert_eq!(sparkline(&[5, 5, 5]).chars().count(), 3);
    }

    #[test]
    fn test_overview_uses_selected_window() {
        let mut d = dashboard();
        d.window = TimeWindow::Last7;
        let page = d.overview(&TokenMeter::default());
        assert_eq!(page.daily.len(), 7);
        assert_eq!(page.totals.days, 7);
        assert_eq!(page.top_intents.len(), 6);
        assert_eq!(page.incidents.len(), 5);
        assert_eq!(page.daily.last(), d.data().daily.last());
        assert!(page.render_text().contains("1,847,293"));
    }

    #[test]
    fn test_tokens_page_applies_multiplier() {
        let mut d = dashboard();
        d.window = TimeWindow::Last30;
        let full = d.tokens();
        d.model = PricingModel::GeminiFlash;
        let cheap = d.tokens();
        assert!((cheap.breakdown.adjusted_cost - full.breakdown.totals.cost * 0.4).abs() < 1e-9);
        assert_eq!(cheap.top_conversations.len(), 10);
        assert!((cheap.top_conversations[0].cost - full.top_conversations[0].cost * 0.4).abs() < 1e-12);
        assert_eq!(cheap.chart.len(), 30);
    }

    #[test]
    fn test_conversations_search() {
        let mut d = dashboard();
        d.search = "MARIA".to_string();
        let page = d.conversations();
        assert_eq!(page.matches.len(), 5);
        d.search = "nobody".to_string();
        assert!(d.conversations().render_text().contains("no conversations found"));
    }

    #[test]
    fn test_sample_timeline_alternates_and_caps() {
        let t = sample_timeline(12);
        assert_eq!(t.len(), TIMELINE_LIMIT);
        assert_eq!(t[0].speaker, Speaker::User);
        assert_eq!(t[1].speaker, Speaker::Assistant);
        assert_eq!(t[4].speaker, Speaker::User);
        assert_eq!(sample_timeline(3).len(), 3);
        assert!(sample_timeline(0).is_empty());
    }

    #[test]
    fn test_conversation_detail_by_id() {
        let d = dashboard();
        let detail = d.conversation_detail("conv-1006").unwrap();
        assert_eq!(detail.conversation.id, "CONV-1006");
        assert_eq!(detail.conversation.user, "maria.garcia");
        assert_eq!(
            detail.timeline.len(),
            (detail.conversation.messages as usize).min(TIMELINE_LIMIT)
        );
        let text = detail.render_text();
        assert!(text.contains("CONV-1006"));
        assert!(text.contains("maria.garcia"));
    }

    #[test]
    fn test_conversation_detail_unknown_id() {
        let err = dashboard().conversation_detail("CONV-9999").unwrap_err();
        assert!(matches!(err, PulseError::UnknownConversation(ref id) if id == "CONV-9999"));
    }

    #[test]
    fn test_render_conversations_with_selection() {
        let mut d = dashboard();
        let board = LiveBoard::new(&PulseConfig::default().live, 3);
        d.selected = Some("CONV-1001".to_string());
        let json = render_page(&d, Page::Conversations, &board, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["conversation"]["id"], "CONV-1001");
        assert_eq!(value["timeline"][0]["speaker"], "user");
        d.selected = Some("nope".to_string());
        assert!(render_page(&d, Page::Conversations, &board, false).is_err());
    }

    #[test]
    fn test_quality_page() {
        let d = dashboard();
        let page = d.quality();
        assert_eq!(page.lowest_success[0].name, "complaint_escalation");
        assert_eq!(page.lowest_success[0].tier, SuccessTier::Failing);
        assert_eq!(page.csat_trend.len(), 14);
        assert!(page.csat_average.is_some());
    }

    #[test]
    fn test_models_and_alerts_pages_reflect_local_edits() {
        let d = dashboard();
        let mut roster = d.model_roster();
        roster.toggle_status(0).unwrap();
        assert_eq!(d.models(&roster).active_traffic, 45);
        assert_eq!(d.models(&d.model_roster()).active_traffic, 90);

        let mut book = d.alert_book();
        book.toggle(0).unwrap();
        assert_eq!(d.alerts(&book).enabled, 3);
        assert_eq!(d.alerts(&d.alert_book()).enabled, 4);
    }

    #[tokio::test]
    async fn test_realtime_page_from_board() {
        let d = dashboard();
        let board = LiveBoard::new(&PulseConfig::default().live, 3);
        board.meter.step();
        let page = d.realtime(&board.meter.snapshot(), &board.feed.snapshot());
        assert_eq!(page.samples.len(), 20);
        assert!(page.live_tokens > 1_847_293);
    }

    #[test]
    fn test_render_page_every_page() {
        let d = dashboard();
        let board = LiveBoard::new(&PulseConfig::default().live, 3);
        for page in <Page as ValueEnum>::value_variants() {
            let text = render_page(&d, *page, &board, false).unwrap();
            assert!(!text.trim().is_empty(), "{page:?}");
            let json = render_page(&d, *page, &board, true).unwrap();
            assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok(), "{page:?}");
        }
    }

    #[test]
    fn test_pages_serialize() {
        let d = dashboard();
        let json = serde_json::to_value(d.tokens()).unwrap();
        assert!(json["breakdown"]["cost_per_thousand"].is_number());
        let json = serde_json::to_value(d.channels()).unwrap();
        assert_eq!(json["channels"][0]["channel"], "WhatsApp");
        assert_eq!(json["channels"][0]["slot"], "tertiary");
    }
}
