//! External tests for the analytics pipeline: dataset -> window -> aggregate
//! -> ranking -> rendered page.

use chrono::{TimeZone, Utc};
use pulseboard::aggregate::{cost_per_thousand, TokenSplit};
use pulseboard::ranking;
use pulseboard::report::RenderText;
use pulseboard::*;
use rstest::rstest;

fn dataset(seed: u64) -> Dataset {
    DatasetGenerator::new(seed)
        .anchored_at(Utc.with_ymd_and_hms(2026, 2, 26, 13, 0, 0).unwrap())
        .generate()
}

fn dashboard(seed: u64) -> Dashboard {
    colored::control::set_override(false);
    Dashboard::new(dataset(seed).shared(), PulseConfig::default())
}

// -- Windows and totals ----------------------------------------------------

#[rstest]
#[case(TimeWindow::Last7, 7)]
#[case(TimeWindow::Last14, 14)]
#[case(TimeWindow::Last30, 30)]
fn test_window_totals_match_manual_sum(#[case] window: TimeWindow, #[case] days: usize) {
    let ds = dataset(21);
    let slice = window::select(&ds.daily, window);
    assert_eq!(slice.len(), days);
    let totals = Totals::from_slice(slice);
    assert_eq!(totals.tokens, slice.iter().map(|m| m.tokens).sum::<u64>());
    assert_eq!(totals.responses, slice.iter().map(|m| m.responses).sum::<u64>());
    let latency = slice.iter().map(|m| m.latency_ms).sum::<u64>() as f64 / days as f64;
    assert_eq!(totals.avg_latency_ms, latency.round() as u64);
}

#[test]
fn test_short_history_window_is_clamped() {
    let ds = DatasetGenerator::new(1).days(5).generate();
    let totals = Totals::from_slice(window::select(&ds.daily, TimeWindow::Last30));
    assert_eq!(totals.days, 5);
}

#[test]
fn test_empty_history_totals_are_zero() {
    let ds = DatasetGenerator::new(1).days(0).generate();
    let breakdown = CostBreakdown::compute(&ds.daily, PricingModel::Gpt4o);
    assert_eq!(breakdown.totals, Totals::default());
    assert_eq!(breakdown.cost_per_thousand, None);
}

#[test]
fn test_split_within_one_of_total() {
    let ds = dataset(2);
    for m in &ds.daily {
        let split = TokenSplit::of(m.tokens);
        assert!((split.prompt + split.completion).abs_diff(m.tokens) <= 1, "tokens={}", m.tokens);
    }
}

#[test]
fn test_split_halves_round_independently() {
    assert_eq!(TokenSplit::of(10), TokenSplit { prompt: 6, completion: 5 });
    assert_eq!(TokenSplit::of(20), TokenSplit { prompt: 11, completion: 9 });
}

#[test]
fn test_cost_per_thousand_matches_breakdown() {
    let ds = dataset(8);
    let slice = window::select(&ds.daily, TimeWindow::Last14);
    let b = CostBreakdown::compute(slice, PricingModel::Claude35);
    assert_eq!(b.cost_per_thousand, cost_per_thousand(b.totals.cost, b.totals.tokens));
    assert!((b.adjusted_cost - b.totals.cost * 0.8).abs() < 1e-9);
}

// -- Rankings on the generated log ----------------------------------------

#[test]
fn test_top_costliest_on_generated_log() {
    let ds = dataset(13);
    let top = ranking::top_costliest(&ds.conversations, ranking::TOP_COSTLIEST);
    assert_eq!(top.len(), 10);
    assert!(top.windows(2).all(|w| w[0].cost >= w[1].cost));
    let max = ds.conversations.iter().map(|c| c.cost).fold(f64::MIN, f64::max);
    assert_eq!(top[0].cost, max);
}

#[test]
fn test_lowest_success_on_catalog() {
    let ds = dataset(13);
    let names: Vec<&str> = ranking::lowest_success(&ds.intents, ranking::LOWEST_SUCCESS)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["complaint_escalation", "refund_request", "schedule_appointment", "billing_inquiry", "product_recommendation"]
    );
}

#[test]
fn test_search_is_case_insensitive() {
    let ds = dataset(13);
    let lower = ranking::search_conversations(&ds.conversations, "conv-10");
    let upper = ranking::search_conversations(&ds.conversations, "CONV-10");
    assert_eq!(lower.len(), 30);
    assert_eq!(lower, upper);
}

// -- Pages -----------------------------------------------------------------

#[test]
fn test_same_seed_same_rendered_page() {
    let board = LiveBoard::new(&PulseConfig::default().live, 4);
    let a = render_page(&dashboard(4), Page::Tokens, &board, true).unwrap();
    let b = render_page(&dashboard(4), Page::Tokens, &board, true).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_window_switch_changes_tokens_page() {
    let mut d = dashboard(6);
    d.window = TimeWindow::Last7;
    let week = d.tokens();
    d.window = TimeWindow::Last30;
    let month = d.tokens();
    assert!(month.breakdown.totals.tokens > week.breakdown.totals.tokens);
    assert_eq!(week.chart.len(), 7);
}

#[test]
fn test_unknown_model_config_uses_neutral_multiplier() {
    let mut cfg = PulseConfig::default();
    cfg.dashboard.model = "mystery-model".to_string();
    let d = Dashboard::new(dataset(1).shared(), cfg);
    assert_eq!(d.model, PricingModel::Gpt4o);
    let page = d.tokens();
    assert_eq!(page.breakdown.adjusted_cost, page.breakdown.totals.cost);
}

#[test]
fn test_settings_page_renders_organization() {
    let text = dashboard(1).settings().render_text();
    assert!(text.contains("AJG IA"));
    assert!(text.contains("admin@ajgia.com"));
}
