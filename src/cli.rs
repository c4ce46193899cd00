use std::path::PathBuf;

use clap::Parser;

use crate::config::PulseConfig;
use crate::report::Page;
use crate::window::TimeWindow;

#[derive(Parser, Debug)]
#[command(name = "pulseboard")]
#[command(version = "0.3.0")]
#[command(about = "Terminal analytics dashboard for an AI assistant deployment")]
pub struct Args {
    /// Page to print
    #[arg(value_enum, default_value = "overview")]
    pub page: Page,

    /// Time window in days: 7, 14 or 30 (a trailing "d" is accepted)
    #[arg(long, short)]
    pub window: Option<TimeWindow>,

    /// Pricing model id for the cost figures (gpt-4o, claude-3.5, gemini-flash)
    #[arg(long, short)]
    pub model: Option<String>,

    /// Filter conversations by id or user, ignoring case
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Show the detail sheet of one conversation (conversations page)
    #[arg(long, value_name = "CONV-ID")]
    pub id: Option<String>,

    /// Seed for the synthetic dataset (random when unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to a TOML config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Print the page as JSON instead of coloured text
    #[arg(long)]
    pub json: bool,

    /// Keep the live counters running for N seconds, printing each tick
    #[arg(long, value_name = "SECS")]
    pub live: Option<u64>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Overlay the command-line flags on a loaded config.
    pub fn apply_to(&self, mut config: PulseConfig) -> PulseConfig {
        if let Some(window) = self.window {
            config.dashboard.window = window;
        }
        if let Some(model) = &self.model {
            config.dashboard.model = model.clone();
        }
        if self.seed.is_some() {
            config.dataset.seed = self.seed;
        }
        config
    }
}
