//! TOML configuration for the dashboard.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [dataset]
//! seed = 42
//!
//! [live]
//! meter_interval_ms = 1000
//! feed_interval_ms = 2000
//!
//! [dashboard]
//! window = "30"
//! model = "claude-3.5"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PulseError, Result};
use crate::live::feed::DEFAULT_FEED_CAPACITY;
use crate::live::meter::DEFAULT_METER_SEED;
use crate::window::TimeWindow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub dataset: DatasetSettings,
    pub live: LiveSettings,
    pub dashboard: DashboardSettings,
    pub organization: OrganizationSettings,
    pub notifications: NotificationSettings,
}

impl PulseConfig {
    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self> {
        toml::from_str(s).map_err(|source| PulseError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PulseError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&content, path)?;
        tracing::debug!(target: "pulseboard::config", path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// The configured seed, or a fresh random one when unset.
    pub fn resolve_seed(&self) -> u64 {
        self.dataset.seed.unwrap_or_else(rand::random)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Fixed seed for reproducible sessions. Unset means a new dataset on
    /// every run.
    pub seed: Option<u64>,
    pub days: usize,
    pub conversations: usize,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            seed: None,
            days: crate::dataset::generator::DEFAULT_DAYS,
            conversations: crate::dataset::generator::DEFAULT_CONVERSATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    pub meter_interval_ms: u64,
    pub feed_interval_ms: u64,
    pub meter_seed: u64,
    pub feed_capacity: usize,
}

impl LiveSettings {
    pub fn meter_interval(&self) -> Duration {
        Duration::from_millis(self.meter_interval_ms)
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            meter_interval_ms: 1_000,
            feed_interval_ms: 2_000,
            meter_seed: DEFAULT_METER_SEED,
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub window: TimeWindow,
    /// Pricing model id for the cost page.
    pub model: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            window: TimeWindow::default(),
            model: crate::aggregate::PricingModel::default().id().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationSettings {
    pub name: String,
    pub contact_email: String,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            name: "AJG IA".to_string(),
            contact_email: "admin@ajgia.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email_alerts: bool,
    pub slack_alerts: bool,
    pub daily_summary: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { email_alerts: true, slack_alerts: true, daily_summary: true }
    }
}
