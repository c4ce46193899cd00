//! View-local editable copies of dataset rows.
//!
//! The shared [`Dataset`](crate::dataset::Dataset) is never mutated. A view
//! that lets the operator flip switches takes a copy here; edits stay in that
//! copy and disappear with it.

use serde::Serialize;

use crate::aggregate::round_to;
use crate::dataset::{AlertRule, DeploymentStatus, ModelDeployment};
use crate::error::{PulseError, Result};

// ---------------------------------------------------------------------------
// ModelRoster
// ---------------------------------------------------------------------------

/// One active deployment's share of routed traffic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficShare {
    pub name: String,
    /// Share of active traffic, one decimal; sums to ~100 across active models.
    pub share_pct: f64,
}

/// Editable list of model deployments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRoster {
    models: Vec<ModelDeployment>,
}

impl ModelRoster {
    pub fn new(models: &[ModelDeployment]) -> Self {
        Self { models: models.to_vec() }
    }

    pub fn models(&self) -> &[ModelDeployment] {
        &self.models
    }

    fn get_mut(&mut self, idx: usize) -> Result<&mut ModelDeployment> {
        let len = self.models.len();
        self.models
            .get_mut(idx)
            .ok_or(PulseError::IndexOutOfRange { what: "model", index: idx, len })
    }

    /// Active becomes disabled; standby and disabled become active.
    pub fn toggle_status(&mut self, idx: usize) -> Result<DeploymentStatus> {
        let m = self.get_mut(idx)?;
        m.status = match m.status {
            DeploymentStatus::Active => DeploymentStatus::Disabled,
            DeploymentStatus::Standby | DeploymentStatus::Disabled => DeploymentStatus::Active,
        };
        tracing::debug!(target: "pulseboard::views", model = %m.name, status = %m.status, "model status toggled");
        Ok(m.status)
    }

    /// Set the traffic slider, clamped to 0..=100. Returns the stored value.
    pub fn set_traffic(&mut self, idx: usize, pct: i64) -> Result<u8> {
        let m = self.get_mut(idx)?;
        m.traffic = pct.clamp(0, 100) as u8;
        Ok(m.traffic)
    }

    /// Sum of the traffic sliders of active deployments.
    pub fn active_traffic(&self) -> u32 {
        self.models
            .iter()
            .filter(|m| m.status == DeploymentStatus::Active)
            .map(|m| u32::from(m.traffic))
            .sum()
    }

    /// Active deployments' traffic normalised to 100%. Empty when no active
    /// deployment carries traffic.
    pub fn traffic_split(&self) -> Vec<TrafficShare> {
        let total = self.active_traffic();
        if total == 0 {
            return Vec::new();
        }
        self.models
            .iter()
            .filter(|m| m.status == DeploymentStatus::Active)
            .map(|m| TrafficShare {
                name: m.name.clone(),
                share_pct: round_to(f64::from(m.traffic) / total as f64 * 100.0, 1),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// AlertRuleBook
// ---------------------------------------------------------------------------

/// Editable list of alert rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRuleBook {
    rules: Vec<AlertRule>,
}

impl AlertRuleBook {
    pub fn new(rules: &[AlertRule]) -> Self {
        Self { rules: rules.to_vec() }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Flip a rule's switch and return the new value.
    pub fn toggle(&mut self, idx: usize) -> Result<bool> {
        let len = self.rules.len();
        let rule = self
            .rules
            .get_mut(idx)
            .ok_or(PulseError::IndexOutOfRange { what: "alert rule", index: idx, len })?;
        rule.enabled = !rule.enabled;
        Ok(rule.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.rules.iter().filter(|r| r.enabled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetGenerator;

    fn roster() -> ModelRoster {
        ModelRoster::new(&DatasetGenerator::new(1).generate().models)
    }

    #[test]
    fn test_toggle_cycles_status() {
        let mut r = roster();
        assert_eq!(r.toggle_status(0).unwrap(), DeploymentStatus::Disabled);
        assert_eq!(r.toggle_status(0).unwrap(), DeploymentStatus::Active);
        // Llama starts on standby.
        assert_eq!(r.toggle_status(3).unwrap(), DeploymentStatus::Active);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut r = roster();
        assert!(matches!(
            r.toggle_status(99),
            Err(PulseError::IndexOutOfRange { what: "model", index: 99, len: 5 })
        ));
    }

    #[test]
    fn test_set_traffic_clamps() {
        let mut r = roster();
        assert_eq!(r.set_traffic(1, 250).unwrap(), 100);
        assert_eq!(r.set_traffic(1, -4).unwrap(), 0);
        assert_eq!(r.set_traffic(1, 42).unwrap(), 42);
    }

    #[test]
    fn test_active_traffic_and_split() {
        let r = roster();
        assert_eq!(r.active_traffic(), 90);
        let split = r.traffic_split();
        assert_eq!(split.len(), 3);
        assert_eq!(split[0].share_pct, 50.0);
        let total: f64 = split.iter().map(|s| s.share_pct).sum();
        assert!((total - 100.0).abs() < 0.2);
    }

    #[test]
    fn test_split_empty_without_active_traffic() {
        let mut r = roster();
        for i in 0..3 {
            r.toggle_status(i).unwrap();
        }
        assert_eq!(r.active_traffic(), 0);
        assert!(r.traffic_split().is_empty());
    }

    #[test]
    fn test_edits_do_not_touch_source() {
        let ds = DatasetGenerator::new(1).generate();
        let mut r = ModelRoster::new(&ds.models);
        r.set_traffic(0, 5).unwrap();
        assert_eq!(ds.models[0].traffic, 45);
    }

    #[test]
    fn test_alert_rule_toggle() {
        let ds = DatasetGenerator::new(1).generate();
        let mut book = AlertRuleBook::new(&ds.alert_rules);
        assert_eq!(book.enabled_count(), 4);
        assert!(book.toggle(3).unwrap());
        assert_eq!(book.enabled_count(), 5);
        assert!(ds.alert_rules.iter().filter(|r| r.enabled).count() == 4);
        assert!(book.toggle(10).is_err());
    }
}
