//! Work-record configuration

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::rules::{
    DEFAULT_HOURS_PER_SHIFT, DEFAULT_SHIFT_LEAD_HOURS, InboundRuleTable, RuleEngine, RuleSettings,
};

/// Configuration for the work-record core
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    pub hours_per_shift: f64,
    pub shift_lead_hours: f64,
    /// Inbound rule table file; `None` uses the built-in table
    pub inbound_rules_path: Option<PathBuf>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            hours_per_shift: DEFAULT_HOURS_PER_SHIFT,
            shift_lead_hours: DEFAULT_SHIFT_LEAD_HOURS,
            inbound_rules_path: None,
        }
    }
}

impl TrackingConfig {
    /// Create a new TrackingConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOURS_PER_SHIFT`: Hours in one shift (default: 6.5)
    /// - `SHIFT_LEAD_HOURS`: Hours credited per shift-lead record (default: 11.0)
    /// - `INBOUND_RULES_PATH`: TOML or JSON inbound rule table (default: built-in table)
    pub fn from_env() -> Result<Self> {
        let hours_per_shift = std::env::var("HOURS_PER_SHIFT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_HOURS_PER_SHIFT);

        let shift_lead_hours = std::env::var("SHIFT_LEAD_HOURS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_SHIFT_LEAD_HOURS);

        let inbound_rules_path = std::env::var("INBOUND_RULES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(TrackingConfig {
            hours_per_shift,
            shift_lead_hours,
            inbound_rules_path,
        })
    }

    pub fn rule_settings(&self) -> RuleSettings {
        RuleSettings {
            hours_per_shift: self.hours_per_shift,
            shift_lead_hours: self.shift_lead_hours,
        }
    }

    /// Load the rule table and build the engine
    pub fn rule_engine(&self) -> Result<RuleEngine> {
        let table = match &self.inbound_rules_path {
            Some(path) => InboundRuleTable::from_file(path)?,
            None => InboundRuleTable::default(),
        };

        RuleEngine::new(self.rule_settings(), table).context("invalid shift settings")
    }
}
