//! Derivation of hours and shifts per work category
//!
//! | Category  | Hours                                  | Shifts                 |
//! |-----------|----------------------------------------|------------------------|
//! | ShiftLead | `shift_lead_hours`                     | hours / hours_per_shift |
//! | Inbound   | rule table, holiday or workday column  | hours / hours_per_shift |
//! | Outbound  | caller supplied, > 0                   | hours / hours_per_shift |

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{TrackError, TrackResult};
use crate::models::{OutboundSubtype, WorkCategory, WorkRecord};

/// Hours that make up one shift
pub const DEFAULT_HOURS_PER_SHIFT: f64 = 6.5;

/// Fixed hours credited for a shift-lead record
pub const DEFAULT_SHIFT_LEAD_HOURS: f64 = 11.0;

/// Hours credited by one inbound rule code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InboundRule {
    pub workday_hours: f64,
    pub holiday_hours: f64,
}

impl InboundRule {
    pub fn hours(&self, holiday: bool) -> f64 {
        if holiday {
            self.holiday_hours
        } else {
            self.workday_hours
        }
    }
}

/// Read-only mapping from inbound rule code to hours
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRuleTable {
    rules: BTreeMap<String, InboundRule>,
}

#[derive(Deserialize)]
struct RuleFile {
    rules: BTreeMap<String, InboundRule>,
}

impl InboundRuleTable {
    /// Build a table; codes must be non-blank and every hours value finite and
    /// positive.
    pub fn new<I, K>(rules: I) -> TrackResult<Self>
    where
        I: IntoIterator<Item = (K, InboundRule)>,
        K: Into<String>,
    {
        let rules: BTreeMap<String, InboundRule> =
            rules.into_iter().map(|(code, rule)| (code.into(), rule)).collect();

        for (code, rule) in &rules {
            if code.trim().is_empty() {
                return Err(TrackError::ValidationFailure(
                    "inbound rule codes must not be blank".to_string(),
                ));
            }
            if !is_positive(rule.workday_hours) || !is_positive(rule.holiday_hours) {
                return Err(TrackError::ValidationFailure(format!(
                    "inbound rule {code} must have positive hours"
                )));
            }
        }

        Ok(Self { rules })
    }

    /// Load a table from a TOML or JSON file with a `[rules.<code>]` section
    /// per code.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let file: RuleFile = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .with_context(|| format!("failed to read inbound rules from {}", path.display()))?;

        Self::new(file.rules).with_context(|| format!("invalid inbound rules in {}", path.display()))
    }

    pub fn get(&self, code: &str) -> Option<&InboundRule> {
        self.rules.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for InboundRuleTable {
    fn default() -> Self {
        let rule = |workday_hours, holiday_hours| InboundRule {
            workday_hours,
            holiday_hours,
        };

        Self {
            rules: BTreeMap::from([
                ("101".to_string(), rule(6.5, 6.5)),
                ("102".to_string(), rule(11.0, 13.0)),
                ("103".to_string(), rule(10.0, 10.0)),
                ("104".to_string(), rule(13.0, 13.0)),
                ("105".to_string(), rule(6.5, 10.0)),
            ]),
        }
    }
}

/// Process-wide constants of the derivation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSettings {
    pub hours_per_shift: f64,
    pub shift_lead_hours: f64,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            hours_per_shift: DEFAULT_HOURS_PER_SHIFT,
            shift_lead_hours: DEFAULT_SHIFT_LEAD_HOURS,
        }
    }
}

/// Inputs that decide a record's hours
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub category: WorkCategory,
    pub inbound_rule: Option<&'a str>,
    pub outbound_subtype: Option<OutboundSubtype>,
    pub holiday_call: bool,
    pub working_hours: Option<f64>,
}

/// Result of a derivation; discriminators that do not apply are `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub hours: f64,
    pub shifts: f64,
    pub inbound_rule: Option<String>,
    pub outbound_subtype: Option<OutboundSubtype>,
}

/// Stateless derivation over an injected rule table
#[derive(Debug, Clone)]
pub struct RuleEngine {
    settings: RuleSettings,
    table: Arc<InboundRuleTable>,
}

impl RuleEngine {
    pub fn new(settings: RuleSettings, table: InboundRuleTable) -> TrackResult<Self> {
        if !is_positive(settings.hours_per_shift) {
            return Err(TrackError::ValidationFailure(
                "hours per shift must be a positive number".to_string(),
            ));
        }
        if !is_positive(settings.shift_lead_hours) {
            return Err(TrackError::ValidationFailure(
                "shift lead hours must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            settings,
            table: Arc::new(table),
        })
    }

    pub fn settings(&self) -> RuleSettings {
        self.settings
    }

    pub fn table(&self) -> &InboundRuleTable {
        &self.table
    }

    /// Compute hours and shifts for one set of inputs
    pub fn derive(&self, input: &RuleInput<'_>) -> TrackResult<Derivation> {
        let (hours, inbound_rule, outbound_subtype) = match input.category {
            WorkCategory::ShiftLead => (self.settings.shift_lead_hours, None, None),
            WorkCategory::Inbound => {
                let code = input.inbound_rule.map(str::trim).unwrap_or_default();
                let rule = self
                    .table
                    .get(code)
                    .ok_or_else(|| TrackError::UnknownRuleCode(code.to_string()))?;

                (rule.hours(input.holiday_call), Some(code.to_string()), None)
            }
            WorkCategory::Outbound => {
                let hours = input
                    .working_hours
                    .filter(|hours| is_positive(*hours))
                    .ok_or(TrackError::InvalidHours)?;
                let subtype = input.outbound_subtype.ok_or(TrackError::MissingSubtype)?;

                (hours, None, Some(subtype))
            }
        };

        Ok(Derivation {
            hours,
            shifts: hours / self.settings.hours_per_shift,
            inbound_rule,
            outbound_subtype,
        })
    }

    /// Re-derive a record from its own fields, returning the updated value.
    pub fn recompute(&self, record: WorkRecord) -> TrackResult<WorkRecord> {
        let derivation = self.derive(&RuleInput {
            category: record.category,
            inbound_rule: record.inbound_rule.as_deref(),
            outbound_subtype: record.outbound_subtype,
            holiday_call: record.holiday_call,
            working_hours: Some(record.working_hours),
        })?;

        Ok(WorkRecord {
            working_hours: derivation.hours,
            working_shifts: derivation.shifts,
            inbound_rule: derivation.inbound_rule,
            outbound_subtype: derivation.outbound_subtype,
            ..record
        })
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
