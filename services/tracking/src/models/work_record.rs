//! Work record model, request payloads and the pure update merge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OutboundSubtype, WorkCategory, parse_date};
use crate::error::TrackResult;

/// A stored work entry with its derived hours and shifts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "work_type")]
    pub category: WorkCategory,
    /// Present only on inbound records
    pub inbound_rule: Option<String>,
    /// Present only on outbound records
    pub outbound_subtype: Option<OutboundSubtype>,
    pub emergency_call: bool,
    pub holiday_call: bool,
    pub working_hours: f64,
    pub working_shifts: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully derived record ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkRecord {
    pub user_id: Uuid,
    pub category: WorkCategory,
    pub inbound_rule: Option<String>,
    pub outbound_subtype: Option<OutboundSubtype>,
    pub emergency_call: bool,
    pub holiday_call: bool,
    pub working_hours: f64,
    pub working_shifts: f64,
    pub date: DateTime<Utc>,
}

/// Request to create a work record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkRecordRequest {
    pub work_type: String,
    #[serde(default)]
    pub inbound_rule: Option<String>,
    #[serde(default)]
    pub outbound_subtype: Option<String>,
    #[serde(default)]
    pub emergency_call: bool,
    #[serde(default)]
    pub holiday_call: bool,
    /// Required for outbound work, ignored otherwise
    #[serde(default)]
    pub working_hours: Option<f64>,
    pub date: String,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkRecordRequest {
    pub work_type: Option<String>,
    pub inbound_rule: Option<String>,
    pub outbound_subtype: Option<String>,
    pub emergency_call: Option<bool>,
    pub holiday_call: Option<bool>,
    pub working_hours: Option<f64>,
    pub date: Option<String>,
}

/// A parsed [`UpdateWorkRecordRequest`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkRecordChanges {
    pub category: Option<WorkCategory>,
    pub inbound_rule: Option<String>,
    pub outbound_subtype: Option<OutboundSubtype>,
    pub emergency_call: Option<bool>,
    pub holiday_call: Option<bool>,
    pub working_hours: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

impl UpdateWorkRecordRequest {
    /// Parse the wire strings; nothing is applied yet.
    pub fn parse(&self) -> TrackResult<WorkRecordChanges> {
        Ok(WorkRecordChanges {
            category: self
                .work_type
                .as_deref()
                .map(str::parse::<WorkCategory>)
                .transpose()?,
            inbound_rule: self.inbound_rule.clone(),
            outbound_subtype: self
                .outbound_subtype
                .as_deref()
                .map(str::parse::<OutboundSubtype>)
                .transpose()?,
            emergency_call: self.emergency_call,
            holiday_call: self.holiday_call,
            working_hours: self.working_hours,
            date: self.date.as_deref().map(parse_date).transpose()?,
        })
    }
}

impl WorkRecord {
    /// Overlay `changes` onto a copy of this record.
    ///
    /// Hours and shifts in the result are stale until the rule engine
    /// recomputes them; only an explicit `working_hours` is carried over.
    pub fn merge(&self, changes: &WorkRecordChanges) -> WorkRecord {
        WorkRecord {
            category: changes.category.unwrap_or(self.category),
            inbound_rule: changes
                .inbound_rule
                .clone()
                .or_else(|| self.inbound_rule.clone()),
            outbound_subtype: changes.outbound_subtype.or(self.outbound_subtype),
            emergency_call: changes.emergency_call.unwrap_or(self.emergency_call),
            holiday_call: changes.holiday_call.unwrap_or(self.holiday_call),
            working_hours: changes.working_hours.unwrap_or(self.working_hours),
            date: changes.date.unwrap_or(self.date),
            ..self.clone()
        }
    }
}
