//! Work-record models and their wire names

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TrackError, TrackResult};

pub mod work_record;

pub use work_record::{
    CreateWorkRecordRequest, NewWorkRecord, UpdateWorkRecordRequest, WorkRecord, WorkRecordChanges,
};

/// Work category, driving which derivation rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkCategory {
    ShiftLead,
    Inbound,
    Outbound,
}

impl WorkCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkCategory::ShiftLead => "shift_lead",
            WorkCategory::Inbound => "inbound",
            WorkCategory::Outbound => "outbound",
        }
    }
}

impl fmt::Display for WorkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for WorkCategory {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shift_lead" => Ok(WorkCategory::ShiftLead),
            "inbound" => Ok(WorkCategory::Inbound),
            "outbound" => Ok(WorkCategory::Outbound),
            other => Err(TrackError::UnknownWorkType(other.to_string())),
        }
    }
}

/// Kind of outbound work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundSubtype {
    Regular,
    Extra,
}

impl OutboundSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboundSubtype::Regular => "regular",
            OutboundSubtype::Extra => "extra",
        }
    }
}

impl FromStr for OutboundSubtype {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(OutboundSubtype::Regular),
            "extra" => Ok(OutboundSubtype::Extra),
            other => Err(TrackError::ValidationFailure(format!(
                "unknown outbound subtype: {other}"
            ))),
        }
    }
}

/// Parse a record date: RFC 3339, or `YYYY-MM-DD` meaning midnight UTC
pub fn parse_date(value: &str) -> TrackResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    parse_day(value).map(start_of_day)
}

/// Parse a calendar day in `YYYY-MM-DD` form
pub fn parse_day(value: &str) -> TrackResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TrackError::ValidationFailure(format!(
            "invalid date {value:?}, expected RFC 3339 or YYYY-MM-DD"
        ))
    })
}

pub(crate) fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
