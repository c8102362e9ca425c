//! Work-record error types

use common::error::DatabaseError;
use thiserror::Error;

/// Classified failures of the work-record core
#[derive(Error, Debug)]
pub enum TrackError {
    /// Malformed caller input (dates, subtype names, empty fields)
    #[error("validation failed: {0}")]
    ValidationFailure(String),

    #[error("work record not found")]
    NotFound,

    /// The record exists but belongs to another user
    #[error("work record belongs to another user")]
    Forbidden,

    #[error("unknown work type: {0}")]
    UnknownWorkType(String),

    #[error("unknown inbound rule code: {0}")]
    UnknownRuleCode(String),

    /// Outbound hours missing, non-finite or not positive
    #[error("working hours must be a positive number")]
    InvalidHours,

    #[error("outbound work requires a subtype")]
    MissingSubtype,

    /// Storage failure not attributable to caller input
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl From<DatabaseError> for TrackError {
    fn from(err: DatabaseError) -> Self {
        TrackError::InternalFailure(err.to_string())
    }
}

/// Type alias for work-record results
pub type TrackResult<T> = Result<T, TrackError>;
