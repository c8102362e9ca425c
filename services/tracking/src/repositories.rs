//! Work-record storage
//!
//! Listings are ordered by record date, newest first. `update` and `delete`
//! match on both id and owner, so a row deleted after the caller's ownership
//! check simply reports no match.

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewWorkRecord, WorkRecord};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryWorkRecordRepository;
pub use postgres::PgWorkRecordRepository;

/// Freshly derived values for one stored record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedValues {
    pub id: Uuid,
    pub working_hours: f64,
    pub working_shifts: f64,
}

pub trait WorkRecordRepository: Send + Sync {
    fn create(&self, input: NewWorkRecord)
    -> impl Future<Output = DatabaseResult<WorkRecord>> + Send;
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<WorkRecord>>> + Send;
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Vec<WorkRecord>>> + Send;

    /// Records of `user_id` dated in `[from, until)`.
    fn list_by_date_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> impl Future<Output = DatabaseResult<Vec<WorkRecord>>> + Send;

    /// Store every mutable field of `record`. `None` when no row with that id
    /// and owner exists.
    fn update(
        &self,
        record: &WorkRecord,
    ) -> impl Future<Output = DatabaseResult<Option<WorkRecord>>> + Send;

    /// Returns whether a row was removed.
    fn delete(&self, id: Uuid, user_id: Uuid) -> impl Future<Output = DatabaseResult<bool>> + Send;

    /// Every record of every user, for offline maintenance.
    fn list_all(&self) -> impl Future<Output = DatabaseResult<Vec<WorkRecord>>> + Send;

    /// Overwrite only the hours and shifts of each listed record, all or
    /// nothing. Returns the ids that matched a row; missing ids are skipped.
    fn set_derived(
        &self,
        values: &[DerivedValues],
    ) -> impl Future<Output = DatabaseResult<Vec<Uuid>>> + Send;
}
