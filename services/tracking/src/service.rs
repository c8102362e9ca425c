//! Work-record service: owner-checked CRUD, date-range listing and summaries

use chrono::Days;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{TrackError, TrackResult};
use crate::models::{
    CreateWorkRecordRequest, NewWorkRecord, OutboundSubtype, UpdateWorkRecordRequest, WorkCategory,
    WorkRecord, parse_date, parse_day, start_of_day,
};
use crate::repositories::WorkRecordRepository;
use crate::rules::{RuleEngine, RuleInput};
use crate::summary::{Summary, summarize};

#[derive(Debug, Clone)]
pub struct WorkRecordService<R> {
    repo: R,
    engine: RuleEngine,
}

impl<R: WorkRecordRepository> WorkRecordService<R> {
    pub fn new(repo: R, engine: RuleEngine) -> Self {
        Self { repo, engine }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Derive and store a new record for `user_id`
    #[instrument(level = "debug", skip(self, request), fields(work_type = %request.work_type))]
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateWorkRecordRequest,
    ) -> TrackResult<WorkRecord> {
        let category: WorkCategory = request.work_type.trim().parse()?;
        let outbound_subtype = request
            .outbound_subtype
            .as_deref()
            .map(str::parse::<OutboundSubtype>)
            .transpose()?;
        let date = parse_date(&request.date)?;

        let derived = self.engine.derive(&RuleInput {
            category,
            inbound_rule: request.inbound_rule.as_deref(),
            outbound_subtype,
            holiday_call: request.holiday_call,
            working_hours: request.working_hours,
        })?;

        let record = self
            .repo
            .create(NewWorkRecord {
                user_id,
                category,
                inbound_rule: derived.inbound_rule,
                outbound_subtype: derived.outbound_subtype,
                emergency_call: request.emergency_call,
                holiday_call: request.holiday_call,
                working_hours: derived.hours,
                working_shifts: derived.shifts,
                date,
            })
            .await?;

        Ok(record)
    }

    /// One record, if it belongs to `user_id`
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> TrackResult<WorkRecord> {
        let record = self.repo.find_by_id(id).await?.ok_or(TrackError::NotFound)?;

        if record.user_id != user_id {
            return Err(TrackError::Forbidden);
        }

        Ok(record)
    }

    /// All records of `user_id`, newest first
    #[instrument(level = "debug", skip(self))]
    pub async fn list(&self, user_id: Uuid) -> TrackResult<Vec<WorkRecord>> {
        Ok(self.repo.list_by_user(user_id).await?)
    }

    /// Records dated within the inclusive day range `start..=end` (`YYYY-MM-DD`)
    #[instrument(level = "debug", skip(self))]
    pub async fn list_by_date_range(
        &self,
        user_id: Uuid,
        start: &str,
        end: &str,
    ) -> TrackResult<Vec<WorkRecord>> {
        let first = parse_day(start)?;
        let last = parse_day(end)?;

        if first > last {
            return Err(TrackError::ValidationFailure(format!(
                "start date {first} is after end date {last}"
            )));
        }

        let until = last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| TrackError::ValidationFailure(format!("end date {last} out of range")))?;

        Ok(self
            .repo
            .list_by_date_range(user_id, start_of_day(first), start_of_day(until))
            .await?)
    }

    /// Merge the provided fields, re-derive and store
    #[instrument(level = "debug", skip(self, request))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateWorkRecordRequest,
    ) -> TrackResult<WorkRecord> {
        let current = self.get(user_id, id).await?;
        let changes = request.parse()?;

        let merged = current.merge(&changes);
        let recomputed = self.engine.recompute(merged)?;

        self.repo
            .update(&recomputed)
            .await?
            .ok_or(TrackError::NotFound)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> TrackResult<()> {
        self.get(user_id, id).await?;

        if self.repo.delete(id, user_id).await? {
            Ok(())
        } else {
            Err(TrackError::NotFound)
        }
    }

    /// Shift totals over the inclusive day range `start..=end`
    #[instrument(level = "debug", skip(self))]
    pub async fn summary(&self, user_id: Uuid, start: &str, end: &str) -> TrackResult<Summary> {
        let records = self.list_by_date_range(user_id, start, end).await?;
        Ok(summarize(&records))
    }
}
