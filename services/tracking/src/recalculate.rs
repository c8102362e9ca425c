//! Offline re-derivation of stored work records
//!
//! Runs the live rule engine over every stored record. Planning happens
//! first and is all-or-nothing: a single record that no longer derives
//! aborts the run before anything is written. Writes touch only the derived
//! hours and shifts, so edits made to other fields in the meantime survive.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::TrackResult;
use crate::models::{WorkCategory, WorkRecord};
use crate::repositories::{DerivedValues, WorkRecordRepository};
use crate::rules::RuleEngine;

const TOLERANCE: f64 = 1e-9;

/// Old and new derived values of one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordChange {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: WorkCategory,
    pub old_hours: f64,
    pub new_hours: f64,
    pub old_shifts: f64,
    pub new_shifts: f64,
}

/// Planned writes, one set of derived values per change
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub scanned: usize,
    pub changes: Vec<RecordChange>,
    pub updates: Vec<DerivedValues>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalculationReport {
    pub scanned: usize,
    pub changes: Vec<RecordChange>,
    pub applied: bool,
}

#[derive(Debug, Clone)]
pub struct Recalculator<R> {
    repo: R,
    engine: RuleEngine,
}

impl<R: WorkRecordRepository> Recalculator<R> {
    pub fn new(repo: R, engine: RuleEngine) -> Self {
        Self { repo, engine }
    }

    /// Recompute every record without writing anything
    pub async fn plan(&self) -> TrackResult<Plan> {
        let records = self.repo.list_all().await?;
        let mut plan = Plan {
            scanned: records.len(),
            ..Default::default()
        };

        for record in records {
            let id = record.id;
            let recomputed = self.engine.recompute(record.clone()).map_err(|e| {
                warn!("Work record {} cannot be re-derived: {}", id, e);
                e
            })?;

            if unchanged(&record, &recomputed) {
                continue;
            }

            plan.changes.push(RecordChange {
                id,
                user_id: record.user_id,
                category: record.category,
                old_hours: record.working_hours,
                new_hours: recomputed.working_hours,
                old_shifts: record.working_shifts,
                new_shifts: recomputed.working_shifts,
            });
            plan.updates.push(DerivedValues {
                id,
                working_hours: recomputed.working_hours,
                working_shifts: recomputed.working_shifts,
            });
        }

        Ok(plan)
    }

    /// Write a plan's derived values in one batch, returning the ids written
    pub async fn apply(&self, plan: &Plan) -> TrackResult<Vec<Uuid>> {
        let written = self.repo.set_derived(&plan.updates).await?;

        for change in &plan.changes {
            if written.contains(&change.id) {
                info!(
                    "Work record {}: hours {} -> {}, shifts {:.3} -> {:.3}",
                    change.id,
                    change.old_hours,
                    change.new_hours,
                    change.old_shifts,
                    change.new_shifts
                );
            } else {
                warn!("Work record {} disappeared before update", change.id);
            }
        }

        Ok(written)
    }

    /// Plan, then write the changes unless `dry_run`
    pub async fn run(&self, dry_run: bool) -> TrackResult<RecalculationReport> {
        let plan = self.plan().await?;
        info!(
            "Scanned {} work records, {} need recalculation",
            plan.scanned,
            plan.changes.len()
        );

        if !dry_run {
            self.apply(&plan).await?;
        }

        Ok(RecalculationReport {
            scanned: plan.scanned,
            changes: plan.changes,
            applied: !dry_run,
        })
    }
}

fn unchanged(before: &WorkRecord, after: &WorkRecord) -> bool {
    (before.working_hours - after.working_hours).abs() < TOLERANCE
        && (before.working_shifts - after.working_shifts).abs() < TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewWorkRecord;
    use crate::repositories::InMemoryWorkRecordRepository;
    use crate::rules::{InboundRuleTable, RuleSettings};
    use chrono::Utc;

    fn engine() -> RuleEngine {
        RuleEngine::new(RuleSettings::default(), InboundRuleTable::default()).unwrap()
    }

    fn stale_shift_lead(user_id: Uuid) -> NewWorkRecord {
        // Stored under an old 8-hour shift-lead constant.
        NewWorkRecord {
            user_id,
            category: WorkCategory::ShiftLead,
            inbound_rule: None,
            outbound_subtype: None,
            emergency_call: false,
            holiday_call: false,
            working_hours: 8.0,
            working_shifts: 8.0 / 6.5,
            date: Utc::now(),
        }
    }

    fn current_inbound(user_id: Uuid) -> NewWorkRecord {
        NewWorkRecord {
            user_id,
            category: WorkCategory::Inbound,
            inbound_rule: Some("101".into()),
            outbound_subtype: None,
            emergency_call: false,
            holiday_call: false,
            working_hours: 6.5,
            working_shifts: 1.0,
            date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn dry_run_reports_without_writing() {
        let repo = InMemoryWorkRecordRepository::new();
        let user = Uuid::new_v4();
        let stale = repo.create(stale_shift_lead(user)).await.unwrap();
        repo.create(current_inbound(user)).await.unwrap();

        let report = Recalculator::new(repo.clone(), engine())
            .run(true)
            .await
            .unwrap();

        assert_eq!(report.scanned, 2);
        assert!(!report.applied);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].id, stale.id);
        assert_eq!(report.changes[0].new_hours, 11.0);

        let stored = repo.find_by_id(stale.id).await.unwrap().unwrap();
        assert_eq!(stored.working_hours, 8.0);
    }

    #[tokio::test]
    async fn apply_writes_and_second_run_is_clean() {
        let repo = InMemoryWorkRecordRepository::new();
        let stale = repo
            .create(stale_shift_lead(Uuid::new_v4()))
            .await
            .unwrap();
        let recalculator = Recalculator::new(repo.clone(), engine());

        let report = recalculator.run(false).await.unwrap();
        assert!(report.applied);

        let stored = repo.find_by_id(stale.id).await.unwrap().unwrap();
        assert_eq!(stored.working_hours, 11.0);
        assert_eq!(stored.working_shifts, 11.0 / 6.5);

        assert!(recalculator.plan().await.unwrap().changes.is_empty());
    }

    #[tokio::test]
    async fn apply_keeps_edits_made_after_planning() {
        let repo = InMemoryWorkRecordRepository::new();
        let stale = repo
            .create(stale_shift_lead(Uuid::new_v4()))
            .await
            .unwrap();
        let recalculator = Recalculator::new(repo.clone(), engine());

        let plan = recalculator.plan().await.unwrap();

        let mut edited = stale.clone();
        edited.emergency_call = true;
        edited.holiday_call = true;
        repo.update(&edited).await.unwrap().unwrap();

        let written = recalculator.apply(&plan).await.unwrap();
        assert_eq!(written, vec![stale.id]);

        let stored = repo.find_by_id(stale.id).await.unwrap().unwrap();
        assert!(stored.emergency_call);
        assert!(stored.holiday_call);
        assert_eq!(stored.working_hours, 11.0);
        assert_eq!(stored.working_shifts, 11.0 / 6.5);
    }

    #[tokio::test]
    async fn records_deleted_after_planning_are_skipped() {
        let repo = InMemoryWorkRecordRepository::new();
        let user = Uuid::new_v4();
        let gone = repo.create(stale_shift_lead(user)).await.unwrap();
        let kept = repo.create(stale_shift_lead(user)).await.unwrap();
        let recalculator = Recalculator::new(repo.clone(), engine());

        let plan = recalculator.plan().await.unwrap();
        assert_eq!(plan.updates.len(), 2);
        assert!(repo.delete(gone.id, user).await.unwrap());

        let written = recalculator.apply(&plan).await.unwrap();
        assert_eq!(written, vec![kept.id]);
        assert_eq!(
            repo.find_by_id(kept.id).await.unwrap().unwrap().working_hours,
            11.0
        );
    }

    #[tokio::test]
    async fn an_underivable_record_aborts_before_writing() {
        let repo = InMemoryWorkRecordRepository::new();
        let user = Uuid::new_v4();
        let stale = repo.create(stale_shift_lead(user)).await.unwrap();
        repo.create(NewWorkRecord {
            inbound_rule: Some("999".into()),
            ..current_inbound(user)
        })
        .await
        .unwrap();

        let result = Recalculator::new(repo.clone(), engine()).run(false).await;
        assert!(result.is_err());

        let stored = repo.find_by_id(stale.id).await.unwrap().unwrap();
        assert_eq!(stored.working_hours, 8.0);
    }
}
