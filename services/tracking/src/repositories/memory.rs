//! In-process work-record store

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{DerivedValues, WorkRecordRepository};
use crate::models::{NewWorkRecord, WorkRecord};

#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkRecordRepository {
    records: Arc<Mutex<HashMap<Uuid, WorkRecord>>>,
}

impl InMemoryWorkRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect<F>(&self, keep: F) -> Vec<WorkRecord>
    where
        F: Fn(&WorkRecord) -> bool,
    {
        let records = self.records.lock().await;
        let mut selected: Vec<WorkRecord> =
            records.values().filter(|&r| keep(r)).cloned().collect();
        selected.sort_by(|a, b| b.date.cmp(&a.date));
        selected
    }
}

impl WorkRecordRepository for InMemoryWorkRecordRepository {
    async fn create(&self, input: NewWorkRecord) -> DatabaseResult<WorkRecord> {
        let now = Utc::now();
        let record = WorkRecord {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            category: input.category,
            inbound_rule: input.inbound_rule,
            outbound_subtype: input.outbound_subtype,
            emergency_call: input.emergency_call,
            holiday_call: input.holiday_call,
            working_hours: input.working_hours,
            working_shifts: input.working_shifts,
            date: input.date,
            created_at: now,
            updated_at: now,
        };

        self.records.lock().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<WorkRecord>> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<WorkRecord>> {
        Ok(self.collect(|r| r.user_id == user_id).await)
    }

    async fn list_by_date_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DatabaseResult<Vec<WorkRecord>> {
        Ok(self
            .collect(|r| r.user_id == user_id && r.date >= from && r.date < until)
            .await)
    }

    async fn update(&self, record: &WorkRecord) -> DatabaseResult<Option<WorkRecord>> {
        let mut records = self.records.lock().await;

        match records.get_mut(&record.id) {
            Some(stored) if stored.user_id == record.user_id => {
                *stored = WorkRecord {
                    created_at: stored.created_at,
                    updated_at: Utc::now(),
                    ..record.clone()
                };
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> DatabaseResult<bool> {
        let mut records = self.records.lock().await;

        match records.get(&id) {
            Some(stored) if stored.user_id == user_id => Ok(records.remove(&id).is_some()),
            _ => Ok(false),
        }
    }

    async fn list_all(&self) -> DatabaseResult<Vec<WorkRecord>> {
        Ok(self.collect(|_| true).await)
    }

    async fn set_derived(&self, values: &[DerivedValues]) -> DatabaseResult<Vec<Uuid>> {
        let mut records = self.records.lock().await;
        let now = Utc::now();

        Ok(values
            .iter()
            .filter_map(|value| {
                let stored = records.get_mut(&value.id)?;
                stored.working_hours = value.working_hours;
                stored.working_shifts = value.working_shifts;
                stored.updated_at = now;
                Some(value.id)
            })
            .collect())
    }
}
