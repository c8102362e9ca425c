//! Work-record repository over the `track_items` table

use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::{DerivedValues, WorkRecordRepository};
use crate::models::{NewWorkRecord, OutboundSubtype, WorkCategory, WorkRecord};

const COLUMNS: &str = "id, user_id, type, inbound_rule, subtype, emergency_call, holiday_call, \
                       working_hours, working_shifts, date, created_at, updated_at";

/// Work-record repository for database operations
#[derive(Debug, Clone)]
pub struct PgWorkRecordRepository {
    pool: PgPool,
}

impl PgWorkRecordRepository {
    /// Create a new work-record repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(&self, query: &str, binds: RangeBinds) -> DatabaseResult<Vec<WorkRecord>> {
        let mut q = sqlx::query(query);
        if let Some(user_id) = binds.user_id {
            q = q.bind(user_id);
        }
        if let Some((from, until)) = binds.window {
            q = q.bind(from).bind(until);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        rows.iter().map(record_from_row).collect()
    }
}

#[derive(Default)]
struct RangeBinds {
    user_id: Option<Uuid>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

fn record_from_row(row: &PgRow) -> DatabaseResult<WorkRecord> {
    let corrupt = |e: sqlx::Error| DatabaseError::Corrupt(format!("track_items row: {}", e));

    let id: Uuid = row.try_get("id").map_err(corrupt)?;
    let category: String = row.try_get("type").map_err(corrupt)?;
    let subtype: Option<String> = row.try_get("subtype").map_err(corrupt)?;

    let category = category
        .parse::<WorkCategory>()
        .map_err(|e| DatabaseError::Corrupt(format!("track item {}: {}", id, e)))?;
    let outbound_subtype = subtype
        .as_deref()
        .map(str::parse::<OutboundSubtype>)
        .transpose()
        .map_err(|e| DatabaseError::Corrupt(format!("track item {}: {}", id, e)))?;

    Ok(WorkRecord {
        id,
        user_id: row.try_get("user_id").map_err(corrupt)?,
        category,
        inbound_rule: row.try_get("inbound_rule").map_err(corrupt)?,
        outbound_subtype,
        emergency_call: row.try_get("emergency_call").map_err(corrupt)?,
        holiday_call: row.try_get("holiday_call").map_err(corrupt)?,
        working_hours: row.try_get("working_hours").map_err(corrupt)?,
        working_shifts: row.try_get("working_shifts").map_err(corrupt)?,
        date: row.try_get("date").map_err(corrupt)?,
        created_at: row.try_get("created_at").map_err(corrupt)?,
        updated_at: row.try_get("updated_at").map_err(corrupt)?,
    })
}

impl WorkRecordRepository for PgWorkRecordRepository {
    async fn create(&self, input: NewWorkRecord) -> DatabaseResult<WorkRecord> {
        info!(
            "Creating {} work record for user: {}",
            input.category, input.user_id
        );

        let query = format!(
            r#"
            INSERT INTO track_items
                (id, user_id, type, inbound_rule, subtype, emergency_call, holiday_call,
                 working_hours, working_shifts, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(input.user_id)
            .bind(input.category.as_str())
            .bind(&input.inbound_rule)
            .bind(input.outbound_subtype.map(|s| s.as_str()))
            .bind(input.emergency_call)
            .bind(input.holiday_call)
            .bind(input.working_hours)
            .bind(input.working_shifts)
            .bind(input.date)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        record_from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<WorkRecord>> {
        debug!("Finding work record by ID: {}", id);

        let query = format!("SELECT {} FROM track_items WHERE id = $1", COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<WorkRecord>> {
        let query = format!(
            "SELECT {} FROM track_items WHERE user_id = $1 ORDER BY date DESC",
            COLUMNS
        );
        self.fetch_many(
            &query,
            RangeBinds {
                user_id: Some(user_id),
                ..Default::default()
            },
        )
        .await
    }

    async fn list_by_date_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DatabaseResult<Vec<WorkRecord>> {
        debug!("Listing work records of {} from {} until {}", user_id, from, until);

        let query = format!(
            r#"
            SELECT {} FROM track_items
            WHERE user_id = $1 AND date >= $2 AND date < $3
            ORDER BY date DESC
            "#,
            COLUMNS
        );
        self.fetch_many(
            &query,
            RangeBinds {
                user_id: Some(user_id),
                window: Some((from, until)),
            },
        )
        .await
    }

    async fn update(&self, record: &WorkRecord) -> DatabaseResult<Option<WorkRecord>> {
        info!("Updating work record: {}", record.id);

        let query = format!(
            r#"
            UPDATE track_items
            SET type = $3, inbound_rule = $4, subtype = $5, emergency_call = $6,
                holiday_call = $7, working_hours = $8, working_shifts = $9, date = $10,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(record.id)
            .bind(record.user_id)
            .bind(record.category.as_str())
            .bind(&record.inbound_rule)
            .bind(record.outbound_subtype.map(|s| s.as_str()))
            .bind(record.emergency_call)
            .bind(record.holiday_call)
            .bind(record.working_hours)
            .bind(record.working_shifts)
            .bind(record.date)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting work record: {}", id);

        let result = sqlx::query("DELETE FROM track_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> DatabaseResult<Vec<WorkRecord>> {
        let query = format!("SELECT {} FROM track_items ORDER BY date DESC", COLUMNS);
        self.fetch_many(&query, RangeBinds::default()).await
    }

    async fn set_derived(&self, values: &[DerivedValues]) -> DatabaseResult<Vec<Uuid>> {
        info!("Writing derived values for {} work records", values.len());

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_query)?;
        let mut written = Vec::with_capacity(values.len());

        for value in values {
            let result = sqlx::query(
                r#"
                UPDATE track_items
                SET working_hours = $2, working_shifts = $3, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(value.id)
            .bind(value.working_hours)
            .bind(value.working_shifts)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from_query)?;

            if result.rows_affected() > 0 {
                written.push(value.id);
            }
        }

        tx.commit().await.map_err(DatabaseError::from_query)?;
        Ok(written)
    }
}
