//! SQL implementation of the work-schedule repository

use crate::error::DbError;
use crate::repositories::work_schedules::{WorkDayTemplate, WorkScheduleRepository};
use crate::DbClient;
use agendify_common::services::BoxFuture;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const COLUMNS: &str = "staff_id, tenant_id, day_of_week, is_active, start_time, end_time";

/// SQL implementation of the work-schedule repository
#[derive(Debug, Clone)]
pub struct SqlWorkScheduleRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlWorkScheduleRepository {
    /// Create a new SQL work-schedule repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn row_to_template(row: &AnyRow) -> Result<WorkDayTemplate, DbError> {
    let staff_id: String = row
        .try_get("staff_id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let tenant_id: String = row
        .try_get("tenant_id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let day_of_week: i64 = row
        .try_get("day_of_week")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let is_active: i64 = row
        .try_get("is_active")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(WorkDayTemplate {
        staff_id: Uuid::parse_str(&staff_id)
            .map_err(|e| DbError::DecodeError(format!("bad staff id: {e}")))?,
        tenant_id: Uuid::parse_str(&tenant_id)
            .map_err(|e| DbError::DecodeError(format!("bad tenant id: {e}")))?,
        day_of_week: u8::try_from(day_of_week)
            .map_err(|_| DbError::DecodeError(format!("bad day_of_week: {day_of_week}")))?,
        is_active: is_active != 0,
        start_time: row
            .try_get("start_time")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        end_time: row
            .try_get("end_time")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
    })
}

impl WorkScheduleRepository for SqlWorkScheduleRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing work-schedule schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS work_schedules (
                    staff_id TEXT NOT NULL,
                    tenant_id TEXT NOT NULL,
                    day_of_week INTEGER NOT NULL,
                    is_active INTEGER NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    PRIMARY KEY (staff_id, day_of_week)
                )
            "#;
            self.db_client.execute(query).await?;

            Ok(())
        })
    }

    fn find_day(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        day_of_week: u8,
    ) -> BoxFuture<'_, Option<WorkDayTemplate>, DbError> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM work_schedules \
                 WHERE tenant_id = $1 AND staff_id = $2 AND day_of_week = $3"
            ))
            .bind(tenant_id.to_string())
            .bind(staff_id.to_string())
            .bind(i64::from(day_of_week))
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row.as_ref().map(row_to_template).transpose()
        })
    }

    fn week(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
    ) -> BoxFuture<'_, Vec<WorkDayTemplate>, DbError> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM work_schedules \
                 WHERE tenant_id = $1 AND staff_id = $2 ORDER BY day_of_week"
            ))
            .bind(tenant_id.to_string())
            .bind(staff_id.to_string())
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            rows.iter().map(row_to_template).collect()
        })
    }

    fn replace_week(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        week: Vec<WorkDayTemplate>,
    ) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Replacing week schedule for staff {}", staff_id);

            let mut tx = self.db_client.begin().await?;

            sqlx::query("DELETE FROM work_schedules WHERE tenant_id = $1 AND staff_id = $2")
                .bind(tenant_id.to_string())
                .bind(staff_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            for day in &week {
                sqlx::query(
                    r#"
                    INSERT INTO work_schedules
                        (staff_id, tenant_id, day_of_week, is_active, start_time, end_time)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(staff_id.to_string())
                .bind(tenant_id.to_string())
                .bind(i64::from(day.day_of_week))
                .bind(i64::from(day.is_active))
                .bind(&day.start_time)
                .bind(&day.end_time)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
            }

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            Ok(())
        })
    }
}
