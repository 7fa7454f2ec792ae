//! SQL implementation of the appointment repository

use crate::error::DbError;
use crate::repositories::appointments::{
    Appointment, AppointmentRepository, GuardedWrite, ReschedulePatch,
};
use crate::time::{decode_ts, encode_ts};
use crate::DbClient;
use agendify_common::services::BoxFuture;
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const COLUMNS: &str = "id, tenant_id, staff_id, service_id, client_id, \
                       start_time, end_time, status, external_event_id, created_at";

/// SQL implementation of the appointment repository
#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    /// Create a new SQL appointment repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn parse_uuid(row: &AnyRow, column: &str) -> Result<Uuid, DbError> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Uuid::parse_str(&raw).map_err(|e| DbError::DecodeError(format!("bad uuid in {column}: {e}")))
}

fn parse_instant(row: &AnyRow, column: &str) -> Result<DateTime<Utc>, DbError> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    decode_ts(&raw)
}

fn row_to_appointment(row: &AnyRow) -> Result<Appointment, DbError> {
    let status: String = row
        .try_get("status")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(Appointment {
        id: parse_uuid(row, "id")?,
        tenant_id: parse_uuid(row, "tenant_id")?,
        staff_id: parse_uuid(row, "staff_id")?,
        service_id: parse_uuid(row, "service_id")?,
        client_id: parse_uuid(row, "client_id")?,
        start_time: parse_instant(row, "start_time")?,
        end_time: parse_instant(row, "end_time")?,
        status: status.parse().map_err(DbError::DecodeError)?,
        external_event_id: row
            .try_get("external_event_id")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        created_at: parse_instant(row, "created_at")?,
    })
}

/// Count of live appointments overlapping `[start, end)` for a staff member,
/// excluding `exclude_id` when given. Runs on the supplied transaction so the
/// answer cannot go stale before the following write commits.
async fn count_overlaps(
    tx: &mut crate::client::DbTransaction<'_>,
    tenant_id: Uuid,
    staff_id: Uuid,
    start: &str,
    end: &str,
    exclude_id: Option<Uuid>,
) -> Result<i64, DbError> {
    let row = match exclude_id {
        Some(id) => {
            sqlx::query(
                r#"
                SELECT COUNT(*) AS conflicts FROM appointments
                WHERE tenant_id = $1 AND staff_id = $2 AND status <> 'cancelled'
                  AND id <> $3 AND start_time < $4 AND end_time > $5
                "#,
            )
            .bind(tenant_id.to_string())
            .bind(staff_id.to_string())
            .bind(id.to_string())
            .bind(end)
            .bind(start)
            .fetch_one(&mut **tx)
            .await
        }
        None => {
            sqlx::query(
                r#"
                SELECT COUNT(*) AS conflicts FROM appointments
                WHERE tenant_id = $1 AND staff_id = $2 AND status <> 'cancelled'
                  AND start_time < $3 AND end_time > $4
                "#,
            )
            .bind(tenant_id.to_string())
            .bind(staff_id.to_string())
            .bind(end)
            .bind(start)
            .fetch_one(&mut **tx)
            .await
        }
    }
    .map_err(|e| DbError::QueryError(e.to_string()))?;

    row.try_get::<i64, _>("conflicts")
        .map_err(|e| DbError::QueryError(e.to_string()))
}

impl AppointmentRepository for SqlAppointmentRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing appointment schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS appointments (
                    id TEXT PRIMARY KEY,
                    tenant_id TEXT NOT NULL,
                    staff_id TEXT NOT NULL,
                    service_id TEXT NOT NULL,
                    client_id TEXT NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'scheduled',
                    external_event_id TEXT,
                    created_at TEXT NOT NULL
                )
            "#;
            self.db_client.execute(query).await?;

            self.db_client
                .execute(
                    "CREATE INDEX IF NOT EXISTS idx_appointments_staff_start \
                     ON appointments (staff_id, start_time)",
                )
                .await?;

            Ok(())
        })
    }

    fn insert_if_free(&self, appointment: Appointment) -> BoxFuture<'_, bool, DbError> {
        Box::pin(async move {
            debug!(
                "Inserting appointment {} for staff {}",
                appointment.id, appointment.staff_id
            );

            let start = encode_ts(appointment.start_time);
            let end = encode_ts(appointment.end_time);

            let mut tx = self.db_client.begin().await?;

            let conflicts = count_overlaps(
                &mut tx,
                appointment.tenant_id,
                appointment.staff_id,
                &start,
                &end,
                None,
            )
            .await?;
            if conflicts > 0 {
                return Ok(false);
            }

            sqlx::query(
                r#"
                INSERT INTO appointments
                    (id, tenant_id, staff_id, service_id, client_id,
                     start_time, end_time, status, external_event_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(appointment.id.to_string())
            .bind(appointment.tenant_id.to_string())
            .bind(appointment.staff_id.to_string())
            .bind(appointment.service_id.to_string())
            .bind(appointment.client_id.to_string())
            .bind(&start)
            .bind(&end)
            .bind(appointment.status.as_str())
            .bind(appointment.external_event_id.as_deref())
            .bind(encode_ts(appointment.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            Ok(true)
        })
    }

    fn reschedule_if_free(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        patch: ReschedulePatch,
    ) -> BoxFuture<'_, GuardedWrite, DbError> {
        Box::pin(async move {
            debug!("Rescheduling appointment {} in tenant {}", id, tenant_id);

            let start = encode_ts(patch.start_time);
            let end = encode_ts(patch.end_time);

            let mut tx = self.db_client.begin().await?;

            let existing = sqlx::query(
                "SELECT id FROM appointments \
                 WHERE tenant_id = $1 AND id = $2 AND status <> 'cancelled'",
            )
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
            if existing.is_none() {
                return Ok(GuardedWrite::Missing);
            }

            let conflicts =
                count_overlaps(&mut tx, tenant_id, patch.staff_id, &start, &end, Some(id))
                    .await?;
            if conflicts > 0 {
                return Ok(GuardedWrite::SlotTaken);
            }

            sqlx::query(
                r#"
                UPDATE appointments
                SET staff_id = $1, service_id = $2, start_time = $3, end_time = $4,
                    status = 'rescheduled'
                WHERE tenant_id = $5 AND id = $6
                "#,
            )
            .bind(patch.staff_id.to_string())
            .bind(patch.service_id.to_string())
            .bind(&start)
            .bind(&end)
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            Ok(GuardedWrite::Applied)
        })
    }

    fn cancel(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Appointment>, DbError> {
        Box::pin(async move {
            debug!("Cancelling appointment {} in tenant {}", id, tenant_id);

            let mut tx = self.db_client.begin().await?;

            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE tenant_id = $1 AND id = $2 AND status <> 'cancelled'"
            ))
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            let Some(row) = row else {
                return Ok(None);
            };
            let appointment = row_to_appointment(&row)?;

            sqlx::query(
                "UPDATE appointments SET status = 'cancelled' \
                 WHERE tenant_id = $1 AND id = $2",
            )
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            Ok(Some(appointment))
        })
    }

    fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'_, Option<Appointment>, DbError> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM appointments WHERE tenant_id = $1 AND id = $2"
            ))
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row.as_ref().map(row_to_appointment).transpose()
        })
    }

    fn list_active_for_staff(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE tenant_id = $1 AND staff_id = $2 AND status <> 'cancelled' \
                   AND start_time >= $3 AND start_time < $4 \
                 ORDER BY start_time"
            ))
            .bind(tenant_id.to_string())
            .bind(staff_id.to_string())
            .bind(encode_ts(from))
            .bind(encode_ts(to))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            rows.iter().map(row_to_appointment).collect()
        })
    }

    fn list_in_range(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE tenant_id = $1 AND start_time >= $2 AND start_time < $3 \
                 ORDER BY start_time"
            ))
            .bind(tenant_id.to_string())
            .bind(encode_ts(from))
            .bind(encode_ts(to))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            rows.iter().map(row_to_appointment).collect()
        })
    }

    fn set_external_event_id(
        &self,
        id: Uuid,
        event_id: Option<&str>,
    ) -> BoxFuture<'_, (), DbError> {
        let event_id = event_id.map(str::to_string);
        Box::pin(async move {
            sqlx::query("UPDATE appointments SET external_event_id = $1 WHERE id = $2")
                .bind(event_id)
                .bind(id.to_string())
                .execute(self.db_client.pool())
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            Ok(())
        })
    }
}
