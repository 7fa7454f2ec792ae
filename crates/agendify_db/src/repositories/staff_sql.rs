//! SQL implementation of the staff repository
//!
//! Also implements the calendar credential seam the Google adapter resolves
//! refresh tokens through.

use crate::error::DbError;
use crate::repositories::staff::{Staff, StaffRepository};
use crate::DbClient;
use agendify_common::services::{BoxFuture, BoxedError, CalendarCredentialStore};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const COLUMNS: &str = "id, tenant_id, full_name, role, google_refresh_token";

/// SQL implementation of the staff repository
#[derive(Debug, Clone)]
pub struct SqlStaffRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlStaffRepository {
    /// Create a new SQL staff repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn row_to_staff(row: &AnyRow) -> Result<Staff, DbError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let tenant_id: String = row
        .try_get("tenant_id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let role: String = row
        .try_get("role")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(Staff {
        id: Uuid::parse_str(&id).map_err(|e| DbError::DecodeError(format!("bad staff id: {e}")))?,
        tenant_id: Uuid::parse_str(&tenant_id)
            .map_err(|e| DbError::DecodeError(format!("bad tenant id: {e}")))?,
        full_name: row
            .try_get("full_name")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        role: role.parse().map_err(DbError::DecodeError)?,
        google_refresh_token: row
            .try_get("google_refresh_token")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
    })
}

impl StaffRepository for SqlStaffRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing staff schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS staff (
                    id TEXT PRIMARY KEY,
                    tenant_id TEXT NOT NULL,
                    full_name TEXT NOT NULL DEFAULT '',
                    role TEXT NOT NULL DEFAULT 'staff',
                    google_refresh_token TEXT
                )
            "#;
            self.db_client.execute(query).await?;

            Ok(())
        })
    }

    fn upsert(&self, staff: Staff) -> BoxFuture<'_, Staff, DbError> {
        Box::pin(async move {
            debug!("Upserting staff {} in tenant {}", staff.id, staff.tenant_id);

            let row = sqlx::query(&format!(
                r#"
                INSERT INTO staff (id, tenant_id, full_name, role, google_refresh_token)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id)
                DO UPDATE SET full_name = excluded.full_name, role = excluded.role
                RETURNING {COLUMNS}
                "#
            ))
            .bind(staff.id.to_string())
            .bind(staff.tenant_id.to_string())
            .bind(&staff.full_name)
            .bind(staff.role.to_string())
            .bind(staff.google_refresh_token.as_deref())
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row_to_staff(&row)
        })
    }

    fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Staff>, DbError> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM staff WHERE tenant_id = $1 AND id = $2"
            ))
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row.as_ref().map(row_to_staff).transpose()
        })
    }

    fn list(&self, tenant_id: Uuid) -> BoxFuture<'_, Vec<Staff>, DbError> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM staff WHERE tenant_id = $1 ORDER BY full_name"
            ))
            .bind(tenant_id.to_string())
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            rows.iter().map(row_to_staff).collect()
        })
    }

    fn save_refresh_token(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        token: &str,
    ) -> BoxFuture<'_, (), DbError> {
        let token = token.to_string();
        Box::pin(async move {
            debug!("Storing calendar credential for staff {}", staff_id);

            sqlx::query(
                r#"
                INSERT INTO staff (id, tenant_id, full_name, role, google_refresh_token)
                VALUES ($1, $2, '', 'staff', $3)
                ON CONFLICT (id)
                DO UPDATE SET google_refresh_token = excluded.google_refresh_token
                "#,
            )
            .bind(staff_id.to_string())
            .bind(tenant_id.to_string())
            .bind(&token)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            Ok(())
        })
    }

    fn clear_refresh_token(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
    ) -> BoxFuture<'_, bool, DbError> {
        Box::pin(async move {
            debug!("Clearing calendar credential for staff {}", staff_id);

            let result = sqlx::query(
                "UPDATE staff SET google_refresh_token = NULL \
                 WHERE tenant_id = $1 AND id = $2 AND google_refresh_token IS NOT NULL",
            )
            .bind(tenant_id.to_string())
            .bind(staff_id.to_string())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            Ok(result.rows_affected() > 0)
        })
    }
}

impl CalendarCredentialStore for SqlStaffRepository {
    fn refresh_token(&self, staff_id: Uuid) -> BoxFuture<'_, Option<String>, BoxedError> {
        Box::pin(async move {
            let row = sqlx::query("SELECT google_refresh_token FROM staff WHERE id = $1")
                .bind(staff_id.to_string())
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| BoxedError(Box::new(DbError::QueryError(e.to_string()))))?;

            let token = row
                .map(|r| {
                    r.try_get::<Option<String>, _>("google_refresh_token")
                        .map_err(|e| BoxedError(Box::new(DbError::QueryError(e.to_string()))))
                })
                .transpose()?
                .flatten();

            Ok(token)
        })
    }
}
