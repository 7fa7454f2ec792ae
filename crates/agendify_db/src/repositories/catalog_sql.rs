//! SQL implementation of the service catalog repository

use crate::error::DbError;
use crate::repositories::catalog::{CatalogRepository, NewServiceOffering, ServiceOffering};
use crate::time::{decode_ts, encode_ts};
use crate::DbClient;
use agendify_common::services::BoxFuture;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const COLUMNS: &str = "id, tenant_id, name, price_minor, duration_minutes, created_at";

/// SQL implementation of the service catalog repository
#[derive(Debug, Clone)]
pub struct SqlCatalogRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlCatalogRepository {
    /// Create a new SQL catalog repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn row_to_offering(row: &AnyRow) -> Result<ServiceOffering, DbError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let tenant_id: String = row
        .try_get("tenant_id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(ServiceOffering {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::DecodeError(format!("bad service id: {e}")))?,
        tenant_id: Uuid::parse_str(&tenant_id)
            .map_err(|e| DbError::DecodeError(format!("bad tenant id: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        price_minor: row
            .try_get("price_minor")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        duration_minutes: row
            .try_get("duration_minutes")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        created_at: decode_ts(&created_at)?,
    })
}

impl CatalogRepository for SqlCatalogRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing service catalog schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS services (
                    id TEXT PRIMARY KEY,
                    tenant_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    price_minor INTEGER NOT NULL,
                    duration_minutes INTEGER NOT NULL,
                    created_at TEXT NOT NULL
                )
            "#;
            self.db_client.execute(query).await?;

            Ok(())
        })
    }

    fn create(
        &self,
        tenant_id: Uuid,
        offering: NewServiceOffering,
    ) -> BoxFuture<'_, ServiceOffering, DbError> {
        Box::pin(async move {
            debug!("Creating service offering {:?} in tenant {}", offering.name, tenant_id);

            let row = sqlx::query(&format!(
                r#"
                INSERT INTO services (id, tenant_id, name, price_minor, duration_minutes, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {COLUMNS}
                "#
            ))
            .bind(Uuid::new_v4().to_string())
            .bind(tenant_id.to_string())
            .bind(&offering.name)
            .bind(offering.price_minor)
            .bind(offering.duration_minutes)
            .bind(encode_ts(Utc::now()))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row_to_offering(&row)
        })
    }

    fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'_, Option<ServiceOffering>, DbError> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM services WHERE tenant_id = $1 AND id = $2"
            ))
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row.as_ref().map(row_to_offering).transpose()
        })
    }

    fn list(&self, tenant_id: Uuid) -> BoxFuture<'_, Vec<ServiceOffering>, DbError> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM services WHERE tenant_id = $1 ORDER BY name"
            ))
            .bind(tenant_id.to_string())
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            rows.iter().map(row_to_offering).collect()
        })
    }
}
