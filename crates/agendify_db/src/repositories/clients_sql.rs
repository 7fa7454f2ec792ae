//! SQL implementation of the client repository

use crate::error::DbError;
use crate::repositories::clients::{Client, ClientRepository, NewClient};
use crate::time::{decode_ts, encode_ts};
use crate::DbClient;
use agendify_common::services::BoxFuture;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const COLUMNS: &str = "id, tenant_id, name, cpf, phone, email, created_at";

/// SQL implementation of the client repository
#[derive(Debug, Clone)]
pub struct SqlClientRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlClientRepository {
    /// Create a new SQL client repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn row_to_client(row: &AnyRow) -> Result<Client, DbError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let tenant_id: String = row
        .try_get("tenant_id")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(Client {
        id: Uuid::parse_str(&id).map_err(|e| DbError::DecodeError(format!("bad client id: {e}")))?,
        tenant_id: Uuid::parse_str(&tenant_id)
            .map_err(|e| DbError::DecodeError(format!("bad tenant id: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        cpf: row
            .try_get("cpf")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        phone: row
            .try_get("phone")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        email: row
            .try_get("email")
            .map_err(|e| DbError::QueryError(e.to_string()))?,
        created_at: decode_ts(&created_at)?,
    })
}

impl ClientRepository for SqlClientRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing client schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS clients (
                    id TEXT PRIMARY KEY,
                    tenant_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    cpf TEXT NOT NULL,
                    phone TEXT NOT NULL,
                    email TEXT,
                    created_at TEXT NOT NULL,
                    UNIQUE(tenant_id, cpf)
                )
            "#;
            self.db_client.execute(query).await?;

            Ok(())
        })
    }

    fn upsert(&self, tenant_id: Uuid, client: NewClient) -> BoxFuture<'_, Client, DbError> {
        Box::pin(async move {
            debug!("Upserting client with cpf ending {} in tenant {}",
                   client.cpf.chars().rev().take(3).collect::<String>(), tenant_id);

            let query = format!(
                r#"
                INSERT INTO clients (id, tenant_id, name, cpf, phone, email, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (tenant_id, cpf)
                DO UPDATE SET name = excluded.name, phone = excluded.phone,
                              email = excluded.email
                RETURNING {COLUMNS}
                "#
            );

            let row = sqlx::query(&query)
                .bind(Uuid::new_v4().to_string())
                .bind(tenant_id.to_string())
                .bind(&client.name)
                .bind(&client.cpf)
                .bind(&client.phone)
                .bind(client.email.as_deref())
                .bind(encode_ts(Utc::now()))
                .fetch_one(self.db_client.pool())
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            row_to_client(&row)
        })
    }

    fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Client>, DbError> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM clients WHERE tenant_id = $1 AND id = $2"
            ))
            .bind(tenant_id.to_string())
            .bind(id.to_string())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            row.as_ref().map(row_to_client).transpose()
        })
    }

    fn search(&self, tenant_id: Uuid, query: &str) -> BoxFuture<'_, Vec<Client>, DbError> {
        let pattern = format!("%{}%", query.to_lowercase());
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {COLUMNS} FROM clients \
                 WHERE tenant_id = $1 AND (LOWER(name) LIKE $2 OR cpf LIKE $3) \
                 ORDER BY name LIMIT 20"
            ))
            .bind(tenant_id.to_string())
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

            rows.iter().map(row_to_client).collect()
        })
    }
}
