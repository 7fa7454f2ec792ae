//! Repository for clients
//!
//! Clients are matched by CPF within a tenant: booking with an inline client
//! payload either reuses the existing row (refreshing its contact fields) or
//! inserts a new one. The `(tenant_id, cpf)` unique constraint makes the
//! upsert idempotent under retry.

use crate::error::DbError;
use agendify_common::services::BoxFuture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person appointments are booked for.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// National taxpayer id, unique per tenant.
    pub cpf: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contact payload for an upsert; the row id and creation time come from the
/// store.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Repository for clients
pub trait ClientRepository: Send + Sync {
    /// Initialize the database schema
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Insert a client, or refresh the contact fields of the existing row
    /// with the same `(tenant_id, cpf)`.
    ///
    /// # Returns
    ///
    /// The stored row either way, so callers always learn the client id.
    fn upsert(&self, tenant_id: Uuid, client: NewClient) -> BoxFuture<'_, Client, DbError>;

    /// Find a client by id, scoped to a tenant
    fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Client>, DbError>;

    /// Case-insensitive substring search over name and CPF, scoped to a
    /// tenant and capped at 20 rows.
    fn search(&self, tenant_id: Uuid, query: &str) -> BoxFuture<'_, Vec<Client>, DbError>;
}
