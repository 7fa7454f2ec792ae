//! Repository for the service catalog
//!
//! Service offerings carry the duration and price a booking freezes at
//! creation time. Editing an offering later never touches existing
//! appointments; their end times were computed when they were booked.

use crate::error::DbError;
use agendify_common::services::BoxFuture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable service offered by a tenant.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// Price in currency subunits.
    pub price_minor: i64,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an offering.
#[derive(Debug, Clone)]
pub struct NewServiceOffering {
    pub name: String,
    pub price_minor: i64,
    pub duration_minutes: i64,
}

/// Repository for service offerings
pub trait CatalogRepository: Send + Sync {
    /// Initialize the database schema
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Create a service offering
    fn create(
        &self,
        tenant_id: Uuid,
        offering: NewServiceOffering,
    ) -> BoxFuture<'_, ServiceOffering, DbError>;

    /// Find an offering by id, scoped to a tenant
    fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'_, Option<ServiceOffering>, DbError>;

    /// All offerings of a tenant, ordered by name
    fn list(&self, tenant_id: Uuid) -> BoxFuture<'_, Vec<ServiceOffering>, DbError>;
}
