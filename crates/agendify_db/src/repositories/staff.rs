//! Repository for staff members
//!
//! Staff rows carry the per-staff external calendar credential. A missing
//! `google_refresh_token` simply means the staff member never linked a
//! calendar; nothing in the booking path requires one.

use crate::error::DbError;
use agendify_common::services::BoxFuture;
use agendify_common::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A schedulable person within a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    /// Matches the identity provider's user id for this person.
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub full_name: String,
    pub role: Role,
    /// Stored OAuth refresh token; presence enables calendar sync.
    #[serde(skip_serializing, default)]
    pub google_refresh_token: Option<String>,
}

/// Repository for staff members
pub trait StaffRepository: Send + Sync {
    /// Initialize the database schema
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Insert a staff member, or update the name and role of the existing
    /// row with the same id. The stored calendar credential is untouched.
    fn upsert(&self, staff: Staff) -> BoxFuture<'_, Staff, DbError>;

    /// Find a staff member by id, scoped to a tenant
    fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Staff>, DbError>;

    /// All staff of a tenant, ordered by name
    fn list(&self, tenant_id: Uuid) -> BoxFuture<'_, Vec<Staff>, DbError>;

    /// Store the calendar refresh token for a staff member, creating the row
    /// when none exists yet.
    fn save_refresh_token(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        token: &str,
    ) -> BoxFuture<'_, (), DbError>;

    /// Drop the stored calendar credential.
    ///
    /// # Returns
    ///
    /// `true` if a credential was cleared, `false` if none was stored
    fn clear_refresh_token(&self, tenant_id: Uuid, staff_id: Uuid)
        -> BoxFuture<'_, bool, DbError>;
}
