//! Repository for the booking ledger
//!
//! Appointments are the authoritative record of committed bookings. The one
//! invariant the store enforces is that for a fixed staff member no two
//! non-cancelled appointments overlap in `[start_time, end_time)`; the
//! guarded write methods re-check it inside the same transaction as the
//! write, so a slot list gone stale between calculation and commit surfaces
//! as `SlotTaken` instead of a double booking.

use crate::error::DbError;
use agendify_common::services::BoxFuture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a ledger entry.
///
/// `Scheduled` and `Rescheduled` are both live; `Cancelled` is terminal and
/// invisible to overlap and availability checks.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "rescheduled" => Ok(AppointmentStatus::Rescheduled),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    /// Start instant, UTC.
    pub start_time: DateTime<Utc>,
    /// End instant, UTC. Frozen at booking time from the service duration.
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Id of the mirrored event on the staff member's external calendar.
    pub external_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Replacement values applied by a guarded reschedule.
#[derive(Debug, Clone)]
pub struct ReschedulePatch {
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Outcome of a guarded ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedWrite {
    /// The write went through.
    Applied,
    /// Another live appointment overlaps the requested interval.
    SlotTaken,
    /// The target row does not exist, is cancelled, or is out of tenant scope.
    Missing,
}

/// Repository for appointments
pub trait AppointmentRepository: Send + Sync {
    /// Initialize the database schema
    ///
    /// Creates the appointments table and its range-query index if they
    /// don't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Insert an appointment unless it would overlap a live one.
    ///
    /// The overlap check and the insert run in one transaction.
    ///
    /// # Returns
    ///
    /// `true` if the row was inserted, `false` if the slot was already taken
    fn insert_if_free(&self, appointment: Appointment) -> BoxFuture<'_, bool, DbError>;

    /// Move an appointment to a new staff/service/time unless the new
    /// interval overlaps a live appointment of the new staff member.
    ///
    /// The existence check, the overlap check (which ignores the row being
    /// moved) and the update run in one transaction. On success the status
    /// becomes `rescheduled`.
    fn reschedule_if_free(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        patch: ReschedulePatch,
    ) -> BoxFuture<'_, GuardedWrite, DbError>;

    /// Mark an appointment cancelled.
    ///
    /// # Returns
    ///
    /// The row as it was before cancellation, or `None` when no live
    /// appointment with this id exists in the tenant — cancelling twice
    /// yields `None` the second time.
    fn cancel(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Appointment>, DbError>;

    /// Find an appointment by id, scoped to a tenant
    fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'_, Option<Appointment>, DbError>;

    /// Live appointments of one staff member whose start falls within
    /// `[from, to)`, ordered by start. Used by the slot calculator.
    fn list_active_for_staff(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError>;

    /// All appointments of a tenant whose start falls within `[from, to)`,
    /// ordered by start. Cancelled rows are included; callers filter.
    fn list_in_range(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError>;

    /// Record (or clear) the external calendar event mirrored for a row.
    fn set_external_event_id(
        &self,
        id: Uuid,
        event_id: Option<&str>,
    ) -> BoxFuture<'_, (), DbError>;
}
