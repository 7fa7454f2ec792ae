//! Repository for weekly work-schedule templates
//!
//! One row per (staff, weekday). The schedule-save operation always replaces
//! the whole week, so partial weeks never exist once a staff member has saved
//! a schedule at least once.

use crate::error::DbError;
use agendify_common::services::BoxFuture;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Working window of one weekday for one staff member.
///
/// Times are local wall-clock `HH:MM` strings in the business timezone;
/// `day_of_week` follows the 0 = Sunday .. 6 = Saturday convention.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDayTemplate {
    pub staff_id: Uuid,
    pub tenant_id: Uuid,
    pub day_of_week: u8,
    pub is_active: bool,
    pub start_time: String,
    pub end_time: String,
}

/// Repository for work-schedule templates
pub trait WorkScheduleRepository: Send + Sync {
    /// Initialize the database schema
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// The template for one weekday, if the staff member has saved one
    fn find_day(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        day_of_week: u8,
    ) -> BoxFuture<'_, Option<WorkDayTemplate>, DbError>;

    /// All stored templates for a staff member, ordered by weekday
    fn week(&self, tenant_id: Uuid, staff_id: Uuid)
        -> BoxFuture<'_, Vec<WorkDayTemplate>, DbError>;

    /// Replace every stored row for a staff member with the given week.
    ///
    /// Delete and re-insert run in one transaction, so readers never observe
    /// a half-replaced week.
    fn replace_week(
        &self,
        tenant_id: Uuid,
        staff_id: Uuid,
        week: Vec<WorkDayTemplate>,
    ) -> BoxFuture<'_, (), DbError>;
}
