//! Service abstractions for external services.
//!
//! This module provides trait definitions for external services used by the
//! application. These traits allow for dependency injection and easier testing
//! by decoupling the scheduling logic from specific implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for per-staff external calendar operations.
///
/// Every operation is keyed by the staff member whose linked calendar should
/// be touched. A staff member without a stored calendar credential is not an
/// error: mutations become no-ops (`create_event` returns `Ok(None)`) and
/// `list_events` returns an empty list. Provider failures are reported
/// through `Err`; whether they abort anything is the caller's decision.
pub trait StaffCalendar: Send + Sync {
    /// Error type returned by calendar operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create an event on the staff member's calendar.
    ///
    /// Returns the provider's event id, or `None` when the staff member has
    /// no linked calendar.
    fn create_event(
        &self,
        staff_id: Uuid,
        draft: EventDraft,
    ) -> BoxFuture<'_, Option<String>, Self::Error>;

    /// Replace the times and summary of an existing event.
    fn update_event(
        &self,
        staff_id: Uuid,
        event_id: &str,
        draft: EventDraft,
    ) -> BoxFuture<'_, (), Self::Error>;

    /// Delete an event. An event already gone on the provider side counts as
    /// success.
    fn delete_event(&self, staff_id: Uuid, event_id: &str) -> BoxFuture<'_, (), Self::Error>;

    /// List events within a time range.
    #[allow(clippy::type_complexity)]
    fn list_events(
        &self,
        staff_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<RemoteEvent>, Self::Error>;
}

/// Lookup of the stored external-calendar credential for a staff member.
///
/// Implemented by the staff repository; the calendar adapter resolves the
/// credential through this seam so it never talks to the database directly.
pub trait CalendarCredentialStore: Send + Sync {
    /// The stored refresh token, or `None` when the staff member never
    /// linked a calendar (or unlinked it again).
    fn refresh_token(&self, staff_id: Uuid) -> BoxFuture<'_, Option<String>, BoxedError>;
}

/// Payload pushed to the external calendar when an appointment is created or
/// moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// The start instant of the event.
    pub start_time: DateTime<Utc>,
    /// The end instant of the event.
    pub end_time: DateTime<Utc>,
}

/// An event read back from the external calendar.
///
/// Times are kept as the provider's RFC 3339 strings; all-day events carry a
/// plain date, which callers render as-is.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEvent {
    /// The provider's id for the event.
    pub event_id: String,
    /// The title of the event.
    pub title: String,
    /// The start of the event.
    pub start: Option<String>,
    /// The end of the event.
    pub end: Option<String>,
}
