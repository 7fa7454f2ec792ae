// --- File: crates/agendify_gcal/src/service.rs ---
//! Google Calendar adapter keyed by staff member.
//!
//! Every operation resolves the staff member's stored refresh token first. A
//! staff member without one has not connected a calendar: mutations become
//! no-ops and listings come back empty, so bookings keep working for them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use agendify_common::services::{
    BoxFuture, BoxedError, CalendarCredentialStore, EventDraft, RemoteEvent, StaffCalendar,
};
use agendify_config::GoogleConfig;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{create_staff_hub, HubType};

/// Events are always written to the connected account's default calendar.
const PRIMARY_CALENDAR: &str = "primary";

fn boxed(err: google_calendar3::Error) -> BoxedError {
    BoxedError(Box::new(err))
}

/// Google reports an event that is already gone as 404 or as 410.
fn is_gone(err: &google_calendar3::Error) -> bool {
    let text = err.to_string();
    text.contains("404") || text.contains("410")
}

/// The timed start or end of an event, or its plain date for all-day events.
pub(crate) fn event_time(value: Option<EventDateTime>) -> Option<String> {
    let value = value?;
    value
        .date_time
        .map(|dt| dt.to_rfc3339())
        .or_else(|| value.date.map(|d| d.to_string()))
}

/// Staff calendar implementation backed by the Google Calendar API.
pub struct GoogleStaffCalendar {
    google: GoogleConfig,
    time_zone: Tz,
    credentials: Arc<dyn CalendarCredentialStore>,
    /// Hubs cached per refresh token. A disconnect removes the stored token,
    /// so the next lookup falls back to the no-op path even while the old
    /// hub is still cached here.
    hubs: Mutex<HashMap<String, Arc<HubType>>>,
}

impl GoogleStaffCalendar {
    /// Create a new adapter over the given credential store.
    ///
    /// `time_zone` is attached to created events so they render in the
    /// business's local time on the staff member's calendar.
    pub fn new(
        google: GoogleConfig,
        time_zone: Tz,
        credentials: Arc<dyn CalendarCredentialStore>,
    ) -> Self {
        Self {
            google,
            time_zone,
            credentials,
            hubs: Mutex::new(HashMap::new()),
        }
    }

    /// The hub acting as the given staff member, or `None` when they have no
    /// connected calendar.
    async fn hub_for(&self, staff_id: Uuid) -> Result<Option<Arc<HubType>>, BoxedError> {
        let Some(token) = self.credentials.refresh_token(staff_id).await? else {
            return Ok(None);
        };

        if let Some(hub) = self.hubs.lock().unwrap().get(&token) {
            return Ok(Some(hub.clone()));
        }

        let hub = Arc::new(
            create_staff_hub(&self.google, &token)
                .await
                .map_err(BoxedError)?,
        );
        self.hubs.lock().unwrap().insert(token, hub.clone());
        Ok(Some(hub))
    }

    fn to_event(&self, draft: &EventDraft) -> Event {
        Event {
            summary: Some(draft.summary.clone()),
            description: draft.description.clone(),
            start: Some(EventDateTime {
                date_time: Some(draft.start_time),
                time_zone: Some(self.time_zone.name().to_string()),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(draft.end_time),
                time_zone: Some(self.time_zone.name().to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

impl StaffCalendar for GoogleStaffCalendar {
    type Error = BoxedError;

    fn create_event(
        &self,
        staff_id: Uuid,
        draft: EventDraft,
    ) -> BoxFuture<'_, Option<String>, Self::Error> {
        Box::pin(async move {
            let Some(hub) = self.hub_for(staff_id).await? else {
                debug!("Staff {} has no connected calendar, skipping event creation", staff_id);
                return Ok(None);
            };

            let event = self.to_event(&draft);
            let (_response, created) = hub
                .events()
                .insert(event, PRIMARY_CALENDAR)
                .doit()
                .await
                .map_err(boxed)?;

            Ok(created.id)
        })
    }

    fn update_event(
        &self,
        staff_id: Uuid,
        event_id: &str,
        draft: EventDraft,
    ) -> BoxFuture<'_, (), Self::Error> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let Some(hub) = self.hub_for(staff_id).await? else {
                debug!("Staff {} has no connected calendar, skipping event update", staff_id);
                return Ok(());
            };

            let patch = self.to_event(&draft);
            hub.events()
                .patch(patch, PRIMARY_CALENDAR, &event_id)
                .doit()
                .await
                .map_err(boxed)?;

            Ok(())
        })
    }

    fn delete_event(&self, staff_id: Uuid, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let Some(hub) = self.hub_for(staff_id).await? else {
                return Ok(());
            };

            match hub.events().delete(PRIMARY_CALENDAR, &event_id).doit().await {
                Ok(_) => Ok(()),
                // Already removed on Google's side counts as deleted
                Err(e) if is_gone(&e) => Ok(()),
                Err(e) => Err(boxed(e)),
            }
        })
    }

    fn list_events(
        &self,
        staff_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<RemoteEvent>, Self::Error> {
        Box::pin(async move {
            let Some(hub) = self.hub_for(staff_id).await? else {
                return Ok(Vec::new());
            };

            let (_response, events_list) = hub
                .events()
                .list(PRIMARY_CALENDAR)
                .time_min(start_time)
                .time_max(end_time)
                .max_results(100)
                .single_events(true) // Expand recurring events
                .order_by("startTime")
                .doit()
                .await
                .map_err(boxed)?;

            let remote = events_list
                .items
                .unwrap_or_default()
                .into_iter()
                .filter(|event| event.status.as_deref() != Some("cancelled"))
                .map(|event| RemoteEvent {
                    event_id: event.id.unwrap_or_default(),
                    title: event.summary.unwrap_or_default(),
                    start: event_time(event.start),
                    end: event_time(event.end),
                })
                .collect();

            Ok(remote)
        })
    }
}
