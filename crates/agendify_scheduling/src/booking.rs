// --- File: crates/agendify_scheduling/src/booking.rs ---
//! Booking transactions over the appointment ledger.
//!
//! The ledger is the source of truth: every create, reschedule and cancel is
//! committed there first, with the overlap guard running inside the same
//! store transaction as the write. The external calendar mirror is pushed
//! afterwards and is best effort; its failures are logged and never unwind a
//! committed booking.

use crate::error::SchedulingError;
use crate::slots;
use agendify_common::services::{BoxedError, EventDraft, RemoteEvent, StaffCalendar};
use agendify_common::CallerContext;
use agendify_config::{GoogleConfig, SchedulingConfig};
use agendify_db::{
    Appointment, AppointmentRepository, AppointmentStatus, CatalogRepository, Client,
    ClientRepository, DbError, GuardedWrite, NewClient, NewServiceOffering, ReschedulePatch,
    ServiceOffering, StaffRepository, WorkDayTemplate, WorkScheduleRepository,
};
use agendify_gcal::oauth;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// The calendar adapter as the booking service consumes it.
pub type SharedCalendar = Arc<dyn StaffCalendar<Error = BoxedError>>;

/// Week template rows are replaced Monday first, Sunday last.
const WEEK_ORDER: [u8; 7] = [1, 2, 3, 4, 5, 6, 0];

// --- Request Payloads ---

/// The client a booking is for: a known row, or inline contact details that
/// are upserted on `(tenant, cpf)`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientRef {
    Existing { client_id: Uuid },
    New(NewClientPayload),
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct NewClientPayload {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client: ClientRef,
    /// Appointment date in the business timezone.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: NaiveDate,
    /// Chosen slot start, wall-clock `HH:MM`.
    #[cfg_attr(feature = "openapi", schema(example = "09:30"))]
    pub slot: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleRequest {
    pub staff_id: Uuid,
    pub service_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(example = "14:00"))]
    pub slot: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    /// Price in currency subunits.
    pub price_minor: i64,
    pub duration_minutes: i64,
}

/// One weekday of a work-schedule replacement.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct WorkDayPayload {
    pub day_of_week: u8,
    pub is_active: bool,
    pub start_time: String,
    pub end_time: String,
}

// --- The Service ---

/// The ledger-side collaborators, injected as trait objects so tests can
/// substitute in-memory stores.
#[derive(Clone)]
pub struct BookingStores {
    pub appointments: Arc<dyn AppointmentRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub schedules: Arc<dyn WorkScheduleRepository>,
    pub staff: Arc<dyn StaffRepository>,
}

/// Slot availability and booking transactions for one process.
pub struct BookingService {
    stores: BookingStores,
    calendar: Option<SharedCalendar>,
    scheduling: SchedulingConfig,
    google: Option<GoogleConfig>,
}

impl BookingService {
    pub fn new(
        stores: BookingStores,
        calendar: Option<SharedCalendar>,
        scheduling: SchedulingConfig,
        google: Option<GoogleConfig>,
    ) -> Self {
        Self {
            stores,
            calendar,
            scheduling,
            google,
        }
    }

    fn time_zone(&self) -> Tz {
        self.scheduling.time_zone
    }

    // --- Slot Calculation ---

    /// Free slot starts for one staff member, service and date, as ascending
    /// wall-clock `HH:MM` strings.
    ///
    /// A missing or inactive work-day template yields an empty list; a
    /// missing service is `NotFound`.
    pub async fn available_slots(
        &self,
        ctx: CallerContext,
        staff_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<String>, SchedulingError> {
        let service = self
            .stores
            .catalog
            .find_by_id(ctx.tenant_id, service_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("service not found".to_string()))?;

        let weekday = date.weekday().num_days_from_sunday() as u8;
        let Some(template) = self
            .stores
            .schedules
            .find_day(ctx.tenant_id, staff_id, weekday)
            .await?
        else {
            return Ok(Vec::new());
        };
        if !template.is_active {
            return Ok(Vec::new());
        }

        let (window_start, window_end) = self.template_window(&template, date)?;
        let (day_start, day_end) = self.day_bounds(date)?;
        let booked = self
            .stores
            .appointments
            .list_active_for_staff(ctx.tenant_id, staff_id, day_start, day_end)
            .await?;
        let busy: Vec<(DateTime<Utc>, DateTime<Utc>)> = booked
            .iter()
            .map(|appointment| (appointment.start_time, appointment.end_time))
            .collect();

        Ok(slots::calculate_free_starts(
            window_start,
            window_end,
            Duration::minutes(service.duration_minutes),
            Duration::minutes(self.scheduling.slot_step_minutes as i64),
            &busy,
        ))
    }

    // --- Booking Transactions ---

    /// Book an appointment.
    ///
    /// The end time is frozen here from the service duration; later edits to
    /// the service never move an existing booking. Returns `Conflict` when
    /// the slot was taken between slot calculation and this commit.
    pub async fn create(
        &self,
        ctx: CallerContext,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let service = self
            .stores
            .catalog
            .find_by_id(ctx.tenant_id, request.service_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("service not found".to_string()))?;
        let client = self.resolve_client(ctx, &request.client).await?;
        let (start_time, end_time) =
            self.slot_interval(request.date, &request.slot, service.duration_minutes)?;

        let mut appointment = Appointment {
            id: Uuid::new_v4(),
            tenant_id: ctx.tenant_id,
            staff_id: request.staff_id,
            service_id: service.id,
            client_id: client.id,
            start_time,
            end_time,
            status: AppointmentStatus::Scheduled,
            external_event_id: None,
            created_at: Utc::now(),
        };

        let inserted = self
            .stores
            .appointments
            .insert_if_free(appointment.clone())
            .await?;
        if !inserted {
            return Err(SchedulingError::Conflict(
                "slot is no longer available".to_string(),
            ));
        }
        info!(
            "Appointment {} booked for staff {} at {}",
            appointment.id, appointment.staff_id, appointment.start_time
        );

        if let Some(event_id) = self
            .push_created_event(&appointment, &service.name, &client)
            .await
        {
            // The mirror id is bookkeeping; losing it must not fail a
            // committed booking.
            match self
                .stores
                .appointments
                .set_external_event_id(appointment.id, Some(event_id.as_str()))
                .await
            {
                Ok(()) => appointment.external_event_id = Some(event_id),
                Err(err) => warn!(
                    "Failed to store external event id for appointment {}: {err}",
                    appointment.id
                ),
            }
        }

        Ok(appointment)
    }

    /// Move an appointment to a new staff member, service, date and slot.
    ///
    /// The overlap guard ignores the row being moved, so shifting within the
    /// appointment's own interval is allowed. A rejected reschedule leaves
    /// the stored row untouched.
    pub async fn reschedule(
        &self,
        ctx: CallerContext,
        appointment_id: Uuid,
        request: RescheduleRequest,
    ) -> Result<Appointment, SchedulingError> {
        let service = self
            .stores
            .catalog
            .find_by_id(ctx.tenant_id, request.service_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("service not found".to_string()))?;
        let before = self
            .stores
            .appointments
            .find_by_id(ctx.tenant_id, appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("appointment not found".to_string()))?;
        let (start_time, end_time) =
            self.slot_interval(request.date, &request.slot, service.duration_minutes)?;

        let patch = ReschedulePatch {
            staff_id: request.staff_id,
            service_id: service.id,
            start_time,
            end_time,
        };
        match self
            .stores
            .appointments
            .reschedule_if_free(ctx.tenant_id, appointment_id, patch)
            .await?
        {
            GuardedWrite::Applied => {}
            GuardedWrite::SlotTaken => {
                return Err(SchedulingError::Conflict(
                    "slot is no longer available".to_string(),
                ))
            }
            GuardedWrite::Missing => {
                return Err(SchedulingError::NotFound(
                    "appointment not found".to_string(),
                ))
            }
        }

        let mut after = self
            .stores
            .appointments
            .find_by_id(ctx.tenant_id, appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("appointment not found".to_string()))?;
        info!(
            "Appointment {} rescheduled to staff {} at {}",
            after.id, after.staff_id, after.start_time
        );

        if let Some(external_event_id) = self.sync_moved_event(ctx, &before, &after, &service.name).await {
            after.external_event_id = external_event_id;
        }
        Ok(after)
    }

    /// Cancel an appointment, keeping the row for history.
    ///
    /// The soft-cancel is guarded, so of two racing cancels only one wins;
    /// the mirrored calendar event is deleted once, by the winner.
    pub async fn cancel(
        &self,
        ctx: CallerContext,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let mut cancelled = self
            .stores
            .appointments
            .cancel(ctx.tenant_id, appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("appointment not found".to_string()))?;
        info!("Appointment {} cancelled", cancelled.id);

        if let (Some(calendar), Some(event_id)) = (
            self.calendar.as_ref(),
            cancelled.external_event_id.as_deref(),
        ) {
            if let Err(err) = calendar.delete_event(cancelled.staff_id, event_id).await {
                warn!(
                    "Calendar delete failed for appointment {} (staff {}): {err}",
                    cancelled.id, cancelled.staff_id
                );
            }
        }

        cancelled.status = AppointmentStatus::Cancelled;
        Ok(cancelled)
    }

    /// The tenant's ledger between two dates, inclusive, cancelled rows
    /// included.
    pub async fn list_appointments(
        &self,
        ctx: CallerContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        if to < from {
            return Err(SchedulingError::Validation(
                "to must not precede from".to_string(),
            ));
        }
        let (range_start, _) = self.day_bounds(from)?;
        let (_, range_end) = self.day_bounds(to)?;
        Ok(self
            .stores
            .appointments
            .list_in_range(ctx.tenant_id, range_start, range_end)
            .await?)
    }

    // --- Work Schedules ---

    /// The caller's weekly template, Monday first, with defaults filled in
    /// for days that were never saved.
    pub async fn week_schedule(
        &self,
        ctx: CallerContext,
    ) -> Result<Vec<WorkDayTemplate>, SchedulingError> {
        let stored = self
            .stores
            .schedules
            .week(ctx.tenant_id, ctx.user_id)
            .await?;
        Ok(materialize_week(ctx, stored))
    }

    /// Replace the caller's weekly template with exactly one row per
    /// weekday.
    pub async fn replace_week_schedule(
        &self,
        ctx: CallerContext,
        week: Vec<WorkDayPayload>,
    ) -> Result<(), SchedulingError> {
        if week.len() != 7 {
            return Err(SchedulingError::Validation(
                "a week schedule needs exactly 7 rows".to_string(),
            ));
        }
        let mut seen = [false; 7];
        for day in &week {
            let index = day.day_of_week as usize;
            if index > 6 || seen[index] {
                return Err(SchedulingError::Validation(format!(
                    "day_of_week {} is repeated or out of range",
                    day.day_of_week
                )));
            }
            seen[index] = true;

            let start = slots::parse_wall_clock(&day.start_time);
            let end = slots::parse_wall_clock(&day.end_time);
            let (Some(start), Some(end)) = (start, end) else {
                return Err(SchedulingError::Validation(format!(
                    "times for day {} must be HH:MM",
                    day.day_of_week
                )));
            };
            if day.is_active && start >= end {
                return Err(SchedulingError::Validation(format!(
                    "start must precede end on day {}",
                    day.day_of_week
                )));
            }
        }

        let rows = week
            .into_iter()
            .map(|day| WorkDayTemplate {
                staff_id: ctx.user_id,
                tenant_id: ctx.tenant_id,
                day_of_week: day.day_of_week,
                is_active: day.is_active,
                start_time: day.start_time,
                end_time: day.end_time,
            })
            .collect();
        Ok(self
            .stores
            .schedules
            .replace_week(ctx.tenant_id, ctx.user_id, rows)
            .await?)
    }

    // --- Catalog & Clients ---

    pub async fn list_services(
        &self,
        ctx: CallerContext,
    ) -> Result<Vec<ServiceOffering>, SchedulingError> {
        Ok(self.stores.catalog.list(ctx.tenant_id).await?)
    }

    /// Add a service offering. Admins only.
    pub async fn create_service(
        &self,
        ctx: CallerContext,
        request: CreateServiceRequest,
    ) -> Result<ServiceOffering, SchedulingError> {
        if !ctx.is_admin() {
            return Err(SchedulingError::Forbidden(
                "only admins can manage the catalog".to_string(),
            ));
        }
        if request.name.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "service name is required".to_string(),
            ));
        }
        if request.duration_minutes <= 0 {
            return Err(SchedulingError::Validation(
                "duration must be positive".to_string(),
            ));
        }
        if request.price_minor < 0 {
            return Err(SchedulingError::Validation(
                "price must not be negative".to_string(),
            ));
        }
        Ok(self
            .stores
            .catalog
            .create(
                ctx.tenant_id,
                NewServiceOffering {
                    name: request.name,
                    price_minor: request.price_minor,
                    duration_minutes: request.duration_minutes,
                },
            )
            .await?)
    }

    pub async fn search_clients(
        &self,
        ctx: CallerContext,
        query: &str,
    ) -> Result<Vec<Client>, SchedulingError> {
        Ok(self.stores.clients.search(ctx.tenant_id, query).await?)
    }

    // --- Calendar Connection ---

    /// The Google consent URL for linking the caller's calendar. The OAuth
    /// state carries the staff id so the callback knows whose token it is.
    pub fn calendar_auth_url(&self, ctx: CallerContext) -> Result<String, SchedulingError> {
        let google = self.google_config()?;
        oauth::consent_url(google, &ctx.user_id.to_string())
            .map_err(|err| SchedulingError::CalendarUnavailable(err.to_string()))
    }

    /// Exchange an authorization code and store the refresh token on the
    /// caller's staff row. Google omits the refresh token for an account
    /// that is already linked; that is success with nothing to store.
    pub async fn connect_calendar(
        &self,
        ctx: CallerContext,
        code: &str,
    ) -> Result<(), SchedulingError> {
        let google = self.google_config()?;
        if code.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "authorization code is required".to_string(),
            ));
        }
        let refresh_token = oauth::exchange_code(google, code)
            .await
            .map_err(|err| SchedulingError::CalendarUnavailable(err.to_string()))?;
        if let Some(token) = refresh_token {
            self.stores
                .staff
                .save_refresh_token(ctx.tenant_id, ctx.user_id, &token)
                .await?;
            info!("Calendar linked for staff {}", ctx.user_id);
        }
        Ok(())
    }

    /// Drop the caller's stored calendar credential.
    pub async fn disconnect_calendar(&self, ctx: CallerContext) -> Result<(), SchedulingError> {
        let cleared = self
            .stores
            .staff
            .clear_refresh_token(ctx.tenant_id, ctx.user_id)
            .await?;
        if cleared {
            info!("Calendar unlinked for staff {}", ctx.user_id);
        }
        Ok(())
    }

    /// The caller's external calendar events. Unlike the mirror pushes this
    /// is a read the caller asked for, so provider failures propagate.
    pub async fn agenda(
        &self,
        ctx: CallerContext,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RemoteEvent>, SchedulingError> {
        let calendar = self.calendar.as_ref().ok_or_else(|| {
            SchedulingError::CalendarUnavailable("calendar sync is not configured".to_string())
        })?;
        let now = Utc::now();
        let from = from.unwrap_or(now - Duration::days(self.scheduling.agenda_past_days));
        let to = to.unwrap_or(now + Duration::days(self.scheduling.agenda_future_days));
        if to <= from {
            return Err(SchedulingError::Validation(
                "to must come after from".to_string(),
            ));
        }
        calendar.list_events(ctx.user_id, from, to).await.map_err(|err| {
            warn!("Calendar listing failed for staff {}: {err}", ctx.user_id);
            SchedulingError::CalendarUnavailable(err.to_string())
        })
    }

    // --- Internals ---

    fn google_config(&self) -> Result<&GoogleConfig, SchedulingError> {
        self.google.as_ref().ok_or_else(|| {
            SchedulingError::CalendarUnavailable("calendar sync is not configured".to_string())
        })
    }

    /// Look up or upsert the client a booking names.
    async fn resolve_client(
        &self,
        ctx: CallerContext,
        reference: &ClientRef,
    ) -> Result<Client, SchedulingError> {
        match reference {
            ClientRef::Existing { client_id } => self
                .stores
                .clients
                .find_by_id(ctx.tenant_id, *client_id)
                .await?
                .ok_or_else(|| SchedulingError::NotFound("client not found".to_string())),
            ClientRef::New(payload) => {
                if payload.name.trim().is_empty()
                    || payload.cpf.trim().is_empty()
                    || payload.phone.trim().is_empty()
                {
                    return Err(SchedulingError::Validation(
                        "name, cpf and phone are required for a new client".to_string(),
                    ));
                }
                Ok(self
                    .stores
                    .clients
                    .upsert(
                        ctx.tenant_id,
                        NewClient {
                            name: payload.name.clone(),
                            cpf: payload.cpf.clone(),
                            phone: payload.phone.clone(),
                            email: payload.email.clone(),
                        },
                    )
                    .await?)
            }
        }
    }

    /// Anchor a work-day template to a calendar date.
    fn template_window(
        &self,
        template: &WorkDayTemplate,
        date: NaiveDate,
    ) -> Result<(DateTime<Tz>, DateTime<Tz>), SchedulingError> {
        let tz = self.time_zone();
        let window = slots::parse_wall_clock(&template.start_time)
            .and_then(|start| slots::anchor_on(date, start, tz))
            .zip(
                slots::parse_wall_clock(&template.end_time)
                    .and_then(|end| slots::anchor_on(date, end, tz)),
            );
        window.ok_or_else(|| {
            SchedulingError::Database(DbError::DecodeError(format!(
                "stored schedule for weekday {} has malformed times",
                template.day_of_week
            )))
        })
    }

    fn day_bounds(&self, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedulingError> {
        slots::day_bounds(date, self.time_zone())
            .ok_or_else(|| SchedulingError::Validation(format!("date {date} is out of range")))
    }

    /// The start and end instants of a booked slot.
    fn slot_interval(
        &self,
        date: NaiveDate,
        slot: &str,
        duration_minutes: i64,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedulingError> {
        let time = slots::parse_wall_clock(slot)
            .ok_or_else(|| SchedulingError::Validation(format!("malformed slot time: {slot}")))?;
        let start = slots::anchor_on(date, time, self.time_zone())
            .ok_or_else(|| {
                SchedulingError::Validation(format!("{slot} does not exist on {date}"))
            })?
            .with_timezone(&Utc);
        Ok((start, start + Duration::minutes(duration_minutes)))
    }

    /// Mirror a fresh booking onto the staff member's calendar. Returns the
    /// provider's event id, or `None` when there is nothing to store.
    async fn push_created_event(
        &self,
        appointment: &Appointment,
        service_name: &str,
        client: &Client,
    ) -> Option<String> {
        let calendar = self.calendar.as_ref()?;
        let draft = event_draft(appointment, service_name, &client.name, Some(&client.phone));
        match calendar.create_event(appointment.staff_id, draft).await {
            Ok(event_id) => event_id,
            Err(err) => {
                warn!(
                    "Calendar create failed for appointment {} (staff {}): {err}",
                    appointment.id, appointment.staff_id
                );
                None
            }
        }
    }

    /// Keep the mirrored event in step with a reschedule.
    ///
    /// Same staff: patch the event in place. New staff: delete the event on
    /// the old calendar and create it on the new one, so exactly one mirror
    /// survives. An appointment that never had a mirror stays without one.
    /// Returns `Some(new_value)` when the stored external id changed.
    async fn sync_moved_event(
        &self,
        ctx: CallerContext,
        before: &Appointment,
        after: &Appointment,
        service_name: &str,
    ) -> Option<Option<String>> {
        let calendar = self.calendar.as_ref()?;
        let event_id = before.external_event_id.as_deref()?;

        let client_name = match self
            .stores
            .clients
            .find_by_id(ctx.tenant_id, after.client_id)
            .await
        {
            Ok(Some(client)) => client.name,
            Ok(None) => String::new(),
            Err(err) => {
                warn!(
                    "Client lookup failed while syncing appointment {}: {err}",
                    after.id
                );
                String::new()
            }
        };
        let draft = event_draft(after, service_name, &client_name, None);

        if before.staff_id == after.staff_id {
            if let Err(err) = calendar.update_event(after.staff_id, event_id, draft).await {
                warn!(
                    "Calendar update failed for appointment {} (staff {}): {err}",
                    after.id, after.staff_id
                );
            }
            return None;
        }

        if let Err(err) = calendar.delete_event(before.staff_id, event_id).await {
            warn!(
                "Calendar delete failed for appointment {} (staff {}): {err}",
                before.id, before.staff_id
            );
        }
        let new_event_id = match calendar.create_event(after.staff_id, draft).await {
            Ok(event_id) => event_id,
            Err(err) => {
                warn!(
                    "Calendar create failed for appointment {} (staff {}): {err}",
                    after.id, after.staff_id
                );
                None
            }
        };
        match self
            .stores
            .appointments
            .set_external_event_id(after.id, new_event_id.as_deref())
            .await
        {
            Ok(()) => Some(new_event_id),
            Err(err) => {
                warn!(
                    "Failed to store external event id for appointment {}: {err}",
                    after.id
                );
                None
            }
        }
    }
}

/// One row per weekday, Monday first; unsaved days get the stock nine-to-six
/// window with Sundays off.
fn materialize_week(ctx: CallerContext, stored: Vec<WorkDayTemplate>) -> Vec<WorkDayTemplate> {
    WEEK_ORDER
        .iter()
        .map(|&day| {
            stored
                .iter()
                .find(|row| row.day_of_week == day)
                .cloned()
                .unwrap_or_else(|| WorkDayTemplate {
                    staff_id: ctx.user_id,
                    tenant_id: ctx.tenant_id,
                    day_of_week: day,
                    is_active: day != 0,
                    start_time: "09:00".to_string(),
                    end_time: "18:00".to_string(),
                })
        })
        .collect()
}

fn event_draft(
    appointment: &Appointment,
    service_name: &str,
    client_name: &str,
    client_phone: Option<&str>,
) -> EventDraft {
    // Updates leave the description out so the provider keeps the existing
    // one.
    let description = client_phone.map(|phone| {
        let phone = if phone.is_empty() { "not provided" } else { phone };
        format!("Booking for {client_name} (phone: {phone}).")
    });
    EventDraft {
        summary: format!("{service_name} - {client_name}"),
        description,
        start_time: appointment.start_time,
        end_time: appointment.end_time,
    }
}
