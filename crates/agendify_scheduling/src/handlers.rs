// --- File: crates/agendify_scheduling/src/handlers.rs ---
use crate::auth::Caller;
use crate::booking::{
    BookingService, CreateAppointmentRequest, CreateServiceRequest, RescheduleRequest,
    WorkDayPayload,
};
use crate::error::SchedulingError;
use agendify_common::services::RemoteEvent;
use agendify_db::{Appointment, Client, ServiceOffering, WorkDayTemplate};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

// Shared state for the scheduling handlers
#[derive(Clone)]
pub struct SchedulingState {
    pub booking: Arc<BookingService>,
}

// --- Query / Response Types ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    pub staff_id: Uuid,
    pub service_id: Uuid,
    /// Date to calculate slots for, YYYY-MM-DD.
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-03-10"))]
    pub date: NaiveDate,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    /// Free slot starts as wall-clock `HH:MM`, ascending.
    #[cfg_attr(feature = "openapi", schema(example = json!(["09:00", "09:15"])))]
    pub slots: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AppointmentsQuery {
    /// First day of the window, YYYY-MM-DD.
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-03-01"))]
    pub from: NaiveDate,
    /// Last day of the window, inclusive, YYYY-MM-DD.
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-03-31"))]
    pub to: NaiveDate,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AgendaQuery {
    /// Window start; defaults to the configured look-back.
    pub from: Option<DateTime<Utc>>,
    /// Window end; defaults to the configured look-ahead.
    pub to: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ClientSearchQuery {
    /// Name or CPF fragment to match.
    pub q: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectCalendarRequest {
    /// Authorization code from the Google consent redirect.
    pub code: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AgendaResponse {
    pub events: Vec<RemoteEvent>,
}

// --- Handlers ---

/// Handler for free slot starts on one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability", // Path relative to /api
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free slot starts for the day", body = SlotsResponse),
        (status = 400, description = "Malformed query"),
        (status = 404, description = "Unknown service")
    ),
    tag = "Scheduling"
))]
pub async fn available_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<SlotsResponse>, SchedulingError> {
    let slots = state
        .booking
        .available_slots(ctx, query.staff_id, query.service_id, query.date)
        .await?;
    Ok(Json(SlotsResponse { slots }))
}

/// Handler to book an appointment.
#[axum::debug_handler]
pub async fn create_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<Json<Appointment>, SchedulingError> {
    let appointment = state.booking.create(ctx, payload).await?;
    Ok(Json(appointment))
}

/// Handler to move an appointment to a new slot, staff member or service.
#[axum::debug_handler]
pub async fn reschedule_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<Appointment>, SchedulingError> {
    let appointment = state.booking.reschedule(ctx, appointment_id, payload).await?;
    Ok(Json(appointment))
}

/// Handler to cancel an appointment.
#[axum::debug_handler]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, SchedulingError> {
    let appointment = state.booking.cancel(ctx, appointment_id).await?;
    Ok(Json(appointment))
}

/// Handler for the tenant's appointment history in a date window.
#[axum::debug_handler]
pub async fn list_appointments_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, SchedulingError> {
    let appointments = state
        .booking
        .list_appointments(ctx, query.from, query.to)
        .await?;
    Ok(Json(appointments))
}

/// Handler for the caller's weekly work template.
#[axum::debug_handler]
pub async fn week_schedule_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
) -> Result<Json<Vec<WorkDayTemplate>>, SchedulingError> {
    let week = state.booking.week_schedule(ctx).await?;
    Ok(Json(week))
}

/// Handler replacing the caller's weekly work template.
#[axum::debug_handler]
pub async fn replace_week_schedule_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Json(payload): Json<Vec<WorkDayPayload>>,
) -> Result<StatusCode, SchedulingError> {
    state.booking.replace_week_schedule(ctx, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for the Google consent URL.
#[axum::debug_handler]
pub async fn calendar_auth_url_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
) -> Result<Json<AuthUrlResponse>, SchedulingError> {
    let url = state.booking.calendar_auth_url(ctx)?;
    Ok(Json(AuthUrlResponse { url }))
}

/// Handler finishing the OAuth flow for the caller's calendar.
#[axum::debug_handler]
pub async fn connect_calendar_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Json(payload): Json<ConnectCalendarRequest>,
) -> Result<StatusCode, SchedulingError> {
    state.booking.connect_calendar(ctx, &payload.code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler unlinking the caller's calendar.
#[axum::debug_handler]
pub async fn disconnect_calendar_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
) -> Result<StatusCode, SchedulingError> {
    state.booking.disconnect_calendar(ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for the caller's external calendar agenda.
#[axum::debug_handler]
pub async fn agenda_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<AgendaResponse>, SchedulingError> {
    let events = state.booking.agenda(ctx, query.from, query.to).await?;
    Ok(Json(AgendaResponse { events }))
}

/// Handler listing the tenant's service catalog.
#[axum::debug_handler]
pub async fn list_services_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
) -> Result<Json<Vec<ServiceOffering>>, SchedulingError> {
    let services = state.booking.list_services(ctx).await?;
    Ok(Json(services))
}

/// Handler adding a service offering to the catalog.
#[axum::debug_handler]
pub async fn create_service_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<Json<ServiceOffering>, SchedulingError> {
    let service = state.booking.create_service(ctx, payload).await?;
    Ok(Json(service))
}

/// Handler searching the tenant's clients by name or CPF.
#[axum::debug_handler]
pub async fn search_clients_handler(
    State(state): State<Arc<SchedulingState>>,
    Caller(ctx): Caller,
    Query(query): Query<ClientSearchQuery>,
) -> Result<Json<Vec<Client>>, SchedulingError> {
    let clients = state
        .booking
        .search_clients(ctx, query.q.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(clients))
}
