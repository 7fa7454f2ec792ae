// --- File: crates/agendify_scheduling/src/doc.rs ---

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;
use uuid::Uuid;

use crate::booking::{
    ClientRef, CreateAppointmentRequest, CreateServiceRequest, NewClientPayload,
    RescheduleRequest, WorkDayPayload,
};
use crate::handlers::{
    AgendaQuery, AgendaResponse, AppointmentsQuery, AuthUrlResponse, AvailabilityQuery,
    ClientSearchQuery, ConnectCalendarRequest, SlotsResponse,
};
use agendify_common::services::RemoteEvent;
use agendify_db::{Appointment, AppointmentStatus, Client, ServiceOffering, WorkDayTemplate};

#[utoipa::path(
    get,
    path = "/availability",
    params(
        ("x-user-id" = String, Header, description = "Caller id injected by the gateway; required on every route"),
        ("x-tenant-id" = String, Header, description = "Tenant id injected by the gateway; required on every route"),
        ("x-user-role" = String, Header, description = "Caller role (admin or staff); required on every route"),
        ("staff_id" = Uuid, Query, description = "Staff member to calculate slots for"),
        ("service_id" = Uuid, Query, description = "Service whose duration each slot must fit"),
        ("date" = String, Query, description = "Date in YYYY-MM-DD format", example = "2025-03-10", format = "date")
    ),
    responses(
        (status = 200, description = "Free slot starts for the day", body = SlotsResponse,
         example = json!({ "slots": ["09:00", "09:15", "09:30"] })),
        (status = 400, description = "Malformed query"),
        (status = 404, description = "Unknown service")
    ),
    tag = "scheduling"
)]
fn doc_available_slots_handler() {}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body(content = CreateAppointmentRequest, example = json!({
        "staff_id": "6e7f4e2e-8a5b-4f9f-9d2c-1b9d9f0a1c23",
        "service_id": "2b1a9c8d-7e6f-4a5b-8c9d-0e1f2a3b4c5d",
        "client": { "name": "Maria Souza", "cpf": "12345678901", "phone": "+55 11 91234-5678" },
        "date": "2025-03-10",
        "slot": "09:30"
    })),
    responses(
        (status = 200, description = "The booked appointment", body = Appointment),
        (status = 404, description = "Unknown service or client"),
        (status = 409, description = "Slot already taken")
    ),
    tag = "appointments"
)]
fn doc_create_appointment_handler() {}

#[utoipa::path(
    get,
    path = "/appointments",
    params(
        ("from" = String, Query, description = "First day, YYYY-MM-DD", format = "date"),
        ("to" = String, Query, description = "Last day, inclusive, YYYY-MM-DD", format = "date")
    ),
    responses(
        (status = 200, description = "Appointments in the window, cancelled included", body = Vec<Appointment>),
        (status = 400, description = "Malformed window")
    ),
    tag = "appointments"
)]
fn doc_list_appointments_handler() {}

#[utoipa::path(
    patch,
    path = "/appointments/{appointment_id}",
    params(
        ("appointment_id" = Uuid, Path, description = "The appointment to move")
    ),
    request_body = RescheduleRequest,
    responses(
        (status = 200, description = "The moved appointment", body = Appointment),
        (status = 404, description = "Unknown appointment or service"),
        (status = 409, description = "Target slot already taken")
    ),
    tag = "appointments"
)]
fn doc_reschedule_appointment_handler() {}

#[utoipa::path(
    delete,
    path = "/appointments/{appointment_id}",
    params(
        ("appointment_id" = Uuid, Path, description = "The appointment to cancel")
    ),
    responses(
        (status = 200, description = "The cancelled appointment", body = Appointment),
        (status = 404, description = "Unknown or already cancelled appointment")
    ),
    tag = "appointments"
)]
fn doc_cancel_appointment_handler() {}

#[utoipa::path(
    get,
    path = "/schedule",
    responses(
        (status = 200, description = "The caller's weekly template, Monday first", body = Vec<WorkDayTemplate>)
    ),
    tag = "scheduling"
)]
fn doc_week_schedule_handler() {}

#[utoipa::path(
    put,
    path = "/schedule",
    request_body(content = Vec<WorkDayPayload>, example = json!([
        { "day_of_week": 1, "is_active": true, "start_time": "09:00", "end_time": "18:00" }
    ])),
    responses(
        (status = 204, description = "Template replaced"),
        (status = 400, description = "Not exactly one valid row per weekday")
    ),
    tag = "scheduling"
)]
fn doc_replace_week_schedule_handler() {}

#[utoipa::path(
    get,
    path = "/calendar/auth-url",
    responses(
        (status = 200, description = "Google consent URL for the caller", body = AuthUrlResponse),
        (status = 502, description = "Calendar sync not configured")
    ),
    tag = "calendar"
)]
fn doc_calendar_auth_url_handler() {}

#[utoipa::path(
    post,
    path = "/calendar/connect",
    request_body = ConnectCalendarRequest,
    responses(
        (status = 204, description = "Calendar linked (or already linked)"),
        (status = 400, description = "Missing authorization code"),
        (status = 502, description = "Token exchange failed")
    ),
    tag = "calendar"
)]
fn doc_connect_calendar_handler() {}

#[utoipa::path(
    delete,
    path = "/calendar/connect",
    responses(
        (status = 204, description = "Stored credential dropped")
    ),
    tag = "calendar"
)]
fn doc_disconnect_calendar_handler() {}

#[utoipa::path(
    get,
    path = "/calendar/agenda",
    params(
        ("from" = Option<String>, Query, description = "RFC 3339 window start; defaults to the configured look-back"),
        ("to" = Option<String>, Query, description = "RFC 3339 window end; defaults to the configured look-ahead")
    ),
    responses(
        (status = 200, description = "Events on the caller's external calendar", body = AgendaResponse),
        (status = 502, description = "Provider unreachable or sync not configured")
    ),
    tag = "calendar"
)]
fn doc_agenda_handler() {}

#[utoipa::path(
    get,
    path = "/services",
    responses(
        (status = 200, description = "The tenant's service catalog", body = Vec<ServiceOffering>)
    ),
    tag = "catalog"
)]
fn doc_list_services_handler() {}

#[utoipa::path(
    post,
    path = "/services",
    request_body(content = CreateServiceRequest, example = json!({
        "name": "Corte de cabelo",
        "price_minor": 8000,
        "duration_minutes": 45
    })),
    responses(
        (status = 200, description = "The created service", body = ServiceOffering),
        (status = 400, description = "Invalid name, duration or price"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "catalog"
)]
fn doc_create_service_handler() {}

#[utoipa::path(
    get,
    path = "/clients",
    params(
        ("q" = Option<String>, Query, description = "Name or CPF fragment; empty lists everyone")
    ),
    responses(
        (status = 200, description = "Matching clients", body = Vec<Client>)
    ),
    tag = "catalog"
)]
fn doc_search_clients_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_available_slots_handler,
        doc_create_appointment_handler,
        doc_list_appointments_handler,
        doc_reschedule_appointment_handler,
        doc_cancel_appointment_handler,
        doc_week_schedule_handler,
        doc_replace_week_schedule_handler,
        doc_calendar_auth_url_handler,
        doc_connect_calendar_handler,
        doc_disconnect_calendar_handler,
        doc_agenda_handler,
        doc_list_services_handler,
        doc_create_service_handler,
        doc_search_clients_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            SlotsResponse,
            CreateAppointmentRequest,
            ClientRef,
            NewClientPayload,
            RescheduleRequest,
            AppointmentsQuery,
            Appointment,
            AppointmentStatus,
            WorkDayPayload,
            WorkDayTemplate,
            CreateServiceRequest,
            ServiceOffering,
            Client,
            ConnectCalendarRequest,
            AuthUrlResponse,
            AgendaQuery,
            AgendaResponse,
            ClientSearchQuery,
            RemoteEvent
        )
    ),
    tags(
        (name = "scheduling", description = "Slot availability and work schedules"),
        (name = "appointments", description = "Booking transactions over the appointment ledger"),
        (name = "calendar", description = "Per-staff external calendar linking"),
        (name = "catalog", description = "Services and clients")
    ),
    servers(
        (url = "/api", description = "Scheduling API server")
    )
)]
pub struct SchedulingApiDoc;
