// --- File: crates/agendify_scheduling/src/routes.rs ---

use crate::booking::{BookingService, BookingStores, SharedCalendar};
use crate::handlers::{
    agenda_handler, available_slots_handler, calendar_auth_url_handler,
    cancel_appointment_handler, connect_calendar_handler, create_appointment_handler,
    create_service_handler, disconnect_calendar_handler, list_appointments_handler,
    list_services_handler, replace_week_schedule_handler, reschedule_appointment_handler,
    search_clients_handler, week_schedule_handler, SchedulingState,
};
use agendify_config::AppConfig;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all availability, booking, schedule and
/// calendar-link routes. Pass `None` for the calendar to run without an
/// external mirror.
pub fn routes(
    config: Arc<AppConfig>,
    stores: BookingStores,
    calendar: Option<SharedCalendar>,
) -> Router {
    let booking = BookingService::new(
        stores,
        calendar,
        config.scheduling.clone(),
        config.google.clone(),
    );
    let state = Arc::new(SchedulingState {
        booking: Arc::new(booking),
    });

    Router::new()
        .route("/availability", get(available_slots_handler))
        .route(
            "/appointments",
            post(create_appointment_handler).get(list_appointments_handler),
        )
        .route(
            "/appointments/{appointment_id}",
            patch(reschedule_appointment_handler).delete(cancel_appointment_handler),
        )
        .route(
            "/schedule",
            get(week_schedule_handler).put(replace_week_schedule_handler),
        )
        .route("/calendar/auth-url", get(calendar_auth_url_handler))
        .route(
            "/calendar/connect",
            post(connect_calendar_handler).delete(disconnect_calendar_handler),
        )
        .route("/calendar/agenda", get(agenda_handler))
        .route(
            "/services",
            get(list_services_handler).post(create_service_handler),
        )
        .route("/clients", get(search_clients_handler))
        .with_state(state)
}
