// File: services/agendify_backend/src/main.rs
use agendify_common::is_gcal_enabled;
use agendify_common::services::CalendarCredentialStore;
use agendify_config::load_config;
use agendify_db::{DbClient, SqlStores};
use agendify_gcal::service::GoogleStaffCalendar;
use agendify_scheduling::booking::{BookingStores, SharedCalendar};
use agendify_scheduling::routes as scheduling_routes;
use axum::http::StatusCode;
use axum::{extract::State, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

#[axum::debug_handler]
async fn health(State(db): State<DbClient>) -> (StatusCode, &'static str) {
    if db.is_healthy().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "database unreachable")
    }
}

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    agendify_common::logging::init();

    let db_client = DbClient::new(&config)
        .await
        .expect("Failed to connect to the database");
    let stores = SqlStores::new(db_client.clone());
    stores
        .init_schema()
        .await
        .expect("Failed to initialize the database schema");

    let booking_stores = BookingStores {
        appointments: stores.appointments.clone(),
        clients: stores.clients.clone(),
        catalog: stores.catalog.clone(),
        schedules: stores.schedules.clone(),
        staff: stores.staff.clone(),
    };

    let calendar: Option<SharedCalendar> = if is_gcal_enabled(&config) {
        println!("🗓️ Google Calendar sync enabled");
        let google = config
            .google
            .clone()
            .expect("use_gcal set without a google config section");
        let credentials = stores.staff.clone() as Arc<dyn CalendarCredentialStore>;
        Some(Arc::new(GoogleStaffCalendar::new(
            google,
            config.scheduling.time_zone,
            credentials,
        )))
    } else {
        println!("ℹ️ Google Calendar sync disabled via runtime config or missing google config section.");
        None
    };

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Agendify API!" }))
        .merge(scheduling_routes::routes(
            config.clone(),
            booking_stores,
            calendar,
        ));

    let mut app = Router::new()
        .nest("/api", api_router)
        .route("/health", get(health).with_state(db_client));

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use agendify_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Agendify API",
                version = "0.1.0",
                description = "Agendify Scheduling Service API Docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Agendify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        // Create the merged OpenAPI document
        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        println!("📖 Adding Swagger UI at /api/docs");

        // Create the Swagger UI route, referencing the merged doc
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        // Merge the Swagger UI into the main app router
        app = app.merge(swagger_ui);
    }

    // Serve static files in dev mode
    if cfg!(debug_assertions) {
        println!("Running in development mode, serving static files from ../../dist");

        // Serve static files at a specific path
        let static_router = Router::new().nest_service("/static", ServeDir::new("../../dist"));
        app = app.merge(static_router);

        // You can also keep the fallback service for non-matched routes
        app = app.fallback_service(ServeDir::new("../dist"));
    }

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
