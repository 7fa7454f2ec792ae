use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://agendify.db, loaded via AGENDIFY__DATABASE__URL
}

// --- Google OAuth Config ---
// Holds the OAuth client used for per-staff calendar linking. The client
// secret is normally injected via AGENDIFY__GOOGLE__CLIENT_SECRET.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

// --- Scheduling Policy Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Business timezone all wall-clock schedule times are expressed in.
    #[serde(default = "default_time_zone")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub time_zone: Tz,
    /// Candidate slot-start granularity in minutes.
    #[serde(default = "default_slot_step")]
    pub slot_step_minutes: u32,
    /// External agenda view window, days before and after today.
    #[serde(default = "default_agenda_past_days")]
    pub agenda_past_days: i64,
    #[serde(default = "default_agenda_future_days")]
    pub agenda_future_days: i64,
}

fn default_time_zone() -> Tz {
    chrono_tz::America::Sao_Paulo
}

fn default_slot_step() -> u32 {
    15
}

fn default_agenda_past_days() -> i64 {
    30
}

fn default_agenda_future_days() -> i64 {
    90
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        SchedulingConfig {
            time_zone: default_time_zone(),
            slot_step_minutes: default_slot_step(),
            agenda_past_days: default_agenda_past_days(),
            agenda_future_days: default_agenda_future_days(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub google: Option<GoogleConfig>,

    #[serde(default)]
    pub scheduling: SchedulingConfig,
}
