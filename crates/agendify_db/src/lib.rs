//! Database integration for Agendify
//!
//! This crate provides a database client that is designed to be database agnostic,
//! using SQLx as the underlying database library. It supports SQLite and PostgreSQL
//! through feature flags, and hosts the repositories for the scheduling data model:
//! appointments, clients, the service catalog, staff records, and weekly work
//! schedules.
//!
//! # Features
//!
//! - Database agnostic design
//! - Connection pooling
//! - Integration with the Agendify configuration system
//! - Support for SQLite and PostgreSQL
//!
//! # Usage
//!
//! Add the crate to your dependencies:
//!
//! ```toml
//! [dependencies]
//! agendify-db = { version = "0.1.0" }
//! ```
//!
//! To use a specific database backend:
//!
//! ```toml
//! [dependencies]
//! agendify-db = { version = "0.1.0", features = ["postgres"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use agendify_config::load_config;
//! use agendify_db::DbClient;
//! use std::sync::Arc;
//!
//! async fn setup_db() -> Result<DbClient, Box<dyn std::error::Error>> {
//!     let config = Arc::new(load_config()?);
//!     let db_client = DbClient::new(&config).await?;
//!     Ok(db_client)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod stores;
pub mod time;

// Register the SQLite driver when the crate is loaded
#[cfg(feature = "sqlite")]
mod sqlite_driver {
    // This import ensures the SQLite driver is linked and registered
    #[allow(unused_imports)]
    use sqlx::sqlite::SqlitePoolOptions as _;
}

pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use stores::SqlStores;

// Re-export the repositories module components for ease of use
pub use repositories::{
    Appointment, AppointmentRepository, AppointmentStatus, CatalogRepository, Client,
    ClientRepository, GuardedWrite, NewClient, NewServiceOffering, ReschedulePatch,
    ServiceOffering, SqlAppointmentRepository, SqlCatalogRepository, SqlClientRepository,
    SqlStaffRepository, SqlWorkScheduleRepository, Staff, StaffRepository, WorkDayTemplate,
    WorkScheduleRepository,
};
