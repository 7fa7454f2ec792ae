//! Aggregate constructor for the SQL repositories
//!
//! The backend wires one of these per process; every repository shares the
//! same pooled client.

use crate::error::DbError;
use crate::repositories::{
    AppointmentRepository, CatalogRepository, ClientRepository, SqlAppointmentRepository,
    SqlCatalogRepository, SqlClientRepository, SqlStaffRepository, SqlWorkScheduleRepository,
    StaffRepository, WorkScheduleRepository,
};
use crate::DbClient;
use std::sync::Arc;
use tracing::info;

/// The full set of SQL repositories over one database client.
#[derive(Clone)]
pub struct SqlStores {
    pub appointments: Arc<SqlAppointmentRepository>,
    pub clients: Arc<SqlClientRepository>,
    pub catalog: Arc<SqlCatalogRepository>,
    pub schedules: Arc<SqlWorkScheduleRepository>,
    pub staff: Arc<SqlStaffRepository>,
}

impl SqlStores {
    /// Create every repository over the given client.
    pub fn new(db_client: DbClient) -> Self {
        Self {
            appointments: Arc::new(SqlAppointmentRepository::new(db_client.clone())),
            clients: Arc::new(SqlClientRepository::new(db_client.clone())),
            catalog: Arc::new(SqlCatalogRepository::new(db_client.clone())),
            schedules: Arc::new(SqlWorkScheduleRepository::new(db_client.clone())),
            staff: Arc::new(SqlStaffRepository::new(db_client)),
        }
    }

    /// Initialize every table. Idempotent; run once at startup.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        self.staff.init_schema().await?;
        self.catalog.init_schema().await?;
        self.clients.init_schema().await?;
        self.schedules.init_schema().await?;
        self.appointments.init_schema().await?;
        info!("Database schema initialized");
        Ok(())
    }
}
