//! Repository modules for database access
//!
//! Each entity gets a trait describing its operations and a SQL
//! implementation over the shared [`DbClient`](crate::DbClient). The traits
//! are object safe so services can hold `Arc<dyn …>` handles and tests can
//! substitute in-memory doubles.

pub mod appointments;
pub mod appointments_sql;
pub mod catalog;
pub mod catalog_sql;
pub mod clients;
pub mod clients_sql;
pub mod staff;
pub mod staff_sql;
pub mod work_schedules;
pub mod work_schedules_sql;

pub use appointments::{
    Appointment, AppointmentRepository, AppointmentStatus, GuardedWrite, ReschedulePatch,
};
pub use appointments_sql::SqlAppointmentRepository;
pub use catalog::{CatalogRepository, NewServiceOffering, ServiceOffering};
pub use catalog_sql::SqlCatalogRepository;
pub use clients::{Client, ClientRepository, NewClient};
pub use clients_sql::SqlClientRepository;
pub use staff::{Staff, StaffRepository};
pub use staff_sql::SqlStaffRepository;
pub use work_schedules::{WorkDayTemplate, WorkScheduleRepository};
pub use work_schedules_sql::SqlWorkScheduleRepository;
