// --- File: crates/agendify_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod booking;
#[cfg(test)]
mod booking_test;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
