// --- File: crates/agendify_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod oauth;
#[cfg(test)]
mod oauth_test;
pub mod service;
