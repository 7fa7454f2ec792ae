// Declare modules within this crate
pub mod models; // Shared data structures
pub mod services; // Service abstractions
pub mod logging; // Logging utilities
pub mod features; // Feature flag handling
pub mod http; // Shared HTTP client

// Re-export the caller context types for easier access
pub use models::{CallerContext, Role};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error};

// Re-export feature flag handling utilities for easier access
pub use features::{is_feature_enabled, is_gcal_enabled};

// This crate provides functionality shared across the application: the
// calendar service seam, caller identity, logging and feature flags.
