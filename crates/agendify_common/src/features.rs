//! Feature flag handling for the Agendify application.
//!
//! Features are toggled two ways: compile-time cargo features (currently only
//! `openapi`) and runtime configuration values. A runtime feature counts as
//! enabled when its `use_*` flag is set and its configuration section is
//! present, so a half-configured feature never activates.

use agendify_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `use_feature` - The configuration flag that enables the feature
/// * `feature_config` - The configuration section for the feature
///
/// # Returns
///
/// `true` if the feature is enabled, `false` otherwise
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if Google Calendar sync is enabled at runtime.
pub fn is_gcal_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_gcal, config.google.as_ref())
}
