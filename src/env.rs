//! Environment variable names used by this crate for convenient
//! configuration of loggers from microservices.
//!
//! These are purely helpers; [`Logger`](crate::Logger) itself never reads
//! the environment.

use crate::keys::KeyNameOverrides;
use crate::logger::{LoggerConfig, ValidFlagEncoding};
use crate::output::parse_output;

/// Service name written into every line.
pub const LOG_SERVICE_NAME_ENV: &str = "SERVICE_NAME";

/// Minimum level name, e.g. `debug`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Output destination: `stderr`, `stdout` or `discard`.
pub const LOG_OUTPUT_ENV: &str = "LOG_OUTPUT";

/// JSON object of key overrides, e.g. `{"time":"ts"}`.
pub const LOG_KEY_NAMES_ENV: &str = "LOG_KEY_NAMES";

/// Encoding of the "is valid" flag: `string` or `bool`.
pub const LOG_VALID_FLAG_ENV: &str = "LOG_VALID_FLAG";

impl LoggerConfig {
    /// Build a configuration from the process environment.
    ///
    /// Unset variables keep their defaults. Malformed values are reported
    /// with `tracing::warn!` and also keep their defaults, except for the
    /// level, which the logger itself reports when it is built.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LoggerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = LoggerConfig::default();

        if let Some(service_name) = lookup(LOG_SERVICE_NAME_ENV) {
            config.service_name = service_name;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(output) = lookup(LOG_OUTPUT_ENV) {
            match parse_output(&output) {
                Ok(kind) => config.output = kind,
                Err(e) => tracing::warn!(error = %e, "ignoring {}", LOG_OUTPUT_ENV),
            }
        }
        if let Some(raw) = lookup(LOG_KEY_NAMES_ENV) {
            match serde_json::from_str::<KeyNameOverrides>(&raw) {
                Ok(overrides) => config.key_names = overrides,
                Err(e) => tracing::warn!(error = %e, "ignoring {}", LOG_KEY_NAMES_ENV),
            }
        }
        if let Some(raw) = lookup(LOG_VALID_FLAG_ENV) {
            match raw.to_ascii_lowercase().as_str() {
                "string" | "text" => config.valid_flag = ValidFlagEncoding::Text,
                "bool" | "boolean" => config.valid_flag = ValidFlagEncoding::Bool,
                _ => tracing::warn!(value = %raw, "ignoring {}", LOG_VALID_FLAG_ENV),
            }
        }

        config
    }
}
