//! Process-wide logger for services that prefer free functions over passing
//! a [`Logger`] around.
//!
//! Call [`init_default_logger`] or [`init_logger`] once at startup. Until
//! then [`logger`] returns a logger without a service name, and every line
//! it is asked to write fails with `FormatError::NotInitialised`.

use crate::entry::{FieldLogger, LogEntry};
use crate::keys::KeyNameOverrides;
use crate::logger::{Logger, LoggerConfig};
use crate::test_hook::{self, CaptureHook};
use parking_lot::RwLock;
use serde::Serialize;
use std::error::Error;
use std::fmt;

static GLOBAL: RwLock<Option<Logger>> = RwLock::new(None);

/// Initialise the global logger at INFO level.
pub fn init_default_logger(service_name: impl Into<String>) {
    set(Logger::info_logger(service_name));
}

/// Initialise the global logger; an unknown level falls back to INFO.
pub fn init_logger(service_name: impl Into<String>, log_level: impl Into<String>) {
    set(Logger::new(service_name, log_level));
}

pub fn init_logger_with_key_names(
    service_name: impl Into<String>,
    log_level: impl Into<String>,
    key_names: KeyNameOverrides,
) {
    set(Logger::with_key_names(service_name, log_level, key_names));
}

pub fn init_from_config(config: LoggerConfig) {
    set(Logger::from_config(config));
}

/// Replace the global logger.
pub fn set(logger: Logger) {
    *GLOBAL.write() = Some(logger);
}

/// Drop the global logger, returning to the uninitialised state.
pub fn reset() {
    *GLOBAL.write() = None;
}

/// Current global logger.
pub fn logger() -> Logger {
    GLOBAL.read().clone().unwrap_or_else(Logger::uninitialised)
}

/// Initialise the global logger with output discarded and records captured
/// by the returned hook.
pub fn new_test_hook(service_name: impl Into<String>) -> CaptureHook {
    let (logger, hook) = test_hook::new_test_hook(service_name);
    set(logger);
    hook
}

pub fn with_field<V: Serialize>(key: impl Into<String>, value: V) -> LogEntry {
    logger().with_field(key, value)
}

pub fn with_fields<I, K, V>(fields: I) -> LogEntry
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    logger().with_fields(fields)
}

pub fn with_transaction_id(tid: &str) -> LogEntry {
    logger().with_transaction_id(tid)
}

pub fn with_error<E>(err: E) -> LogEntry
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    logger().with_error(err)
}

pub fn with_monitoring_event(event_name: &str, tid: &str, content_type: &str) -> LogEntry {
    logger().with_monitoring_event(event_name, tid, content_type)
}

pub fn with_categorised_event(
    event_name: &str,
    event_category: &str,
    event_msg: &str,
    tid: &str,
) -> LogEntry {
    logger().with_categorised_event(event_name, event_category, event_msg, tid)
}

pub fn debug(message: impl fmt::Display) {
    logger().debug(message);
}

pub fn info(message: impl fmt::Display) {
    logger().info(message);
}

pub fn infof(args: fmt::Arguments<'_>) {
    logger().infof(args);
}

pub fn warn(message: impl fmt::Display) {
    logger().warn(message);
}

pub fn error(message: impl fmt::Display) {
    logger().error(message);
}
