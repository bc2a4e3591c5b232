//! Chainable log entries.
//!
//! A [`LogEntry`] accumulates fields until one of the terminal severity
//! methods is called. Every `with_*` call returns a new entry holding its
//! own copy of the fields, so an intermediate entry can be stored and
//! extended in several directions without the branches seeing each other.

use crate::error::LogError;
use crate::format::format_timestamp;
use crate::level::Level;
use crate::logger::{report, Logger, ValidFlagEncoding};
use crate::record::{FieldValue, Fields};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

macro_rules! terminal_methods {
    ($( $(#[$doc:meta])* $plain:ident, $formatted:ident => $level:expr; )*) => {
        $(
            $(#[$doc])*
            fn $plain(&self, message: impl fmt::Display) {
                self.log($level, message);
            }

            /// Formatted variant; build the arguments with `format_args!`.
            fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.log($level, args);
            }
        )*
    };
}

/// Field-attachment and logging operations shared by [`Logger`] and
/// [`LogEntry`].
///
/// `with_*` methods never log; they return a new [`LogEntry`]. Terminal
/// methods (`debug` ... `panic`) hand the accumulated fields to the logger.
pub trait FieldLogger {
    /// A fresh entry carrying this value's fields.
    fn entry(&self) -> LogEntry;

    fn with_field<V>(&self, key: impl Into<String>, value: V) -> LogEntry
    where
        V: Serialize,
    {
        self.entry()
            .insert(key.into(), FieldValue::from_serialize(&value))
    }

    fn with_fields<I, K, V>(&self, fields: I) -> LogEntry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        fields.into_iter().fold(self.entry(), |entry, (key, value)| {
            entry.insert(key.into(), FieldValue::from_serialize(&value))
        })
    }

    fn with_transaction_id(&self, tid: &str) -> LogEntry {
        let entry = self.entry();
        let key = entry.logger.key_names().transaction_id().to_string();
        entry.insert(key, tid.into())
    }

    fn with_uuid(&self, uuid: &str) -> LogEntry {
        let entry = self.entry();
        let key = entry.logger.key_names().uuid().to_string();
        entry.insert(key, uuid.into())
    }

    /// Written as `"true"`/`"false"` unless the logger is configured with
    /// [`ValidFlagEncoding::Bool`].
    fn with_valid_flag(&self, is_valid: bool) -> LogEntry {
        let entry = self.entry();
        let key = entry.logger.key_names().is_valid().to_string();
        let value = match entry.logger.valid_flag_encoding() {
            ValidFlagEncoding::Text => FieldValue::from(is_valid.to_string()),
            ValidFlagEncoding::Bool => FieldValue::Json(is_valid.into()),
        };
        entry.insert(key, value)
    }

    /// Overrides the timestamp the formatter would otherwise use.
    fn with_time(&self, time: DateTime<Utc>) -> LogEntry {
        let entry = self.entry();
        let key = entry.logger.key_names().time().to_string();
        entry.insert(key, format_timestamp(&time).into())
    }

    fn with_error<E>(&self, err: E) -> LogEntry
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let entry = self.entry();
        let key = entry.logger.key_names().error().to_string();
        let err: Box<dyn Error + Send + Sync> = err.into();
        entry.insert(key, FieldValue::Error(Arc::from(err)))
    }

    /// Mark the entry as a monitoring event: monitoring flag `"true"`, event
    /// name, content type and transaction id.
    fn with_monitoring_event(&self, event_name: &str, tid: &str, content_type: &str) -> LogEntry {
        let entry = self.entry();
        let keys = entry.logger.key_names().clone();
        entry
            .insert(keys.monitoring_event().to_string(), "true".into())
            .insert(keys.event_name().to_string(), event_name.into())
            .insert(keys.content_type().to_string(), content_type.into())
            .with_transaction_id(tid)
    }

    /// Mark the entry as a categorised event: event name, category, event
    /// message and transaction id.
    fn with_categorised_event(
        &self,
        event_name: &str,
        event_category: &str,
        event_msg: &str,
        tid: &str,
    ) -> LogEntry {
        let entry = self.entry();
        let keys = entry.logger.key_names().clone();
        entry
            .insert(keys.event_name().to_string(), event_name.into())
            .insert(keys.event_category().to_string(), event_category.into())
            .insert(keys.event_msg().to_string(), event_msg.into())
            .with_transaction_id(tid)
    }

    /// Log at `level`, returning any formatting or write failure.
    ///
    /// A fatal record still exits the process and a panic record still
    /// panics after writing.
    fn try_log(&self, level: Level, message: impl fmt::Display) -> Result<(), LogError> {
        let entry = self.entry();
        entry
            .logger
            .write_record(level, message.to_string(), entry.fields)
    }

    /// Log at `level`; failures are printed to stderr.
    fn log(&self, level: Level, message: impl fmt::Display) {
        if let Err(e) = self.try_log(level, message) {
            report(&e);
        }
    }

    terminal_methods! {
        debug, debugf => Level::Debug;
        info, infof => Level::Info;
        /// Same as `info`.
        print, printf => Level::Info;
        warn, warnf => Level::Warn;
        /// Same as `warn`.
        warning, warningf => Level::Warn;
        error, errorf => Level::Error;
        /// Logs, then terminates the process with exit code 1.
        fatal, fatalf => Level::Fatal;
        /// Logs, then panics with the message.
        panic, panicf => Level::Panic;
    }
}

/// Intermediate or final log entry bound to a [`Logger`].
#[derive(Clone, Debug)]
pub struct LogEntry {
    logger: Logger,
    fields: Fields,
}

impl LogEntry {
    pub(crate) fn new(logger: Logger) -> Self {
        LogEntry {
            logger,
            fields: Fields::new(),
        }
    }

    fn insert(mut self, key: String, value: FieldValue) -> Self {
        self.fields.insert(key, value);
        self
    }

    /// Fields accumulated so far.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl FieldLogger for LogEntry {
    fn entry(&self) -> LogEntry {
        self.clone()
    }
}
