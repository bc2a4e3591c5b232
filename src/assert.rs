//! Fluent assertions over captured [`LogRecord`]s.
//!
//! ```
//! use ft_logger::assert::assert_on;
//! use ft_logger::test_hook::new_test_hook;
//! use ft_logger::FieldLogger;
//!
//! let (logger, hook) = new_test_hook("test_service");
//! logger.with_monitoring_event("anEvent", "tid_test", "aContentType").info("done");
//!
//! let record = hook.last_entry().unwrap();
//! assert_on(&record)
//!     .has_monitoring_event("anEvent", "tid_test", "aContentType")
//!     .check();
//! ```
//!
//! Mismatches are collected instead of panicking on the spot. Call
//! [`LogAssert::check`] to fail the test, or [`LogAssert::failed`] /
//! [`LogAssert::into_failures`] to inspect them. An asserter with failures
//! that is dropped without being inspected panics.

use crate::format::format_timestamp;
use crate::keys::KeyNames;
use crate::record::{FieldValue, LogRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub fn assert_on(record: &LogRecord) -> LogAssert<'_> {
    LogAssert {
        record,
        keys: KeyNames::default(),
        failures: Vec::new(),
        inspected: false,
    }
}

#[must_use = "call `check`, `failed` or `into_failures` to observe the result"]
pub struct LogAssert<'a> {
    record: &'a LogRecord,
    keys: KeyNames,
    failures: Vec<String>,
    inspected: bool,
}

impl<'a> LogAssert<'a> {
    /// Resolve role keys (`has_transaction_id`, ...) through `keys` instead
    /// of the defaults.
    pub fn with_key_names(mut self, keys: KeyNames) -> Self {
        self.keys = keys;
        self
    }

    pub fn has_field<V: Serialize>(mut self, key: &str, expected: V) -> Self {
        let expected = match serde_json::to_value(&expected) {
            Ok(value) => value,
            Err(e) => {
                self.fail(format!("expected value for {:?} is not serializable: {}", key, e));
                return self;
            }
        };
        match self.record.field(key).map(FieldValue::to_json) {
            None => self.fail(format!("field {:?} is missing, expected {}", key, expected)),
            Some(None) => self.fail(format!("field {:?} holds an unserializable value", key)),
            Some(Some(actual)) if actual != expected => self.fail(format!(
                "field {:?}: expected {}, got {}",
                key, expected, actual
            )),
            Some(Some(_)) => {}
        }
        self
    }

    pub fn has_fields<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        fields
            .into_iter()
            .fold(self, |this, (key, value)| this.has_field(key.as_ref(), value))
    }

    pub fn has_transaction_id(self, expected: &str) -> Self {
        let key = self.keys.transaction_id().to_string();
        self.has_field(&key, expected)
    }

    pub fn has_uuid(self, expected: &str) -> Self {
        let key = self.keys.uuid().to_string();
        self.has_field(&key, expected)
    }

    /// Accepts both the string and the boolean encoding of the flag.
    pub fn has_valid_flag(mut self, expected: bool) -> Self {
        let key = self.keys.is_valid().to_string();
        let record = self.record;
        match record.field(&key) {
            Some(FieldValue::Json(Value::Bool(actual))) if *actual == expected => self,
            Some(FieldValue::Json(Value::String(actual))) if *actual == expected.to_string() => self,
            other => {
                self.fail(format!("field {:?}: expected {}, got {:?}", key, expected, other));
                self
            }
        }
    }

    pub fn has_time(self, expected: DateTime<Utc>) -> Self {
        let key = self.keys.time().to_string();
        self.has_field(&key, format_timestamp(&expected))
    }

    /// Compares the attached error's message with `expected`.
    pub fn has_error(self, expected: impl fmt::Display) -> Self {
        let key = self.keys.error().to_string();
        self.has_field(&key, expected.to_string())
    }

    pub fn has_monitoring_event(self, event_name: &str, tid: &str, content_type: &str) -> Self {
        let event_key = self.keys.event_name().to_string();
        let content_type_key = self.keys.content_type().to_string();
        let monitoring_key = self.keys.monitoring_event().to_string();
        self.has_field(&event_key, event_name)
            .has_transaction_id(tid)
            .has_field(&content_type_key, content_type)
            .has_field(&monitoring_key, "true")
    }

    pub fn failed(mut self) -> bool {
        self.inspected = true;
        !self.failures.is_empty()
    }

    pub fn into_failures(mut self) -> Vec<String> {
        self.inspected = true;
        std::mem::take(&mut self.failures)
    }

    /// Panic with every collected mismatch, if any.
    pub fn check(mut self) {
        self.inspected = true;
        if !self.failures.is_empty() {
            panic!("log record assertions failed:\n{}", self.failures.join("\n"));
        }
    }

    fn fail(&mut self, message: String) {
        self.failures.push(message);
    }
}

impl Drop for LogAssert<'_> {
    fn drop(&mut self) {
        if !self.inspected && !self.failures.is_empty() && !std::thread::panicking() {
            panic!("log record assertions failed:\n{}", self.failures.join("\n"));
        }
    }
}
