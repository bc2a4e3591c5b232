use crate::error::FormatError;
use crate::keys::KeyNames;
use crate::record::{FieldValue, LogRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::sync::Arc;

/// Turns a [`LogRecord`] into the bytes of one output line.
pub trait Formatter: Send + Sync {
    /// Format a record, including the trailing newline.
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError>;
}

/// RFC3339 timestamp in UTC (`Z`) with up to nine fraction digits.
///
/// Trailing zeros of the fraction are dropped, and so is the dot when
/// nothing is left: `12:04:05.5Z`, `12:04:05Z`.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    let full = time.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let without_zone = full.trim_end_matches('Z');
    let trimmed = without_zone.trim_end_matches('0').trim_end_matches('.');
    format!("{}Z", trimmed)
}

/// Single-line JSON formatter used by FT services.
///
/// Writes every caller field, then the time (only when the caller did not
/// set one), message, level and service name under the configured keys.
#[derive(Debug, Clone)]
pub struct FtJsonFormatter {
    service_name: String,
    keys: Arc<KeyNames>,
}

impl FtJsonFormatter {
    pub fn new(service_name: impl Into<String>, keys: Arc<KeyNames>) -> Self {
        FtJsonFormatter {
            service_name: service_name.into(),
            keys,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Formatter for FtJsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError> {
        if self.service_name.is_empty() {
            return Err(FormatError::NotInitialised);
        }

        let mut data = Map::new();
        for (key, value) in &record.fields {
            let json = match value {
                FieldValue::Json(json) => json.clone(),
                // JSON has no error type; keep the message.
                FieldValue::Error(err) => Value::String(err.to_string()),
                FieldValue::Unserializable(reason) => {
                    return Err(FormatError::SerializationFailed {
                        key: key.clone(),
                        reason: reason.clone(),
                    })
                }
            };
            data.insert(key.clone(), json);
        }

        if !data.contains_key(self.keys.time()) {
            data.insert(
                self.keys.time().to_string(),
                Value::String(format_timestamp(&record.timestamp)),
            );
        }

        data.insert(self.keys.msg().to_string(), Value::String(record.message.clone()));
        data.insert(
            self.keys.level().to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        data.insert(
            self.keys.service_name().to_string(),
            Value::String(self.service_name.clone()),
        );

        let mut serialized =
            serde_json::to_vec(&data).map_err(|e| FormatError::SerializationFailed {
                key: String::new(),
                reason: e.to_string(),
            })?;
        serialized.push(b'\n');
        Ok(serialized)
    }
}

/// Plain `key=value` formatter for the unstructured logger.
///
/// Output looks like `time="..." level=info msg="..." foo=bar`, with caller
/// fields in key order. It needs no service name.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError> {
        let mut line = String::new();
        push_pair(
            &mut line,
            "time",
            &record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        push_pair(&mut line, "level", record.level.as_str());
        push_pair(&mut line, "msg", &record.message);

        for (key, value) in &record.fields {
            let text = match value {
                FieldValue::Json(Value::String(s)) => s.clone(),
                FieldValue::Json(json) => json.to_string(),
                FieldValue::Error(err) => err.to_string(),
                FieldValue::Unserializable(reason) => {
                    return Err(FormatError::SerializationFailed {
                        key: key.clone(),
                        reason: reason.clone(),
                    })
                }
            };
            push_pair(&mut line, key, &text);
        }

        line.push('\n');
        Ok(line.into_bytes())
    }
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    if needs_quoting(value) {
        let _ = write!(line, "{}={:?}", key, value);
    } else {
        let _ = write!(line, "{}={}", key, value);
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyNameOverrides;
    use crate::level::Level;
    use crate::record::Fields;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;
    use std::io;

    const SERVICE: &str = "test-service-api";

    #[test]
    fn timestamp_fraction_drops_trailing_zeros() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 4, 0).unwrap();
        assert_eq!(format_timestamp(&base), "2024-03-01T12:04:00Z");
        assert_eq!(
            format_timestamp(&(base + Duration::milliseconds(500))),
            "2024-03-01T12:04:00.5Z"
        );
        assert_eq!(
            format_timestamp(&(base + Duration::nanoseconds(120))),
            "2024-03-01T12:04:00.00000012Z"
        );

        let later = base + Duration::nanoseconds(1_000_000_007);
        let parsed = DateTime::parse_from_rfc3339(&format_timestamp(&later)).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), later);
    }

    fn monitoring_fields() -> Fields {
        let mut fields = Fields::new();
        fields.insert("monitoring_event".into(), "true".into());
        fields.insert("event".into(), "apocalypse".into());
        fields.insert("content_type".into(), "lionel-barber-biography".into());
        fields.insert("transaction_id".into(), "tid_test".into());
        fields.insert(
            "error".into(),
            FieldValue::Error(Arc::new(io::Error::new(io::ErrorKind::Other, "the world is over"))),
        );
        fields
    }

    fn parse(bytes: &[u8]) -> HashMap<String, String> {
        serde_json::from_slice(bytes).expect("line is a flat JSON object of strings")
    }

    #[test]
    fn formats_monitoring_event_with_error() {
        let formatter = FtJsonFormatter::new(SERVICE, Arc::new(KeyNames::default()));
        let record = LogRecord::new(Level::Info, "happy ending", monitoring_fields());

        let bytes = formatter.format(&record).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);

        let line = parse(&bytes);
        assert_eq!(line.len(), 9);
        assert_eq!(line["service_name"], SERVICE);
        assert_eq!(line["event"], "apocalypse");
        assert_eq!(line["transaction_id"], "tid_test");
        assert_eq!(line["content_type"], "lionel-barber-biography");
        assert_eq!(line["error"], "the world is over");
        assert_eq!(line["msg"], "happy ending");
        assert_eq!(line["level"], "info");
        assert_eq!(line["monitoring_event"], "true");

        let time = DateTime::parse_from_rfc3339(&line["@time"]).unwrap();
        let drift = Utc::now().signed_duration_since(time.with_timezone(&Utc));
        assert!(drift < Duration::seconds(2));
    }

    #[test]
    fn keeps_caller_supplied_time() {
        let expected = Utc.timestamp_opt(1_234_567_890, 123_456_789).unwrap();
        let mut fields = monitoring_fields();
        fields.insert("@time".into(), format_timestamp(&expected).into());

        let formatter = FtJsonFormatter::new(SERVICE, Arc::new(KeyNames::default()));
        let line = parse(&formatter.format(&LogRecord::new(Level::Info, "m", fields)).unwrap());

        assert_eq!(line.len(), 9);
        let actual = DateTime::parse_from_rfc3339(&line["@time"]).unwrap();
        assert_eq!(actual.with_timezone(&Utc), expected);
    }

    #[test]
    fn reserved_keys_overwrite_caller_fields() {
        let mut fields = Fields::new();
        fields.insert("msg".into(), "from caller".into());
        fields.insert("level".into(), "bogus".into());
        fields.insert("service_name".into(), "someone-else".into());

        let formatter = FtJsonFormatter::new(SERVICE, Arc::new(KeyNames::default()));
        let line = parse(&formatter.format(&LogRecord::new(Level::Warn, "real", fields)).unwrap());

        assert_eq!(line.len(), 4);
        assert_eq!(line["msg"], "real");
        assert_eq!(line["level"], "warn");
        assert_eq!(line["service_name"], SERVICE);
    }

    #[test]
    fn uses_configured_key_names() {
        let keys = KeyNames::resolve(&KeyNameOverrides {
            time: Some("ts".into()),
            msg: Some("message".into()),
            level: Some("severity".into()),
            service_name: Some("app".into()),
            ..Default::default()
        });
        let formatter = FtJsonFormatter::new(SERVICE, Arc::new(keys));
        let line = parse(&formatter.format(&LogRecord::new(Level::Error, "m", Fields::new())).unwrap());

        assert_eq!(line.len(), 4);
        assert!(line.contains_key("ts"));
        assert_eq!(line["message"], "m");
        assert_eq!(line["severity"], "error");
        assert_eq!(line["app"], SERVICE);
    }

    #[test]
    fn refuses_to_format_without_service_name() {
        let formatter = FtJsonFormatter::new("", Arc::new(KeyNames::default()));
        let record = LogRecord::new(Level::Error, "happy ending", monitoring_fields());

        let err = formatter.format(&record).unwrap_err();
        assert!(matches!(err, FormatError::NotInitialised));
        assert_eq!(
            err.to_string(),
            "logger is not initialised - please use init_logger or init_default_logger"
        );
    }

    #[test]
    fn unserializable_field_fails_the_whole_line() {
        let mut bad_map = HashMap::new();
        bad_map.insert((1, 2), "tuple keys are not JSON object keys");
        let mut fields = Fields::new();
        fields.insert("ok".into(), "fine".into());
        fields.insert("bad".into(), FieldValue::from_serialize(&bad_map));

        let formatter = FtJsonFormatter::new(SERVICE, Arc::new(KeyNames::default()));
        match formatter.format(&LogRecord::new(Level::Info, "m", fields)) {
            Err(FormatError::SerializationFailed { key, .. }) => assert_eq!(key, "bad"),
            other => panic!("expected serialization failure, got {:?}", other),
        }
    }

    #[test]
    fn text_formatter_quotes_when_needed() {
        let mut fields = Fields::new();
        fields.insert("foo".into(), "bar".into());
        fields.insert("count".into(), FieldValue::Json(serde_json::json!(3)));
        fields.insert("note".into(), "two words".into());
        let record = LogRecord::new(Level::Info, "hello world", fields);

        let line = String::from_utf8(TextFormatter.format(&record).unwrap()).unwrap();
        assert!(line.starts_with("time="));
        assert!(line.contains(" level=info msg=\"hello world\" count=3 foo=bar note=\"two words\""));
        assert!(line.ends_with('\n'));
    }
}
