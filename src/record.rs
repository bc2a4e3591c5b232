use crate::level::Level;
use chrono::{DateTime, Utc};
use serde::ser::{self, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied fields of a record. Keys are unique; the last write wins.
pub type Fields = BTreeMap<String, FieldValue>;

/// Value attached to a field.
#[derive(Clone)]
pub enum FieldValue {
    /// Any value that serialized cleanly when it was attached.
    Json(serde_json::Value),
    /// An error; formatters write its display string.
    Error(Arc<dyn Error + Send + Sync>),
    /// A value whose `Serialize` impl failed. Formatting a record holding
    /// one of these fails with `FormatError::SerializationFailed`.
    Unserializable(String),
}

impl FieldValue {
    /// Convert any serializable value, deferring a serializer failure to
    /// formatting time.
    ///
    /// NaN and infinite floats have no JSON form and count as failures,
    /// wherever they are nested.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        if let Err(e) = value.serialize(FiniteCheck) {
            return FieldValue::Unserializable(e.0);
        }
        match serde_json::to_value(value) {
            Ok(json) => FieldValue::Json(json),
            Err(e) => FieldValue::Unserializable(e.to_string()),
        }
    }

    /// JSON view of the value, if it has one. Errors become their message.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            FieldValue::Json(value) => Some(value.clone()),
            FieldValue::Error(err) => Some(serde_json::Value::String(err.to_string())),
            FieldValue::Unserializable(_) => None,
        }
    }

    /// Content of a JSON string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// JSON number for a finite float.
    pub fn from_f64(value: f64) -> Self {
        match non_finite(value) {
            Some(reason) => FieldValue::Unserializable(reason),
            None => FieldValue::Json(serde_json::Value::from(value)),
        }
    }
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("unsupported value: NaN".to_string())
    } else if value.is_infinite() {
        let sign = if value > 0.0 { '+' } else { '-' };
        Some(format!("unsupported value: {}Inf", sign))
    } else {
        None
    }
}

#[derive(Debug)]
struct NonFinite(String);

impl fmt::Display for NonFinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for NonFinite {}

impl ser::Error for NonFinite {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        NonFinite(msg.to_string())
    }
}

/// Walks a value without producing output, failing on the first float
/// JSON cannot hold.
#[derive(Clone, Copy)]
struct FiniteCheck;

type Checked = Result<(), NonFinite>;

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> Checked {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Checked {
        match non_finite(v) {
            Some(reason) => Err(NonFinite(reason)),
            None => Ok(()),
        }
    }

    fn serialize_bool(self, _v: bool) -> Checked {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Checked {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Checked {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Checked {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Checked {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Checked {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Checked {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Checked {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Checked {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Checked {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Checked {
        Ok(())
    }

    fn serialize_char(self, _v: char) -> Checked {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Checked {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Checked {
        Ok(())
    }

    fn serialize_none(self) -> Checked {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Checked {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Checked {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Checked {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Checked {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFinite> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Checked {
        key.serialize(*self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Json(value) => write!(f, "{}", value),
            FieldValue::Error(err) => write!(f, "Error({:?})", err.to_string()),
            FieldValue::Unserializable(reason) => write!(f, "Unserializable({:?})", reason),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Json(a), FieldValue::Json(b)) => a == b,
            (FieldValue::Error(a), FieldValue::Error(b)) => a.to_string() == b.to_string(),
            (FieldValue::Unserializable(a), FieldValue::Unserializable(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Json(serde_json::Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Json(serde_json::Value::String(value))
    }
}

/// One log call: what the formatter and hooks see.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>, fields: Fields) -> Self {
        LogRecord {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn finite_values_convert_to_json() {
        assert_eq!(FieldValue::from_serialize(&1.5), FieldValue::Json(serde_json::json!(1.5)));
        assert_eq!(
            FieldValue::from_serialize(&vec![Some(1.0), None]),
            FieldValue::Json(serde_json::json!([1.0, null]))
        );
    }

    #[test]
    fn non_finite_floats_are_unserializable() {
        assert_eq!(
            FieldValue::from_serialize(&f64::NAN),
            FieldValue::Unserializable("unsupported value: NaN".into())
        );
        assert_eq!(
            FieldValue::from_serialize(&f32::NEG_INFINITY),
            FieldValue::Unserializable("unsupported value: -Inf".into())
        );
        assert_eq!(
            FieldValue::from_f64(f64::INFINITY),
            FieldValue::Unserializable("unsupported value: +Inf".into())
        );
    }

    #[test]
    fn nested_non_finite_floats_are_found() {
        let mut ratios = HashMap::new();
        ratios.insert("hit", vec![0.5, f64::NAN]);
        assert!(matches!(
            FieldValue::from_serialize(&ratios),
            FieldValue::Unserializable(_)
        ));
    }
}
