use chrono::{NaiveDate, NaiveDateTime};

use std::fmt;

use crate::datatype::{
    self, DataType, ExtraBoolean, TypeRegistry,
};
use crate::error::{RecastError, Result};

/// The raw payload carried by a [`Value`].
#[derive(Clone, PartialEq, Debug)]
pub enum Payload {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Extra(ExtraBoolean),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Payload::String(s) => write!(f, "{}", s),
            Payload::Integer(i) => write!(f, "{}", i),
            Payload::Long(l) => write!(f, "{}", l),
            Payload::Double(d) => write!(f, "{}", d),
            Payload::Boolean(b) => write!(f, "{}", b),
            Payload::Extra(e) => write!(f, "{}", e),
            Payload::Date(d) => write!(f, "{}", d),
            Payload::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// An immutable pair of payload and data type, the central currency of the
/// system.
///
/// The typed constructors guarantee that the payload's runtime shape matches
/// the declared type. A null value carries a type without a payload, serving
/// as a typed placeholder. Conversion never mutates; it produces a new value.
#[derive(Clone, PartialEq, Debug)]
pub struct Value {
    payload: Option<Payload>,
    data_type: DataType,
}

impl Value {
    pub(crate) fn tagged(payload: Payload, data_type: DataType) -> Self {
        Self {
            payload: Some(payload),
            data_type,
        }
    }
    pub fn null(data_type: DataType) -> Self {
        Self {
            payload: None,
            data_type,
        }
    }
    pub fn string(s: impl Into<String>) -> Self {
        Self::tagged(Payload::String(s.into()), datatype::STRING.clone())
    }
    pub fn integer(i: i32) -> Self {
        Self::tagged(Payload::Integer(i), datatype::INTEGER.clone())
    }
    pub fn long(l: i64) -> Self {
        Self::tagged(Payload::Long(l), datatype::LONG.clone())
    }
    pub fn double(d: f64) -> Self {
        Self::tagged(Payload::Double(d), datatype::DOUBLE.clone())
    }
    pub fn number(d: f64) -> Self {
        Self::tagged(Payload::Double(d), datatype::NUMBER.clone())
    }
    pub fn boolean(b: bool) -> Self {
        Self::tagged(Payload::Boolean(b), datatype::BOOLEAN.clone())
    }
    pub fn extra_boolean(e: ExtraBoolean) -> Self {
        Self::tagged(Payload::Extra(e), datatype::EXTRA_BOOLEAN.clone())
    }
    pub fn date(d: NaiveDate) -> Self {
        Self::tagged(Payload::Date(d), datatype::DATE.clone())
    }
    pub fn datetime(dt: NaiveDateTime) -> Self {
        Self::tagged(Payload::DateTime(dt), datatype::DATETIME.clone())
    }
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
    pub fn is_null(&self) -> bool {
        self.payload.is_none()
    }
    /// Converts to another type through the registry's parser chain,
    /// producing a new value.
    pub fn cast_to(&self, registry: &TypeRegistry, to: &DataType) -> Result<Value> {
        registry.convert(self, to)
    }
    fn unwrap_failure(&self, to: &DataType) -> RecastError {
        RecastError::Conversion {
            value: self.to_string(),
            from: self.data_type.name().to_owned(),
            to: to.name().to_owned(),
        }
    }
    pub fn to_string_value(&self, registry: &TypeRegistry) -> Result<String> {
        match self.cast_to(registry, &datatype::STRING)?.payload {
            Some(Payload::String(s)) => Ok(s),
            _ => Err(self.unwrap_failure(&datatype::STRING)),
        }
    }
    pub fn to_integer(&self, registry: &TypeRegistry) -> Result<i32> {
        match self.cast_to(registry, &datatype::INTEGER)?.payload {
            Some(Payload::Integer(i)) => Ok(i),
            _ => Err(self.unwrap_failure(&datatype::INTEGER)),
        }
    }
    pub fn to_long(&self, registry: &TypeRegistry) -> Result<i64> {
        match self.cast_to(registry, &datatype::LONG)?.payload {
            Some(Payload::Long(l)) => Ok(l),
            _ => Err(self.unwrap_failure(&datatype::LONG)),
        }
    }
    pub fn to_double(&self, registry: &TypeRegistry) -> Result<f64> {
        match self.cast_to(registry, &datatype::DOUBLE)?.payload {
            Some(Payload::Double(d)) => Ok(d),
            _ => Err(self.unwrap_failure(&datatype::DOUBLE)),
        }
    }
    pub fn to_boolean(&self, registry: &TypeRegistry) -> Result<bool> {
        match self.cast_to(registry, &datatype::BOOLEAN)?.payload {
            Some(Payload::Boolean(b)) => Ok(b),
            _ => Err(self.unwrap_failure(&datatype::BOOLEAN)),
        }
    }
    pub fn to_extra_boolean(&self, registry: &TypeRegistry) -> Result<ExtraBoolean> {
        match self.cast_to(registry, &datatype::EXTRA_BOOLEAN)?.payload {
            Some(Payload::Extra(e)) => Ok(e),
            _ => Err(self.unwrap_failure(&datatype::EXTRA_BOOLEAN)),
        }
    }
    pub fn to_date(&self, registry: &TypeRegistry) -> Result<NaiveDate> {
        match self.cast_to(registry, &datatype::DATE)?.payload {
            Some(Payload::Date(d)) => Ok(d),
            _ => Err(self.unwrap_failure(&datatype::DATE)),
        }
    }
    pub fn to_datetime(&self, registry: &TypeRegistry) -> Result<NaiveDateTime> {
        match self.cast_to(registry, &datatype::DATETIME)?.payload {
            Some(Payload::DateTime(dt)) => Ok(dt),
            _ => Err(self.unwrap_failure(&datatype::DATETIME)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}", payload),
            None => Ok(()),
        }
    }
}
