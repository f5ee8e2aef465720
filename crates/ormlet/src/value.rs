use crate::{Error, Result};

/// A storage value moving between entities, rows, and the executor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 32-bit floating point
    F32(f32),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// Byte sequence
    Bytes(Vec<u8>),

    /// Universally unique identifier
    Uuid(uuid::Uuid),

    /// Instant in time
    Timestamp(jiff::Timestamp),

    /// Calendar date
    Date(jiff::civil::Date),

    /// Wall-clock time
    Time(jiff::civil::Time),

    /// Calendar date with wall-clock time
    DateTime(jiff::civil::DateTime),
}

impl Value {
    /// Returns a value representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Orders two values of the same variant; `None` when the variants differ
    /// or the variant has no total order.
    pub fn compare(&self, other: &Value) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::I16(a), Value::I16(b)) => Some(a.cmp(b)),
            (Value::I32(a), Value::I32(b)) => Some(a.cmp(b)),
            (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
            (Value::F32(a), Value::F32(b)) => a.partial_cmp(b),
            (Value::F64(a), Value::F64(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Conversion from a storage value into a property value.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// Conversion from a property value into a storage value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! primitive {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(value) => Ok(value),
                    other => Err(Error::type_conversion($name, other.type_name())),
                }
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

primitive!(bool, Bool, "bool");
primitive!(i16, I16, "i16");
primitive!(i32, I32, "i32");
primitive!(i64, I64, "i64");
primitive!(f32, F32, "f32");
primitive!(f64, F64, "f64");
primitive!(String, String, "string");
primitive!(Vec<u8>, Bytes, "bytes");
primitive!(uuid::Uuid, Uuid, "uuid");
primitive!(jiff::Timestamp, Timestamp, "timestamp");
primitive!(jiff::civil::Date, Date, "date");
primitive!(jiff::civil::Time, Time, "time");
primitive!(jiff::civil::DateTime, DateTime, "datetime");

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_round_trip() {
        assert_eq!(i64::from_value(42i64.into_value()).unwrap(), 42);
        assert_eq!(
            String::from_value("hi".into_value()).unwrap(),
            "hi".to_owned()
        );
    }

    #[test]
    fn option_null_round_trip() {
        assert_eq!(None::<i64>.into_value(), Value::Null);
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(Value::I64(7)).unwrap(), Some(7));
    }

    #[test]
    fn mismatched_variant_fails() {
        let err = i64::from_value(Value::String("7".into())).unwrap_err();
        assert!(err.is_type_conversion());
    }
}
