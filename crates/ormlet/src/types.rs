use std::fmt;

/// Storage-level column type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    VarChar(u32),
    Binary(u32),
    Blob,
    Timestamp,
    Date,
    Time,
    DateTime,
    Uuid,
    Custom(String),
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Boolean => f.write_str("boolean"),
            SqlType::SmallInt => f.write_str("smallint"),
            SqlType::Int => f.write_str("int"),
            SqlType::BigInt => f.write_str("bigint"),
            SqlType::Float => f.write_str("float"),
            SqlType::Double => f.write_str("double"),
            SqlType::Text => f.write_str("text"),
            SqlType::VarChar(size) => write!(f, "varchar({size})"),
            SqlType::Binary(size) => write!(f, "binary({size})"),
            SqlType::Blob => f.write_str("blob"),
            SqlType::Timestamp => f.write_str("timestamp"),
            SqlType::Date => f.write_str("date"),
            SqlType::Time => f.write_str("time"),
            SqlType::DateTime => f.write_str("datetime"),
            SqlType::Uuid => f.write_str("uuid"),
            SqlType::Custom(name) => f.write_str(name),
        }
    }
}
