use indexmap::IndexMap;

use crate::{Error, FromValue, Result, Value};

/// One result row, keyed by storage column name in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.set(column, value);
        self
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn require(&self, column: &str) -> Result<&Value> {
        self.values
            .get(column)
            .ok_or_else(|| Error::missing_value(column))
    }

    /// Reads a column under a non-null assertion: a missing entry is an
    /// error, and a `Null` entry fails the target type's conversion unless
    /// the target is an `Option`.
    pub fn typed<T: FromValue>(&self, column: &str) -> Result<T> {
        T::from_value(self.require(column)?.clone())
    }

    /// Reads a nullable column: a missing or `Null` entry is `None`.
    pub fn opt<T: FromValue>(&self, column: &str) -> Result<Option<T>> {
        match self.values.get(column) {
            None => Ok(None),
            Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value.clone()).map(Some),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_missing_column_is_an_error() {
        let row = Row::new().with("id", Value::I64(1));
        let err = row.typed::<i64>("name").unwrap_err();
        assert!(err.is_missing_value());
    }

    #[test]
    fn opt_missing_and_null_read_back_absent() {
        let row = Row::new().with("name", Value::Null);
        assert_eq!(row.opt::<String>("name").unwrap(), None);
        assert_eq!(row.opt::<String>("other").unwrap(), None);
    }
}
