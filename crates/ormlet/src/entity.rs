use indexmap::IndexMap;

use crate::{FromValue, Result, Value};

/// Capability marker that proxy entity declarations must extend.
pub trait Entity {}

/// Generic backing store for proxy entities: property name to storage value.
///
/// Values are stored in storage encoding; generated getters and setters
/// convert at the edges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap {
    values: IndexMap<String, Value>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: impl Into<String>, value: Value) {
        self.values.insert(property.into(), value);
    }

    pub fn contains(&self, property: &str) -> bool {
        self.values.contains_key(property)
    }

    pub fn value(&self, property: &str) -> Option<&Value> {
        self.values.get(property)
    }

    pub fn typed<T: FromValue>(&self, property: &str) -> Result<T> {
        T::from_value(
            self.values
                .get(property)
                .cloned()
                .unwrap_or(Value::Null),
        )
    }

    pub fn opt<T: FromValue>(&self, property: &str) -> Result<Option<T>> {
        match self.values.get(property) {
            None => Ok(None),
            Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value.clone()).map(Some),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
