use crate::{Result, Value};

/// Converts between a property's value type and its storage value.
///
/// Implementations are stateless unit structs declared in the schema module
/// and registered in the `#[database]` configuration; generated bindings call
/// through the singleton value.
pub trait Convert<T> {
    fn to_value(&self, value: &T) -> Value;

    fn from_value(&self, value: Value) -> Result<T>;
}
