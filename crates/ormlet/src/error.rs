/// An error raised by generated mapping code or the execution seam.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entity mutation helpers operate only on the unmodified default
    /// collection; a filtered, sorted, grouped, or paged sequence refuses
    /// them.
    #[error("unsupported operation `{0}` on a derived entity sequence")]
    UnsupportedOperationOnDerivedView(Box<str>),

    #[error("cannot convert {found} value into {expected}")]
    TypeConversion {
        expected: &'static str,
        found: &'static str,
    },

    /// A row carried no value for a column that materialization requires.
    #[error("row has no value for column `{0}`")]
    MissingValue(Box<str>),

    /// A pseudo-constructor was invoked without a value for a required
    /// non-nullable column.
    #[error("required column `{0}` is not set")]
    RequiredColumnUnset(Box<str>),
}

impl Error {
    pub fn derived_view(operation: impl Into<String>) -> Error {
        Error::UnsupportedOperationOnDerivedView(operation.into().into())
    }

    pub fn type_conversion(expected: &'static str, found: &'static str) -> Error {
        Error::TypeConversion { expected, found }
    }

    pub fn missing_value(column: impl Into<String>) -> Error {
        Error::MissingValue(column.into().into())
    }

    pub fn required_unset(column: impl Into<String>) -> Error {
        Error::RequiredColumnUnset(column.into().into())
    }

    /// Returns `true` if this error is a derived-view refusal.
    pub fn is_derived_view(&self) -> bool {
        matches!(self, Error::UnsupportedOperationOnDerivedView(_))
    }

    /// Returns `true` if this error is a type conversion failure.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self, Error::TypeConversion { .. })
    }

    /// Returns `true` if this error is a missing row value.
    pub fn is_missing_value(&self) -> bool {
        matches!(self, Error::MissingValue(_))
    }

    /// Returns `true` if this error is an unset required column.
    pub fn is_required_unset(&self) -> bool {
        matches!(self, Error::RequiredColumnUnset(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
