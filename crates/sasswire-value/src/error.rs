use thiserror::Error;

/// A value did not fit the requested target shape.
///
/// Conversion errors are local to one value; they never poison the
/// connection the value arrived on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {from} to {to}")]
pub struct ConversionError {
    /// Variant name of the value being converted.
    pub from: &'static str,
    /// Name of the target shape.
    pub to: &'static str,
}

impl ConversionError {
    pub fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
