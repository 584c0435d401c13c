//! Error types for the calculator.

/// Errors raised by a calculator session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation only exists in the other calculator variant.
    #[error("'{operation}' is not available in the {variant} calculator")]
    Unsupported {
        variant: &'static str,
        operation: &'static str,
    },

    /// A field name that does not map to any input.
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Errors raised while opening an external profile link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The system browser could not be launched.
    #[error("Failed to open {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A named option received a value outside its allowed set.
    #[error("Invalid value for {key}: '{value}' (expected one of: {expected})")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A numeric option outside its allowed range.
    #[error("Invalid value for {key}: {value} (expected a number from {min} to {max})")]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A numeric option that is not a number.
    #[error("Invalid value for {key}: '{value}' is not a number")]
    NotANumber { key: &'static str, value: String },
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
