//! Error types for data parsing in airq-types.

use thiserror::Error;

/// Errors that can occur when parsing air-quality values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Alert threshold outside the AQI scale.
    #[error("AQI threshold must be between 0 and {max}, got {value}")]
    InvalidThreshold {
        /// Rejected value.
        value: i64,
        /// Largest accepted value.
        max: u16,
    },

    /// Input that is not an integer.
    #[error("Not a number: {0}")]
    NotANumber(String),

    /// Theme name that is neither `dark` nor `light`.
    #[error("Unknown theme: {0} (expected 'dark' or 'light')")]
    UnknownTheme(String),
}

/// Result type alias using airq-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
