//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur in the attendance and payroll core.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound { id: 42 };
/// assert_eq!(error.to_string(), "Employee not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The referenced employee does not exist.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee identifier that was not found.
        id: u64,
    },

    /// A request field was malformed or out of range.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput {
        /// The field that failed validation.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A captured frame could not be decoded into an image.
    #[error("Unreadable frame: {message}")]
    UnreadableFrame {
        /// A description of the decode failure.
        message: String,
    },

    /// An operation would break a core invariant, such as the work window
    /// or the single-PENDING-payroll rule. No state change took place.
    #[error("{message}")]
    InvariantViolation {
        /// A human-visible description of the violated invariant.
        message: String,
    },

    /// The underlying store failed. The engine does not retry.
    #[error("Storage error: {message}")]
    Storage {
        /// The original storage failure message.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
