//! Response types for the payroll engine API.
//!
//! This module defines the error response structures, the EngineError to
//! HTTP mapping, and the attendance log DTOs shared by the status and
//! logs endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::attendance::formatted_duration;
use crate::models::Attendance;

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::EmployeeNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "EMPLOYEE_NOT_FOUND",
                    format!("Employee not found: {}", id),
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid input for '{}': {}", field, message),
                    "The request contains an invalid value",
                ),
            },
            EngineError::UnreadableFrame { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "UNREADABLE_FRAME",
                    "The captured frame could not be decoded",
                    message,
                ),
            },
            EngineError::InvariantViolation { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVARIANT_VIOLATION", message),
            },
            EngineError::Storage { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            },
        }
    }
}

/// One attendance row rendered for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceLogEntry {
    /// The attendance row id.
    pub log_id: u64,
    /// The calendar date, ISO `YYYY-MM-DD`.
    pub date: String,
    /// Time in as `HH:MM:SS`, if set.
    pub time_in: Option<String>,
    /// Time out as `HH:MM:SS`, if set.
    pub time_out: Option<String>,
    /// Worked duration as `HH:MM:SS` (`"00:00:00"` while open).
    pub duration: String,
}

impl From<&Attendance> for AttendanceLogEntry {
    fn from(row: &Attendance) -> Self {
        Self {
            log_id: row.id,
            date: row.date.format("%Y-%m-%d").to_string(),
            time_in: row.time_in.map(|t| t.format("%H:%M:%S").to_string()),
            time_out: row.time_out.map(|t| t.format("%H:%M:%S").to_string()),
            duration: formatted_duration(row.time_in, row.time_out),
        }
    }
}

/// Response body for the attendance status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStatusResponse {
    /// Whether the employee has an open session today.
    pub has_open_session: bool,
    /// The open session's row id, if any.
    pub current_log_id: Option<u64>,
    /// Today's rows, earliest first.
    pub today_logs: Vec<AttendanceLogEntry>,
    /// Rows before today in the requested window, newest date first.
    pub history_logs: Vec<AttendanceLogEntry>,
}
