//! HTTP API module for the payroll engine.
//!
//! This module provides the axum-based HTTP interface: request and
//! response DTOs, the shared application state, and the router.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceLogsQuery, AttendanceRequest, AttendanceStatusRequest, CashAdvanceRequest,
    CurrentPayrollQuery, IncentivesRequest, PaymentDateRequest,
};
pub use response::{ApiError, ApiErrorResponse, AttendanceLogEntry, AttendanceStatusResponse};
pub use state::AppState;
