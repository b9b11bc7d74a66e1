//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Days;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::{SessionMachine, StatsProjector, project_session};
use crate::error::{EngineError, EngineResult};
use crate::payroll::{PeriodEngine, confirm_payroll};
use crate::recognition::{Frame, RecognitionVerdict, Recognizer};
use crate::store::{AttendanceRepo, EmployeeRepo};

use super::request::{
    AttendanceLogsQuery, AttendanceRequest, AttendanceStatusRequest, CashAdvanceRequest,
    CurrentPayrollQuery, IncentivesRequest, PaymentDateRequest,
};
use super::response::{ApiError, ApiErrorResponse, AttendanceLogEntry, AttendanceStatusResponse};
use super::state::AppState;

/// Days of history returned by the status endpoint when no range is given.
const DEFAULT_HISTORY_DAYS: u64 = 30;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/recognize", post(recognize_handler))
        .route("/attendance", post(attendance_handler))
        .route("/attendance/status", post(attendance_status_handler))
        .route("/attendance/logs", get(attendance_logs_handler))
        .route("/payroll/current", get(current_payroll_handler))
        .route("/payroll/incentives", post(incentives_handler))
        .route("/payroll/payment-date", post(payment_date_handler))
        .route("/payroll/cash-advance", post(cash_advance_handler))
        .route("/payroll/confirm", post(confirm_payroll_handler))
        .with_state(state)
}

/// Handler for POST /recognize.
///
/// Accepts raw JPEG or PNG bytes and returns the recognition verdict.
async fn recognize_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, bytes = body.len(), "Processing recognition request");

    let result: EngineResult<RecognitionVerdict> = (|| {
        let frame = Frame::decode(&body)?;
        let templates = state.enrollment().templates(state.store(), state.analyzer())?;
        let recognizer = Recognizer::new(state.policy().recognition);
        Ok(recognizer.recognize(&frame, &templates, state.analyzer()))
    })();

    match result {
        Ok(verdict) => {
            info!(correlation_id = %correlation_id, ?verdict, "Recognition completed");
            (StatusCode::OK, Json(verdict)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Recognition failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /attendance.
///
/// Applies a time-in/time-out action and refreshes the employee's
/// attendance statistics.
async fn attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = request.employee_id,
        action = ?request.action,
        "Processing attendance action"
    );

    let result: EngineResult<_> = (|| {
        let employee = state.store().employee(request.employee_id)?;
        let now = state.clock().now();
        let machine = SessionMachine::new(state.store(), state.policy().work_window);
        let outcome = machine.apply(&employee, request.action, now)?;
        StatsProjector::new(state.store(), state.policy().rest_day)
            .refresh(employee.id, now.date())?;
        Ok(outcome)
    })();

    match result {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                status = ?outcome.status,
                log_id = ?outcome.log_id,
                "Attendance action completed"
            );
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Attendance action failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /attendance/status.
///
/// Reports the employee's open-session state, today's rows, and the
/// history rows in the requested (or default 30-day) window.
async fn attendance_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match attendance_status(&state, &request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Status lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn attendance_status(
    state: &AppState,
    request: &AttendanceStatusRequest,
) -> EngineResult<AttendanceStatusResponse> {
    let employee = state.store().employee(request.employee_id)?;
    let today = state.clock().today();

    let today_rows = state.store().attendance_on(employee.id, today)?;
    let session = project_session(&today_rows);
    let current_log_id = match session {
        crate::attendance::Session::Open { id, .. } => Some(id),
        crate::attendance::Session::Closed => None,
    };

    let start = request
        .start_date
        .unwrap_or_else(|| today.checked_sub_days(Days::new(DEFAULT_HISTORY_DAYS)).unwrap_or(today));
    let end = request.end_date.unwrap_or(today);
    if start > end {
        return Err(EngineError::invalid(
            "start_date",
            "start_date must not be after end_date",
        ));
    }

    let mut history: Vec<_> = state
        .store()
        .attendance_between(employee.id, start, end)?
        .into_iter()
        .filter(|row| row.date < today)
        .collect();
    history.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));

    Ok(AttendanceStatusResponse {
        has_open_session: current_log_id.is_some(),
        current_log_id,
        today_logs: today_rows.iter().map(AttendanceLogEntry::from).collect(),
        history_logs: history.iter().map(AttendanceLogEntry::from).collect(),
    })
}

/// Handler for GET /attendance/logs.
async fn attendance_logs_handler(
    State(state): State<AppState>,
    query: Result<Query<AttendanceLogsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let result = (|| {
        let employee = state.store().employee(query.employee_id)?;
        if query.start_date > query.end_date {
            return Err(EngineError::invalid(
                "start_date",
                "start_date must not be after end_date",
            ));
        }
        state
            .store()
            .attendance_between(employee.id, query.start_date, query.end_date)
    })();

    match result {
        Ok(rows) => {
            let entries: Vec<AttendanceLogEntry> =
                rows.iter().map(AttendanceLogEntry::from).collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Log listing failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /payroll/current.
///
/// Returns the employee's live PENDING payroll, creating the period on
/// first read and repricing the salary from attendance.
async fn current_payroll_handler(
    State(state): State<AppState>,
    query: Result<Query<CurrentPayrollQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let engine = PeriodEngine::new(state.store(), state.clock(), state.policy().payday);
    match engine.current_payroll(query.employee_id) {
        Ok(payroll) => (StatusCode::OK, Json(payroll)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Current payroll lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/incentives.
async fn incentives_handler(
    State(state): State<AppState>,
    payload: Result<Json<IncentivesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = request.employee_id,
        action = ?request.action,
        amount = %request.amount,
        "Adjusting incentives"
    );

    let engine = PeriodEngine::new(state.store(), state.clock(), state.policy().payday);
    match engine.update_incentives(request.employee_id, request.action, request.amount) {
        Ok(payroll) => (StatusCode::OK, Json(payroll)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Incentive adjustment failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/payment-date.
async fn payment_date_handler(
    State(state): State<AppState>,
    payload: Result<Json<PaymentDateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let engine = PeriodEngine::new(state.store(), state.clock(), state.policy().payday);
    match engine.set_payment_date(request.employee_id, request.payment_date) {
        Ok(payroll) => (StatusCode::OK, Json(payroll)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payment date move failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/cash-advance.
async fn cash_advance_handler(
    State(state): State<AppState>,
    payload: Result<Json<CashAdvanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let engine = PeriodEngine::new(state.store(), state.clock(), state.policy().payday);
    match engine.grant_cash_advance(request.employee_id, request.amount) {
        Ok(payroll) => (StatusCode::OK, Json(payroll)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Cash advance failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/confirm.
///
/// Runs the weekly rollover over every PENDING payroll.
async fn confirm_payroll_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll confirmation");

    match confirm_payroll(state.store(), state.clock(), state.policy().payday) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                processed = outcome.processed,
                "Payroll confirmation completed"
            );
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll confirmation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    warn!(correlation_id = %correlation_id, error = %rejection, "Query string error");
    let error = ApiError::new("VALIDATION_ERROR", rejection.to_string());
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}
