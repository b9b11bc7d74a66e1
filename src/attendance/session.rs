//! Attendance session machine.
//!
//! Applies time-in/time-out requests against the day's open-session
//! invariant. State is the set of attendance rows for `(employee, today)`;
//! the open session is rebuilt from those rows on every call, so there is
//! no hidden in-process state to drift.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::WorkWindow;
use crate::error::EngineResult;
use crate::models::{Attendance, AttendanceStatus, Employee, NewAttendance};
use crate::store::AttendanceRepo;

use super::hours::{formatted_duration, hours_worked, validate_time_in, validate_time_out};

/// A clock action requested for an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    /// Open a session for today.
    TimeIn,
    /// Close today's open session.
    TimeOut,
    /// Time out when a session is open, otherwise time in.
    Auto,
}

/// The projected session state for one employee-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// No open session today.
    Closed,
    /// A session is open; `id` is the backing attendance row.
    Open {
        /// The open attendance row.
        id: u64,
        /// When the session was opened.
        time_in: chrono::NaiveTime,
    },
}

/// Non-fatal outcome classification for an applied action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The action took effect as requested.
    Success,
    /// The action completed (or was skipped) with human-visible advice.
    Warning,
}

/// Result of applying an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Success or warning; hard failures surface as errors instead.
    pub status: OutcomeStatus,
    /// Human-visible confirmation or advice.
    pub message: String,
    /// The attendance row touched by the action, when one exists.
    pub log_id: Option<u64>,
    /// Whether the employee has an open session after the action.
    pub has_open_session: bool,
}

/// Projects the open session from the day's rows.
///
/// Multiple open rows should not happen; defensively, the
/// earliest-created one is treated as the session so that a time-out
/// closes it first.
pub fn project_session(rows: &[Attendance]) -> Session {
    rows.iter()
        .filter(|row| row.is_open())
        .min_by_key(|row| (row.created_at, row.id))
        .map(|row| Session::Open {
            id: row.id,
            time_in: row.time_in.unwrap_or_default(),
        })
        .unwrap_or(Session::Closed)
}

/// Applies clock actions for one employee-day.
///
/// Calls for a single employee must be serialized by the caller; the
/// storage layer backstops the open-session invariant regardless.
pub struct SessionMachine<'a, S> {
    store: &'a S,
    window: WorkWindow,
}

impl<'a, S: AttendanceRepo> SessionMachine<'a, S> {
    /// Creates a machine over the given store and work window.
    pub fn new(store: &'a S, window: WorkWindow) -> Self {
        Self { store, window }
    }

    /// Applies one action at local time `now`.
    pub fn apply(
        &self,
        employee: &Employee,
        action: AttendanceAction,
        now: NaiveDateTime,
    ) -> EngineResult<ActionOutcome> {
        let rows = self.store.attendance_on(employee.id, now.date())?;
        let session = project_session(&rows);

        let action = match (action, session) {
            (AttendanceAction::Auto, Session::Open { .. }) => AttendanceAction::TimeOut,
            (AttendanceAction::Auto, Session::Closed) => AttendanceAction::TimeIn,
            (other, _) => other,
        };

        match (action, session) {
            (AttendanceAction::TimeIn, Session::Open { id, time_in }) => Ok(ActionOutcome {
                status: OutcomeStatus::Warning,
                message: format!(
                    "You already have an open session (timed in at {}).",
                    time_in.format("%H:%M:%S")
                ),
                log_id: Some(id),
                has_open_session: true,
            }),
            (AttendanceAction::TimeIn, Session::Closed) => self.time_in(employee, now),
            (AttendanceAction::TimeOut, Session::Open { id, .. }) => {
                self.time_out(&rows, id, now)
            }
            (AttendanceAction::TimeOut, Session::Closed) => self.orphan_time_out(employee, now),
            (AttendanceAction::Auto, _) => unreachable!("auto resolved above"),
        }
    }

    fn time_in(&self, employee: &Employee, now: NaiveDateTime) -> EngineResult<ActionOutcome> {
        validate_time_in(&self.window, now.time())?;

        let row = self.store.insert_attendance(
            NewAttendance {
                employee_id: employee.id,
                date: now.date(),
                time_in: Some(now.time()),
                time_out: None,
                hours_worked: Decimal::ZERO,
                status: AttendanceStatus::Present,
            },
            now,
        )?;

        Ok(ActionOutcome {
            status: OutcomeStatus::Success,
            message: format!("Time in recorded at {}.", now.time().format("%H:%M:%S")),
            log_id: Some(row.id),
            has_open_session: true,
        })
    }

    fn time_out(
        &self,
        rows: &[Attendance],
        open_id: u64,
        now: NaiveDateTime,
    ) -> EngineResult<ActionOutcome> {
        validate_time_out(&self.window, now.time())?;

        let mut row = rows
            .iter()
            .find(|row| row.id == open_id)
            .cloned()
            .ok_or_else(|| crate::error::EngineError::Storage {
                message: format!("open session row {} disappeared", open_id),
            })?;

        row.time_out = Some(now.time());
        row.hours_worked = hours_worked(row.time_in, row.time_out);
        self.store.update_attendance(&row, now)?;

        Ok(ActionOutcome {
            status: OutcomeStatus::Success,
            message: format!(
                "Time out recorded at {}. You worked {}.",
                now.time().format("%H:%M:%S"),
                formatted_duration(row.time_in, row.time_out)
            ),
            log_id: Some(row.id),
            has_open_session: false,
        })
    }

    fn orphan_time_out(
        &self,
        employee: &Employee,
        now: NaiveDateTime,
    ) -> EngineResult<ActionOutcome> {
        validate_time_out(&self.window, now.time())?;

        let row = self.store.insert_attendance(
            NewAttendance {
                employee_id: employee.id,
                date: now.date(),
                time_in: None,
                time_out: Some(now.time()),
                hours_worked: Decimal::ZERO,
                status: AttendanceStatus::Absent,
            },
            now,
        )?;

        Ok(ActionOutcome {
            status: OutcomeStatus::Warning,
            message: format!(
                "Time out recorded at {} with no time in; the record needs admin adjustment.",
                now.time().format("%H:%M:%S")
            ),
            log_id: Some(row.id),
            has_open_session: false,
        })
    }
}
