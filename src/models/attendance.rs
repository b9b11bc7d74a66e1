//! Attendance model and related types.
//!
//! This module defines the Attendance row emitted by the session machine.
//! A row with `time_in` set and `time_out` null is an *open session*; a row
//! with only `time_out` set is an *orphan time-out* awaiting admin
//! adjustment.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an attendance row counts the employee as present for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee timed in on this day.
    Present,
    /// The row does not establish presence (e.g. an orphan time-out).
    Absent,
}

/// A single time-in/time-out record for one employee on one date.
///
/// Invariants enforced at write time: when both times are set,
/// `time_in < time_out`; `Present` implies `time_in` is set; `time_in`
/// and `time_out` lie inside the work window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier for the attendance row.
    pub id: u64,
    /// The employee this row belongs to.
    pub employee_id: u64,
    /// The calendar date of the session.
    pub date: NaiveDate,
    /// Time the employee clocked in, if any.
    pub time_in: Option<NaiveTime>,
    /// Time the employee clocked out, if any.
    pub time_out: Option<NaiveTime>,
    /// Hours worked for the closed session, rounded to two decimals.
    pub hours_worked: Decimal,
    /// Presence status derived from the times.
    pub status: AttendanceStatus,
    /// When the row was created.
    pub created_at: NaiveDateTime,
    /// When the row was last updated.
    pub updated_at: NaiveDateTime,
}

impl Attendance {
    /// Returns true if this row is an open session (timed in, not out).
    pub fn is_open(&self) -> bool {
        self.time_in.is_some() && self.time_out.is_none()
    }

    /// Returns true if this row is an orphan time-out.
    pub fn is_orphan(&self) -> bool {
        self.time_in.is_none() && self.time_out.is_some()
    }
}

/// Data required to insert a new attendance row; the store assigns the id
/// and stamps `created_at`/`updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    /// The employee this row belongs to.
    pub employee_id: u64,
    /// The calendar date of the session.
    pub date: NaiveDate,
    /// Time the employee clocked in, if any.
    pub time_in: Option<NaiveTime>,
    /// Time the employee clocked out, if any.
    pub time_out: Option<NaiveTime>,
    /// Hours worked, zero while the session is open.
    pub hours_worked: Decimal,
    /// Presence status derived from the times.
    pub status: AttendanceStatus,
}
