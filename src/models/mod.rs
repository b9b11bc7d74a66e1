//! Data model for the payroll engine.
//!
//! This module contains the core entities: employees, attendance rows,
//! payroll rows, and the append-only audit history.

mod attendance;
mod employee;
mod history;
mod payroll;

pub use attendance::{Attendance, AttendanceStatus, NewAttendance};
pub use employee::{Employee, NewEmployee};
pub use history::HistoryEntry;
pub use payroll::{NewPayroll, Payroll, PayrollStatus};
