//! Repository contracts and the in-memory system of record.
//!
//! The session machine, stats projector, and payroll engines talk to
//! persistence only through these traits, which keeps the state machines
//! testable against the in-memory implementation. The row-level data
//! invariants are enforced here in addition to any in-process checks.

mod memory;

pub use memory::MemoryStore;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::EngineResult;
use crate::models::{
    Attendance, Employee, HistoryEntry, NewAttendance, NewEmployee, NewPayroll, Payroll,
};

/// Persistence contract for employees.
pub trait EmployeeRepo {
    /// Inserts a new employee. Rejects a duplicate of an existing employee
    /// (same first name, last name, and date of birth) and an empty
    /// portrait.
    fn insert_employee(&self, new: NewEmployee) -> EngineResult<Employee>;

    /// Fetches an employee by id.
    fn employee(&self, id: u64) -> EngineResult<Employee>;

    /// Lists active employees in insertion order.
    fn active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Persists recomputed days-worked and absence counts.
    fn update_employee_counts(&self, id: u64, days_worked: u32, absences: u32)
        -> EngineResult<()>;

    /// Marks an employee inactive; their rows are kept.
    fn deactivate_employee(&self, id: u64) -> EngineResult<()>;

    /// Removes an employee together with their attendance and payroll rows.
    fn remove_employee(&self, id: u64) -> EngineResult<()>;
}

/// Persistence contract for attendance rows.
pub trait AttendanceRepo {
    /// Inserts a new attendance row, stamping it with `now`.
    fn insert_attendance(&self, new: NewAttendance, now: NaiveDateTime)
        -> EngineResult<Attendance>;

    /// Persists changes to an existing row, stamping `updated_at` with `now`.
    fn update_attendance(&self, row: &Attendance, now: NaiveDateTime) -> EngineResult<()>;

    /// Rows for one employee on one date, ordered by creation.
    fn attendance_on(&self, employee_id: u64, date: NaiveDate) -> EngineResult<Vec<Attendance>>;

    /// Rows for one employee within an inclusive date range, ordered by
    /// date then creation.
    fn attendance_between(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Attendance>>;

    /// All rows for one employee, ordered by date then creation.
    fn attendance_for_employee(&self, employee_id: u64) -> EngineResult<Vec<Attendance>>;
}

/// Persistence contract for payroll rows.
pub trait PayrollRepo {
    /// Inserts a new payroll row. Rejects a second PENDING row for the
    /// same employee.
    fn insert_payroll(&self, new: NewPayroll) -> EngineResult<Payroll>;

    /// Persists changes to an existing row. A PROCESSED row can never
    /// return to PENDING.
    fn update_payroll(&self, row: &Payroll) -> EngineResult<()>;

    /// The newest payroll for an employee by payment date, if any.
    fn latest_payroll(&self, employee_id: u64) -> EngineResult<Option<Payroll>>;

    /// All PENDING payrolls, ordered by employee id.
    fn pending_payrolls(&self) -> EngineResult<Vec<Payroll>>;

    /// All payrolls for one employee, newest payment date first.
    fn payrolls_for_employee(&self, employee_id: u64) -> EngineResult<Vec<Payroll>>;
}

/// Persistence contract for the append-only audit log.
pub trait HistoryRepo {
    /// Appends an audit entry.
    fn append_history(&self, description: &str, timestamp: NaiveDateTime)
        -> EngineResult<HistoryEntry>;

    /// All entries in append order.
    fn history(&self) -> EngineResult<Vec<HistoryEntry>>;
}

/// The full system of record.
///
/// `exclusive` runs a closure under the store's global advisory lock.
/// The payroll rollover and the period engine's writes run inside it so
/// the two never interleave.
pub trait Store: EmployeeRepo + AttendanceRepo + PayrollRepo + HistoryRepo {
    /// Runs `f` while holding the advisory lock.
    fn exclusive<T>(&self, f: impl FnOnce() -> EngineResult<T>) -> EngineResult<T>;
}
