//! In-memory implementation of the repository contracts.
//!
//! A single `RwLock` guards the tables, so every call is atomic on its
//! own. The additional advisory mutex behind [`Store::exclusive`] lets
//! multi-step routines (payroll rollover, period edits) serialize against
//! each other without holding the table lock across the whole routine.

use std::collections::BTreeMap;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Attendance, AttendanceStatus, Employee, HistoryEntry, NewAttendance, NewEmployee, NewPayroll,
    Payroll, PayrollStatus,
};

use super::{AttendanceRepo, EmployeeRepo, HistoryRepo, PayrollRepo, Store};

#[derive(Debug, Default)]
struct Inner {
    employees: BTreeMap<u64, Employee>,
    attendance: BTreeMap<u64, Attendance>,
    payrolls: BTreeMap<u64, Payroll>,
    history: Vec<HistoryEntry>,
    next_employee_id: u64,
    next_attendance_id: u64,
    next_payroll_id: u64,
    next_history_id: u64,
}

/// In-memory system of record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    advisory: Mutex<()>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|e| EngineError::Storage {
            message: format!("store lock poisoned: {e}"),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|e| EngineError::Storage {
            message: format!("store lock poisoned: {e}"),
        })
    }
}

fn check_attendance_invariants(
    time_in: Option<chrono::NaiveTime>,
    time_out: Option<chrono::NaiveTime>,
    status: AttendanceStatus,
) -> EngineResult<()> {
    if let (Some(t_in), Some(t_out)) = (time_in, time_out) {
        if t_in >= t_out {
            return Err(EngineError::invariant(
                "time_in must be earlier than time_out.",
            ));
        }
    }
    if status == AttendanceStatus::Present && time_in.is_none() {
        return Err(EngineError::invariant(
            "a Present attendance row requires a time_in.",
        ));
    }
    Ok(())
}

fn check_payroll_amounts(row: &NewPayroll) -> EngineResult<()> {
    for (field, value) in [
        ("rate", row.rate),
        ("incentives", row.incentives),
        ("deductions", row.deductions),
        ("cash_advance", row.cash_advance),
        ("salary", row.salary),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(EngineError::invalid(field, "must not be negative"));
        }
    }
    Ok(())
}

impl EmployeeRepo for MemoryStore {
    fn insert_employee(&self, new: NewEmployee) -> EngineResult<Employee> {
        if new.portrait.is_empty() {
            return Err(EngineError::invalid("portrait", "portrait image is required"));
        }

        let mut inner = self.write()?;
        let duplicate = inner.employees.values().any(|e| {
            e.first_name == new.first_name
                && e.last_name == new.last_name
                && e.date_of_birth == new.date_of_birth
        });
        if duplicate {
            return Err(EngineError::invariant(
                "An employee with the same name and birth date already exists.",
            ));
        }

        inner.next_employee_id += 1;
        let employee = Employee {
            id: inner.next_employee_id,
            first_name: new.first_name,
            last_name: new.last_name,
            date_of_birth: new.date_of_birth,
            date_of_employment: new.date_of_employment,
            portrait: new.portrait,
            active: true,
            days_worked: 0,
            absences: 0,
        };
        inner.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    fn employee(&self, id: u64) -> EngineResult<Employee> {
        self.read()?
            .employees
            .get(&id)
            .cloned()
            .ok_or(EngineError::EmployeeNotFound { id })
    }

    fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self
            .read()?
            .employees
            .values()
            .filter(|e| e.active)
            .cloned()
            .collect())
    }

    fn update_employee_counts(
        &self,
        id: u64,
        days_worked: u32,
        absences: u32,
    ) -> EngineResult<()> {
        let mut inner = self.write()?;
        let employee = inner
            .employees
            .get_mut(&id)
            .ok_or(EngineError::EmployeeNotFound { id })?;
        employee.days_worked = days_worked;
        employee.absences = absences;
        Ok(())
    }

    fn deactivate_employee(&self, id: u64) -> EngineResult<()> {
        let mut inner = self.write()?;
        let employee = inner
            .employees
            .get_mut(&id)
            .ok_or(EngineError::EmployeeNotFound { id })?;
        employee.active = false;
        Ok(())
    }

    fn remove_employee(&self, id: u64) -> EngineResult<()> {
        let mut inner = self.write()?;
        if inner.employees.remove(&id).is_none() {
            return Err(EngineError::EmployeeNotFound { id });
        }
        inner.attendance.retain(|_, row| row.employee_id != id);
        inner.payrolls.retain(|_, row| row.employee_id != id);
        Ok(())
    }
}

impl AttendanceRepo for MemoryStore {
    fn insert_attendance(
        &self,
        new: NewAttendance,
        now: NaiveDateTime,
    ) -> EngineResult<Attendance> {
        check_attendance_invariants(new.time_in, new.time_out, new.status)?;

        let mut inner = self.write()?;
        if !inner.employees.contains_key(&new.employee_id) {
            return Err(EngineError::EmployeeNotFound {
                id: new.employee_id,
            });
        }

        let opens_session = new.time_in.is_some() && new.time_out.is_none();
        if opens_session {
            let already_open = inner
                .attendance
                .values()
                .any(|row| row.employee_id == new.employee_id && row.date == new.date && row.is_open());
            if already_open {
                return Err(EngineError::invariant(
                    "An open session already exists for this employee today.",
                ));
            }
        }

        inner.next_attendance_id += 1;
        let row = Attendance {
            id: inner.next_attendance_id,
            employee_id: new.employee_id,
            date: new.date,
            time_in: new.time_in,
            time_out: new.time_out,
            hours_worked: new.hours_worked,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        inner.attendance.insert(row.id, row.clone());
        Ok(row)
    }

    fn update_attendance(&self, row: &Attendance, now: NaiveDateTime) -> EngineResult<()> {
        check_attendance_invariants(row.time_in, row.time_out, row.status)?;

        let mut inner = self.write()?;
        let stored = inner
            .attendance
            .get_mut(&row.id)
            .ok_or_else(|| EngineError::Storage {
                message: format!("attendance row {} does not exist", row.id),
            })?;
        *stored = row.clone();
        stored.updated_at = now;
        Ok(())
    }

    fn attendance_on(&self, employee_id: u64, date: NaiveDate) -> EngineResult<Vec<Attendance>> {
        // BTreeMap iteration follows insertion because ids are monotonic.
        Ok(self
            .read()?
            .attendance
            .values()
            .filter(|row| row.employee_id == employee_id && row.date == date)
            .cloned()
            .collect())
    }

    fn attendance_between(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Attendance>> {
        let mut rows: Vec<Attendance> = self
            .read()?
            .attendance
            .values()
            .filter(|row| row.employee_id == employee_id && row.date >= start && row.date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.date, row.id));
        Ok(rows)
    }

    fn attendance_for_employee(&self, employee_id: u64) -> EngineResult<Vec<Attendance>> {
        let mut rows: Vec<Attendance> = self
            .read()?
            .attendance
            .values()
            .filter(|row| row.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.date, row.id));
        Ok(rows)
    }
}

impl PayrollRepo for MemoryStore {
    fn insert_payroll(&self, new: NewPayroll) -> EngineResult<Payroll> {
        check_payroll_amounts(&new)?;

        let mut inner = self.write()?;
        if !inner.employees.contains_key(&new.employee_id) {
            return Err(EngineError::EmployeeNotFound {
                id: new.employee_id,
            });
        }
        if new.status == PayrollStatus::Pending {
            let already_pending = inner
                .payrolls
                .values()
                .any(|row| row.employee_id == new.employee_id && row.is_pending());
            if already_pending {
                return Err(EngineError::invariant(
                    "Employee already has a PENDING payroll.",
                ));
            }
        }

        inner.next_payroll_id += 1;
        let row = Payroll {
            id: inner.next_payroll_id,
            employee_id: new.employee_id,
            rate: new.rate,
            incentives: new.incentives,
            deductions: new.deductions,
            cash_advance: new.cash_advance,
            salary: new.salary,
            payment_date: new.payment_date,
            status: new.status,
        };
        inner.payrolls.insert(row.id, row.clone());
        Ok(row)
    }

    fn update_payroll(&self, row: &Payroll) -> EngineResult<()> {
        let mut inner = self.write()?;
        let stored = inner
            .payrolls
            .get_mut(&row.id)
            .ok_or_else(|| EngineError::Storage {
                message: format!("payroll row {} does not exist", row.id),
            })?;
        if stored.status == PayrollStatus::Processed && row.status == PayrollStatus::Pending {
            return Err(EngineError::invariant(
                "A PROCESSED payroll can never return to PENDING.",
            ));
        }
        *stored = row.clone();
        Ok(())
    }

    fn latest_payroll(&self, employee_id: u64) -> EngineResult<Option<Payroll>> {
        Ok(self
            .read()?
            .payrolls
            .values()
            .filter(|row| row.employee_id == employee_id)
            .max_by_key(|row| (row.payment_date, row.id))
            .cloned())
    }

    fn pending_payrolls(&self) -> EngineResult<Vec<Payroll>> {
        let mut rows: Vec<Payroll> = self
            .read()?
            .payrolls
            .values()
            .filter(|row| row.is_pending())
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.employee_id);
        Ok(rows)
    }

    fn payrolls_for_employee(&self, employee_id: u64) -> EngineResult<Vec<Payroll>> {
        let mut rows: Vec<Payroll> = self
            .read()?
            .payrolls
            .values()
            .filter(|row| row.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.payment_date, b.id).cmp(&(a.payment_date, a.id)));
        Ok(rows)
    }
}

impl HistoryRepo for MemoryStore {
    fn append_history(
        &self,
        description: &str,
        timestamp: NaiveDateTime,
    ) -> EngineResult<HistoryEntry> {
        let mut inner = self.write()?;
        inner.next_history_id += 1;
        let entry = HistoryEntry {
            id: inner.next_history_id,
            description: description.to_string(),
            timestamp,
        };
        inner.history.push(entry.clone());
        Ok(entry)
    }

    fn history(&self) -> EngineResult<Vec<HistoryEntry>> {
        Ok(self.read()?.history.clone())
    }
}

impl Store for MemoryStore {
    fn exclusive<T>(&self, f: impl FnOnce() -> EngineResult<T>) -> EngineResult<T> {
        let _guard = self.advisory.lock().map_err(|e| EngineError::Storage {
            message: format!("advisory lock poisoned: {e}"),
        })?;
        f()
    }
}
