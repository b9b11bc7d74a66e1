//! Per-employee attendance statistics.
//!
//! Recomputes `days_worked` and `absences` from the attendance rows on
//! every refresh, so the stored counts are a projection that can always
//! be rebuilt. Rest days never count as working days, and days before an
//! employee's start date never count against them.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::EngineResult;
use crate::store::{AttendanceRepo, EmployeeRepo};

/// Recomputes and persists attendance counts.
pub struct StatsProjector<'a, S> {
    store: &'a S,
    rest_day: Weekday,
}

impl<'a, S: EmployeeRepo + AttendanceRepo> StatsProjector<'a, S> {
    /// Creates a projector that excludes `rest_day` from working days.
    pub fn new(store: &'a S, rest_day: Weekday) -> Self {
        Self { store, rest_day }
    }

    /// Recomputes `days_worked` and `absences` for one employee as of
    /// `today` and persists them.
    ///
    /// A day counts as worked when at least one row for that date has a
    /// time-in; rows holding only an orphan time-out do not count.
    /// Employees who have not started yet keep zero counts.
    pub fn refresh(&self, employee_id: u64, today: NaiveDate) -> EngineResult<()> {
        let employee = self.store.employee(employee_id)?;
        if employee.date_of_employment > today {
            return Ok(());
        }

        let rows = self
            .store
            .attendance_between(employee_id, employee.date_of_employment, today)?;
        let present: BTreeSet<NaiveDate> = rows
            .iter()
            .filter(|row| row.time_in.is_some())
            .map(|row| row.date)
            .collect();

        let working_days = self.working_days(employee.date_of_employment, today);
        let days_worked = present.len() as u32;
        let absences = working_days.saturating_sub(days_worked);

        self.store
            .update_employee_counts(employee_id, days_worked, absences)
    }

    fn working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let mut count = 0;
        let mut day = start;
        while day <= end {
            if day.weekday() != self.rest_day {
                count += 1;
            }
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        count
    }
}
