//! Payroll period engine.
//!
//! Maintains the single PENDING payroll per employee: creating it on
//! demand, repricing its salary from attendance, and applying admin
//! adjustments (incentives, payment date, cash advances). All writes run
//! under the store's advisory lock so they never interleave with the
//! rollover.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, NewEmployee, NewPayroll, Payroll, PayrollStatus};
use crate::store::Store;

/// The next occurrence of `payday` strictly after `today`.
pub fn next_payday(today: NaiveDate, payday: Weekday) -> NaiveDate {
    let ahead = (payday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today
        .checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(today)
}

/// The next Saturday strictly after `today`.
pub fn next_saturday(today: NaiveDate) -> NaiveDate {
    next_payday(today, Weekday::Sat)
}

/// The attendance window priced into a payroll closing on `payment_date`:
/// from the Monday of that week through the payment date.
pub fn week_window(payment_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = payment_date
        .checked_sub_days(Days::new(u64::from(
            payment_date.weekday().num_days_from_monday(),
        )))
        .unwrap_or(payment_date);
    (start, payment_date)
}

/// `max(0, rate * attendance_count + incentives - deductions)`, two decimals.
pub fn compute_salary(
    rate: Decimal,
    incentives: Decimal,
    deductions: Decimal,
    attendance_count: u32,
) -> Decimal {
    let gross = rate * Decimal::from(attendance_count) + incentives - deductions;
    gross.max(Decimal::ZERO).round_dp(2)
}

/// Direction of an incentive adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveAction {
    /// Add the amount to the period's incentives.
    Add,
    /// Subtract the amount, clamping at zero.
    Subtract,
}

/// Period-level payroll operations over one store.
pub struct PeriodEngine<'a, S> {
    store: &'a S,
    clock: &'a dyn Clock,
    payday: Weekday,
}

impl<'a, S: Store> PeriodEngine<'a, S> {
    /// Creates an engine closing periods on `payday`.
    pub fn new(store: &'a S, clock: &'a dyn Clock, payday: Weekday) -> Self {
        Self {
            store,
            clock,
            payday,
        }
    }

    /// Registers a new employee together with their first PENDING payroll.
    pub fn register_employee(&self, new: NewEmployee, rate: Decimal) -> EngineResult<Employee> {
        if rate < Decimal::ZERO {
            return Err(EngineError::invalid("rate", "rate must not be negative"));
        }
        self.store.exclusive(|| {
            let employee = self.store.insert_employee(new)?;
            let today = self.clock.today();
            self.store.insert_payroll(NewPayroll {
                employee_id: employee.id,
                rate,
                incentives: Decimal::ZERO,
                deductions: Decimal::ZERO,
                cash_advance: Decimal::ZERO,
                salary: Decimal::ZERO,
                payment_date: next_payday(today, self.payday),
                status: PayrollStatus::Pending,
            })?;
            self.store.append_history(
                &format!("Registered employee {}.", employee.full_name()),
                self.clock.now(),
            )?;
            Ok(employee)
        })
    }

    /// The employee's current payroll, creating the period if none is
    /// open and repricing its salary from attendance.
    pub fn current_payroll(&self, employee_id: u64) -> EngineResult<Payroll> {
        self.store
            .exclusive(|| self.current_payroll_locked(employee_id))
    }

    /// Adjusts the current period's incentives and reprices the salary.
    pub fn update_incentives(
        &self,
        employee_id: u64,
        action: IncentiveAction,
        amount: Decimal,
    ) -> EngineResult<Payroll> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::invalid("amount", "amount must be positive"));
        }
        self.store.exclusive(|| {
            let mut payroll = self.current_payroll_locked(employee_id)?;
            payroll.incentives = match action {
                IncentiveAction::Add => payroll.incentives + amount,
                IncentiveAction::Subtract => (payroll.incentives - amount).max(Decimal::ZERO),
            };
            self.reprice(&mut payroll)?;
            self.store.update_payroll(&payroll)?;
            let employee = self.store.employee(employee_id)?;
            self.store.append_history(
                &format!(
                    "Incentives for {} set to {}.",
                    employee.full_name(),
                    payroll.incentives
                ),
                self.clock.now(),
            )?;
            Ok(payroll)
        })
    }

    /// Moves the current period's payment date. The date must not be in
    /// the past.
    pub fn set_payment_date(&self, employee_id: u64, date: NaiveDate) -> EngineResult<Payroll> {
        if date < self.clock.today() {
            return Err(EngineError::invalid(
                "payment_date",
                "payment date must not be in the past",
            ));
        }
        self.store.exclusive(|| {
            let mut payroll = self.current_payroll_locked(employee_id)?;
            payroll.payment_date = date;
            self.reprice(&mut payroll)?;
            self.store.update_payroll(&payroll)?;
            let employee = self.store.employee(employee_id)?;
            self.store.append_history(
                &format!(
                    "Payment date for {} moved to {}.",
                    employee.full_name(),
                    date
                ),
                self.clock.now(),
            )?;
            Ok(payroll)
        })
    }

    /// Grants a cash advance in the current period.
    ///
    /// The advance never reduces this period's salary; the rollover
    /// carries it into the next period's deductions.
    pub fn grant_cash_advance(&self, employee_id: u64, amount: Decimal) -> EngineResult<Payroll> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::invalid("amount", "amount must be positive"));
        }
        self.store.exclusive(|| {
            let mut payroll = self.current_payroll_locked(employee_id)?;
            payroll.cash_advance += amount;
            self.store.update_payroll(&payroll)?;
            let employee = self.store.employee(employee_id)?;
            self.store.append_history(
                &format!(
                    "Cash advance of {} granted to {}.",
                    amount,
                    employee.full_name()
                ),
                self.clock.now(),
            )?;
            Ok(payroll)
        })
    }

    // Must already hold the advisory lock.
    fn current_payroll_locked(&self, employee_id: u64) -> EngineResult<Payroll> {
        let employee = self.store.employee(employee_id)?;

        let latest = self.store.latest_payroll(employee_id)?;
        let mut payroll = match latest {
            Some(ref row) if row.is_pending() => row.clone(),
            previous => {
                // The last period was processed (or none exists): open the
                // next one, carrying the rate and incentives forward.
                let (rate, incentives) = previous
                    .as_ref()
                    .map(|row| (row.rate, row.incentives))
                    .unwrap_or((Decimal::ZERO, Decimal::ZERO));
                self.store.insert_payroll(NewPayroll {
                    employee_id: employee.id,
                    rate,
                    incentives,
                    deductions: Decimal::ZERO,
                    cash_advance: Decimal::ZERO,
                    salary: Decimal::ZERO,
                    payment_date: next_payday(self.clock.today(), self.payday),
                    status: PayrollStatus::Pending,
                })?
            }
        };

        self.reprice(&mut payroll)?;
        self.store.update_payroll(&payroll)?;
        Ok(payroll)
    }

    fn reprice(&self, payroll: &mut Payroll) -> EngineResult<()> {
        let count = self.attendance_count(payroll.employee_id, payroll.payment_date)?;
        payroll.salary = compute_salary(
            payroll.rate,
            payroll.incentives,
            payroll.deductions,
            count,
        );
        Ok(())
    }

    /// Distinct days with a time-in inside the period's week window.
    fn attendance_count(&self, employee_id: u64, payment_date: NaiveDate) -> EngineResult<u32> {
        let (start, end) = week_window(payment_date);
        let rows = self.store.attendance_between(employee_id, start, end)?;
        let days: std::collections::BTreeSet<NaiveDate> = rows
            .iter()
            .filter(|row| row.time_in.is_some())
            .map(|row| row.date)
            .collect();
        Ok(days.len() as u32)
    }
}
