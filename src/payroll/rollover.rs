//! Weekly payroll rollover.
//!
//! Confirming payroll closes every PENDING period at once: each row is
//! repriced one last time, marked PROCESSED, and replaced by a fresh
//! PENDING period whose deductions are the cash advance carried over
//! from the closed one. Running the rollover with nothing pending is a
//! no-op.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Clock;
use crate::error::EngineResult;
use crate::models::{NewPayroll, PayrollStatus};
use crate::store::Store;

use super::period::{compute_salary, next_payday, week_window};

/// What a rollover run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverOutcome {
    /// Number of payrolls promoted to PROCESSED.
    pub processed: u32,
}

/// Closes all PENDING payrolls and opens the next period for each.
///
/// Runs under the store's advisory lock; concurrent confirmations
/// serialize, and the second run sees nothing pending.
pub fn confirm_payroll<S: Store>(
    store: &S,
    clock: &dyn Clock,
    payday: Weekday,
) -> EngineResult<RolloverOutcome> {
    store.exclusive(|| {
        let pending = store.pending_payrolls()?;
        if pending.is_empty() {
            return Ok(RolloverOutcome { processed: 0 });
        }

        let today = clock.today();
        let next_date = next_payday(today, payday);
        let mut processed = 0;

        for mut payroll in pending {
            payroll.salary = compute_salary(
                payroll.rate,
                payroll.incentives,
                payroll.deductions,
                attendance_count(store, payroll.employee_id, payroll.payment_date)?,
            );
            payroll.status = PayrollStatus::Processed;
            store.update_payroll(&payroll)?;

            store.insert_payroll(NewPayroll {
                employee_id: payroll.employee_id,
                rate: payroll.rate,
                incentives: Decimal::ZERO,
                deductions: payroll.cash_advance,
                cash_advance: Decimal::ZERO,
                salary: Decimal::ZERO,
                payment_date: next_date,
                status: PayrollStatus::Pending,
            })?;
            processed += 1;
        }

        store.append_history(
            "Payroll confirmed. Cash advances transferred to next period deductions.",
            clock.now(),
        )?;
        info!(processed, next_payment_date = %next_date, "payroll rollover complete");

        Ok(RolloverOutcome { processed })
    })
}

fn attendance_count<S: Store>(
    store: &S,
    employee_id: u64,
    payment_date: NaiveDate,
) -> EngineResult<u32> {
    let (start, end) = week_window(payment_date);
    let rows = store.attendance_between(employee_id, start, end)?;
    let days: BTreeSet<NaiveDate> = rows
        .iter()
        .filter(|row| row.time_in.is_some())
        .map(|row| row.date)
        .collect();
    Ok(days.len() as u32)
}
