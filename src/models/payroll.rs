//! Payroll model and related types.
//!
//! A payroll row holds the monetary inputs and the computed salary for one
//! employee and one payday. At most one PENDING row exists per employee;
//! the weekly rollover promotes it to PROCESSED and spawns the next one.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a payroll row.
///
/// A row is created `Pending`, transitions to `Processed` exactly once at
/// rollover, and never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    /// The live payroll for the current period; salary is recomputed on read.
    Pending,
    /// A closed payroll; immutable after rollover.
    Processed,
}

/// One payroll period for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier for the payroll row.
    pub id: u64,
    /// The employee this payroll belongs to.
    pub employee_id: u64,
    /// Daily rate used to price attendance.
    pub rate: Decimal,
    /// Incentives added on top of the base pay.
    pub incentives: Decimal,
    /// Deductions subtracted from the base pay. Carried cash advances
    /// arrive here on rollover.
    pub deductions: Decimal,
    /// Cash advance granted during this period; it does not reduce this
    /// period's salary but becomes next period's deduction.
    pub cash_advance: Decimal,
    /// Computed salary: `max(0, rate * attendance_count + incentives - deductions)`.
    pub salary: Decimal,
    /// The payday closing this period.
    pub payment_date: NaiveDate,
    /// Lifecycle state.
    pub status: PayrollStatus,
}

impl Payroll {
    /// Returns true if this payroll is still open for the current period.
    pub fn is_pending(&self) -> bool {
        self.status == PayrollStatus::Pending
    }
}

/// Data required to insert a new payroll row; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayroll {
    /// The employee this payroll belongs to.
    pub employee_id: u64,
    /// Daily rate used to price attendance.
    pub rate: Decimal,
    /// Incentives added on top of the base pay.
    pub incentives: Decimal,
    /// Deductions subtracted from the base pay.
    pub deductions: Decimal,
    /// Cash advance granted during this period.
    pub cash_advance: Decimal,
    /// Computed salary.
    pub salary: Decimal,
    /// The payday closing this period.
    pub payment_date: NaiveDate,
    /// Lifecycle state.
    pub status: PayrollStatus,
}
