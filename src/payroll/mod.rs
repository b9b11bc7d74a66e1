//! Payroll periods: pricing, admin adjustments, and the weekly rollover.

mod period;
mod rollover;

pub use period::{
    IncentiveAction, PeriodEngine, compute_salary, next_payday, next_saturday, week_window,
};
pub use rollover::{RolloverOutcome, confirm_payroll};
