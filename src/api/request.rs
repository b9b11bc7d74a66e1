//! Request types for the payroll engine API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceAction;
use crate::payroll::IncentiveAction;

/// Body of `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The employee clocking in or out.
    pub employee_id: u64,
    /// The requested action.
    pub action: AttendanceAction,
}

/// Body of `POST /attendance/status`.
///
/// With no range, the history covers the last 30 days before today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStatusRequest {
    /// The employee to report on.
    pub employee_id: u64,
    /// Optional history range start, inclusive.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Optional history range end, inclusive.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Query string of `GET /attendance/logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceLogsQuery {
    /// The employee whose rows to list.
    pub employee_id: u64,
    /// Range start, inclusive.
    pub start_date: NaiveDate,
    /// Range end, inclusive.
    pub end_date: NaiveDate,
}

/// Query string of `GET /payroll/current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentPayrollQuery {
    /// The employee whose live payroll to return.
    pub employee_id: u64,
}

/// Body of `POST /payroll/incentives`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncentivesRequest {
    /// The employee whose current period to adjust.
    pub employee_id: u64,
    /// Whether to add or subtract.
    pub action: IncentiveAction,
    /// The positive amount to apply.
    pub amount: Decimal,
}

/// Body of `POST /payroll/payment-date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDateRequest {
    /// The employee whose current period to adjust.
    pub employee_id: u64,
    /// The new payment date; must not be in the past.
    pub payment_date: NaiveDate,
}

/// Body of `POST /payroll/cash-advance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAdvanceRequest {
    /// The employee receiving the advance.
    pub employee_id: u64,
    /// The positive amount to grant.
    pub amount: Decimal,
}
