//! Hours calculation and work-window validation.
//!
//! The calculator assumes its inputs already passed validation; the
//! window checks here are what the session machine runs before writing.

use chrono::NaiveTime;
use rust_decimal::Decimal;

use crate::config::WorkWindow;
use crate::error::{EngineError, EngineResult};

/// Hours between `time_in` and `time_out`, rounded to two decimals.
///
/// Zero when either time is missing.
///
/// # Examples
///
/// ```
/// use payroll_engine::attendance::hours_worked;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let time_in = NaiveTime::from_hms_opt(9, 0, 0);
/// let time_out = NaiveTime::from_hms_opt(12, 0, 0);
/// assert_eq!(hours_worked(time_in, time_out), Decimal::new(300, 2)); // 3.00
/// ```
pub fn hours_worked(time_in: Option<NaiveTime>, time_out: Option<NaiveTime>) -> Decimal {
    let (Some(t_in), Some(t_out)) = (time_in, time_out) else {
        return Decimal::ZERO;
    };
    let seconds = (t_out - t_in).num_seconds();
    if seconds <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::new(seconds, 0) / Decimal::new(3600, 0)).round_dp(2)
}

/// The worked duration as an `HH:MM:SS` string, `"00:00:00"` when a
/// time is missing.
pub fn formatted_duration(time_in: Option<NaiveTime>, time_out: Option<NaiveTime>) -> String {
    let seconds = match (time_in, time_out) {
        (Some(t_in), Some(t_out)) => (t_out - t_in).num_seconds().max(0),
        _ => 0,
    };
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Rejects a time-in earlier than the window start.
pub fn validate_time_in(window: &WorkWindow, at: NaiveTime) -> EngineResult<()> {
    if at < window.start {
        return Err(EngineError::invariant(format!(
            "Cannot time in before {}.",
            ampm(window.start)
        )));
    }
    Ok(())
}

/// Rejects a time-out later than the window end.
pub fn validate_time_out(window: &WorkWindow, at: NaiveTime) -> EngineResult<()> {
    if at > window.end {
        return Err(EngineError::invariant(format!(
            "Cannot time out after {}.",
            ampm(window.end)
        )));
    }
    Ok(())
}

/// Formats a time as e.g. "8:00 AM" for human-visible messages.
fn ampm(at: NaiveTime) -> String {
    let formatted = at.format("%I:%M %p").to_string();
    formatted
        .strip_prefix('0')
        .map(str::to_string)
        .unwrap_or(formatted)
}
