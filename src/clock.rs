//! Wall-clock access pinned to the business time zone.
//!
//! All attendance and payroll decisions are made in local Manila time
//! (UTC+8, no daylight saving). The [`Clock`] trait lets tests replace
//! "now" with a fixed instant.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Seconds east of UTC for Asia/Manila.
pub const MANILA_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Returns the current local time of day.
    fn time(&self) -> NaiveTime {
        self.now().time()
    }
}

/// System clock translated to Asia/Manila.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManilaClock;

impl Clock for ManilaClock {
    fn now(&self) -> NaiveDateTime {
        let offset =
            FixedOffset::east_opt(MANILA_UTC_OFFSET_SECS).expect("valid fixed offset for UTC+8");
        let local: DateTime<FixedOffset> = Utc::now().with_timezone(&offset);
        local.naive_local()
    }
}

/// A clock frozen at a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
