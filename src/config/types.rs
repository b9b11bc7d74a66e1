//! Configuration types for engine policy.
//!
//! The policy file captures the tunable operating points of the engine:
//! the daily work window, the payday weekday, the weekly rest day, and
//! the face-recognition thresholds. Compiled-in defaults match the
//! values the business runs with.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// The daily interval outside which time-in and time-out are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkWindow {
    /// Earliest permitted time-in.
    pub start: NaiveTime,
    /// Latest permitted time-out.
    pub end: NaiveTime,
}

impl Default for WorkWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).expect("valid work window start"),
            end: NaiveTime::from_hms_opt(17, 0, 0).expect("valid work window end"),
        }
    }
}

/// Acceptance thresholds for face comparison.
///
/// A probe is accepted against a template only when the boolean match at
/// `match_tolerance` holds AND the Euclidean distance is below
/// `distance_ceiling`. The boolean is the library's default acceptance;
/// the ceiling adds a narrow margin against the more lenient webcam
/// operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecognitionThresholds {
    /// Distance tolerance for the boolean match gate.
    pub match_tolerance: f64,
    /// Upper bound on the accepted Euclidean distance.
    pub distance_ceiling: f64,
}

impl Default for RecognitionThresholds {
    fn default() -> Self {
        Self {
            match_tolerance: 0.5,
            distance_ceiling: 0.6,
        }
    }
}

/// Validated engine policy.
#[derive(Debug, Clone, PartialEq)]
pub struct EnginePolicy {
    /// Daily work window.
    pub work_window: WorkWindow,
    /// Weekday on which payroll closes (default Saturday).
    pub payday: Weekday,
    /// Weekday excluded from the working-day count (default Sunday).
    pub rest_day: Weekday,
    /// Face comparison thresholds.
    pub recognition: RecognitionThresholds,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            work_window: WorkWindow::default(),
            payday: Weekday::Sat,
            rest_day: Weekday::Sun,
            recognition: RecognitionThresholds::default(),
        }
    }
}

/// Raw shape of `policy.yaml` before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Work window times as `HH:MM:SS` strings.
    pub work_window: WorkWindowFile,
    /// Payday weekday name (e.g. "saturday").
    pub payday: String,
    /// Rest day weekday name (e.g. "sunday").
    pub rest_day: String,
    /// Recognition thresholds.
    pub recognition: RecognitionFile,
}

/// Raw work window section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkWindowFile {
    /// Earliest permitted time-in, `HH:MM:SS`.
    pub start: String,
    /// Latest permitted time-out, `HH:MM:SS`.
    pub end: String,
}

/// Raw recognition section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionFile {
    /// Distance tolerance for the boolean match gate.
    pub match_tolerance: f64,
    /// Upper bound on the accepted Euclidean distance.
    pub distance_ceiling: f64,
}
