//! Employee model.
//!
//! This module defines the Employee struct representing a worker whose
//! attendance is captured and whose payroll is computed by the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents an employee known to the payroll system.
///
/// The portrait is the reference image used for biometric enrollment; an
/// employee whose portrait contains no detectable face is silently excluded
/// from recognition but otherwise participates in attendance and payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: u64,
    /// The employee's first name.
    pub first_name: String,
    /// The employee's last name.
    pub last_name: String,
    /// The employee's date of birth.
    pub date_of_birth: NaiveDate,
    /// The date the employee started employment.
    pub date_of_employment: NaiveDate,
    /// Encoded portrait image bytes (JPEG or PNG).
    #[serde(skip)]
    pub portrait: Vec<u8>,
    /// Whether the employee is currently active.
    pub active: bool,
    /// Number of distinct days the employee was present, maintained by
    /// the stats projector.
    pub days_worked: u32,
    /// Number of working days the employee was absent, maintained by
    /// the stats projector.
    pub absences: u32,
}

impl Employee {
    /// Returns the employee's display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, NewEmployee};
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     first_name: "Maria".to_string(),
    ///     last_name: "Santos".to_string(),
    ///     date_of_birth: NaiveDate::from_ymd_opt(1992, 4, 11).unwrap(),
    ///     date_of_employment: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ///     portrait: vec![],
    ///     active: true,
    ///     days_worked: 0,
    ///     absences: 0,
    /// };
    /// assert_eq!(employee.full_name(), "Maria Santos");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data required to register a new employee; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    /// The employee's first name.
    pub first_name: String,
    /// The employee's last name.
    pub last_name: String,
    /// The employee's date of birth.
    pub date_of_birth: NaiveDate,
    /// The date the employee started employment.
    pub date_of_employment: NaiveDate,
    /// Encoded portrait image bytes (JPEG or PNG).
    pub portrait: Vec<u8>,
}
