//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! policy from a YAML file.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};

use crate::error::{EngineError, EngineResult};

use super::types::{EnginePolicy, PolicyFile, RecognitionThresholds, WorkWindow};

/// Loads and provides access to the engine policy.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// └── policy.yaml   # Work window, payday, rest day, recognition thresholds
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// assert_eq!(loader.policy().work_window.start.to_string(), "08:00:00");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: EnginePolicy,
}

impl ConfigLoader {
    /// Loads the policy from `policy.yaml` in the specified directory.
    ///
    /// Returns an error if the file is missing, contains invalid YAML,
    /// or holds an unparseable time or weekday.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let policy_path = path.as_ref().join("policy.yaml");
        let path_str = policy_path.display().to_string();

        let content = fs::read_to_string(&policy_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let file: PolicyFile =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        let policy = Self::validate(file, &path_str)?;
        Ok(Self { policy })
    }

    /// Builds a loader around the compiled-in default policy.
    pub fn with_defaults() -> Self {
        Self {
            policy: EnginePolicy::default(),
        }
    }

    /// Returns the validated engine policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    fn validate(file: PolicyFile, path: &str) -> EngineResult<EnginePolicy> {
        let parse_time = |value: &str, field: &str| {
            NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|_| {
                EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: format!("{field} is not a valid HH:MM:SS time: '{value}'"),
                }
            })
        };
        let parse_weekday = |value: &str, field: &str| {
            Weekday::from_str(value).map_err(|_| EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!("{field} is not a valid weekday: '{value}'"),
            })
        };

        let start = parse_time(&file.work_window.start, "work_window.start")?;
        let end = parse_time(&file.work_window.end, "work_window.end")?;
        if start >= end {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: "work_window.start must be before work_window.end".to_string(),
            });
        }

        Ok(EnginePolicy {
            work_window: WorkWindow { start, end },
            payday: parse_weekday(&file.payday, "payday")?,
            rest_day: parse_weekday(&file.rest_day, "rest_day")?,
            recognition: RecognitionThresholds {
                match_tolerance: file.recognition.match_tolerance,
                distance_ceiling: file.recognition.distance_ceiling,
            },
        })
    }
}
