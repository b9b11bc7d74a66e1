//! Attendance-capture and payroll-computation engine.
//!
//! This crate resolves camera frames to enrolled employees, drives the
//! daily time-in/time-out session machine, and computes weekly payroll
//! periods (salary, incentives, deductions, cash-advance carryover) for
//! a small business operating on Manila time.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod recognition;
pub mod store;
