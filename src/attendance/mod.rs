//! Attendance tracking: the session machine, hours calculation, and the
//! statistics projection.

mod hours;
mod session;
mod stats;

pub use hours::{formatted_duration, hours_worked, validate_time_in, validate_time_out};
pub use session::{
    ActionOutcome, AttendanceAction, OutcomeStatus, Session, SessionMachine, project_session,
};
pub use stats::StatsProjector;
