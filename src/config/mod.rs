//! Configuration module for the payroll engine.
//!
//! Provides loading and validation of the engine policy (work window,
//! payday, rest day, recognition thresholds) from YAML files.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EnginePolicy, PolicyFile, RecognitionFile, RecognitionThresholds, WorkWindow, WorkWindowFile,
};
