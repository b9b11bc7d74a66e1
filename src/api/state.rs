//! Application state for the payroll engine API.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::EnginePolicy;
use crate::recognition::{EnrollmentCache, FaceAnalyzer};
use crate::store::MemoryStore;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<MemoryStore>,
    analyzer: Arc<dyn FaceAnalyzer>,
    clock: Arc<dyn Clock>,
    policy: EnginePolicy,
    enrollment: Arc<EnrollmentCache>,
}

impl AppState {
    /// Creates application state over the given store, face backend, and
    /// clock.
    pub fn new(
        store: Arc<MemoryStore>,
        analyzer: Arc<dyn FaceAnalyzer>,
        clock: Arc<dyn Clock>,
        policy: EnginePolicy,
    ) -> Self {
        Self {
            store,
            analyzer,
            clock,
            policy,
            enrollment: Arc::new(EnrollmentCache::new()),
        }
    }

    /// The system of record.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// The face detection/encoding backend.
    pub fn analyzer(&self) -> &dyn FaceAnalyzer {
        self.analyzer.as_ref()
    }

    /// The engine clock (Asia/Manila in production).
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The validated engine policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// The enrolled-template cache.
    pub fn enrollment(&self) -> &EnrollmentCache {
        &self.enrollment
    }
}
