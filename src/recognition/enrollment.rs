//! Face enrollment store.
//!
//! Maintains one reference encoding per active employee, derived from
//! their stored portrait. Employees whose portrait is unreadable or
//! contains no detectable face are silently skipped. Encodings are
//! cached against a hash of the portrait bytes, so a rebuild only pays
//! the detection cost for employees whose portrait changed.

use std::collections::HashMap;
use std::sync::RwLock;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::store::EmployeeRepo;

use super::encoding::{FaceAnalyzer, FaceEncoding};
use super::frame::Frame;

/// One enrolled reference template.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrolledTemplate {
    /// The enrolled employee.
    pub employee_id: u64,
    /// The employee's display name, carried into recognition verdicts.
    pub name: String,
    /// The reference encoding from the portrait.
    pub encoding: FaceEncoding,
}

#[derive(Debug, Clone)]
struct CacheSlot {
    portrait_hash: [u8; 32],
    // None caches a portrait that yielded no usable face.
    encoding: Option<FaceEncoding>,
}

/// Rebuildable cache of enrolled templates.
///
/// Safe to rebuild at any time; no persistence between restarts. Writers
/// replacing a portrait only need [`EnrollmentCache::invalidate`] — the
/// hash check would catch the change anyway on the next rebuild.
#[derive(Debug, Default)]
pub struct EnrollmentCache {
    slots: RwLock<HashMap<u64, CacheSlot>>,
}

impl EnrollmentCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the enrolled templates for all active employees, in
    /// employee insertion order.
    pub fn templates<S: EmployeeRepo>(
        &self,
        store: &S,
        analyzer: &dyn FaceAnalyzer,
    ) -> EngineResult<Vec<EnrolledTemplate>> {
        let employees = store.active_employees()?;
        let mut templates = Vec::new();

        for employee in employees {
            let hash: [u8; 32] = Sha256::digest(&employee.portrait).into();

            let cached = {
                let slots = self.slots.read().map_err(|e| EngineError::Storage {
                    message: format!("enrollment cache lock poisoned: {e}"),
                })?;
                slots
                    .get(&employee.id)
                    .filter(|slot| slot.portrait_hash == hash)
                    .map(|slot| slot.encoding.clone())
            };

            let encoding = match cached {
                Some(encoding) => encoding,
                None => {
                    let fresh = Self::encode_portrait(&employee.portrait, analyzer, employee.id);
                    let mut slots = self.slots.write().map_err(|e| EngineError::Storage {
                        message: format!("enrollment cache lock poisoned: {e}"),
                    })?;
                    slots.insert(
                        employee.id,
                        CacheSlot {
                            portrait_hash: hash,
                            encoding: fresh.clone(),
                        },
                    );
                    fresh
                }
            };

            if let Some(encoding) = encoding {
                templates.push(EnrolledTemplate {
                    employee_id: employee.id,
                    name: employee.full_name(),
                    encoding,
                });
            }
        }

        Ok(templates)
    }

    /// Drops the cached encoding for one employee.
    pub fn invalidate(&self, employee_id: u64) {
        if let Ok(mut slots) = self.slots.write() {
            slots.remove(&employee_id);
        }
    }

    fn encode_portrait(
        portrait: &[u8],
        analyzer: &dyn FaceAnalyzer,
        employee_id: u64,
    ) -> Option<FaceEncoding> {
        let frame = match Frame::decode(portrait) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(employee_id, error = %e, "skipping unreadable portrait");
                return None;
            }
        };

        let faces = analyzer.detect_faces(&frame);
        let largest = faces.iter().max_by_key(|region| region.area())?;
        let encoding = analyzer.encode(&frame, largest);
        if encoding.is_none() {
            warn!(employee_id, "portrait face could not be encoded");
        }
        encoding
    }
}
