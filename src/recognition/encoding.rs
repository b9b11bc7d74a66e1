//! Face encodings and the detection/encoding seam.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::frame::Frame;

/// Length of a face encoding vector.
pub const ENCODING_LEN: usize = 128;

/// A fixed-length numeric template derived from one face.
///
/// Two encodings are compared by Euclidean distance; smaller is more
/// similar, zero is a perfect match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceEncoding(Vec<f64>);

impl FaceEncoding {
    /// Wraps a raw vector, checking its length.
    pub fn new(values: Vec<f64>) -> EngineResult<Self> {
        if values.len() != ENCODING_LEN {
            return Err(EngineError::invalid(
                "encoding",
                format!("expected {} components, got {}", ENCODING_LEN, values.len()),
            ));
        }
        Ok(Self(values))
    }

    /// Euclidean distance to another encoding.
    pub fn distance(&self, other: &FaceEncoding) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Boolean match gate: accepts when the distance is within `tolerance`.
    pub fn matches(&self, other: &FaceEncoding, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }

    /// The raw components.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// A detected face rectangle in CSS order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    /// Top edge, pixels from the frame top.
    pub top: u32,
    /// Right edge, pixels from the frame left.
    pub right: u32,
    /// Bottom edge, pixels from the frame top.
    pub bottom: u32,
    /// Left edge, pixels from the frame left.
    pub left: u32,
}

impl FaceRegion {
    /// Area of the rectangle in pixels.
    pub fn area(&self) -> u64 {
        let height = self.bottom.saturating_sub(self.top) as u64;
        let width = self.right.saturating_sub(self.left) as u64;
        height * width
    }
}

/// Detection and encoding backend.
///
/// Implementations wrap whatever face stack the deployment uses; the
/// engine only relies on this seam, so tests can substitute a
/// deterministic stub. Both calls are CPU-bound and may take hundreds
/// of milliseconds; callers must not hold locks across them.
pub trait FaceAnalyzer: Send + Sync {
    /// Finds face rectangles in the frame. Empty when no face is visible.
    fn detect_faces(&self, frame: &Frame) -> Vec<FaceRegion>;

    /// Encodes the face inside `region`, or `None` if encoding fails.
    fn encode(&self, frame: &Frame, region: &FaceRegion) -> Option<FaceEncoding>;
}
