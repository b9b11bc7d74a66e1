//! Face enrollment and frame recognition.
//!
//! The recognition pipeline resolves a captured camera frame to at most
//! one known employee. Detection and encoding are delegated to a
//! [`FaceAnalyzer`] implementation (in production a native face stack;
//! in tests a deterministic stub); everything above that seam — template
//! enrollment, caching, and the acceptance gate — lives here.

mod encoding;
mod enrollment;
mod frame;
mod recognizer;

pub use encoding::{ENCODING_LEN, FaceAnalyzer, FaceEncoding, FaceRegion};
pub use enrollment::{EnrolledTemplate, EnrollmentCache};
pub use frame::{ColorLayout, Frame};
pub use recognizer::{RecognitionVerdict, Recognizer};
