//! Frame recognizer.
//!
//! Resolves one captured frame to at most one enrolled employee. The
//! acceptance rule is a double gate: the boolean match at the configured
//! tolerance must hold AND the Euclidean distance must stay below the
//! distance ceiling. The first template to pass both gates wins, in
//! enrollment (insertion) order.

use serde::{Deserialize, Serialize};

use crate::config::RecognitionThresholds;

use super::encoding::FaceAnalyzer;
use super::enrollment::EnrolledTemplate;
use super::frame::Frame;

/// Outcome of recognizing one frame.
///
/// `Waiting` and `Unknown` are not errors; the capture client simply
/// retries on its next frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecognitionVerdict {
    /// Exactly one employee was matched.
    Recognized {
        /// The matched employee.
        employee_id: u64,
        /// The employee's display name.
        name: String,
        /// `1 - distance`; closer to 1 is a stronger match.
        confidence: f64,
    },
    /// No usable face in this frame; try the next one.
    Waiting {
        /// Why the frame was not usable.
        reason: String,
    },
    /// A face was found but matched no enrolled template.
    Unknown,
    /// Recognition could not run at all.
    Error {
        /// What prevented recognition.
        reason: String,
    },
}

/// Compares a probe frame against enrolled templates.
#[derive(Debug, Clone, Copy)]
pub struct Recognizer {
    thresholds: RecognitionThresholds,
}

impl Recognizer {
    /// Creates a recognizer with the given acceptance thresholds.
    pub fn new(thresholds: RecognitionThresholds) -> Self {
        Self { thresholds }
    }

    /// Recognizes the face in `frame` against `templates`.
    ///
    /// Pure with respect to its inputs: identical frames and templates
    /// always produce identical verdicts.
    pub fn recognize(
        &self,
        frame: &Frame,
        templates: &[EnrolledTemplate],
        analyzer: &dyn FaceAnalyzer,
    ) -> RecognitionVerdict {
        if templates.is_empty() {
            return RecognitionVerdict::Error {
                reason: "No enrolled templates available".to_string(),
            };
        }

        let faces = analyzer.detect_faces(frame);
        let Some(largest) = faces.iter().max_by_key(|region| region.area()) else {
            return RecognitionVerdict::Waiting {
                reason: "No face detected".to_string(),
            };
        };

        let Some(probe) = analyzer.encode(frame, largest) else {
            return RecognitionVerdict::Waiting {
                reason: "Cannot encode face".to_string(),
            };
        };

        for template in templates {
            let distance = template.encoding.distance(&probe);
            let matched = template
                .encoding
                .matches(&probe, self.thresholds.match_tolerance);
            if matched && distance < self.thresholds.distance_ceiling {
                return RecognitionVerdict::Recognized {
                    employee_id: template.employee_id,
                    name: template.name.clone(),
                    confidence: 1.0 - distance,
                };
            }
        }

        RecognitionVerdict::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::encoding::{ENCODING_LEN, FaceEncoding, FaceRegion};
    use crate::recognition::frame::ColorLayout;

    /// Reports one face per frame and encodes it as the first pixel
    /// scaled to [0, 1]; an all-zero frame has no face and a frame whose
    /// first pixel is 255 fails to encode.
    struct PixelStub;

    impl FaceAnalyzer for PixelStub {
        fn detect_faces(&self, frame: &Frame) -> Vec<FaceRegion> {
            if frame.data().first().copied().unwrap_or(0) == 0 {
                return vec![];
            }
            vec![FaceRegion {
                top: 0,
                right: frame.width(),
                bottom: frame.height(),
                left: 0,
            }]
        }

        fn encode(&self, frame: &Frame, _region: &FaceRegion) -> Option<FaceEncoding> {
            let first = frame.data()[0];
            if first == 255 {
                return None;
            }
            let mut values = vec![0.0; ENCODING_LEN];
            values[0] = first as f64 / 255.0;
            Some(FaceEncoding::new(values).unwrap())
        }
    }

    fn frame_with_first(value: u8) -> Frame {
        Frame::from_raw(1, 1, ColorLayout::Rgb, vec![value, 0, 0]).unwrap()
    }

    fn template(employee_id: u64, name: &str, first_component: f64) -> EnrolledTemplate {
        let mut values = vec![0.0; ENCODING_LEN];
        values[0] = first_component;
        EnrolledTemplate {
            employee_id,
            name: name.to_string(),
            encoding: FaceEncoding::new(values).unwrap(),
        }
    }

    fn recognizer() -> Recognizer {
        Recognizer::new(RecognitionThresholds::default())
    }

    #[test]
    fn test_close_match_is_recognized() {
        // Probe at 102/255 ≈ 0.4 against a template at 0.0: distance 0.4,
        // inside both gates.
        let templates = vec![template(1, "Ana Santos", 0.0)];
        let verdict = recognizer().recognize(&frame_with_first(102), &templates, &PixelStub);

        match verdict {
            RecognitionVerdict::Recognized {
                employee_id,
                name,
                confidence,
            } => {
                assert_eq!(employee_id, 1);
                assert_eq!(name, "Ana Santos");
                assert!((confidence - 0.6).abs() < 0.01);
            }
            other => panic!("expected Recognized, got {:?}", other),
        }
    }

    #[test]
    fn test_distance_above_ceiling_is_unknown() {
        // Probe at 166/255 ≈ 0.65: outside the 0.5 boolean gate and the
        // 0.6 ceiling, so the face stays unknown.
        let templates = vec![template(1, "Ana Santos", 0.0)];
        let verdict = recognizer().recognize(&frame_with_first(166), &templates, &PixelStub);
        assert_eq!(verdict, RecognitionVerdict::Unknown);
    }

    #[test]
    fn test_distance_between_gates_is_unknown() {
        // A permissive boolean gate alone would accept 0.55; the double
        // gate still requires the boolean at 0.5, so this stays unknown.
        let thresholds = RecognitionThresholds {
            match_tolerance: 0.5,
            distance_ceiling: 0.6,
        };
        let templates = vec![template(1, "Ana Santos", 0.0)];
        let verdict = Recognizer::new(thresholds).recognize(
            &frame_with_first(140), // ≈ 0.549
            &templates,
            &PixelStub,
        );
        assert_eq!(verdict, RecognitionVerdict::Unknown);
    }

    #[test]
    fn test_blank_frame_is_waiting_no_face() {
        let templates = vec![template(1, "Ana Santos", 0.0)];
        let verdict = recognizer().recognize(&frame_with_first(0), &templates, &PixelStub);
        assert_eq!(
            verdict,
            RecognitionVerdict::Waiting {
                reason: "No face detected".to_string()
            }
        );
    }

    #[test]
    fn test_unencodable_face_is_waiting_cannot_encode() {
        let templates = vec![template(1, "Ana Santos", 0.0)];
        let verdict = recognizer().recognize(&frame_with_first(255), &templates, &PixelStub);
        assert_eq!(
            verdict,
            RecognitionVerdict::Waiting {
                reason: "Cannot encode face".to_string()
            }
        );
    }

    #[test]
    fn test_no_templates_is_an_error_verdict() {
        let verdict = recognizer().recognize(&frame_with_first(102), &[], &PixelStub);
        assert!(matches!(verdict, RecognitionVerdict::Error { .. }));
    }

    #[test]
    fn test_first_accepted_template_wins_in_insertion_order() {
        // Both templates pass the gates for a probe at 0.2; the first
        // enrolled one must win even though the second is closer.
        let templates = vec![
            template(1, "Ana Santos", 0.0),
            template(2, "Ben Reyes", 51.0 / 255.0),
        ];
        let verdict = recognizer().recognize(&frame_with_first(51), &templates, &PixelStub);

        match verdict {
            RecognitionVerdict::Recognized { employee_id, .. } => assert_eq!(employee_id, 1),
            other => panic!("expected Recognized, got {:?}", other),
        }
    }

    #[test]
    fn test_recognize_is_deterministic() {
        let templates = vec![template(1, "Ana Santos", 0.0)];
        let frame = frame_with_first(102);
        let first = recognizer().recognize(&frame, &templates, &PixelStub);
        let second = recognizer().recognize(&frame, &templates, &PixelStub);
        assert_eq!(first, second);
    }

    #[test]
    fn test_verdict_serializes_with_status_tag() {
        let json = serde_json::to_value(RecognitionVerdict::Unknown).unwrap();
        assert_eq!(json["status"], "unknown");

        let json = serde_json::to_value(RecognitionVerdict::Waiting {
            reason: "No face detected".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "waiting");
        assert_eq!(json["reason"], "No face detected");
    }
}
