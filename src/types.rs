//! Core types for the Trackk Flux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: skeleton frames, per-frame phase scores, score series, and the
//! per-phase feedback records that make up a report.
//!
//! Coordinates follow the capture layer's convention when a phone is held
//! upright facing the subject: positive X is to the right, positive Y is up and
//! positive Z comes towards the camera. Units are meters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the sensor's 3D coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise difference `self - origin`
    pub fn delta_from(&self, origin: &Point3D) -> (f64, f64, f64) {
        (self.x - origin.x, self.y - origin.y, self.z - origin.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Reference plane for angle extraction.
///
/// The two named axes form the "horizontal" of the angle; the remaining axis
/// gives the angle its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

/// Tracked joints carried by every skeleton snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    RightHand,
    LeftHand,
    RightFoot,
    LeftFoot,
    RightShoulder,
    LeftShoulder,
    Hip,
    Head,
}

impl Joint {
    pub const ALL: [Joint; 8] = [
        Joint::RightHand,
        Joint::LeftHand,
        Joint::RightFoot,
        Joint::LeftFoot,
        Joint::RightShoulder,
        Joint::LeftShoulder,
        Joint::Hip,
        Joint::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::RightHand => "rightHand",
            Joint::LeftHand => "leftHand",
            Joint::RightFoot => "rightFoot",
            Joint::LeftFoot => "leftFoot",
            Joint::RightShoulder => "rightShoulder",
            Joint::LeftShoulder => "leftShoulder",
            Joint::Hip => "hip",
            Joint::Head => "head",
        }
    }
}

/// Snapshot of all tracked joint positions. Every joint is required.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skeleton {
    pub right_hand: Point3D,
    pub left_hand: Point3D,
    pub right_foot: Point3D,
    pub left_foot: Point3D,
    pub right_shoulder: Point3D,
    pub left_shoulder: Point3D,
    pub hip: Point3D,
    pub head: Point3D,
}

impl Skeleton {
    /// Position of a single joint
    pub fn joint(&self, joint: Joint) -> Point3D {
        match joint {
            Joint::RightHand => self.right_hand,
            Joint::LeftHand => self.left_hand,
            Joint::RightFoot => self.right_foot,
            Joint::LeftFoot => self.left_foot,
            Joint::RightShoulder => self.right_shoulder,
            Joint::LeftShoulder => self.left_shoulder,
            Joint::Hip => self.hip,
            Joint::Head => self.head,
        }
    }

    /// First joint holding a NaN or infinite coordinate, if any
    pub fn first_non_finite(&self) -> Option<Joint> {
        Joint::ALL
            .into_iter()
            .find(|joint| !self.joint(*joint).is_finite())
    }
}

/// One timestamped skeleton snapshot.
///
/// `timestamp` is a millisecond counter assigned by the capture layer; only
/// its ordering matters here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub skeleton: Skeleton,
    pub timestamp: i64,
}

impl Frame {
    pub fn new(skeleton: Skeleton, timestamp: i64) -> Self {
        Self {
            skeleton,
            timestamp,
        }
    }
}

/// Reference pose in a jumping-jack cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Arms raised above the shoulders
    Top,
    /// Neutral "T" pose, arms level with the shoulders
    Middle,
    /// Arms lowered towards the hips
    Bottom,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Top, Phase::Middle, Phase::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Top => "top",
            Phase::Middle => "middle",
            Phase::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores of a single frame against all three phases
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseScores {
    pub top: f64,
    pub middle: f64,
    pub bottom: f64,
}

impl PhaseScores {
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Top => self.top,
            Phase::Middle => self.middle,
            Phase::Bottom => self.bottom,
        }
    }
}

/// Per-phase scores in recording order. Order is significant for peak detection.
pub type ScoreSeries = Vec<f64>;

/// Degrees of deviation from the ideal pose of a phase, in `[0, 90]`
pub type FeedbackAngle = f64;

/// The three phase series of one recording
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreSeriesSet {
    pub top: ScoreSeries,
    pub middle: ScoreSeries,
    pub bottom: ScoreSeries,
}

impl ScoreSeriesSet {
    /// Split a per-frame score table into one series per phase
    pub fn from_scores(scores: &[PhaseScores]) -> Self {
        Self {
            top: scores.iter().map(|s| s.top).collect(),
            middle: scores.iter().map(|s| s.middle).collect(),
            bottom: scores.iter().map(|s| s.bottom).collect(),
        }
    }

    pub fn get(&self, phase: Phase) -> &[f64] {
        match phase {
            Phase::Top => &self.top,
            Phase::Middle => &self.middle,
            Phase::Bottom => &self.bottom,
        }
    }

    pub fn len(&self) -> usize {
        self.top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }
}

/// Aggregated result for one phase of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseFeedback {
    pub phase: Phase,
    /// Local maxima found in the series, before thresholding
    pub peaks_detected: usize,
    /// Peaks that reached the phase threshold
    pub qualifying_peaks: Vec<f64>,
    /// Mean of the qualifying peaks
    pub mean_score: f64,
    /// Deviation from the ideal pose (degrees)
    pub feedback_angle: FeedbackAngle,
}

/// Per-phase outcome inside a report.
///
/// A phase with no qualifying attempts does not fail the rest of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseOutcome {
    Feedback(PhaseFeedback),
    InsufficientAttempts {
        phase: Phase,
        peaks_detected: usize,
        threshold: f64,
    },
}

impl PhaseOutcome {
    pub fn phase(&self) -> Phase {
        match self {
            PhaseOutcome::Feedback(feedback) => feedback.phase,
            PhaseOutcome::InsufficientAttempts { phase, .. } => *phase,
        }
    }

    pub fn feedback_angle(&self) -> Option<FeedbackAngle> {
        match self {
            PhaseOutcome::Feedback(feedback) => Some(feedback.feedback_angle),
            PhaseOutcome::InsufficientAttempts { .. } => None,
        }
    }

    pub fn peaks_detected(&self) -> usize {
        match self {
            PhaseOutcome::Feedback(feedback) => feedback.peaks_detected,
            PhaseOutcome::InsufficientAttempts { peaks_detected, .. } => *peaks_detected,
        }
    }
}

/// Scoring result of a whole recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpingJackReport {
    pub top: PhaseOutcome,
    pub middle: PhaseOutcome,
    pub bottom: PhaseOutcome,
    /// Number of frames scored
    pub frame_count: usize,
    /// Last timestamp minus first timestamp (ms)
    pub duration_ms: i64,
    /// Raw per-phase series, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<ScoreSeriesSet>,
}

impl JumpingJackReport {
    pub fn outcome(&self, phase: Phase) -> &PhaseOutcome {
        match phase {
            Phase::Top => &self.top,
            Phase::Middle => &self.middle,
            Phase::Bottom => &self.bottom,
        }
    }
}

/// Producer metadata stamped on every payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Recording summary inside a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadRecording {
    pub frame_count: usize,
    pub duration_ms: i64,
}

/// One phase inside a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadPhase {
    /// "feedback" or "insufficient_attempts"
    pub status: String,
    pub feedback_angle: Option<f64>,
    pub mean_score: Option<f64>,
    pub peaks_detected: usize,
    pub qualifying_peaks: Option<usize>,
    pub threshold: f64,
    pub passed: bool,
    pub message: String,
}

/// Per-phase section of a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadPhases {
    pub top: PayloadPhase,
    pub middle: PayloadPhase,
    pub bottom: PayloadPhase,
}

/// Complete feedback payload handed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub payload_version: String,
    pub producer: PayloadProducer,
    pub computed_at_utc: String,
    pub recording: PayloadRecording,
    pub phases: PayloadPhases,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<ScoreSeriesSet>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_skeleton() -> Skeleton {
        Skeleton {
            right_hand: Point3D::new(0.8, 1.4, 0.0),
            left_hand: Point3D::new(-0.8, 1.4, 0.0),
            right_foot: Point3D::new(0.2, 0.0, 0.0),
            left_foot: Point3D::new(-0.2, 0.0, 0.0),
            right_shoulder: Point3D::new(0.2, 1.4, 0.0),
            left_shoulder: Point3D::new(-0.2, 1.4, 0.0),
            hip: Point3D::new(0.0, 0.9, 0.0),
            head: Point3D::new(0.0, 1.7, 0.0),
        }
    }

    #[test]
    fn test_frame_serializes_field_for_field() {
        let frame = Frame::new(sample_skeleton(), 120);
        let value = serde_json::to_value(frame).unwrap();

        assert_eq!(value["timestamp"], 120);
        assert_eq!(value["skeleton"]["rightHand"]["x"], 0.8);
        assert_eq!(value["skeleton"]["leftShoulder"]["x"], -0.2);
        assert_eq!(value["skeleton"]["head"]["y"], 1.7);
        assert_eq!(value["skeleton"].as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_frame_deserialize_requires_all_joints() {
        let json = r#"{
            "skeleton": {
                "rightHand": {"x": 0.0, "y": 0.0, "z": 0.0}
            },
            "timestamp": 0
        }"#;

        assert!(serde_json::from_str::<Frame>(json).is_err());
    }

    #[test]
    fn test_skeleton_joint_lookup() {
        let skeleton = sample_skeleton();
        assert_eq!(skeleton.joint(Joint::Hip), Point3D::new(0.0, 0.9, 0.0));
        assert_eq!(skeleton.joint(Joint::LeftHand), skeleton.left_hand);
        assert_eq!(skeleton.first_non_finite(), None);
    }

    #[test]
    fn test_first_non_finite() {
        let mut skeleton = sample_skeleton();
        skeleton.left_foot.y = f64::NAN;
        assert_eq!(skeleton.first_non_finite(), Some(Joint::LeftFoot));
    }

    #[test]
    fn test_series_from_scores() {
        let scores = vec![
            PhaseScores { top: 1.0, middle: 2.0, bottom: 3.0 },
            PhaseScores { top: 4.0, middle: 5.0, bottom: 6.0 },
        ];
        let series = ScoreSeriesSet::from_scores(&scores);

        assert_eq!(series.top, vec![1.0, 4.0]);
        assert_eq!(series.get(Phase::Middle), &[2.0, 5.0]);
        assert_eq!(series.bottom, vec![3.0, 6.0]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_phase_outcome_tagged_serialization() {
        let outcome = PhaseOutcome::InsufficientAttempts {
            phase: Phase::Bottom,
            peaks_detected: 2,
            threshold: 3200.0,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "insufficient_attempts");
        assert_eq!(value["phase"], "bottom");
        assert_eq!(outcome.feedback_angle(), None);
    }
}
