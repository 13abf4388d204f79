//! Trackk Flux - On-device scoring engine for jumping-jack form feedback
//!
//! Flux turns a recording of 3D skeleton frames into per-phase form feedback
//! through a deterministic pipeline: angle extraction → phase scoring → peak
//! detection → phase aggregation → feedback encoding.
//!
//! ## Modules
//!
//! - **Geometry**: skeleton frames and signed joint angles
//! - **Scoring**: per-frame top/middle/bottom scores and their inverses
//! - **Aggregation**: local maxima, threshold gating and feedback angles
//! - **Recording**: append-only capture buffer frozen for scoring

pub mod aggregator;
pub mod angles;
pub mod config;
pub mod encoder;
pub mod error;
pub mod feedback;
pub mod peaks;
pub mod pipeline;
pub mod recording;
pub mod scorer;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::PhaseAggregator;
pub use angles::{angle, format_degrees, JointAngles};
pub use config::{PhaseThresholds, ScoringConfig};
pub use error::ScoringError;
pub use feedback::{FeedbackFormatter, Verdict};
pub use peaks::local_maxima;
pub use pipeline::{frames_to_feedback_json, JumpingJackProcessor};
pub use recording::{Recording, RecordingSession};
pub use scorer::PhaseScorer;
pub use types::{
    FeedbackAngle, Frame, JumpingJackReport, Phase, PhaseFeedback, PhaseOutcome, PhaseScores,
    Plane, Point3D, ScoreSeries, ScoreSeriesSet, Skeleton,
};

/// Flux version embedded in all feedback payloads
pub const FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for feedback payloads
pub const PRODUCER_NAME: &str = "trackk-flux";
