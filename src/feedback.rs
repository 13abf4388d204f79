//! Feedback formatting
//!
//! Turns per-phase outcomes into the pass/correction text shown to the user.
//! The direction of each correction is fixed per phase.

use crate::config::DEFAULT_TOLERANCE_DEGREES;
use crate::types::{FeedbackAngle, Phase, PhaseOutcome};
use serde::{Deserialize, Serialize};

/// Formatted verdict for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "message", rename_all = "snake_case")]
pub enum Verdict {
    Pass(String),
    Adjust(String),
    Retry(String),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Verdict::Pass(msg) | Verdict::Adjust(msg) | Verdict::Retry(msg) => msg,
        }
    }
}

/// Formatter holding the pass tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackFormatter {
    tolerance_degrees: f64,
}

impl Default for FeedbackFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_DEGREES)
    }
}

impl FeedbackFormatter {
    pub fn new(tolerance_degrees: f64) -> Self {
        Self { tolerance_degrees }
    }

    /// Pass when the angle is below tolerance, otherwise a correction
    /// carrying the angle rounded to whole degrees.
    pub fn format(&self, phase: Phase, angle: FeedbackAngle) -> Verdict {
        if angle < self.tolerance_degrees {
            return Verdict::Pass(pass_message(phase).to_string());
        }

        let degrees = angle.round() as i64;
        let message = match phase {
            Phase::Top => format!("Raise your arms {degrees} degrees higher at the top"),
            Phase::Middle => format!(
                "Keep your arms level with your shoulders, they were {degrees} degrees off"
            ),
            Phase::Bottom => format!("Bring your arms {degrees} degrees lower at the bottom"),
        };
        Verdict::Adjust(message)
    }

    pub fn format_outcome(&self, outcome: &PhaseOutcome) -> Verdict {
        match outcome {
            PhaseOutcome::Feedback(feedback) => self.format(feedback.phase, feedback.feedback_angle),
            PhaseOutcome::InsufficientAttempts { phase, .. } => Verdict::Retry(format!(
                "Not enough {phase} attempts recorded, try a few more reps"
            )),
        }
    }
}

fn pass_message(phase: Phase) -> &'static str {
    match phase {
        Phase::Top => "Great reach at the top!",
        Phase::Middle => "Arms nicely level in the middle!",
        Phase::Bottom => "Good full range at the bottom!",
    }
}
