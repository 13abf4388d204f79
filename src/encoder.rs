//! Feedback payload encoding
//!
//! This module encodes a scored report into the versioned JSON payload read by
//! the presentation layer. Every phase carries a status, the numeric feedback
//! when there is one, and the formatted message.

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::feedback::FeedbackFormatter;
use crate::types::{
    FeedbackPayload, JumpingJackReport, PayloadPhase, PayloadPhases, PayloadProducer,
    PayloadRecording, Phase, PhaseOutcome,
};
use crate::{FLUX_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current feedback payload version
pub const PAYLOAD_VERSION: &str = "1.0.0";

/// Encoder for producing feedback payloads
pub struct FeedbackEncoder {
    instance_id: String,
}

impl Default for FeedbackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode a report into a payload
    pub fn encode(&self, report: &JumpingJackReport, config: &ScoringConfig) -> FeedbackPayload {
        let formatter = FeedbackFormatter::new(config.tolerance_degrees);
        let phase_payload = |phase: Phase| {
            encode_phase(
                report.outcome(phase),
                config.thresholds.get(phase),
                &formatter,
            )
        };

        FeedbackPayload {
            payload_version: PAYLOAD_VERSION.to_string(),
            producer: PayloadProducer {
                name: PRODUCER_NAME.to_string(),
                version: FLUX_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            recording: PayloadRecording {
                frame_count: report.frame_count,
                duration_ms: report.duration_ms,
            },
            phases: PayloadPhases {
                top: phase_payload(Phase::Top),
                middle: phase_payload(Phase::Middle),
                bottom: phase_payload(Phase::Bottom),
            },
            series: report.series.clone(),
        }
    }

    /// Encode a report directly to a JSON string
    pub fn encode_to_json(
        &self,
        report: &JumpingJackReport,
        config: &ScoringConfig,
    ) -> Result<String, ScoringError> {
        let payload = self.encode(report, config);
        serde_json::to_string(&payload).map_err(|e| ScoringError::EncodingError(e.to_string()))
    }
}

fn encode_phase(
    outcome: &PhaseOutcome,
    threshold: f64,
    formatter: &FeedbackFormatter,
) -> PayloadPhase {
    let verdict = formatter.format_outcome(outcome);

    match outcome {
        PhaseOutcome::Feedback(feedback) => PayloadPhase {
            status: "feedback".to_string(),
            feedback_angle: Some(round_to(feedback.feedback_angle, 2)),
            mean_score: Some(round_to(feedback.mean_score, 2)),
            peaks_detected: feedback.peaks_detected,
            qualifying_peaks: Some(feedback.qualifying_peaks.len()),
            threshold,
            passed: verdict.passed(),
            message: verdict.message().to_string(),
        },
        PhaseOutcome::InsufficientAttempts { peaks_detected, .. } => PayloadPhase {
            status: "insufficient_attempts".to_string(),
            feedback_angle: None,
            mean_score: None,
            peaks_detected: *peaks_detected,
            qualifying_peaks: None,
            threshold,
            passed: false,
            message: verdict.message().to_string(),
        },
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
