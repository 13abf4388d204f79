//! Error types for Trackk Flux

use thiserror::Error;

use crate::types::Phase;

/// Errors that can occur while recording or scoring frames
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Failed to parse frames: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Score series is empty; record at least one frame before scoring")]
    EmptySeries,

    #[error(
        "Insufficient qualifying attempts for {phase} phase: {peaks_detected} peaks detected, none reached threshold {threshold}"
    )]
    InsufficientAttempts {
        phase: Phase,
        peaks_detected: usize,
        threshold: f64,
    },

    #[error("Invalid frame at index {index}: {reason}")]
    InvalidFrame { index: usize, reason: String },

    #[error("Frame at index {index} has timestamp {timestamp} earlier than previous {previous}")]
    OutOfOrderFrame {
        index: usize,
        previous: i64,
        timestamp: i64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl ScoringError {
    /// True for local data-quality problems the caller can recover from by
    /// recording more frames or relaxing thresholds.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScoringError::EmptySeries | ScoringError::InsufficientAttempts { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_attempts_message() {
        let err = ScoringError::InsufficientAttempts {
            phase: Phase::Top,
            peaks_detected: 3,
            threshold: 3200.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("top"));
        assert!(msg.contains("3 peaks"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_parse_error_not_recoverable() {
        let err = ScoringError::ParseError("bad".to_string());
        assert!(!err.is_recoverable());
    }
}
