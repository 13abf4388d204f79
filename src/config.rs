//! Scoring configuration
//!
//! Constants that shape the phase scores and the feedback thresholds. The
//! defaults match the values the jumping-jack feedback messages were tuned on.

use crate::error::ScoringError;
use crate::types::Phase;
use serde::{Deserialize, Serialize};

/// Ideal arm elevation at the top and bottom of a rep (degrees)
pub const DEFAULT_MAX_HAND_ANGLE: f64 = 60.0;

/// Feedback angles below this are reported as a pass (degrees)
pub const DEFAULT_TOLERANCE_DEGREES: f64 = 5.0;

/// Minimum peak score that counts as a genuine attempt, per phase.
///
/// Peaks below a threshold are treated as transition noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    pub top: f64,
    pub middle: f64,
    pub bottom: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            // both arms at 40 degrees
            top: 3200.0,
            middle: 6000.0,
            bottom: 3200.0,
        }
    }
}

impl PhaseThresholds {
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Top => self.top,
            Phase::Middle => self.middle,
            Phase::Bottom => self.bottom,
        }
    }
}

/// Top-level scoring configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Ideal arm angle at the top/bottom of a rep (degrees)
    pub max_hand_angle: f64,
    pub thresholds: PhaseThresholds,
    /// Pass/fail tolerance for formatted feedback (degrees)
    pub tolerance_degrees: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_hand_angle: DEFAULT_MAX_HAND_ANGLE,
            thresholds: PhaseThresholds::default(),
            tolerance_degrees: DEFAULT_TOLERANCE_DEGREES,
        }
    }
}

impl ScoringConfig {
    /// Score ceiling of the middle phase: both arms at `max_hand_angle`
    pub fn max_deviation(&self) -> f64 {
        2.0 * self.max_hand_angle.powi(2)
    }

    /// Check that every value is usable for scoring
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(self.max_hand_angle > 0.0 && self.max_hand_angle <= 90.0) {
            return Err(ScoringError::InvalidConfig(format!(
                "max_hand_angle must be in (0, 90], got {}",
                self.max_hand_angle
            )));
        }

        if !self.tolerance_degrees.is_finite() || self.tolerance_degrees < 0.0 {
            return Err(ScoringError::InvalidConfig(format!(
                "tolerance_degrees must be a non-negative number, got {}",
                self.tolerance_degrees
            )));
        }

        for phase in Phase::ALL {
            let threshold = self.thresholds.get(phase);
            if !threshold.is_finite() {
                return Err(ScoringError::InvalidConfig(format!(
                    "{phase} threshold must be finite, got {threshold}"
                )));
            }
        }

        Ok(())
    }

    /// Parse and validate a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let config: ScoringConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ScoringError> {
        serde_json::to_string_pretty(self).map_err(|e| ScoringError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.max_hand_angle, 60.0);
        assert_eq!(config.max_deviation(), 7200.0);
        assert_eq!(config.thresholds.get(Phase::Middle), 6000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScoringConfig::from_json(r#"{"max_hand_angle": 45.0}"#).unwrap();
        assert_eq!(config.max_hand_angle, 45.0);
        assert_eq!(config.thresholds, PhaseThresholds::default());
        assert_eq!(config.tolerance_degrees, DEFAULT_TOLERANCE_DEGREES);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ScoringConfig {
            max_hand_angle: 50.0,
            thresholds: PhaseThresholds {
                top: 2000.0,
                middle: 4000.0,
                bottom: 2500.0,
            },
            tolerance_degrees: 3.0,
        };
        let json = config.to_json().unwrap();
        assert_eq!(ScoringConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_max_hand_angle() {
        let result = ScoringConfig::from_json(r#"{"max_hand_angle": 120.0}"#);
        assert!(matches!(result, Err(ScoringError::InvalidConfig(_))));

        let result = ScoringConfig::from_json(r#"{"max_hand_angle": 0.0}"#);
        assert!(matches!(result, Err(ScoringError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = ScoringConfig {
            tolerance_degrees: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json() {
        let result = ScoringConfig::from_json("not json");
        assert!(matches!(result, Err(ScoringError::JsonError(_))));
    }
}
