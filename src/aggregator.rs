//! Phase aggregation
//!
//! Turns a score series into a single feedback angle per phase:
//! peaks → threshold gate → mean → inverse score → deviation from ideal.

use crate::config::{PhaseThresholds, ScoringConfig};
use crate::error::ScoringError;
use crate::peaks::local_maxima;
use crate::scorer::PhaseScorer;
use crate::types::{FeedbackAngle, Phase, PhaseFeedback, PhaseOutcome, ScoreSeriesSet};

/// Upper bound of a feedback angle (degrees)
const MAX_FEEDBACK_ANGLE: f64 = 90.0;

/// Aggregator for per-phase score series
#[derive(Debug, Clone, Copy)]
pub struct PhaseAggregator {
    scorer: PhaseScorer,
    thresholds: PhaseThresholds,
}

impl Default for PhaseAggregator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl PhaseAggregator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            scorer: PhaseScorer::new(config.max_hand_angle),
            thresholds: config.thresholds,
        }
    }

    pub fn threshold(&self, phase: Phase) -> f64 {
        self.thresholds.get(phase)
    }

    /// Aggregate one phase's series using the configured threshold
    pub fn aggregate(&self, phase: Phase, series: &[f64]) -> Result<PhaseFeedback, ScoringError> {
        self.aggregate_with_threshold(phase, series, self.threshold(phase))
    }

    /// Aggregate one phase's series against an explicit threshold.
    ///
    /// Fails with `InsufficientAttempts` when no peak reaches `threshold`.
    pub fn aggregate_with_threshold(
        &self,
        phase: Phase,
        series: &[f64],
        threshold: f64,
    ) -> Result<PhaseFeedback, ScoringError> {
        let peaks = local_maxima(series)?;
        let peaks_detected = peaks.len();

        let qualifying_peaks: Vec<f64> = peaks.into_iter().filter(|p| *p >= threshold).collect();

        if qualifying_peaks.is_empty() {
            tracing::warn!(
                %phase,
                peaks_detected,
                threshold,
                "no peak reached the phase threshold"
            );
            return Err(ScoringError::InsufficientAttempts {
                phase,
                peaks_detected,
                threshold,
            });
        }

        let mean_score = qualifying_peaks.iter().sum::<f64>() / qualifying_peaks.len() as f64;
        let feedback_angle = self.feedback_angle(phase, mean_score);

        tracing::debug!(
            %phase,
            peaks_detected,
            qualifying = qualifying_peaks.len(),
            mean_score,
            feedback_angle,
            "aggregated phase"
        );

        Ok(PhaseFeedback {
            phase,
            peaks_detected,
            qualifying_peaks,
            mean_score,
            feedback_angle,
        })
    }

    /// Deviation from the ideal pose for a mean peak score.
    ///
    /// Top and bottom measure the distance from `max_hand_angle`; middle
    /// measures the distance from level arms.
    pub fn feedback_angle(&self, phase: Phase, mean_score: f64) -> FeedbackAngle {
        let equivalent = self.scorer.inverse(phase, mean_score);
        let deviation = match phase {
            Phase::Top | Phase::Bottom => (self.scorer.max_hand_angle() - equivalent).abs(),
            Phase::Middle => equivalent,
        };
        deviation.clamp(0.0, MAX_FEEDBACK_ANGLE)
    }

    /// Per-phase outcome. A phase without qualifying attempts becomes
    /// `PhaseOutcome::InsufficientAttempts`; any other error propagates.
    pub fn outcome(&self, phase: Phase, series: &[f64]) -> Result<PhaseOutcome, ScoringError> {
        match self.aggregate(phase, series) {
            Ok(feedback) => Ok(PhaseOutcome::Feedback(feedback)),
            Err(ScoringError::InsufficientAttempts {
                phase,
                peaks_detected,
                threshold,
            }) => Ok(PhaseOutcome::InsufficientAttempts {
                phase,
                peaks_detected,
                threshold,
            }),
            Err(e) => Err(e),
        }
    }

    /// Outcomes for all three phases, in `[top, middle, bottom]` order
    pub fn aggregate_all(&self, series: &ScoreSeriesSet) -> Result<[PhaseOutcome; 3], ScoringError> {
        Ok([
            self.outcome(Phase::Top, &series.top)?,
            self.outcome(Phase::Middle, &series.middle)?,
            self.outcome(Phase::Bottom, &series.bottom)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_middle_scenario() {
        let aggregator = PhaseAggregator::default();
        let series = [100.0, 6500.0, 200.0, 5800.0, 50.0];

        // peaks survive only when >= threshold, so 5800 is gated out at 6000
        let feedback = aggregator
            .aggregate_with_threshold(Phase::Middle, &series, 6000.0)
            .unwrap();

        assert_eq!(feedback.peaks_detected, 2);
        assert_eq!(feedback.qualifying_peaks, vec![6500.0]);
        assert_eq!(feedback.mean_score, 6500.0);
    }

    #[test]
    fn test_middle_scenario_both_peaks_survive() {
        let aggregator = PhaseAggregator::default();
        let series = [100.0, 6500.0, 200.0, 5800.0, 50.0];

        let feedback = aggregator
            .aggregate_with_threshold(Phase::Middle, &series, 5800.0)
            .unwrap();

        assert_eq!(feedback.qualifying_peaks, vec![6500.0, 5800.0]);
        assert!((feedback.mean_score - 6150.0).abs() < 1e-9);

        let scorer = PhaseScorer::default();
        let expected = scorer.inverse_middle(6150.0);
        assert!((feedback.feedback_angle - expected).abs() < 1e-9);
        // sqrt(525)
        assert!((feedback.feedback_angle - 22.9129).abs() < 1e-3);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let aggregator = PhaseAggregator::default();
        let feedback = aggregator
            .aggregate_with_threshold(Phase::Top, &[0.0, 3200.0, 0.0], 3200.0)
            .unwrap();
        assert_eq!(feedback.qualifying_peaks, vec![3200.0]);
    }

    #[test]
    fn test_all_peaks_below_threshold() {
        let aggregator = PhaseAggregator::default();
        let result = aggregator.aggregate(Phase::Middle, &[100.0, 500.0, 200.0, 400.0, 50.0]);

        match result {
            Err(ScoringError::InsufficientAttempts {
                phase,
                peaks_detected,
                threshold,
            }) => {
                assert_eq!(phase, Phase::Middle);
                assert_eq!(peaks_detected, 2);
                assert_eq!(threshold, 6000.0);
            }
            other => panic!("expected InsufficientAttempts, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_series_is_distinct_error() {
        let aggregator = PhaseAggregator::default();
        assert!(matches!(
            aggregator.aggregate(Phase::Top, &[]),
            Err(ScoringError::EmptySeries)
        ));
        assert!(aggregator.outcome(Phase::Top, &[]).is_err());
    }

    #[test]
    fn test_top_feedback_distance_from_ideal() {
        let aggregator = PhaseAggregator::default();

        // both arms at 50 degrees: 2 * 50^2
        let feedback = aggregator.aggregate(Phase::Top, &[0.0, 5000.0, 0.0]).unwrap();
        assert!((feedback.feedback_angle - 10.0).abs() < 1e-9);

        // both arms at the ideal 60 degrees
        let feedback = aggregator.aggregate(Phase::Top, &[7200.0]).unwrap();
        assert!(feedback.feedback_angle.abs() < 1e-9);
    }

    #[test]
    fn test_bottom_feedback_distance_from_ideal() {
        let aggregator = PhaseAggregator::default();
        // both arms at -70 degrees: overshoot by 10
        let feedback = aggregator.aggregate(Phase::Bottom, &[1000.0, 9800.0, 1000.0]).unwrap();
        assert!((feedback.feedback_angle - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_feedback_angle_is_clamped() {
        let aggregator = PhaseAggregator::default();
        // sensor glitch: huge negative middle score
        let angle = aggregator.feedback_angle(Phase::Middle, -1.0e7);
        assert_eq!(angle, 90.0);
    }

    #[test]
    fn test_outcome_converts_insufficient_attempts() {
        let aggregator = PhaseAggregator::default();
        let outcome = aggregator.outcome(Phase::Bottom, &[-10.0, -5.0, -10.0]).unwrap();

        assert_eq!(
            outcome,
            PhaseOutcome::InsufficientAttempts {
                phase: Phase::Bottom,
                peaks_detected: 1,
                threshold: 3200.0,
            }
        );
    }

    #[test]
    fn test_aggregate_all_independent_phases() {
        let aggregator = PhaseAggregator::default();
        let series = ScoreSeriesSet {
            top: vec![0.0, 5000.0, 0.0],
            middle: vec![100.0, 200.0, 100.0],
            bottom: vec![0.0, 7200.0, 0.0],
        };

        let [top, middle, bottom] = aggregator.aggregate_all(&series).unwrap();
        assert!(top.feedback_angle().is_some());
        assert!(matches!(middle, PhaseOutcome::InsufficientAttempts { .. }));
        assert_eq!(bottom.phase(), Phase::Bottom);
    }
}
