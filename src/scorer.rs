//! Phase scoring
//!
//! Scores a frame against the three jumping-jack phases using the squared arm
//! angles (hand relative to shoulder, plane XZ):
//! - Middle: highest when both arms are level (neutral "T" pose)
//! - Top: highest when both arms point straight up
//! - Bottom: highest when both arms point straight down
//!
//! Top and bottom share a magnitude formula; the sign separates them.

use crate::angles::angle;
use crate::config::DEFAULT_MAX_HAND_ANGLE;
use crate::types::{Frame, Phase, PhaseScores, Plane};

/// Phase scorer parameterized by the ideal arm angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseScorer {
    max_hand_angle: f64,
}

impl Default for PhaseScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HAND_ANGLE)
    }
}

impl PhaseScorer {
    pub fn new(max_hand_angle: f64) -> Self {
        Self { max_hand_angle }
    }

    pub fn max_hand_angle(&self) -> f64 {
        self.max_hand_angle
    }

    /// Middle-phase score ceiling
    pub fn max_deviation(&self) -> f64 {
        2.0 * self.max_hand_angle.powi(2)
    }

    /// Distance of the arms from the neutral pose, inverted so level arms score highest.
    /// Goes negative once the squared angles exceed `max_deviation`.
    pub fn score_middle(&self, frame: &Frame) -> f64 {
        let (right, left) = arm_angles(frame);
        self.max_deviation() - (right.powi(2) + left.powi(2))
    }

    pub fn score_top(&self, frame: &Frame) -> f64 {
        let (right, left) = arm_angles(frame);
        let score = right.powi(2) + left.powi(2);

        // both arms below the shoulders is a bottom pose
        if right < 0.0 && left < 0.0 {
            -score
        } else {
            score
        }
    }

    pub fn score_bottom(&self, frame: &Frame) -> f64 {
        let (right, left) = arm_angles(frame);
        let score = right.powi(2) + left.powi(2);

        if right > 0.0 && left > 0.0 {
            -score
        } else {
            score
        }
    }

    pub fn score(&self, phase: Phase, frame: &Frame) -> f64 {
        match phase {
            Phase::Top => self.score_top(frame),
            Phase::Middle => self.score_middle(frame),
            Phase::Bottom => self.score_bottom(frame),
        }
    }

    /// Score one frame against every phase
    pub fn score_frame(&self, frame: &Frame) -> PhaseScores {
        PhaseScores {
            top: self.score_top(frame),
            middle: self.score_middle(frame),
            bottom: self.score_bottom(frame),
        }
    }

    /// Score table for a recording, in frame order
    pub fn score_frames(&self, frames: &[Frame]) -> Vec<PhaseScores> {
        frames.iter().map(|frame| self.score_frame(frame)).collect()
    }

    /// Single arm angle equivalent to a middle score.
    ///
    /// Lossy: assumes both arms had the same angle magnitude, and drops sign.
    pub fn inverse_middle(&self, score: f64) -> f64 {
        ((score - self.max_deviation()) / -2.0).abs().sqrt()
    }

    /// Single arm angle equivalent to a top score. Same lossy assumption as
    /// [`inverse_middle`](Self::inverse_middle).
    pub fn inverse_top(&self, score: f64) -> f64 {
        (score / 2.0).abs().sqrt()
    }

    pub fn inverse_bottom(&self, score: f64) -> f64 {
        (score / 2.0).abs().sqrt()
    }

    pub fn inverse(&self, phase: Phase, score: f64) -> f64 {
        match phase {
            Phase::Top => self.inverse_top(score),
            Phase::Middle => self.inverse_middle(score),
            Phase::Bottom => self.inverse_bottom(score),
        }
    }
}

/// (right, left) arm angles of a frame
fn arm_angles(frame: &Frame) -> (f64, f64) {
    let skeleton = &frame.skeleton;
    let right = angle(&skeleton.right_hand, &skeleton.right_shoulder, Plane::XZ);
    let left = angle(&skeleton.left_hand, &skeleton.left_shoulder, Plane::XZ);
    (right, left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point3D, Skeleton};

    /// Frame with both arms raised `right_deg` / `left_deg` above horizontal
    fn make_frame(right_deg: f64, left_deg: f64) -> Frame {
        let right_shoulder = Point3D::new(0.2, 1.4, 0.0);
        let left_shoulder = Point3D::new(-0.2, 1.4, 0.0);
        let arm = 0.6;

        let (rs, rc) = right_deg.to_radians().sin_cos();
        let (ls, lc) = left_deg.to_radians().sin_cos();

        let skeleton = Skeleton {
            right_hand: Point3D::new(right_shoulder.x + arm * rc, right_shoulder.y + arm * rs, 0.0),
            left_hand: Point3D::new(left_shoulder.x - arm * lc, left_shoulder.y + arm * ls, 0.0),
            right_foot: Point3D::new(0.2, 0.0, 0.0),
            left_foot: Point3D::new(-0.2, 0.0, 0.0),
            right_shoulder,
            left_shoulder,
            hip: Point3D::new(0.0, 0.9, 0.0),
            head: Point3D::new(0.0, 1.7, 0.0),
        };
        Frame::new(skeleton, 0)
    }

    #[test]
    fn test_arm_angles_match_synthetic_frame() {
        let (right, left) = arm_angles(&make_frame(30.0, -20.0));
        assert!((right - 30.0).abs() < 1e-6);
        assert!((left + 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_middle_peaks_at_t_pose() {
        let scorer = PhaseScorer::default();
        let t_pose = scorer.score_middle(&make_frame(0.0, 0.0));
        let raised = scorer.score_middle(&make_frame(30.0, 30.0));

        assert!((t_pose - 7200.0).abs() < 1e-6);
        assert!(t_pose > raised);
    }

    #[test]
    fn test_middle_goes_negative_past_max_hand_angle() {
        let scorer = PhaseScorer::default();
        assert!(scorer.score_middle(&make_frame(80.0, 80.0)) < 0.0);
    }

    #[test]
    fn test_top_negated_when_both_arms_down() {
        let scorer = PhaseScorer::default();
        let up = scorer.score_top(&make_frame(60.0, 60.0));
        let down = scorer.score_top(&make_frame(-60.0, -60.0));
        let mixed = scorer.score_top(&make_frame(60.0, -60.0));

        assert!((up - 7200.0).abs() < 1e-6);
        assert!((down + 7200.0).abs() < 1e-6);
        assert!(mixed > 0.0);
    }

    #[test]
    fn test_bottom_negated_when_both_arms_up() {
        let scorer = PhaseScorer::default();
        let down = scorer.score_bottom(&make_frame(-60.0, -60.0));
        let up = scorer.score_bottom(&make_frame(60.0, 60.0));

        assert!((down - 7200.0).abs() < 1e-6);
        assert!((up + 7200.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_frame_matches_individual_scores() {
        let scorer = PhaseScorer::default();
        let frame = make_frame(45.0, 40.0);
        let scores = scorer.score_frame(&frame);

        assert_eq!(scores.top, scorer.score_top(&frame));
        assert_eq!(scores.middle, scorer.score_middle(&frame));
        assert_eq!(scores.bottom, scorer.score_bottom(&frame));
        for phase in Phase::ALL {
            assert_eq!(scores.get(phase), scorer.score(phase, &frame));
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let scorer = PhaseScorer::default();

        for theta in [-85.0, -60.0, -30.0, -5.0, 0.0, 10.0, 45.0, 60.0, 85.0] {
            let frame = make_frame(theta, theta);
            for phase in Phase::ALL {
                let recovered = scorer.inverse(phase, scorer.score(phase, &frame));
                assert!(
                    (recovered - f64::abs(theta)).abs() < 0.5,
                    "{phase} at {theta}: recovered {recovered}"
                );
            }
        }
    }

    #[test]
    fn test_inverse_with_custom_max_hand_angle() {
        let scorer = PhaseScorer::new(45.0);
        assert_eq!(scorer.max_deviation(), 4050.0);

        let frame = make_frame(20.0, 20.0);
        let recovered = scorer.inverse_middle(scorer.score_middle(&frame));
        assert!((recovered - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_score_frames_preserves_order() {
        let scorer = PhaseScorer::default();
        let frames = vec![make_frame(0.0, 0.0), make_frame(60.0, 60.0), make_frame(-60.0, -60.0)];
        let scores = scorer.score_frames(&frames);

        assert_eq!(scores.len(), 3);
        assert!(scores[0].middle > scores[1].middle);
        assert!(scores[1].top > scores[2].top);
        assert!(scores[2].bottom > scores[1].bottom);
    }
}
