//! Pipeline orchestration
//!
//! This module provides the public API for Trackk Flux.
//! It orchestrates the full pipeline from recorded frames to feedback output.

use crate::aggregator::PhaseAggregator;
use crate::config::ScoringConfig;
use crate::encoder::FeedbackEncoder;
use crate::error::ScoringError;
use crate::recording::{duration_ms, validate_frames, Recording};
use crate::scorer::PhaseScorer;
use crate::types::{Frame, JumpingJackReport, PhaseScores, ScoreSeriesSet};

/// Convert a JSON array of frames into a feedback payload using default settings.
///
/// # Arguments
/// * `frames_json` - JSON array of `{ "skeleton": {...}, "timestamp": ms }` frames
///
/// # Returns
/// Feedback payload JSON
///
/// # Example
/// ```ignore
/// let feedback = frames_to_feedback_json(recording_json)?;
/// ```
pub fn frames_to_feedback_json(frames_json: String) -> Result<String, ScoringError> {
    let processor = JumpingJackProcessor::new();
    processor.process_json(&frames_json)
}

/// Processor holding the scoring configuration across recordings.
///
/// Pipeline stages:
/// 1. PhaseScorer - Score every frame against top/middle/bottom
/// 2. ScoreSeriesSet - Split scores into one series per phase
/// 3. PhaseAggregator - Peaks, threshold gate, mean, feedback angle
/// 4. FeedbackEncoder - Encode the report to JSON
pub struct JumpingJackProcessor {
    config: ScoringConfig,
    encoder: FeedbackEncoder,
    include_series: bool,
}

impl Default for JumpingJackProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpingJackProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self {
            config: ScoringConfig::default(),
            encoder: FeedbackEncoder::new(),
            include_series: false,
        }
    }

    /// Create a processor with a validated configuration
    pub fn with_config(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Keep the raw per-phase series in reports for diagnostics
    pub fn with_series(mut self, include_series: bool) -> Self {
        self.include_series = include_series;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Load configuration from JSON
    pub fn load_config(&mut self, json: &str) -> Result<(), ScoringError> {
        self.config = ScoringConfig::from_json(json)?;
        Ok(())
    }

    /// Save configuration to JSON
    pub fn save_config(&self) -> Result<String, ScoringError> {
        self.config.to_json()
    }

    fn scorer(&self) -> PhaseScorer {
        PhaseScorer::new(self.config.max_hand_angle)
    }

    /// Per-frame score table, in frame order
    pub fn score_frames(&self, frames: &[Frame]) -> Vec<PhaseScores> {
        self.scorer().score_frames(frames)
    }

    /// Per-phase score series of a recording
    pub fn series(&self, frames: &[Frame]) -> ScoreSeriesSet {
        ScoreSeriesSet::from_scores(&self.score_frames(frames))
    }

    /// Score a frame sequence.
    ///
    /// Frames are validated first, so unordered or non-finite input fails
    /// here. A phase without qualifying attempts is reported in its outcome,
    /// not as an error.
    pub fn analyze(&self, frames: &[Frame]) -> Result<JumpingJackReport, ScoringError> {
        validate_frames(frames)?;
        self.analyze_validated(frames)
    }

    /// Score a frozen recording
    pub fn analyze_recording(&self, recording: &Recording) -> Result<JumpingJackReport, ScoringError> {
        self.analyze_validated(recording.frames())
    }

    fn analyze_validated(&self, frames: &[Frame]) -> Result<JumpingJackReport, ScoringError> {
        if frames.is_empty() {
            return Err(ScoringError::EmptySeries);
        }

        let series = self.series(frames);
        let aggregator = PhaseAggregator::new(&self.config);
        let [top, middle, bottom] = aggregator.aggregate_all(&series)?;

        tracing::debug!(frames = frames.len(), "recording scored");

        Ok(JumpingJackReport {
            top,
            middle,
            bottom,
            frame_count: frames.len(),
            duration_ms: duration_ms(frames),
            series: self.include_series.then_some(series),
        })
    }

    /// Encode a report with this processor's encoder and configuration
    pub fn encode(&self, report: &JumpingJackReport) -> Result<String, ScoringError> {
        self.encoder.encode_to_json(report, &self.config)
    }

    /// Parse a JSON array of frames, score it and return payload JSON
    pub fn process_json(&self, frames_json: &str) -> Result<String, ScoringError> {
        let recording = Recording::from_json(frames_json)?;
        let report = self.analyze_recording(&recording)?;
        self.encode(&report)
    }

    /// Parse NDJSON frames, score them and return payload JSON
    pub fn process_ndjson(&self, frames_ndjson: &str) -> Result<String, ScoringError> {
        let recording = Recording::from_ndjson(frames_ndjson)?;
        let report = self.analyze_recording(&recording)?;
        self.encode(&report)
    }
}
