//! Recording sessions
//!
//! Frames are appended while a session is recording and frozen into an
//! immutable [`Recording`] when it stops. Scoring only ever reads a frozen
//! recording, so peak detection always sees one stable, ordered pass.

use crate::error::ScoringError;
use crate::types::Frame;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Check a frame before it joins a recording
fn validate_frame(index: usize, frame: &Frame, previous: Option<i64>) -> Result<(), ScoringError> {
    if let Some(joint) = frame.skeleton.first_non_finite() {
        return Err(ScoringError::InvalidFrame {
            index,
            reason: format!("joint {} has a non-finite coordinate", joint.as_str()),
        });
    }

    if let Some(previous) = previous {
        if frame.timestamp < previous {
            return Err(ScoringError::OutOfOrderFrame {
                index,
                previous,
                timestamp: frame.timestamp,
            });
        }
    }

    Ok(())
}

/// Validate a whole frame sequence, stopping at the first problem
pub fn validate_frames(frames: &[Frame]) -> Result<(), ScoringError> {
    let mut previous = None;
    for (index, frame) in frames.iter().enumerate() {
        validate_frame(index, frame, previous)?;
        previous = Some(frame.timestamp);
    }
    Ok(())
}

/// Every problem in a frame sequence, with its index
pub fn frame_issues(frames: &[Frame]) -> Vec<ScoringError> {
    let mut previous = None;
    let mut issues = Vec::new();
    for (index, frame) in frames.iter().enumerate() {
        if let Err(e) = validate_frame(index, frame, previous) {
            issues.push(e);
        }
        previous = Some(previous.map_or(frame.timestamp, |p: i64| p.max(frame.timestamp)));
    }
    issues
}

/// Append-only capture buffer
#[derive(Debug, Default)]
pub struct RecordingSession {
    frames: Vec<Frame>,
    recording: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any previous frames and begin recording
    pub fn start(&mut self) {
        self.frames.clear();
        self.recording = true;
        tracing::debug!("recording started");
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Frames captured so far in the current recording
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append a frame. Returns `Ok(false)` and drops the frame when idle.
    pub fn record(&mut self, frame: Frame) -> Result<bool, ScoringError> {
        if !self.recording {
            return Ok(false);
        }

        let previous = self.frames.last().map(|f| f.timestamp);
        validate_frame(self.frames.len(), &frame, previous)?;
        self.frames.push(frame);
        Ok(true)
    }

    /// Stop recording and freeze the captured frames
    pub fn stop(&mut self) -> Recording {
        self.recording = false;
        let frames = std::mem::take(&mut self.frames);
        tracing::debug!(frames = frames.len(), "recording stopped");
        Recording {
            frames: frames.into(),
        }
    }
}

/// Parse newline-delimited JSON, one frame per line, without validation.
///
/// Blank lines are skipped. Parse errors carry the 1-based line number.
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<Frame>, ScoringError> {
    let mut frames = Vec::new();
    for (line_no, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let frame: Frame = serde_json::from_str(trimmed)
            .map_err(|e| ScoringError::ParseError(format!("line {}: {}", line_no + 1, e)))?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Immutable, cheaply clonable snapshot of a finished recording.
///
/// Serializes as a plain JSON array of frames. Deserializing runs the same
/// validation as [`Recording::from_frames`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Recording {
    frames: Arc<[Frame]>,
}

impl<'de> Deserialize<'de> for Recording {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let frames = Vec::<Frame>::deserialize(deserializer)?;
        Recording::from_frames(frames).map_err(serde::de::Error::custom)
    }
}

impl Recording {
    /// Freeze an already ordered frame sequence
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self, ScoringError> {
        validate_frames(&frames)?;
        Ok(Self {
            frames: frames.into(),
        })
    }

    /// Parse a JSON array of frames
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let frames: Vec<Frame> = serde_json::from_str(json)?;
        Self::from_frames(frames)
    }

    /// Parse newline-delimited JSON, one frame per line
    pub fn from_ndjson(ndjson: &str) -> Result<Self, ScoringError> {
        Self::from_frames(parse_ndjson(ndjson)?)
    }

    /// Pretty-printed JSON array of frames
    pub fn to_json(&self) -> Result<String, ScoringError> {
        serde_json::to_string_pretty(self.frames())
            .map_err(|e| ScoringError::EncodingError(e.to_string()))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Last timestamp minus first, 0 for fewer than two frames
    pub fn duration_ms(&self) -> i64 {
        duration_ms(&self.frames)
    }
}

/// Span between the first and last frame, saturating at `i64::MAX`
pub fn duration_ms(frames: &[Frame]) -> i64 {
    match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => last.timestamp.saturating_sub(first.timestamp),
        _ => 0,
    }
}
