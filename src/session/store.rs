//! Append-only in-session recording store

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emotion::{Emotion, EmotionVector};
use crate::error::StoreError;

/// Identifier of a recording within one session.
///
/// Ids are dense positions in insertion order, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingId(pub u64);

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a recording's audio lives on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioRef {
    /// The file that was analyzed
    pub source: PathBuf,
    /// Preprocessed waveform, when exported
    pub processed: Option<PathBuf>,
}

impl AudioRef {
    pub fn source_only(source: PathBuf) -> Self {
        Self {
            source,
            processed: None,
        }
    }
}

/// One analyzed clip and its classification outcome.
///
/// Everything except `confidence` is settled at append time. Confidence
/// is a display scalar the user may re-weight; adjusting it never touches
/// the emotion vector.
#[derive(Debug, Clone, Serialize)]
pub struct Recording {
    pub id: RecordingId,
    pub timestamp: DateTime<Utc>,
    pub emotions: EmotionVector,
    pub dominant: Emotion,
    pub confidence: f32,
    pub language: String,
    pub audio: AudioRef,
}

/// Ordered store of the recordings made in one session.
///
/// Strictly append-only: recordings are never removed or reordered, so
/// ids stay valid for the whole session. Not durable and not safe to
/// share across threads without external synchronization.
#[derive(Debug, Default)]
pub struct RecordingStore {
    recordings: Vec<Recording>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classified clip.
    ///
    /// Dominant label and initial confidence are derived from the vector
    /// at this point and never recomputed.
    pub fn append(
        &mut self,
        emotions: EmotionVector,
        language: String,
        audio: AudioRef,
    ) -> RecordingId {
        let id = RecordingId(self.recordings.len() as u64);
        let dominant = emotions.dominant();
        let confidence = emotions.peak();

        debug!(
            "Storing recording {}: {} at {:.1}% confidence",
            id,
            dominant,
            confidence * 100.0
        );

        self.recordings.push(Recording {
            id,
            timestamp: Utc::now(),
            emotions,
            dominant,
            confidence,
            language,
            audio,
        });
        id
    }

    /// Multiply the newest recording's confidence by `factor`.
    ///
    /// Only the tail may be adjusted; older recordings are settled. The
    /// result is clamped at zero but deliberately not capped at one, so
    /// repeated increases can push it past the original peak score.
    pub fn adjust_confidence(&mut self, id: RecordingId, factor: f32) -> Result<f32, StoreError> {
        let tail = self.recordings.last_mut().ok_or(StoreError::NotFound(id))?;
        if tail.id != id {
            return Err(StoreError::NotFound(id));
        }

        tail.confidence = (tail.confidence * factor).max(0.0);
        Ok(tail.confidence)
    }

    /// Restore a recording's confidence to its emotion vector's peak score
    pub fn reset_confidence(&mut self, id: RecordingId) -> Result<f32, StoreError> {
        let recording = self
            .recordings
            .get_mut(id.0 as usize)
            .ok_or(StoreError::NotFound(id))?;

        recording.confidence = recording.emotions.peak();
        Ok(recording.confidence)
    }

    pub fn get(&self, id: RecordingId) -> Option<&Recording> {
        self.recordings.get(id.0 as usize)
    }

    /// All recordings in insertion order
    pub fn all(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn last(&self) -> Option<&Recording> {
        self.recordings.last()
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }
}
