//! Aggregate views over a recording store
//!
//! Read-side only; nothing here mutates the store. Every function
//! recomputes from the live recordings, so results always reflect the
//! store as it stands at call time.

use serde::Serialize;

use crate::emotion::Emotion;
use crate::error::StoreError;
use crate::session::store::RecordingStore;

/// Count of recordings per dominant label, in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionCounts([usize; Emotion::COUNT]);

impl EmotionCounts {
    pub fn get(&self, emotion: Emotion) -> usize {
        self.0[emotion.index()]
    }

    /// Iterate label/count pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, usize)> + '_ {
        Emotion::ALL.into_iter().map(move |e| (e, self.0[e.index()]))
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Headline numbers for a whole session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub total_recordings: usize,
    pub mean_confidence: f32,
    pub mode_emotion: Emotion,
}

/// Distribution of dominant emotions across all recordings
pub fn distribution(store: &RecordingStore) -> EmotionCounts {
    let mut counts = [0usize; Emotion::COUNT];
    for recording in store.all() {
        counts[recording.dominant.index()] += 1;
    }
    EmotionCounts(counts)
}

/// Mean of the stored confidence values
pub fn mean_confidence(store: &RecordingStore) -> Result<f32, StoreError> {
    if store.is_empty() {
        return Err(StoreError::Empty);
    }
    let sum: f32 = store.all().iter().map(|r| r.confidence).sum();
    Ok(sum / store.len() as f32)
}

/// Most frequent dominant emotion, ties broken by canonical order
pub fn mode_emotion(store: &RecordingStore) -> Result<Emotion, StoreError> {
    if store.is_empty() {
        return Err(StoreError::Empty);
    }

    let counts = distribution(store);
    let mut best = Emotion::Anger;
    for emotion in Emotion::ALL {
        if counts.get(emotion) > counts.get(best) {
            best = emotion;
        }
    }
    Ok(best)
}

/// Confidence of each recording in insertion order.
///
/// Lazy over the borrowed store; call again for a fresh view after
/// mutations.
pub fn confidence_trend(store: &RecordingStore) -> impl Iterator<Item = (u64, f32)> + '_ {
    store.all().iter().map(|r| (r.id.0, r.confidence))
}

/// Summarize the session, or None when nothing has been recorded yet
pub fn summarize(store: &RecordingStore) -> Option<SessionSummary> {
    let mean_confidence = mean_confidence(store).ok()?;
    let mode_emotion = mode_emotion(store).ok()?;
    Some(SessionSummary {
        total_recordings: store.len(),
        mean_confidence,
        mode_emotion,
    })
}
