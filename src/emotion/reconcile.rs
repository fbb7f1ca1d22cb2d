//! Reconciliation of raw classifier labels onto the canonical taxonomy
//!
//! Classifier checkpoints disagree about vocabulary ("happy" vs "joy",
//! "fearful" vs "fear"). Reconciliation folds whatever the model emitted
//! into the seven canonical slots and renormalizes, so everything
//! downstream sees one fixed distribution shape.

use tracing::debug;

use crate::emotion::{Emotion, EmotionVector};

/// A single label/score pair as returned by a classifier backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Synonym table mapping classifier vocabulary onto canonical labels.
///
/// Lookup is case-insensitive substring containment; the first matching
/// entry wins, so variants of one label must stay adjacent.
const SYNONYMS: &[(&str, Emotion)] = &[
    ("anger", Emotion::Anger),
    ("angry", Emotion::Anger),
    ("disgust", Emotion::Disgust),
    ("fear", Emotion::Fear),
    ("happy", Emotion::Happiness),
    ("joy", Emotion::Happiness),
    ("neutral", Emotion::Neutral),
    ("sad", Emotion::Sadness),
    ("surprise", Emotion::Surprise),
];

/// Map a raw classifier label onto the canonical taxonomy, or None if no
/// synonym matches.
pub fn canonicalize(label: &str) -> Option<Emotion> {
    let lowered = label.to_lowercase();
    SYNONYMS
        .iter()
        .find(|(key, _)| lowered.contains(key))
        .map(|(_, emotion)| *emotion)
}

/// Fold raw label/score pairs into a normalized canonical vector.
///
/// Unrecognized labels are dropped, scores landing in the same slot are
/// summed, and the result is renormalized to sum to 1.0. When nothing
/// matches (or every score is zero) the uniform distribution is returned
/// rather than a degenerate all-zero vector.
pub fn reconcile(pairs: &[LabelScore]) -> EmotionVector {
    let mut slots = [0.0f32; Emotion::COUNT];
    for pair in pairs {
        if let Some(emotion) = canonicalize(&pair.label) {
            slots[emotion.index()] += pair.score.max(0.0);
        } else {
            debug!("Dropping unrecognized classifier label: {:?}", pair.label);
        }
    }

    let total: f32 = slots.iter().sum();
    if total > 0.0 {
        for slot in slots.iter_mut() {
            *slot /= total;
        }
        EmotionVector::from_scores(slots)
    } else {
        EmotionVector::uniform()
    }
}
