//! Canonical emotion taxonomy and score vectors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven canonical emotion labels.
///
/// Declaration order is the canonical order, used to break ties wherever a
/// maximum over labels is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Happiness,
    Neutral,
    Sadness,
    Surprise,
}

impl Emotion {
    /// Number of canonical labels
    pub const COUNT: usize = 7;

    /// All canonical labels in canonical order
    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happiness,
        Emotion::Neutral,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    /// Position in the canonical order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable canonical label
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Anger => "Anger",
            Emotion::Disgust => "Disgust",
            Emotion::Fear => "Fear",
            Emotion::Happiness => "Happiness",
            Emotion::Neutral => "Neutral",
            Emotion::Sadness => "Sadness",
            Emotion::Surprise => "Surprise",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown emotion label: {s:?}"))
    }
}

/// Scores over the canonical taxonomy, one slot per label in canonical order.
///
/// A vector produced by reconciliation sums to 1.0 within floating tolerance;
/// the zero vector exists only as a transient pre-classification state.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionVector([f32; Emotion::COUNT]);

impl EmotionVector {
    /// Build a vector from per-label scores in canonical order
    pub fn from_scores(scores: [f32; Emotion::COUNT]) -> Self {
        Self(scores)
    }

    /// The transient all-zero vector
    pub fn zero() -> Self {
        Self([0.0; Emotion::COUNT])
    }

    /// The uniform distribution over all seven labels
    pub fn uniform() -> Self {
        Self([1.0 / Emotion::COUNT as f32; Emotion::COUNT])
    }

    /// Score for a single label
    pub fn get(&self, emotion: Emotion) -> f32 {
        self.0[emotion.index()]
    }

    /// Iterate label/score pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.into_iter().map(move |e| (e, self.0[e.index()]))
    }

    /// Sum of all scores
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Highest score in the vector
    pub fn peak(&self) -> f32 {
        self.0.iter().fold(0.0f32, |a, &b| a.max(b))
    }

    /// Label with the highest score, ties broken by canonical order
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::Anger;
        for emotion in Emotion::ALL {
            if self.0[emotion.index()] > self.0[best.index()] {
                best = emotion;
            }
        }
        best
    }

    /// True for the transient pre-classification state
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&s| s == 0.0)
    }
}

impl Default for EmotionVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl Serialize for EmotionVector {
    /// Serializes as a map of lowercase canonical label to score
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Emotion::COUNT))?;
        for (emotion, score) in self.iter() {
            map.serialize_entry(&emotion, &score)?;
        }
        map.end()
    }
}
