//! Emotion classifier backends
//!
//! A classifier scores a clip against its own label vocabulary. The raw
//! pairs it returns are folded onto the canonical taxonomy downstream,
//! so backends are free to disagree about label spelling and count.

pub mod hf;

pub use hf::HfClassifier;

use crate::audio::AudioClip;
use crate::emotion::LabelScore;
use crate::error::ClassifierError;

/// A backend that classifies the emotion of a spoken clip
pub trait EmotionClassifier {
    /// Score the clip, returning raw label/score pairs in the backend's
    /// own vocabulary
    fn classify(&self, clip: &AudioClip) -> Result<Vec<LabelScore>, ClassifierError>;
}
