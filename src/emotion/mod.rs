//! Emotion taxonomy, score vectors, and label reconciliation

pub mod reconcile;
pub mod taxonomy;

pub use reconcile::{canonicalize, reconcile, LabelScore};
pub use taxonomy::{Emotion, EmotionVector};
