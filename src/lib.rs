//! Speech Emotion Recognition System
//!
//! A Rust-based system for analyzing the emotional content of speech
//! recordings: decode an audio file, normalize the waveform, classify it
//! with a hosted model, and fold the raw scores onto a fixed seven-label
//! taxonomy. Recordings accumulate in an in-memory session store with
//! analytics over them, and user feedback lands in a durable append-only
//! ledger.
//!
//! # Architecture
//!
//! The system is organized into the following modules:
//!
//! - `audio`: Audio file decoding and waveform preprocessing
//! - `emotion`: Canonical taxonomy, score vectors, and label reconciliation
//! - `classifier`: Classifier backends (Hugging Face Inference API)
//! - `session`: In-session recording store and analytics
//! - `feedback`: Append-only feedback ledger
//! - `pipeline`: End-to-end analysis orchestration
//! - `report`: Result rendering for the terminal
//! - `config`: Configuration structures
//! - `error`: Error types
//!
//! # Example
//!
//! ```no_run
//! use ser_rs::{Config, EmotionAnalyzer, HfClassifier, Session};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let classifier = HfClassifier::new(config.classifier.clone()).unwrap();
//! let analyzer = EmotionAnalyzer::new(&config, classifier);
//!
//! let mut session = Session::new(&config.session.language);
//! let id = analyzer.analyze_file(Path::new("clip.wav"), &mut session).unwrap();
//! let recording = session.store().get(id).unwrap();
//! println!("{}: {:.1}%", recording.dominant, recording.confidence * 100.0);
//! ```

pub mod audio;
pub mod classifier;
pub mod config;
pub mod emotion;
pub mod error;
pub mod feedback;
pub mod pipeline;
pub mod report;
pub mod session;

// Re-exports for convenience
pub use audio::{AudioClip, WaveformPreprocessor};
pub use classifier::{EmotionClassifier, HfClassifier};
pub use config::{ClassifierConfig, Config, FeedbackConfig, PreprocessingConfig, SessionConfig};
pub use emotion::{reconcile, Emotion, EmotionVector, LabelScore};
pub use error::{
    AudioError, ClassifierError, ConfigError, LedgerError, Result, SerError, StoreError,
};
pub use feedback::{FeedbackEntry, FeedbackLedger, FeedbackStats};
pub use pipeline::EmotionAnalyzer;
pub use session::{Recording, RecordingId, RecordingStore, Session};
