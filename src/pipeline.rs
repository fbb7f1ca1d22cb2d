//! End-to-end analysis pipeline: decode, preprocess, classify, store
//!
//! One `analyze_file` call is strictly sequential: the classifier request
//! is the only blocking external call, and the store is only touched
//! after a successfully reconciled vector exists. Nothing partial is ever
//! appended.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::audio::{self, AudioClip, WaveformPreprocessor};
use crate::classifier::EmotionClassifier;
use crate::config::Config;
use crate::emotion::reconcile;
use crate::error::{AudioError, Result};
use crate::session::{AudioRef, RecordingId, Session};

/// Drives a clip from file on disk to a stored recording
pub struct EmotionAnalyzer<C> {
    preprocessor: WaveformPreprocessor,
    classifier: C,
    save_processed: bool,
}

impl<C: EmotionClassifier> EmotionAnalyzer<C> {
    pub fn new(config: &Config, classifier: C) -> Self {
        Self {
            preprocessor: WaveformPreprocessor::new(config.preprocessing.clone()),
            classifier,
            save_processed: config.session.save_processed,
        }
    }

    /// Analyze one audio file and append the result to the session.
    ///
    /// Decode failures and classifier failures are terminal for this file
    /// and leave the store untouched. A preprocessing failure is absorbed:
    /// the raw decoded clip is classified instead.
    pub fn analyze_file(&self, path: &Path, session: &mut Session) -> Result<RecordingId> {
        info!("Analyzing {}", path.display());

        let raw = audio::decode_file(path)?;
        debug!(
            "Decoded {:.2}s at {} Hz",
            raw.duration_secs(),
            raw.sample_rate
        );

        let clip = match self.preprocessor.process(&raw) {
            Ok(clip) => clip,
            Err(e) => {
                warn!("Preprocessing failed ({}), classifying raw audio", e);
                raw
            }
        };

        let scores = self.classifier.classify(&clip)?;
        let emotions = reconcile(&scores);
        let dominant = emotions.dominant();
        let confidence = emotions.peak();

        let mut audio_ref = AudioRef::source_only(path.to_path_buf());
        if self.save_processed {
            match export_processed(path, &clip) {
                Ok(out) => {
                    info!("Saved processed audio to {}", out.display());
                    audio_ref.processed = Some(out);
                }
                Err(e) => warn!("Could not save processed audio: {}", e),
            }
        }

        let language = session.language().to_string();
        let id = session.store_mut().append(emotions, language, audio_ref);

        info!(
            "Recording {}: {} at {:.1}% confidence",
            id,
            dominant,
            confidence * 100.0
        );
        Ok(id)
    }
}

/// Write the preprocessed waveform next to the source file
fn export_processed(source: &Path, clip: &AudioClip) -> std::result::Result<PathBuf, AudioError> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clip");
    let out = source.with_file_name(format!("{}.processed.wav", stem));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(&out, spec).map_err(|e| AudioError::WavWrite(e.to_string()))?;
    for &sample in &clip.samples {
        let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| AudioError::WavWrite(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioError::WavWrite(e.to_string()))?;

    Ok(out)
}
