//! Integration tests for ser-rs

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ser_rs::session::analytics;
use ser_rs::{
    AudioClip, ClassifierError, Config, Emotion, EmotionAnalyzer, EmotionClassifier,
    FeedbackEntry, FeedbackLedger, LabelScore, PreprocessingConfig, RecordingId, Session,
    WaveformPreprocessor,
};

/// Generate synthetic audio that simulates speech
fn generate_speech(sample_rate: u32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            // Mix of frequencies to simulate speech formants
            let f1 = 300.0; // First formant
            let f2 = 1000.0; // Second formant
            let f3 = 2500.0; // Third formant

            amplitude * (
                0.5 * (2.0 * std::f32::consts::PI * f1 * t).sin()
                + 0.3 * (2.0 * std::f32::consts::PI * f2 * t).sin()
                + 0.2 * (2.0 * std::f32::consts::PI * f3 * t).sin()
            )
        })
        .collect()
}

/// Generate silence with minimal noise
fn generate_silence(sample_rate: u32, duration_secs: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    vec![0.0001; num_samples]
}

/// Write samples as a 16-bit mono WAV file
fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// Classifier that replays a fixed script of responses, one per call
struct ScriptedClassifier {
    responses: RefCell<VecDeque<Vec<LabelScore>>>,
}

impl ScriptedClassifier {
    fn new(responses: Vec<Vec<LabelScore>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
        }
    }

    fn single(response: Vec<LabelScore>) -> Self {
        Self::new(vec![response])
    }
}

impl EmotionClassifier for ScriptedClassifier {
    fn classify(&self, _clip: &AudioClip) -> Result<Vec<LabelScore>, ClassifierError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ClassifierError::InvalidResponse("script exhausted".to_string()))
    }
}

fn speech_wav(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut samples = generate_silence(16000, 0.2);
    samples.extend(generate_speech(16000, 0.5, 0.4));
    samples.extend(generate_silence(16000, 0.2));
    write_wav(&path, &samples, 16000);
    path
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.preprocessing.target_sample_rate, 16000);
    assert!(config.preprocessing.enable_trim);
    assert!(config.preprocessing.enable_normalization);
    assert_eq!(config.classifier.model, "jihedjabnoun/wavlm-base-emotion");
    assert_eq!(config.classifier.max_retries, 3);
    assert_eq!(config.session.language, "en");
    assert!(!config.session.save_processed);
    assert_eq!(config.feedback.log_path, PathBuf::from("feedback.jsonl"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
        [preprocessing]
        target_sample_rate = 8000
        enable_normalization = false

        [classifier]
        model = "superb/wav2vec2-base-superb-er"
        timeout_secs = 5

        [session]
        language = "de"
        save_processed = true

        [feedback]
        log_path = "custom.jsonl"
    "#;

    let config: Config = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.preprocessing.target_sample_rate, 8000);
    assert!(!config.preprocessing.enable_normalization);
    assert!(config.preprocessing.enable_trim);
    assert_eq!(config.classifier.model, "superb/wav2vec2-base-superb-er");
    assert_eq!(config.classifier.timeout_secs, 5);
    assert_eq!(config.session.language, "de");
    assert!(config.session.save_processed);
    assert_eq!(config.feedback.log_path, PathBuf::from("custom.jsonl"));
}

#[test]
fn test_analyze_file_end_to_end() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = speech_wav(dir.path(), "clip.wav");

    let classifier = ScriptedClassifier::single(vec![
        LabelScore::new("happy", 0.7),
        LabelScore::new("sad", 0.2),
        LabelScore::new("angry", 0.1),
    ]);

    let config = Config::default();
    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new("en");

    let id = analyzer
        .analyze_file(&path, &mut session)
        .expect("Analysis failed");
    assert_eq!(id, RecordingId(0));

    let recording = session.store().get(id).expect("Recording missing");
    assert_eq!(recording.dominant, Emotion::Happiness);
    assert!((recording.confidence - 0.7).abs() < 1e-4);
    assert!((recording.emotions.sum() - 1.0).abs() < 1e-5);
    assert_eq!(recording.language, "en");
    assert_eq!(recording.audio.source, path);
    assert!(recording.audio.processed.is_none());
}

#[test]
fn test_multi_file_session_analytics() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let files: Vec<PathBuf> = (0..3)
        .map(|i| speech_wav(dir.path(), &format!("clip{}.wav", i)))
        .collect();

    let classifier = ScriptedClassifier::new(vec![
        vec![LabelScore::new("happy", 0.8), LabelScore::new("neutral", 0.2)],
        vec![LabelScore::new("happy", 0.6), LabelScore::new("sad", 0.4)],
        vec![LabelScore::new("sad", 0.9), LabelScore::new("fear", 0.1)],
    ]);

    let config = Config::default();
    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new("en");

    for file in &files {
        analyzer
            .analyze_file(file, &mut session)
            .expect("Analysis failed");
    }

    let counts = analytics::distribution(session.store());
    assert_eq!(counts.get(Emotion::Happiness), 2);
    assert_eq!(counts.get(Emotion::Sadness), 1);
    assert_eq!(counts.total(), 3);

    let mean = analytics::mean_confidence(session.store()).expect("No recordings");
    let expected = (0.8 + 0.6 + 0.9) / 3.0;
    assert!((mean - expected).abs() < 1e-4, "mean {} != {}", mean, expected);

    let mode = analytics::mode_emotion(session.store()).expect("No recordings");
    assert_eq!(mode, Emotion::Happiness);

    let trend: Vec<(u64, f32)> = analytics::confidence_trend(session.store()).collect();
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[0].0, 0);
    assert_eq!(trend[2].0, 2);

    let summary = session.summary().expect("Summary missing");
    assert_eq!(summary.total_recordings, 3);
    assert_eq!(summary.mode_emotion, Emotion::Happiness);
}

#[test]
fn test_confidence_adjustment_after_analysis() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = speech_wav(dir.path(), "clip.wav");

    let classifier = ScriptedClassifier::single(vec![
        LabelScore::new("neutral", 0.6),
        LabelScore::new("happy", 0.4),
    ]);

    let config = Config::default();
    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new("en");

    let id = analyzer
        .analyze_file(&path, &mut session)
        .expect("Analysis failed");

    let boosted = session
        .store_mut()
        .adjust_confidence(id, 1.1)
        .expect("Adjust failed");
    assert!((boosted - 0.66).abs() < 1e-4);

    let reset = session
        .store_mut()
        .reset_confidence(id)
        .expect("Reset failed");
    assert!((reset - 0.6).abs() < 1e-4);
}

#[test]
fn test_save_processed_writes_sibling_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = speech_wav(dir.path(), "clip.wav");

    let classifier = ScriptedClassifier::single(vec![LabelScore::new("neutral", 1.0)]);

    let mut config = Config::default();
    config.session.save_processed = true;
    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new("en");

    let id = analyzer
        .analyze_file(&path, &mut session)
        .expect("Analysis failed");

    let recording = session.store().get(id).expect("Recording missing");
    let processed = recording
        .audio
        .processed
        .as_ref()
        .expect("Processed path missing");
    assert_eq!(processed, &dir.path().join("clip.processed.wav"));
    assert!(processed.exists(), "Processed WAV should be on disk");
}

#[test]
fn test_preprocessor_trims_and_normalizes() {
    let config = PreprocessingConfig::default();
    let preprocessor = WaveformPreprocessor::new(config);

    let mut samples = generate_silence(16000, 0.5);
    samples.extend(generate_speech(16000, 0.5, 0.3));
    samples.extend(generate_silence(16000, 0.5));
    let input_len = samples.len();

    let clip = AudioClip::new(samples, 16000);
    let processed = preprocessor.process(&clip).expect("Preprocessing failed");

    assert!(
        processed.samples.len() < input_len,
        "Silence should be trimmed: {} -> {}",
        input_len,
        processed.samples.len()
    );
    assert!(
        processed.peak() > 0.99,
        "Peak should be normalized, got {}",
        processed.peak()
    );
    assert_eq!(processed.sample_rate, 16000);
}

#[test]
fn test_synonym_and_unknown_labels_reconciled() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = speech_wav(dir.path(), "clip.wav");

    // "joy" maps to happiness, "LABEL_9" matches nothing
    let classifier = ScriptedClassifier::single(vec![
        LabelScore::new("Joy", 0.6),
        LabelScore::new("LABEL_9", 0.6),
        LabelScore::new("Fearful", 0.2),
    ]);

    let config = Config::default();
    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new("en");

    let id = analyzer
        .analyze_file(&path, &mut session)
        .expect("Analysis failed");

    let recording = session.store().get(id).expect("Recording missing");
    assert_eq!(recording.dominant, Emotion::Happiness);
    assert!((recording.confidence - 0.75).abs() < 1e-4);
    assert!((recording.emotions.get(Emotion::Fear) - 0.25).abs() < 1e-4);
    assert!((recording.emotions.sum() - 1.0).abs() < 1e-5);
}

#[test]
fn test_analyze_missing_file_fails() {
    let classifier = ScriptedClassifier::single(vec![LabelScore::new("neutral", 1.0)]);
    let config = Config::default();
    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new("en");

    let result = analyzer.analyze_file(Path::new("/nonexistent/clip.wav"), &mut session);
    assert!(result.is_err());
    assert!(session.store().is_empty());
}

#[test]
fn test_feedback_ledger_roundtrip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let ledger = FeedbackLedger::new(dir.path().join("feedback.jsonl"));

    let entries = [
        FeedbackEntry::new(
            RecordingId(0),
            Emotion::Happiness,
            Emotion::Happiness,
            String::new(),
            5,
        ),
        FeedbackEntry::new(
            RecordingId(1),
            Emotion::Sadness,
            Emotion::Anger,
            "too dark".to_string(),
            2,
        ),
        FeedbackEntry::new(
            RecordingId(2),
            Emotion::Neutral,
            Emotion::Neutral,
            String::new(),
            4,
        ),
    ];
    for entry in &entries {
        ledger.record(entry).expect("Record failed");
    }

    let loaded = ledger.load().expect("Load failed");
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[1].free_text, "too dark");
    assert!(!loaded[1].is_correct);

    let stats = ledger.stats().expect("Stats failed");
    assert_eq!(stats.count, 3);
    assert!((stats.accuracy - 2.0 / 3.0).abs() < 1e-4);
    assert!((stats.mean_helpfulness - 11.0 / 3.0).abs() < 1e-4);
}

#[test]
fn test_feedback_ledger_skips_corrupt_lines() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("feedback.jsonl");
    let ledger = FeedbackLedger::new(path.clone());

    let entry = FeedbackEntry::new(
        RecordingId(0),
        Emotion::Fear,
        Emotion::Surprise,
        String::new(),
        3,
    );
    ledger.record(&entry).expect("Record failed");

    let mut file = OpenOptions::new()
        .append(true)
        .open(&path)
        .expect("Failed to open log");
    writeln!(file, "{{not json").expect("Failed to append garbage");

    ledger.record(&entry).expect("Record failed");

    let loaded = ledger.load().expect("Load failed");
    assert_eq!(loaded.len(), 2, "Corrupt line should be skipped");
}
