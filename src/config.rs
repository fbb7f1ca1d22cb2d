//! Configuration structures for the SER-RS system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preprocessing: PreprocessingConfig,
    pub classifier: ClassifierConfig,
    pub session: SessionConfig,
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, crate::error::ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            crate::error::ConfigError::FileNotFound(path.display().to_string())
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::ConfigError::Parse(e.to_string()))
    }
}

/// Waveform preprocessing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Sample rate the classifier expects (Hz)
    pub target_sample_rate: u32,
    /// Enable resampling to the target sample rate
    pub enable_resampling: bool,
    /// Enable leading/trailing silence trimming
    pub enable_trim: bool,
    /// Frames this far (dB) below the peak frame energy count as silence
    pub trim_threshold_db: f32,
    /// Analysis frame length in samples for trimming
    pub trim_frame_len: usize,
    /// Hop between analysis frames in samples
    pub trim_hop_len: usize,
    /// Enable peak amplitude normalization
    pub enable_normalization: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000,
            enable_resampling: true,
            enable_trim: true,
            trim_threshold_db: 40.0,
            trim_frame_len: 2048,
            trim_hop_len: 512,
            enable_normalization: true,
        }
    }
}

/// Emotion classifier gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Inference API base URL (the model id is appended)
    pub endpoint: String,
    /// Model identifier on the inference service
    pub model: String,
    /// API token (None = read HUGGING_FACE_API_KEY from the environment)
    pub api_token: Option<String>,
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,
    /// Retry attempts after the first failure on transient errors
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries (ms)
    pub retry_base_delay_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "jihedjabnoun/wavlm-base-emotion".to_string(),
            api_token: None,
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Language tag attached to new recordings (e.g. "en", "de")
    pub language: String,
    /// Write the preprocessed waveform next to the source file
    pub save_processed: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            save_processed: false,
        }
    }
}

/// Feedback ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Path of the append-only feedback log
    pub log_path: PathBuf,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("feedback.jsonl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.preprocessing.target_sample_rate, 16000);
        assert_eq!(config.preprocessing.trim_threshold_db, 40.0);
        assert_eq!(config.classifier.model, "jihedjabnoun/wavlm-base-emotion");
        assert_eq!(config.classifier.max_retries, 3);
        assert_eq!(config.session.language, "en");
        assert_eq!(config.feedback.log_path, PathBuf::from("feedback.jsonl"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [preprocessing]
            target_sample_rate = 8000
            enable_trim = false

            [classifier]
            model = "some/other-emotion-model"
            timeout_secs = 5

            [session]
            language = "de"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.preprocessing.target_sample_rate, 8000);
        assert!(!config.preprocessing.enable_trim);
        assert_eq!(config.classifier.model, "some/other-emotion-model");
        assert_eq!(config.classifier.timeout_secs, 5);
        assert_eq!(config.session.language, "de");
        // Untouched sections keep their defaults
        assert!(config.preprocessing.enable_normalization);
        assert_eq!(config.classifier.max_retries, 3);
    }
}
