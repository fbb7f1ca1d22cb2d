//! Hugging Face Inference API gateway
//!
//! Posts the preprocessed clip as a WAV payload to a hosted
//! audio-classification model. Transient failures (network errors, model
//! still loading, rate limiting) are retried with exponential backoff;
//! everything else fails the request immediately.

use std::io::Cursor;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::audio::AudioClip;
use crate::config::ClassifierConfig;
use crate::emotion::LabelScore;
use crate::error::ClassifierError;

use super::EmotionClassifier;

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV_VAR: &str = "HUGGING_FACE_API_KEY";

/// Statuses that signal a transient condition worth retrying
const RETRYABLE_STATUSES: &[u16] = &[429, 503];

#[derive(Debug, Deserialize)]
struct RawScore {
    label: String,
    score: f32,
}

enum AttemptError {
    Transient(String),
    Fatal(ClassifierError),
}

/// Client for hosted audio-classification models
pub struct HfClassifier {
    config: ClassifierConfig,
    client: reqwest::blocking::Client,
    token: String,
}

impl HfClassifier {
    /// Build a client, resolving the API token from the configuration or
    /// the `HUGGING_FACE_API_KEY` environment variable.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let token = resolve_token(config.api_token.as_deref(), std::env::var(TOKEN_ENV_VAR).ok())?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Unavailable {
                attempts: 0,
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            config,
            client,
            token,
        })
    }

    /// Model identifier this client posts to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn attempt(&self, url: &str, payload: &[u8]) -> Result<Vec<LabelScore>, AttemptError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(payload.to_vec())
            .send()
            .map_err(|e| AttemptError::Transient(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let scores: Vec<RawScore> = response.json().map_err(|e| {
                AttemptError::Fatal(ClassifierError::InvalidResponse(e.to_string()))
            })?;
            debug!("Classifier returned {} raw labels", scores.len());
            return Ok(scores
                .into_iter()
                .map(|s| LabelScore::new(s.label, s.score))
                .collect());
        }

        let code = status.as_u16();
        let body = response.text().unwrap_or_default();
        if RETRYABLE_STATUSES.contains(&code) {
            Err(AttemptError::Transient(format!("HTTP {}: {}", code, body)))
        } else {
            Err(AttemptError::Fatal(ClassifierError::Rejected {
                status: code,
                reason: body,
            }))
        }
    }
}

impl EmotionClassifier for HfClassifier {
    fn classify(&self, clip: &AudioClip) -> Result<Vec<LabelScore>, ClassifierError> {
        let payload = encode_wav(clip)?;
        let url = self.request_url();
        let attempts = self.config.max_retries + 1;

        let mut last_reason = String::new();
        for attempt in 0..attempts {
            if attempt > 0 {
                let delay =
                    Duration::from_millis(self.config.retry_base_delay_ms << (attempt - 1));
                warn!(
                    "Classification attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, attempts, last_reason, delay
                );
                std::thread::sleep(delay);
            }

            match self.attempt(&url, &payload) {
                Ok(scores) => return Ok(scores),
                Err(AttemptError::Transient(reason)) => last_reason = reason,
                Err(AttemptError::Fatal(err)) => return Err(err),
            }
        }

        Err(ClassifierError::Unavailable {
            attempts,
            reason: last_reason,
        })
    }
}

fn resolve_token(
    configured: Option<&str>,
    from_env: Option<String>,
) -> Result<String, ClassifierError> {
    if let Some(token) = configured {
        if !token.trim().is_empty() {
            return Ok(token.to_string());
        }
    }
    from_env
        .filter(|t| !t.trim().is_empty())
        .ok_or(ClassifierError::MissingToken)
}

/// Serialize a mono clip as a 16-bit PCM WAV payload
fn encode_wav(clip: &AudioClip) -> Result<Vec<u8>, ClassifierError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| ClassifierError::Payload(e.to_string()))?;
        for &sample in &clip.samples {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(scaled)
                .map_err(|e| ClassifierError::Payload(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| ClassifierError::Payload(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
