//! Custom error types for the SER-RS system

use thiserror::Error;

use crate::session::RecordingId;

/// Main error type for the SER-RS system
#[derive(Error, Debug)]
pub enum SerError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Feedback ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio decoding and preprocessing errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No audio track in {0}")]
    NoAudioTrack(String),

    #[error("Resampling error: {0}")]
    Resample(String),

    #[error("Failed to write WAV: {0}")]
    WavWrite(String),
}

/// Classifier gateway errors
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("No API token configured (set HUGGING_FACE_API_KEY or [classifier] api_token)")]
    MissingToken,

    #[error("Failed to encode request payload: {0}")]
    Payload(String),

    #[error("Classifier rejected the request (HTTP {status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Failed to parse classifier response: {0}")]
    InvalidResponse(String),

    #[error("Classification unavailable after {attempts} attempts: {reason}")]
    Unavailable { attempts: u32, reason: String },
}

/// Recording store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recording {0} not found (or not the most recent recording)")]
    NotFound(RecordingId),

    #[error("No recordings in the store")]
    Empty,
}

/// Feedback ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to persist feedback entry: {0}")]
    Persistence(#[source] std::io::Error),

    #[error("No feedback entries in the ledger")]
    Empty,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, SerError>;
