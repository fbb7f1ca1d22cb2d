//! Append-only feedback ledger
//!
//! One JSON object per line on stable storage. Aggregates are recomputed
//! by replaying the full log on every query, so the file stays the single
//! source of truth across sessions.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::emotion::Emotion;
use crate::error::LedgerError;
use crate::session::RecordingId;

/// One user verdict on a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub recording_id: RecordingId,
    pub predicted_emotion: Emotion,
    pub corrected_emotion: Emotion,
    pub is_correct: bool,
    #[serde(default)]
    pub free_text: String,
    pub helpfulness_rating: u8,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackEntry {
    /// Build an entry stamped with the current time.
    ///
    /// `is_correct` is derived from the two labels and the rating is
    /// clamped into 1..=5. Both fields stay public for callers that need
    /// different semantics.
    pub fn new(
        recording_id: RecordingId,
        predicted_emotion: Emotion,
        corrected_emotion: Emotion,
        free_text: String,
        helpfulness_rating: u8,
    ) -> Self {
        Self {
            recording_id,
            predicted_emotion,
            corrected_emotion,
            is_correct: predicted_emotion == corrected_emotion,
            free_text,
            helpfulness_rating: helpfulness_rating.clamp(1, 5),
            timestamp: Utc::now(),
        }
    }
}

/// Aggregates over the whole ledger
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackStats {
    pub count: usize,
    pub accuracy: f32,
    pub mean_helpfulness: f32,
}

/// Durable append-only log of feedback entries
pub struct FeedbackLedger {
    path: PathBuf,
}

impl FeedbackLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to disk.
    ///
    /// A write failure surfaces as `PersistenceError`; the entry is never
    /// dropped silently.
    pub fn record(&self, entry: &FeedbackEntry) -> Result<(), LedgerError> {
        let line = serde_json::to_string(entry).map_err(|e| {
            LedgerError::Persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(LedgerError::Persistence)?;

        writeln!(file, "{}", line).map_err(LedgerError::Persistence)?;
        file.flush().map_err(LedgerError::Persistence)?;

        debug!(
            "Recorded feedback for recording {} in {}",
            entry.recording_id,
            self.path.display()
        );
        Ok(())
    }

    /// Load all entries in append order.
    ///
    /// A missing file is an empty ledger. A corrupt line is skipped with
    /// a warning; the rest of the log still loads.
    pub fn load(&self) -> Result<Vec<FeedbackEntry>, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LedgerError::Persistence(e)),
        };

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(LedgerError::Persistence)?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping corrupt feedback entry at line {}: {}", idx + 1, e),
            }
        }
        Ok(entries)
    }

    /// Fraction of entries marked correct
    pub fn accuracy(&self) -> Result<f32, LedgerError> {
        let entries = self.load()?;
        if entries.is_empty() {
            return Err(LedgerError::Empty);
        }
        let correct = entries.iter().filter(|e| e.is_correct).count();
        Ok(correct as f32 / entries.len() as f32)
    }

    /// Mean helpfulness rating across all entries
    pub fn mean_helpfulness(&self) -> Result<f32, LedgerError> {
        let entries = self.load()?;
        if entries.is_empty() {
            return Err(LedgerError::Empty);
        }
        let sum: u32 = entries.iter().map(|e| u32::from(e.helpfulness_rating)).sum();
        Ok(sum as f32 / entries.len() as f32)
    }

    /// Number of entries on disk; zero when the file does not exist
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.load()?.len())
    }

    /// All aggregates from one replay of the log
    pub fn stats(&self) -> Result<FeedbackStats, LedgerError> {
        let entries = self.load()?;
        if entries.is_empty() {
            return Err(LedgerError::Empty);
        }

        let correct = entries.iter().filter(|e| e.is_correct).count();
        let rating_sum: u32 = entries.iter().map(|e| u32::from(e.helpfulness_rating)).sum();
        Ok(FeedbackStats {
            count: entries.len(),
            accuracy: correct as f32 / entries.len() as f32,
            mean_helpfulness: rating_sum as f32 / entries.len() as f32,
        })
    }
}
