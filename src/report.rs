//! Rendering of recordings and session aggregates for the terminal

use std::collections::BTreeMap;

use serde::Serialize;

use crate::emotion::Emotion;
use crate::feedback::FeedbackStats;
use crate::session::{EmotionCounts, Recording, SessionSummary};

/// How results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// JSON view of a session summary
#[derive(Debug, Serialize)]
struct JsonSummary {
    total_recordings: usize,
    mean_confidence: f32,
    mode_emotion: Emotion,
    distribution: BTreeMap<Emotion, usize>,
}

/// Format one recording as a readable block
pub fn format_recording_text(recording: &Recording) -> String {
    let file = recording
        .audio
        .source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>");

    let mut out = format!(
        "[{}] {}: {} ({:.1}% confidence)\n",
        recording.id,
        file,
        recording.dominant,
        recording.confidence * 100.0
    );
    for (emotion, score) in recording.emotions.iter() {
        out.push_str(&format!("  {:<10} {:>5.1}%\n", emotion, score * 100.0));
    }
    out
}

/// Format one recording as JSON
pub fn format_recording_json(recording: &Recording) -> String {
    serde_json::to_string(recording).unwrap_or_else(|_| String::from("{}"))
}

/// Format the session summary as a readable block
pub fn format_summary_text(summary: &SessionSummary, counts: &EmotionCounts) -> String {
    let mut out = format!(
        "Session: {} recordings\n  Mean confidence: {:.1}%\n  Most common emotion: {}\n",
        summary.total_recordings,
        summary.mean_confidence * 100.0,
        summary.mode_emotion
    );
    out.push_str("  Distribution:\n");
    for (emotion, count) in counts.iter() {
        if count > 0 {
            out.push_str(&format!("    {:<10} {}\n", emotion, count));
        }
    }
    out
}

/// Format the session summary as JSON, including the full distribution
pub fn format_summary_json(summary: &SessionSummary, counts: &EmotionCounts) -> String {
    let output = JsonSummary {
        total_recordings: summary.total_recordings,
        mean_confidence: summary.mean_confidence,
        mode_emotion: summary.mode_emotion,
        distribution: counts.iter().collect(),
    };
    serde_json::to_string(&output).unwrap_or_else(|_| String::from("{}"))
}

/// Format feedback ledger aggregates as a readable block
pub fn format_feedback_text(stats: &FeedbackStats) -> String {
    format!(
        "Feedback: {} entries\n  Accuracy: {:.1}%\n  Mean helpfulness: {:.1}/5\n",
        stats.count,
        stats.accuracy * 100.0,
        stats.mean_helpfulness
    )
}

/// Format feedback ledger aggregates as JSON
pub fn format_feedback_json(stats: &FeedbackStats) -> String {
    serde_json::to_string(stats).unwrap_or_else(|_| String::from("{}"))
}
