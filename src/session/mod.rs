//! Session state: the recording store plus session-wide settings

pub mod analytics;
pub mod store;

pub use analytics::{EmotionCounts, SessionSummary};
pub use store::{AudioRef, Recording, RecordingId, RecordingStore};

/// Languages selectable for a session, as (name, tag) pairs
pub const KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Japanese", "ja"),
    ("Chinese", "zh"),
    ("Korean", "ko"),
    ("Russian", "ru"),
    ("Arabic", "ar"),
    ("Hindi", "hi"),
];

/// Look up the display name for a language tag
pub fn language_name(tag: &str) -> Option<&'static str> {
    KNOWN_LANGUAGES
        .iter()
        .find(|(_, t)| *t == tag)
        .map(|(name, _)| *name)
}

/// One analysis session: its recordings and the selected language.
///
/// Lives for the duration of a run and is never persisted; only the
/// feedback ledger outlasts it.
#[derive(Debug, Default)]
pub struct Session {
    store: RecordingStore,
    language: String,
}

impl Session {
    /// Start an empty session tagged with a language
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            store: RecordingStore::new(),
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switch the language tag for recordings made from now on
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn store(&self) -> &RecordingStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordingStore {
        &mut self.store
    }

    /// Session-wide aggregates, or None before the first recording
    pub fn summary(&self) -> Option<SessionSummary> {
        analytics::summarize(&self.store)
    }
}
