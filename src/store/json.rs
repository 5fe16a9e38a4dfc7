//! JSON file implementation of the progress store
//!
//! All progress lives in one `progress.json` under the platform data
//! directory. Writes go through immediately; reads validate each record and
//! silently drop anything structurally broken, logging a warning, so a
//! corrupt record degrades to "fresh start" rather than a crash.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;

use super::{
    AudioProgress, ChapterProgress, FlashcardSessionProgress, ProgressStore, StoreError,
};

/// On-disk shape of the progress file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProgressData {
    /// Flashcard session progress per deck id
    #[serde(default)]
    flashcards: HashMap<String, FlashcardSessionProgress>,
    /// Chapter progress per chapter id
    #[serde(default)]
    chapters: HashMap<String, ChapterProgress>,
    /// Audiobook progress per book id
    #[serde(default)]
    audio: HashMap<String, AudioProgress>,
}

/// File-backed [`ProgressStore`]
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: ProgressData,
}

impl JsonFileStore {
    /// Open the store at the default data-dir location
    pub fn open() -> Result<Self> {
        Ok(Self::open_at(Config::data_dir()?.join("progress.json")))
    }

    /// Open the store at an explicit path
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = Self::read_data(&path);
        Self { path, data }
    }

    fn read_data(path: &Path) -> ProgressData {
        if !path.exists() {
            return ProgressData::default();
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(?path, %err, "failed to read progress file; starting fresh");
                return ProgressData::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(?path, %err, "progress file is corrupt; starting fresh");
                ProgressData::default()
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.try_persist().map_err(StoreError::Write)
    }

    fn try_persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(&self.data)
            .with_context(|| "Failed to serialize progress")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", self.path))?;

        Ok(())
    }

    /// Validate a looked-up record, logging and dropping invalid ones
    fn checked<T: Clone>(id: &str, record: Option<&T>, valid: impl Fn(&T) -> bool) -> Option<T> {
        let record = record?;
        if valid(record) {
            Some(record.clone())
        } else {
            tracing::warn!(id, "discarding structurally invalid progress record");
            None
        }
    }
}

impl ProgressStore for JsonFileStore {
    fn flashcard_progress(&self, deck_id: &str) -> Option<FlashcardSessionProgress> {
        Self::checked(deck_id, self.data.flashcards.get(deck_id), |p| p.is_valid())
    }

    fn set_flashcard_progress(
        &mut self,
        deck_id: &str,
        progress: FlashcardSessionProgress,
    ) -> Result<(), StoreError> {
        self.data.flashcards.insert(deck_id.to_string(), progress);
        self.persist()
    }

    fn all_flashcard_progress(&self) -> HashMap<String, FlashcardSessionProgress> {
        self.data
            .flashcards
            .iter()
            .filter(|(_, p)| p.is_valid())
            .map(|(id, p)| (id.clone(), p.clone()))
            .collect()
    }

    fn chapter_progress(&self, chapter_id: &str) -> Option<ChapterProgress> {
        Self::checked(chapter_id, self.data.chapters.get(chapter_id), |p| p.is_valid())
    }

    fn set_chapter_progress(
        &mut self,
        chapter_id: &str,
        progress: ChapterProgress,
    ) -> Result<(), StoreError> {
        self.data.chapters.insert(chapter_id.to_string(), progress);
        self.persist()
    }

    fn all_chapter_progress(&self) -> HashMap<String, ChapterProgress> {
        self.data
            .chapters
            .iter()
            .filter(|(_, p)| p.is_valid())
            .map(|(id, p)| (id.clone(), p.clone()))
            .collect()
    }

    fn audio_progress(&self, book_id: &str) -> Option<AudioProgress> {
        Self::checked(book_id, self.data.audio.get(book_id), |p| p.is_valid())
    }

    fn set_audio_progress(
        &mut self,
        book_id: &str,
        progress: AudioProgress,
    ) -> Result<(), StoreError> {
        self.data.audio.insert(book_id.to_string(), progress);
        self.persist()
    }

    fn all_audio_progress(&self) -> HashMap<String, AudioProgress> {
        self.data.audio.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    fn sample_chapter() -> ChapterProgress {
        ChapterProgress {
            is_completed: false,
            quiz_score: Some(85),
            completed_at: None,
            reading_progress: 50,
        }
    }

    fn sample_session() -> FlashcardSessionProgress {
        FlashcardSessionProgress {
            current_index: 3,
            known_cards: HashSet::from(["1".to_string(), "2".to_string()]),
            unknown_cards: HashSet::from(["3".to_string()]),
            is_completed: false,
            last_studied: now(),
            total_cards: 7,
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = JsonFileStore::open_at(&path);
        store.set_chapter_progress("ch01", sample_chapter()).unwrap();
        store.set_flashcard_progress("deck-a", sample_session()).unwrap();

        // Re-open from disk to exercise the full round trip.
        let store = JsonFileStore::open_at(&path);
        assert_eq!(store.chapter_progress("ch01"), Some(sample_chapter()));
        assert_eq!(store.flashcard_progress("deck-a"), Some(sample_session()));
        assert!(store.chapter_progress("ch02").is_none());
    }

    #[test]
    fn corrupt_file_degrades_to_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open_at(&path);
        assert!(store.all_chapter_progress().is_empty());
    }

    #[test]
    fn invalid_record_is_discarded_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = JsonFileStore::open_at(&path);
        let broken = ChapterProgress { reading_progress: 250, ..sample_chapter() };
        store.set_chapter_progress("ch01", broken).unwrap();
        store.set_chapter_progress("ch02", sample_chapter()).unwrap();

        let store = JsonFileStore::open_at(&path);
        assert!(store.chapter_progress("ch01").is_none());
        assert_eq!(store.all_chapter_progress().len(), 1);
    }

    #[test]
    fn audio_progress_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = JsonFileStore::open_at(&path);
        let progress = AudioProgress {
            current_track: 2,
            position_seconds: 914,
            is_completed: false,
            last_played: now(),
        };
        store.set_audio_progress("book-1", progress.clone()).unwrap();

        let store = JsonFileStore::open_at(&path);
        assert_eq!(store.audio_progress("book-1"), Some(progress));
    }

    #[test]
    fn missing_sections_default_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, r#"{"chapters":{}}"#).unwrap();

        let store = JsonFileStore::open_at(&path);
        assert!(store.all_flashcard_progress().is_empty());
        assert!(store.all_audio_progress().is_empty());
    }
}
