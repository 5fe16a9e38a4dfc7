//! Persisted progress records and the storage contract
//!
//! The engine only requires a thin get/set/get-all contract per progress
//! kind; [`JsonFileStore`] is the bundled implementation. Records carry their
//! own structural validation: a record that fails it is discarded at the read
//! boundary and the activity degrades to a fresh start instead of crashing or
//! applying partial state.

pub mod json;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json::JsonFileStore;

/// Storage failure; non-fatal to callers, which keep their in-memory state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read progress store: {0}")]
    Read(#[source] anyhow::Error),

    #[error("Failed to write progress store: {0}")]
    Write(#[source] anyhow::Error),
}

/// Saved state of a flashcard study session, keyed by deck id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardSessionProgress {
    /// Index of the card being studied
    pub current_index: usize,
    /// Cards the user marked as known
    pub known_cards: HashSet<String>,
    /// Cards the user marked as unknown (disjoint from `known_cards`)
    pub unknown_cards: HashSet<String>,
    /// Whether the deck was finished
    pub is_completed: bool,
    /// Last study instant
    pub last_studied: DateTime<Utc>,
    /// Deck size when the session was saved
    pub total_cards: usize,
}

impl FlashcardSessionProgress {
    /// Structural validity: non-empty deck, disjoint sets, counts within bounds
    pub fn is_valid(&self) -> bool {
        self.total_cards > 0
            && self.known_cards.len() + self.unknown_cards.len() <= self.total_cards
            && self.known_cards.is_disjoint(&self.unknown_cards)
    }
}

/// Saved progress for a textbook chapter, keyed by chapter id
///
/// For multi-page chapters `reading_progress` is an aggregate:
/// `round(pages_with_completed_quiz / total_pages * 100)`. Per-page detail is
/// not persisted separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub is_completed: bool,
    /// Quiz score 0-100, if a quiz was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<u8>,
    /// When the chapter was completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Aggregate reading progress 0-100
    pub reading_progress: u8,
}

impl ChapterProgress {
    /// Structural validity: percentages stay within 0-100
    pub fn is_valid(&self) -> bool {
        self.reading_progress <= 100 && self.quiz_score.is_none_or(|s| s <= 100)
    }
}

/// Saved listening position for an audiobook, keyed by book id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioProgress {
    /// Track index within the book
    pub current_track: usize,
    /// Position within the track
    pub position_seconds: u32,
    pub is_completed: bool,
    pub last_played: DateTime<Utc>,
}

impl AudioProgress {
    pub fn is_valid(&self) -> bool {
        true
    }
}

/// Get/set progress by id, per activity kind.
///
/// Implementations may fail on IO; callers treat failures as non-fatal and
/// keep their already-applied in-memory state.
pub trait ProgressStore {
    fn flashcard_progress(&self, deck_id: &str) -> Option<FlashcardSessionProgress>;
    fn set_flashcard_progress(
        &mut self,
        deck_id: &str,
        progress: FlashcardSessionProgress,
    ) -> Result<(), StoreError>;
    fn all_flashcard_progress(&self) -> HashMap<String, FlashcardSessionProgress>;

    fn chapter_progress(&self, chapter_id: &str) -> Option<ChapterProgress>;
    fn set_chapter_progress(
        &mut self,
        chapter_id: &str,
        progress: ChapterProgress,
    ) -> Result<(), StoreError>;
    fn all_chapter_progress(&self) -> HashMap<String, ChapterProgress>;

    fn audio_progress(&self, book_id: &str) -> Option<AudioProgress>;
    fn set_audio_progress(
        &mut self,
        book_id: &str,
        progress: AudioProgress,
    ) -> Result<(), StoreError>;
    fn all_audio_progress(&self) -> HashMap<String, AudioProgress>;
}
