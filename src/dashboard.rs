//! Dashboard summaries over persisted progress
//!
//! Pure helpers that scan the per-kind progress maps to answer "where did I
//! leave off" for the home screen.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::store::{AudioProgress, ChapterProgress, FlashcardSessionProgress};

/// The most recently studied, unfinished flashcard deck
pub fn most_recent_deck(
    decks: &HashMap<String, FlashcardSessionProgress>,
) -> Option<(&str, &FlashcardSessionProgress)> {
    decks
        .iter()
        .filter(|(_, p)| !p.is_completed)
        .max_by_key(|(_, p)| p.last_studied)
        .map(|(id, p)| (id.as_str(), p))
}

/// The most recently played, unfinished audiobook
pub fn most_recent_audiobook(
    books: &HashMap<String, AudioProgress>,
) -> Option<(&str, &AudioProgress)> {
    books
        .iter()
        .filter(|(_, p)| !p.is_completed)
        .max_by_key(|(_, p)| p.last_played)
        .map(|(id, p)| (id.as_str(), p))
}

/// First chapter in curriculum order that isn't completed yet.
///
/// `chapter_ids` carries the curriculum order; the progress map only knows
/// what has been touched.
pub fn next_incomplete_chapter<'a>(
    chapter_ids: &'a [String],
    progress: &HashMap<String, ChapterProgress>,
) -> Option<&'a str> {
    chapter_ids
        .iter()
        .find(|id| progress.get(*id).is_none_or(|p| !p.is_completed))
        .map(String::as_str)
}

/// When the user last did anything, across all activity kinds
pub fn last_activity(
    decks: &HashMap<String, FlashcardSessionProgress>,
    chapters: &HashMap<String, ChapterProgress>,
    books: &HashMap<String, AudioProgress>,
) -> Option<DateTime<Utc>> {
    let deck = decks.values().map(|p| p.last_studied).max();
    let chapter = chapters.values().filter_map(|p| p.completed_at).max();
    let book = books.values().map(|p| p.last_played).max();

    [deck, chapter, book].into_iter().flatten().max()
}
