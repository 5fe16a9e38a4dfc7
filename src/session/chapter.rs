//! Multi-page chapter progress reconstruction
//!
//! Only an aggregate reading percentage is persisted per chapter, so resume
//! reconstructs an approximate per-page quiz-completion vector from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::ChapterProgress;

/// Errors updating chapter page state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChapterError {
    /// Page index past the end of the chapter
    #[error("Page index {index} out of range for {total_pages} pages")]
    PageOutOfRange { index: usize, total_pages: usize },
}

/// Per-page completion flags reconstructed for the continuation UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCompletion {
    /// Whether each page's content has been read this session.
    /// Never reconstructed from persistence; always starts all-false.
    pub content_read: Vec<bool>,
    /// Whether each page's quiz has been completed
    pub quiz_done: Vec<bool>,
}

/// Result of marking one page's quiz complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizUpdate {
    pub quiz_done: Vec<bool>,
    /// `round(completed / total_pages * 100)`, the value to persist
    pub aggregate_progress: u8,
    pub chapter_fully_complete: bool,
}

fn aggregate_percent(done: usize, total_pages: usize) -> u8 {
    if total_pages == 0 {
        return 0;
    }
    (done as f64 / total_pages as f64 * 100.0).round() as u8
}

/// Reconstruct per-page flags from saved aggregate progress.
///
/// `round(reading_progress / 100 * total_pages)` pages are assumed complete,
/// always the first N in index order. That assumption is lossy when pages
/// were completed out of order; it matches the persisted data model, which
/// keeps no per-page detail, and stands until the product decides otherwise.
/// Invalid records (out-of-range percentages) are discarded with a warning.
pub fn resolve_page_completion(
    saved: Option<&ChapterProgress>,
    total_pages: usize,
) -> PageCompletion {
    let completed = match saved {
        Some(s) if !s.is_valid() => {
            tracing::warn!("discarding invalid chapter progress; starting fresh");
            0
        }
        Some(s) => {
            (s.reading_progress as f64 / 100.0 * total_pages as f64).round() as usize
        }
        None => 0,
    };
    let completed = completed.min(total_pages);

    let mut quiz_done = vec![false; total_pages];
    for flag in quiz_done.iter_mut().take(completed) {
        *flag = true;
    }

    PageCompletion { content_read: vec![false; total_pages], quiz_done }
}

/// Mark a page's quiz complete and recompute the aggregate to persist
pub fn update_on_quiz_complete(
    quiz_done: &[bool],
    page_index: usize,
) -> Result<QuizUpdate, ChapterError> {
    if page_index >= quiz_done.len() {
        return Err(ChapterError::PageOutOfRange {
            index: page_index,
            total_pages: quiz_done.len(),
        });
    }

    let mut quiz_done = quiz_done.to_vec();
    quiz_done[page_index] = true;

    let done = quiz_done.iter().filter(|&&d| d).count();
    let total = quiz_done.len();

    Ok(QuizUpdate {
        aggregate_progress: aggregate_percent(done, total),
        chapter_fully_complete: done == total,
        quiz_done,
    })
}
