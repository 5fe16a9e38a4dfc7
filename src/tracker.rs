//! Orchestration between the in-memory engine and the progress store
//!
//! The tracker applies every change to the in-memory state first and persists
//! afterwards, fire-and-forget: a failed write is logged and never rolls back
//! or blocks what the user already did.

use chrono::{DateTime, Utc};

use crate::gamification::{ActivityType, AwardError, AwardOutcome, GamificationState};
use crate::store::{
    AudioProgress, ChapterProgress, FlashcardSessionProgress, ProgressStore,
};

/// Owns the gamification state and a progress store for one user
pub struct StudyTracker<S: ProgressStore> {
    pub state: GamificationState,
    store: S,
}

impl<S: ProgressStore> StudyTracker<S> {
    pub fn new(state: GamificationState, store: S) -> Self {
        Self { state, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Credit XP for a completed study action and persist the new state.
    ///
    /// The award applies in memory first; persistence failures are logged and
    /// swallowed so they never surface into the UI event path.
    pub fn record_activity(
        &mut self,
        amount: u32,
        activity: ActivityType,
        now: DateTime<Utc>,
    ) -> Result<AwardOutcome, AwardError> {
        let outcome = self.state.award(amount, activity, now)?;
        self.persist_state();
        Ok(outcome)
    }

    /// Host-driven scheduled boundary check (midnight rollover, streak decay)
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let before = (self.state.ledger.today_date, self.state.streak.current);
        self.state.tick(now);
        if before != (self.state.ledger.today_date, self.state.streak.current) {
            self.persist_state();
        }
    }

    /// Save flashcard session progress, non-fatally
    pub fn save_flashcard_progress(&mut self, deck_id: &str, progress: FlashcardSessionProgress) {
        if let Err(err) = self.store.set_flashcard_progress(deck_id, progress) {
            tracing::warn!(deck_id, %err, "failed to persist flashcard progress");
        }
    }

    /// Save chapter progress, non-fatally
    pub fn save_chapter_progress(&mut self, chapter_id: &str, progress: ChapterProgress) {
        if let Err(err) = self.store.set_chapter_progress(chapter_id, progress) {
            tracing::warn!(chapter_id, %err, "failed to persist chapter progress");
        }
    }

    /// Save audiobook progress, non-fatally
    pub fn save_audio_progress(&mut self, book_id: &str, progress: AudioProgress) {
        if let Err(err) = self.store.set_audio_progress(book_id, progress) {
            tracing::warn!(book_id, %err, "failed to persist audiobook progress");
        }
    }

    fn persist_state(&self) {
        if let Err(err) = self.state.save() {
            tracing::warn!(%err, "failed to persist gamification state");
        }
    }
}
