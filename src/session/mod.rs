//! Session resume for the two activity shapes
//!
//! Flat flashcard decks resume to an index plus known/unknown sets; multi-page
//! chapters resume by reconstructing per-page flags from an aggregate
//! percentage. Both resolvers read persisted records owned by the store and
//! produce the initial in-memory state for their activity.

pub mod chapter;
pub mod flashcards;

pub use chapter::{ChapterError, PageCompletion, QuizUpdate};
pub use flashcards::{Flashcard, SessionError, SessionState};
