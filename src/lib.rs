//! Seito - study progress and gamification engine
//!
//! Seito converts study activity (flashcards, textbook chapters, audiobooks)
//! into XP, levels, daily streaks, and badges, and reconstructs resumable
//! session state from persisted progress.

pub mod config;
pub mod dashboard;
pub mod gamification;
pub mod session;
pub mod store;
pub mod tracker;

pub use config::Config;
pub use gamification::{ActivityType, GamificationState};
pub use tracker::StudyTracker;
