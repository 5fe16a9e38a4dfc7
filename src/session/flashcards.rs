//! Flashcard session resume and revision mode

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::FlashcardSessionProgress;

/// Errors starting or resuming a flashcard session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Revision mode was requested but no unknown cards remain in the deck
    #[error("No cards to revise")]
    NoCardsToRevise,
}

/// A single flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
}

/// In-memory state of an active study session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Ids of the cards in study order
    pub card_ids: Vec<String>,
    /// Position within `card_ids`
    pub current_index: usize,
    pub known_cards: HashSet<String>,
    pub unknown_cards: HashSet<String>,
    pub is_completed: bool,
    /// Whether this is a revision pass over previously unknown cards
    pub revision_mode: bool,
}

impl SessionState {
    fn fresh(card_ids: Vec<String>) -> Self {
        Self {
            card_ids,
            current_index: 0,
            known_cards: HashSet::new(),
            unknown_cards: HashSet::new(),
            is_completed: false,
            revision_mode: false,
        }
    }
}

/// Reconstruct a study session from previously saved progress.
///
/// No saved progress, a structurally invalid record, or a previously finished
/// deck all produce a fresh session at index 0; an in-progress record resumes
/// at its saved position (clamped to the deck) with the known/unknown sets
/// carried over verbatim. Finished decks restart fresh so the user can always
/// go again; the caller offers revision over the old unknowns separately.
pub fn resume(saved: Option<FlashcardSessionProgress>, deck_card_ids: &[String]) -> SessionState {
    let deck: Vec<String> = deck_card_ids.to_vec();

    let saved = match saved {
        Some(s) if !s.is_valid() => {
            tracing::warn!("discarding invalid flashcard progress; starting fresh");
            None
        }
        other => other,
    };

    match saved {
        None => SessionState::fresh(deck),
        Some(s) if s.is_completed => SessionState::fresh(deck),
        Some(s) => {
            let last = deck.len().saturating_sub(1);
            SessionState {
                current_index: s.current_index.min(last),
                known_cards: s.known_cards,
                unknown_cards: s.unknown_cards,
                is_completed: false,
                revision_mode: false,
                card_ids: deck,
            }
        }
    }
}

/// Start a revision session restricted to previously unknown cards.
///
/// The deck is filtered to the unknown ids, keeping deck order; an empty
/// result is an error rather than a silently empty session.
pub fn start_revision(
    unknown_card_ids: &HashSet<String>,
    deck: &[Flashcard],
) -> Result<SessionState, SessionError> {
    let card_ids: Vec<String> = deck
        .iter()
        .filter(|card| unknown_card_ids.contains(&card.id))
        .map(|card| card.id.clone())
        .collect();

    if card_ids.is_empty() {
        return Err(SessionError::NoCardsToRevise);
    }

    Ok(SessionState { revision_mode: true, ..SessionState::fresh(card_ids) })
}
