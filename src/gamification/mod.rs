//! Gamification engine: XP, levels, streaks, and badges
//!
//! One [`GamificationState`] holds the per-user XP ledger, streak record, and
//! earned badges. It is explicitly owned by the caller and mutated only
//! through [`GamificationState::award`] and [`GamificationState::tick`];
//! there is no ambient singleton, and "now" is always passed in so tests can
//! drive time deterministically.

pub mod badges;
pub mod ledger;
pub mod level;
pub mod streak;

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use badges::Badge;
use ledger::XpLedger;
use level::level_info;
use streak::StreakRecord;

/// Study activity kinds that earn XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Flashcard,
    Audiobook,
    Textbook,
    Exercise,
}

/// Rejected award input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AwardError {
    /// XP awards must be positive; zero awards are rejected before any mutation
    #[error("XP award amount must be positive")]
    NonPositiveAmount,
}

/// Emitted when an award pushes the user past a level boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub old_level: u32,
    pub new_level: u32,
}

/// Everything a single award produced, for the presentation layer to display
#[derive(Debug, Clone, Default)]
pub struct AwardOutcome {
    pub level_up: Option<LevelUpEvent>,
    pub new_badges: Vec<Badge>,
}

/// The per-user gamification state: ledger + streak + earned badges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationState {
    pub ledger: XpLedger,
    pub streak: StreakRecord,
    pub badges: Vec<Badge>,
}

impl GamificationState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ledger: XpLedger::new(now.date_naive()),
            streak: StreakRecord::new(now),
            badges: Vec::new(),
        }
    }

    /// Credit XP for a completed study action.
    ///
    /// Updates the ledger, credits the streak, and evaluates badges against
    /// the one post-update snapshot, so a burst of awards can never interleave
    /// a partially updated ledger into an evaluation pass.
    pub fn award(
        &mut self,
        amount: u32,
        activity: ActivityType,
        now: DateTime<Utc>,
    ) -> Result<AwardOutcome, AwardError> {
        if amount == 0 {
            return Err(AwardError::NonPositiveAmount);
        }

        let level_before = level_info(self.ledger.total).level;
        self.ledger.add(amount, activity);
        let level_after = level_info(self.ledger.total).level;

        self.streak.touch(now);

        let earned_ids: HashSet<String> =
            self.badges.iter().map(|b| b.id().to_string()).collect();
        let new_badges = badges::evaluate(&self.ledger, &self.streak, &earned_ids, now);
        self.badges.extend(new_badges.iter().cloned());

        let level_up = (level_after > level_before)
            .then_some(LevelUpEvent { old_level: level_before, new_level: level_after });
        if let Some(event) = level_up {
            tracing::info!(old = event.old_level, new = event.new_level, "level up");
        }

        Ok(AwardOutcome { level_up, new_badges })
    }

    /// Apply user configuration to loaded state
    pub fn apply_config(&mut self, config: &Config) {
        self.ledger.daily_goal = config.daily_xp_goal;
    }

    /// Scheduled boundary check: midnight XP rollover and streak decay.
    ///
    /// The host calls this on a recurring timer; both halves are idempotent,
    /// so duplicate firings for the same boundary apply nothing twice.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.ledger.roll_over(now.date_naive());
        self.streak.check_reset(now);
    }

    /// Whether any earned badge has not yet been shown to the user
    pub fn has_new_badge(&self) -> bool {
        self.badges.iter().any(|b| b.is_new)
    }

    /// The most recently earned badge, if any
    pub fn latest_badge(&self) -> Option<&Badge> {
        self.badges.iter().max_by_key(|b| b.earned_date)
    }

    /// Clear the `is_new` flag once the UI has displayed the badges
    pub fn mark_badges_seen(&mut self) {
        for badge in &mut self.badges {
            badge.is_new = false;
        }
    }

    /// Load persisted state, or start fresh if none exists
    pub fn load_or_new(now: DateTime<Utc>) -> Result<Self> {
        let path = Self::state_path()?;

        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read gamification state from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse gamification.json")
        } else {
            Ok(Self::new(now))
        }
    }

    /// Save state to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::state_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize gamification state")?;

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write gamification state to {:?}", path))?;

        Ok(())
    }

    fn state_path() -> Result<PathBuf> {
        Ok(Config::data_dir()?.join("gamification.json"))
    }
}
