//! XP ledger: daily and lifetime totals per activity
//!
//! The ledger is mutated only through [`XpLedger::add`] and
//! [`XpLedger::roll_over`], which keep `total == sum(by_activity)` and
//! `today <= total`. History entries are append-only and created at day
//! rollover, one per past day with activity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ActivityType;

/// Default daily XP goal shown on the dashboard
pub const DEFAULT_DAILY_GOAL: u32 = 50;

/// XP earned on one past calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyXp {
    pub date: NaiveDate,
    pub amount: u32,
}

/// Lifetime XP split by activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTotals {
    pub flashcard: u32,
    pub audiobook: u32,
    pub textbook: u32,
    pub exercise: u32,
}

impl ActivityTotals {
    pub fn get(&self, activity: ActivityType) -> u32 {
        match activity {
            ActivityType::Flashcard => self.flashcard,
            ActivityType::Audiobook => self.audiobook,
            ActivityType::Textbook => self.textbook,
            ActivityType::Exercise => self.exercise,
        }
    }

    fn add(&mut self, activity: ActivityType, amount: u32) {
        match activity {
            ActivityType::Flashcard => self.flashcard += amount,
            ActivityType::Audiobook => self.audiobook += amount,
            ActivityType::Textbook => self.textbook += amount,
            ActivityType::Exercise => self.exercise += amount,
        }
    }

    pub fn sum(&self) -> u32 {
        self.flashcard + self.audiobook + self.textbook + self.exercise
    }
}

/// Per-user XP accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpLedger {
    /// XP earned so far on `today_date`
    pub today: u32,

    /// The calendar day `today` refers to. Rollover compares against this,
    /// so restoring persisted state never triggers a spurious rollover.
    pub today_date: NaiveDate,

    /// Lifetime XP
    pub total: u32,

    /// Daily XP target
    pub daily_goal: u32,

    /// One entry per past day with activity, chronological
    pub history: Vec<DailyXp>,

    /// Lifetime XP per activity type
    pub by_activity: ActivityTotals,
}

impl XpLedger {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: 0,
            today_date: today,
            total: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            history: Vec::new(),
            by_activity: ActivityTotals::default(),
        }
    }

    /// Credit XP to today's and lifetime totals. Callers validate the amount.
    pub(crate) fn add(&mut self, amount: u32, activity: ActivityType) {
        self.today += amount;
        self.total += amount;
        self.by_activity.add(activity, amount);
    }

    /// Close out `today_date` if the calendar has moved past it.
    ///
    /// Appends yesterday's earnings to history (only when non-zero and not
    /// already recorded) and resets the daily counter. Safe to call on every
    /// scheduled tick; repeated calls for the same boundary do nothing.
    pub fn roll_over(&mut self, today: NaiveDate) {
        if today <= self.today_date {
            return;
        }
        if self.today > 0 && !self.history.iter().any(|e| e.date == self.today_date) {
            self.history.push(DailyXp { date: self.today_date, amount: self.today });
        }
        self.today = 0;
        self.today_date = today;
    }

    /// Whether today's earnings have met the daily goal
    pub fn goal_met(&self) -> bool {
        self.today >= self.daily_goal
    }
}
