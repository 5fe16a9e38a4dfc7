//! Daily activity streak tracking
//!
//! A streak counts consecutive calendar days with at least one qualifying
//! activity. Comparison is by year/month/day only; time-of-day never matters.
//! Resetting after a gap and incrementing on the next day are two distinct
//! transitions: the first touch after a gap only performs the reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Streak lengths that trigger a one-time celebration
pub const STREAK_MILESTONES: [u32; 4] = [3, 7, 30, 100];

fn default_milestones() -> Vec<u32> {
    STREAK_MILESTONES.to_vec()
}

/// Persistent streak state for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Current consecutive-day count
    pub current: u32,

    /// Longest streak ever reached; never decremented
    pub longest: u32,

    /// When the streak was last credited or reset
    pub last_updated: DateTime<Utc>,

    /// Milestone catalog (fixed; serialized so stored records are self-describing)
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u32>,

    /// Milestones already celebrated; each fires exactly once
    #[serde(default)]
    pub milestones_reached: Vec<u32>,
}

impl StreakRecord {
    /// Create a fresh record; the first increment happens on the next calendar day
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current: 0,
            longest: 0,
            last_updated: now,
            milestones: default_milestones(),
            milestones_reached: Vec::new(),
        }
    }

    /// Credit activity at `now`.
    ///
    /// Same calendar day as `last_updated`: no-op (already credited).
    /// Exactly the next day: increment and collect any newly crossed
    /// milestones. More than one day later: reset to zero without
    /// incrementing; the streak restarts with tomorrow's touch.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let elapsed = (now.date_naive() - self.last_updated.date_naive()).num_days();

        match elapsed {
            d if d <= 0 => {}
            1 => {
                self.current += 1;
                self.longest = self.longest.max(self.current);
                self.last_updated = now;
                self.collect_milestones();
            }
            _ => {
                self.current = 0;
                self.last_updated = now;
            }
        }
    }

    /// Decay the streak if more than one day has passed without activity.
    ///
    /// Intended for a recurring scheduled check so the streak visibly drops
    /// to zero without waiting for the next touch. Idempotent; leaves
    /// `longest` and `milestones_reached` alone.
    pub fn check_reset(&mut self, now: DateTime<Utc>) {
        let elapsed = (now.date_naive() - self.last_updated.date_naive()).num_days();
        if elapsed > 1 {
            self.current = 0;
            self.last_updated = now;
        }
    }

    /// Milestones at or below the current streak that haven't fired yet
    fn collect_milestones(&mut self) {
        for &m in &self.milestones {
            if self.current >= m && !self.milestones_reached.contains(&m) {
                self.milestones_reached.push(m);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap()
    }

    fn record(current: u32, last: DateTime<Utc>) -> StreakRecord {
        StreakRecord { current, longest: current, ..StreakRecord::new(last) }
    }

    #[test]
    fn same_day_touch_is_noop() {
        let mut streak = record(5, at(2026, 1, 10, 9));
        streak.touch(at(2026, 1, 10, 23));
        assert_eq!(streak.current, 5);
    }

    #[test]
    fn next_day_touch_increments() {
        let mut streak = record(5, at(2026, 1, 10, 9));
        streak.touch(at(2026, 1, 11, 0));
        assert_eq!(streak.current, 6);
        assert_eq!(streak.longest, 6);
    }

    #[test]
    fn time_of_day_is_ignored() {
        // 23:59 -> 00:01 is still one calendar day apart.
        let mut streak = record(2, at(2026, 3, 1, 23));
        streak.touch(at(2026, 3, 2, 0));
        assert_eq!(streak.current, 3);
    }

    #[test]
    fn gap_touch_resets_without_incrementing() {
        let mut streak = record(5, at(2026, 1, 10, 12));
        streak.touch(at(2026, 1, 13, 12));
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 5);

        // The streak restarts on the following day.
        streak.touch(at(2026, 1, 14, 8));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 5);
    }

    #[test]
    fn check_reset_decays_after_gap() {
        let mut streak = record(6, at(2026, 1, 11, 12));
        streak.milestones_reached = vec![3];

        streak.check_reset(at(2026, 1, 12, 12));
        assert_eq!(streak.current, 6, "one-day gap is still alive");

        streak.check_reset(at(2026, 1, 13, 12));
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 6);
        assert_eq!(streak.milestones_reached, vec![3]);
    }

    #[test]
    fn check_reset_is_idempotent() {
        let mut streak = record(4, at(2026, 1, 1, 12));
        streak.check_reset(at(2026, 1, 5, 12));
        streak.check_reset(at(2026, 1, 5, 12));
        assert_eq!(streak.current, 0);
    }

    #[test]
    fn milestone_fires_exactly_once() {
        let mut streak = record(2, at(2026, 1, 1, 12));
        streak.touch(at(2026, 1, 2, 12));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.milestones_reached, vec![3]);

        streak.touch(at(2026, 1, 3, 12));
        streak.touch(at(2026, 1, 4, 12));
        assert_eq!(streak.current, 5);
        assert_eq!(streak.milestones_reached, vec![3], "3 must not re-fire");
    }

    #[test]
    fn skipped_milestones_are_backfilled() {
        // A restored record can jump past several milestones at once.
        let mut streak = record(9, at(2026, 1, 1, 12));
        streak.touch(at(2026, 1, 2, 12));
        assert_eq!(streak.current, 10);
        assert_eq!(streak.milestones_reached, vec![3, 7]);
    }

    #[test]
    fn longest_never_decreases() {
        let mut streak = record(8, at(2026, 1, 1, 12));
        streak.check_reset(at(2026, 2, 1, 12));
        streak.touch(at(2026, 2, 2, 12));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 8);
    }

    #[test]
    fn deserializes_without_milestone_fields() {
        let json = r#"{
            "current": 2,
            "longest": 4,
            "last_updated": "2026-01-10T09:00:00Z"
        }"#;
        let streak: StreakRecord = serde_json::from_str(json).unwrap();
        assert_eq!(streak.milestones, vec![3, 7, 30, 100]);
        assert!(streak.milestones_reached.is_empty());
    }
}
