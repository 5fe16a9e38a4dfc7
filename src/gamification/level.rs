//! Level calculation from cumulative XP
//!
//! Level 1 spans 0..100 XP. The gap from level 2 to 3 is 150 XP, and each
//! subsequent gap grows by 50 (200, 250, ...). The calculator walks the
//! levels accumulating thresholds, so it is pure and safe to call on every
//! render.

use serde::{Deserialize, Serialize};

/// XP required to clear level 1
const FIRST_GAP: u64 = 100;

/// XP required to clear level 2
const SECOND_GAP: u64 = 150;

/// How much each gap after level 2 grows
const GAP_STEP: u64 = 50;

/// Where a given XP total sits in the level curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Current level (1-indexed)
    pub level: u32,
    /// XP earned within the current level
    pub current_level_xp: u64,
    /// XP still needed to reach the next level
    pub xp_needed_for_next: u64,
    /// Cumulative XP at which the current level began
    pub total_xp_for_current_level: u64,
    /// Cumulative XP at which the next level begins
    pub total_xp_for_next_level: u64,
    /// Progress through the current level, 0-100
    pub progress_percent: f32,
}

/// XP gap between `level` and `level + 1`
fn gap_for(level: u32) -> u64 {
    match level {
        0 | 1 => FIRST_GAP,
        n => SECOND_GAP + GAP_STEP * u64::from(n - 2),
    }
}

/// Map a cumulative XP total to level and progress-within-level.
///
/// Thresholds accumulate in u64 so the next-level boundary stays
/// representable even at the top of the u32 input range.
pub fn level_info(total_xp: u32) -> LevelInfo {
    let total_xp = u64::from(total_xp);
    let mut level = 1;
    let mut level_start = 0u64;
    let mut gap = gap_for(level);

    while total_xp >= level_start + gap {
        level_start += gap;
        level += 1;
        gap = gap_for(level);
    }

    let current_level_xp = total_xp - level_start;
    LevelInfo {
        level,
        current_level_xp,
        xp_needed_for_next: gap - current_level_xp,
        total_xp_for_current_level: level_start,
        total_xp_for_next_level: level_start + gap,
        progress_percent: (current_level_xp as f32 / gap as f32) * 100.0,
    }
}
