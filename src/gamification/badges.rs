//! Badge catalog and eligibility evaluation
//!
//! Badges are plain data: a static catalog of definitions with a tagged
//! requirement variant, consumed by one generic evaluator. Adding a badge is
//! a catalog edit, not a new code branch.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ActivityType;
use super::ledger::XpLedger;
use super::streak::StreakRecord;

/// What a badge is awarded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Streak,
    Flashcard,
    Audiobook,
    Textbook,
    Exercise,
    General,
}

/// Eligibility rule for a badge
///
/// `Completion` measures XP earned in one activity, not a count of finished
/// items; that proxy is inherited from the product design. `Accuracy` is
/// reserved and never currently eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    Streak { threshold: u32 },
    Xp { threshold: u32 },
    Completion { threshold: u32, activity: ActivityType },
    Accuracy { threshold: u32 },
}

/// One entry in the immutable badge catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Tier within the badge family (1..=max_level)
    pub level: u32,
    pub max_level: u32,
    pub category: BadgeCategory,
    pub requirement: Requirement,
}

/// An earned badge instance; created once per definition id per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(flatten)]
    pub definition: BadgeDefinition,
    pub earned_date: DateTime<Utc>,
    /// Set on creation; the UI clears it once the badge has been shown
    pub is_new: bool,
}

impl Badge {
    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

fn def(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    level: u32,
    max_level: u32,
    category: BadgeCategory,
    requirement: Requirement,
) -> BadgeDefinition {
    BadgeDefinition {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        icon: icon.into(),
        level,
        max_level,
        category,
        requirement,
    }
}

/// The process-wide badge catalog
pub static BADGE_CATALOG: Lazy<Vec<BadgeDefinition>> = Lazy::new(|| {
    use ActivityType::*;
    use BadgeCategory as C;
    use Requirement as R;

    vec![
        // Streak family
        def("streak_3", "On a Roll", "Study 3 days in a row", "🔥", 1, 4, C::Streak,
            R::Streak { threshold: 3 }),
        def("streak_7", "One Week Strong", "Study 7 days in a row", "🔥", 2, 4, C::Streak,
            R::Streak { threshold: 7 }),
        def("streak_30", "Monthly Devotion", "Study 30 days in a row", "🔥", 3, 4, C::Streak,
            R::Streak { threshold: 30 }),
        def("streak_100", "Century Club", "Study 100 days in a row", "🏆", 4, 4, C::Streak,
            R::Streak { threshold: 100 }),
        // Lifetime XP family
        def("xp_100", "First Steps", "Earn 100 XP", "⭐", 1, 4, C::General,
            R::Xp { threshold: 100 }),
        def("xp_500", "Scholar", "Earn 500 XP", "⭐", 2, 4, C::General,
            R::Xp { threshold: 500 }),
        def("xp_2500", "Sage", "Earn 2,500 XP", "🌟", 3, 4, C::General,
            R::Xp { threshold: 2500 }),
        def("xp_10000", "Grandmaster", "Earn 10,000 XP", "👑", 4, 4, C::General,
            R::Xp { threshold: 10_000 }),
        // Per-activity effort
        def("flashcard_250", "Card Sharp", "Earn 250 XP from flashcards", "🃏", 1, 2, C::Flashcard,
            R::Completion { threshold: 250, activity: Flashcard }),
        def("flashcard_1000", "Deck Master", "Earn 1,000 XP from flashcards", "🃏", 2, 2,
            C::Flashcard, R::Completion { threshold: 1000, activity: Flashcard }),
        def("audiobook_250", "Good Listener", "Earn 250 XP from audiobooks", "🎧", 1, 1,
            C::Audiobook, R::Completion { threshold: 250, activity: Audiobook }),
        def("textbook_250", "Bookworm", "Earn 250 XP from textbook chapters", "📖", 1, 2,
            C::Textbook, R::Completion { threshold: 250, activity: Textbook }),
        def("textbook_1000", "Page Turner", "Earn 1,000 XP from textbook chapters", "📖", 2, 2,
            C::Textbook, R::Completion { threshold: 1000, activity: Textbook }),
        def("exercise_250", "Practice Pays", "Earn 250 XP from exercises", "✏️", 1, 1,
            C::Exercise, R::Completion { threshold: 250, activity: Exercise }),
        // Reserved until accuracy tracking lands
        def("accuracy_90", "Perfectionist", "Average 90% quiz accuracy", "🎯", 1, 1, C::General,
            R::Accuracy { threshold: 90 }),
    ]
});

fn eligible(requirement: Requirement, ledger: &XpLedger, streak: &StreakRecord) -> bool {
    match requirement {
        Requirement::Streak { threshold } => streak.current >= threshold,
        Requirement::Xp { threshold } => ledger.total >= threshold,
        Requirement::Completion { threshold, activity } => {
            ledger.by_activity.get(activity) >= threshold
        }
        Requirement::Accuracy { .. } => false,
    }
}

/// Evaluate the catalog against one consistent XP/streak snapshot.
///
/// Pure function of its inputs: definitions already in `already_earned` are
/// skipped, everything else that meets its requirement becomes a new badge
/// stamped with `now`.
pub fn evaluate(
    ledger: &XpLedger,
    streak: &StreakRecord,
    already_earned: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<Badge> {
    BADGE_CATALOG
        .iter()
        .filter(|d| !already_earned.contains(&d.id))
        .filter(|d| eligible(d.requirement, ledger, streak))
        .map(|d| Badge { definition: d.clone(), earned_date: now, is_new: true })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    fn ledger_with(total_by: &[(ActivityType, u32)]) -> XpLedger {
        let mut ledger = XpLedger::new(now().date_naive());
        for &(activity, amount) in total_by {
            ledger.add(amount, activity);
        }
        ledger
    }

    fn streak_of(current: u32) -> StreakRecord {
        StreakRecord { current, longest: current, ..StreakRecord::new(now()) }
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut seen = HashSet::new();
        for d in BADGE_CATALOG.iter() {
            assert!(seen.insert(d.id.clone()), "duplicate badge id {}", d.id);
            assert!(d.level >= 1 && d.level <= d.max_level);
        }
    }

    #[test]
    fn xp_badge_awarded_at_threshold() {
        let ledger = ledger_with(&[(ActivityType::Flashcard, 100)]);
        let earned = evaluate(&ledger, &streak_of(0), &HashSet::new(), now());

        let ids: Vec<&str> = earned.iter().map(|b| b.id()).collect();
        assert!(ids.contains(&"xp_100"));
        assert!(!ids.contains(&"xp_500"));
    }

    #[test]
    fn completion_badge_tracks_per_activity_xp() {
        // 250 XP spread across activities must not award an activity badge.
        let ledger = ledger_with(&[(ActivityType::Flashcard, 150), (ActivityType::Textbook, 100)]);
        let earned = evaluate(&ledger, &streak_of(0), &HashSet::new(), now());
        assert!(!earned.iter().any(|b| b.id() == "flashcard_250"));

        let ledger = ledger_with(&[(ActivityType::Flashcard, 250)]);
        let earned = evaluate(&ledger, &streak_of(0), &HashSet::new(), now());
        assert!(earned.iter().any(|b| b.id() == "flashcard_250"));
    }

    #[test]
    fn streak_badges_follow_current_streak() {
        let ledger = ledger_with(&[]);
        let earned = evaluate(&ledger, &streak_of(7), &HashSet::new(), now());
        let ids: Vec<&str> = earned.iter().map(|b| b.id()).collect();
        assert!(ids.contains(&"streak_3"));
        assert!(ids.contains(&"streak_7"));
        assert!(!ids.contains(&"streak_30"));
    }

    #[test]
    fn accuracy_badges_are_never_eligible() {
        let ledger = ledger_with(&[(ActivityType::Exercise, 100_000)]);
        let earned = evaluate(&ledger, &streak_of(500), &HashSet::new(), now());
        assert!(!earned.iter().any(|b| b.id() == "accuracy_90"));
    }

    #[test]
    fn evaluation_is_idempotent_once_earned() {
        let ledger = ledger_with(&[(ActivityType::Textbook, 600)]);
        let streak = streak_of(4);

        let first = evaluate(&ledger, &streak, &HashSet::new(), now());
        assert!(!first.is_empty());

        let earned: HashSet<String> = first.iter().map(|b| b.id().to_string()).collect();
        let second = evaluate(&ledger, &streak, &earned, now());
        assert!(second.is_empty());
    }

    #[test]
    fn new_badges_start_flagged() {
        let ledger = ledger_with(&[(ActivityType::Audiobook, 300)]);
        let earned = evaluate(&ledger, &streak_of(0), &HashSet::new(), now());
        assert!(earned.iter().all(|b| b.is_new));
        assert!(earned.iter().all(|b| b.earned_date == now()));
    }

    #[test]
    fn requirement_serializes_tagged() {
        let r = Requirement::Completion { threshold: 250, activity: ActivityType::Flashcard };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains(r#""kind":"completion""#));
        assert!(json.contains(r#""activity":"flashcard""#));
    }
}
