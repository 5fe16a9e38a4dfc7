use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use seito::gamification::level::level_info;
use seito::store::{JsonFileStore, ProgressStore};
use seito::{ActivityType, Config, GamificationState, StudyTracker, dashboard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seito")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, XP, and streak
    Stats,
    /// List earned badges
    Badges,
    /// Record a completed study action
    Award {
        /// XP amount
        amount: u32,
        /// Activity the XP came from
        #[arg(value_enum)]
        activity: ActivityType,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seito=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::load()?;
    let now = Utc::now();

    let mut state = GamificationState::load_or_new(now)?;
    state.apply_config(&config);
    // Catch up on any boundary crossed while the app was closed.
    state.tick(now);

    match Cli::parse().command {
        Some(Commands::Stats) => {
            let info = level_info(state.ledger.total);
            println!("Level {} ({} / {} XP)", info.level, state.ledger.total, info.total_xp_for_next_level);
            println!(
                "Today: {} / {} XP{}",
                state.ledger.today,
                state.ledger.daily_goal,
                if state.ledger.goal_met() { "  (goal met)" } else { "" }
            );
            println!("Streak: {} days (longest {})", state.streak.current, state.streak.longest);
            state.save()?;
        }
        Some(Commands::Badges) => {
            if state.badges.is_empty() {
                println!("No badges earned yet");
            }
            for badge in &state.badges {
                let new = if badge.is_new { " (new)" } else { "" };
                println!(
                    "{} {} - {}{}",
                    badge.definition.icon, badge.definition.name, badge.definition.description, new
                );
            }
            state.mark_badges_seen();
            state.save()?;
        }
        Some(Commands::Award { amount, activity }) => {
            let mut tracker = StudyTracker::new(state, JsonFileStore::open()?);
            let outcome = tracker.record_activity(amount, activity, now)?;
            if let Some(level_up) = outcome.level_up {
                println!("Level up! {} -> {}", level_up.old_level, level_up.new_level);
            }
            for badge in &outcome.new_badges {
                println!("Badge earned: {} {}", badge.definition.icon, badge.definition.name);
            }
            println!("+{amount} XP");
        }
        None => {
            let store = JsonFileStore::open()?;
            let decks = store.all_flashcard_progress();
            let books = store.all_audio_progress();

            let info = level_info(state.ledger.total);
            println!(
                "Level {} - {:.0}% to next | streak {} days",
                info.level, info.progress_percent, state.streak.current
            );
            if let Some((id, progress)) = dashboard::most_recent_deck(&decks) {
                println!("Continue deck '{}' at card {}", id, progress.current_index + 1);
            }
            if let Some((id, progress)) = dashboard::most_recent_audiobook(&books) {
                println!("Continue audiobook '{}' at track {}", id, progress.current_track + 1);
            }
            state.save()?;
        }
    }

    Ok(())
}
