//! Progress command implementation

use anyhow::Result;
use std::path::Path;

use ranch_academy::catalog;
use ranch_academy::config::Config;
use ranch_academy::session::LearnerSession;
use ranch_academy::store::SqliteStore;
use ranch_academy::ProgressState;

/// Show a learner's progress, economy and badges from the local store
pub async fn progress_command(
    work_dir: &Path,
    config_path: Option<&Path>,
    uid: &str,
) -> Result<()> {
    let config = Config::resolve(config_path, work_dir)?;
    let store = SqliteStore::open(&config.db_path())?;
    let session = LearnerSession::load(&store, uid, &config)?;

    let tracker = session.tracker();
    let stats = session.economy().stats();

    println!("Learner {}", uid);
    println!(
        "  Level {} {} ({} xp, next level at {})",
        stats.level, stats.title, stats.total_xp, stats.next_level_xp
    );
    println!("  Coins: {}", session.economy().coins());
    println!("  Overall progress: {}%\n", tracker.overall_progress());

    for lesson in catalog::builtin().all_lessons() {
        let state = match ProgressState::of(tracker.get_progress(lesson.id)) {
            ProgressState::NotStarted if session.is_unlocked(lesson) => "not started".to_string(),
            ProgressState::NotStarted => "locked".to_string(),
            ProgressState::InProgress {
                current_step,
                attempts,
            } => format!(
                "step {}/{} ({} attempts)",
                current_step,
                lesson.step_count(),
                attempts
            ),
            ProgressState::Completed { completed_at } => {
                format!("completed {}", completed_at.format("%Y-%m-%d"))
            }
        };
        println!("  #{} {} - {}", lesson.id, lesson.title, state);
    }

    let rewards = session.rewards();
    if !rewards.is_empty() {
        println!("\nBadges ({}):", rewards.len());
        for reward in rewards {
            println!("  {} (lesson #{})", reward.name, reward.lesson_id);
        }
    }

    Ok(())
}
