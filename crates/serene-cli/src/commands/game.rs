use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use serde::Serialize;
use serene_core::{GameMood, LimitCollection, LimitStore};

#[derive(Subcommand)]
pub enum GameAction {
    /// Current aggregate standing across every limit
    Status,
}

#[derive(Serialize)]
struct GameReport {
    mood: GameMood,
    score: i64,
    score_label: String,
    clean_since: NaiveDate,
    clean_streak: String,
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = LimitStore::open()?;
    let collection = LimitCollection::from_limits(store.load_all()?);
    let today = super::today();

    match action {
        GameAction::Status => {
            let mut clean = store.load_clean_time()?;
            let initialized = clean.current().is_none();
            let clean_since = clean.current_or_init(Utc::now());
            if initialized {
                store.append_clean_date(clean_since)?;
            }

            let status = collection.game_status(today);
            let report = GameReport {
                mood: status.mood,
                score: status.score,
                score_label: status.score_label,
                clean_since: clean_since.date_naive(),
                clean_streak: clean.streak_label(today),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
