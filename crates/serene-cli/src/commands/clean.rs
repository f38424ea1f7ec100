use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Subcommand;
use serene_core::LimitStore;

#[derive(Subcommand)]
pub enum CleanAction {
    /// Current clean date and streak
    Show,
    /// Reset the clean date; future dates are rejected
    Reset {
        /// New clean date; defaults to now
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: CleanAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = LimitStore::open()?;
    let today = super::today();
    let now = Utc::now();

    match action {
        CleanAction::Show => {
            let mut clean = store.load_clean_time()?;
            let initialized = clean.current().is_none();
            let current = clean.current_or_init(now);
            if initialized {
                store.append_clean_date(current)?;
            }
            println!(
                "Clean since {}, {} clean",
                current.date_naive(),
                clean.streak_label(today)
            );
        }
        CleanAction::Reset { date } => {
            let mut clean = store.load_clean_time()?;
            let stamp = match date {
                Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
                None => now,
            };
            // Validation runs before the storage write.
            clean.reset(stamp, now)?;
            store.append_clean_date(stamp)?;
            println!(
                "Clean date set to {}, {} clean",
                stamp.date_naive(),
                clean.streak_label(today)
            );
        }
    }
    Ok(())
}
