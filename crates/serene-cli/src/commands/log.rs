use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use serene_core::{
    reduction_delta, GeoPoint, LimitCollection, LimitStore, LogEntry, ValidationError,
};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record consumption against a limit
    Add {
        name: String,
        /// Signed amount; positive increases the day total, negative
        /// records a correction
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
        /// Day to log against; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Opaque reference to an attached photo
        #[arg(long)]
        photo: Option<String>,
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,
    },
    /// Record a reduction, clamped so the day total never goes negative
    Reduce {
        name: String,
        /// How much to take back; must be positive
        amount: Decimal,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List a day's entries, newest first
    List {
        name: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct EntryRow<'a> {
    amount: Decimal,
    logged_at: chrono::DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<GeoPoint>,
}

fn resolve_day(
    date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    let day = date.unwrap_or(today);
    if day > today {
        return Err("unable to log future days".into());
    }
    Ok(day)
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = LimitStore::open()?;
    let mut collection = LimitCollection::from_limits(store.load_all()?);
    let today = super::today();

    match action {
        LogAction::Add {
            name,
            amount,
            date,
            photo,
            latitude,
            longitude,
        } => {
            if amount.is_zero() {
                return Err(ValidationError::ZeroAmount.into());
            }
            let day = resolve_day(date, today)?;
            let limit = collection
                .get_mut(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;

            let mut entry = LogEntry::new(amount, Utc::now());
            if let Some(photo) = photo {
                entry = entry.with_photo(photo);
            }
            if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                entry = entry.with_location(GeoPoint {
                    latitude,
                    longitude,
                });
            }
            limit.append_log(day, entry);
            store.save(limit)?;

            println!(
                "{} {} logged, {}",
                limit.units_logged(day),
                limit.units_name(),
                limit.progress_summary(day).to_lowercase()
            );
        }
        LogAction::Reduce { name, amount, date } => {
            if amount <= Decimal::ZERO {
                return Err(ValidationError::InvalidValue {
                    field: "amount".into(),
                    message: "reductions must be positive".into(),
                }
                .into());
            }
            let day = resolve_day(date, today)?;
            let limit = collection
                .get_mut(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;

            // The clamp runs here, at the call site; the engine records
            // whatever delta it is handed.
            let delta = reduction_delta(limit.units_logged(day), amount);
            if delta.is_zero() {
                println!("Nothing logged for {day}, nothing to reduce");
                return Ok(());
            }
            limit.append_log(day, LogEntry::new(delta, Utc::now()));
            store.save(limit)?;

            println!(
                "{} {} logged after reduction",
                limit.units_logged(day),
                limit.units_name()
            );
        }
        LogAction::List { name, date } => {
            let day = resolve_day(date, today)?;
            let limit = collection
                .get(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;

            let rows: Vec<EntryRow> = limit
                .ledger(day)
                .map(|ledger| {
                    ledger
                        .entries
                        .iter()
                        .rev()
                        .map(|e| EntryRow {
                            amount: e.amount,
                            logged_at: e.logged_at,
                            photo: e.photo.as_deref(),
                            location: e.location,
                        })
                        .collect()
                })
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
