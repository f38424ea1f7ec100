use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use serene_core::storage::Config;
use serene_core::{Category, DayCursor, Limit, LimitCollection, LimitStatus, LimitStore, Period};

#[derive(Subcommand)]
pub enum LimitAction {
    /// Create a new limit
    Add {
        name: String,
        /// food, drug or activity
        #[arg(long)]
        category: String,
        /// Per-day quota; must be greater than zero
        #[arg(long)]
        quota: Decimal,
        /// Units label; defaults to the first preset for the category
        #[arg(long)]
        units: Option<String>,
        /// daily, weekly, monthly or yearly
        #[arg(long, default_value = "daily")]
        period: String,
        #[arg(long)]
        icon: Option<String>,
    },
    /// List limits, optionally restricted to one category
    List {
        /// food, drug or activity
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one limit's progress for a day
    Show {
        name: String,
        /// Step the day cursor back this many days from today
        #[arg(long, default_value_t = 0)]
        back: u32,
    },
    /// Rename a limit
    Rename { name: String, new_name: String },
    /// Change a limit's quota for future days
    SetQuota { name: String, quota: Decimal },
    /// Change a limit's units label
    SetUnits { name: String, units: String },
    /// Delete a limit and every logged day with it
    Delete { name: String },
}

fn parse_category(tag: &str) -> Result<Category, Box<dyn std::error::Error>> {
    Category::from_tag(tag)
        .ok_or_else(|| format!("unknown category '{tag}', expected food, drug or activity").into())
}

fn parse_period(tag: &str) -> Result<Period, Box<dyn std::error::Error>> {
    Period::from_tag(tag).ok_or_else(|| {
        format!("unknown period '{tag}', expected daily, weekly, monthly or yearly").into()
    })
}

#[derive(Serialize)]
struct LimitRow<'a> {
    name: &'a str,
    category: &'a str,
    quota: Decimal,
    units: &'a str,
    period: &'a str,
    status: LimitStatus,
    summary: String,
}

#[derive(Serialize)]
struct LimitReport<'a> {
    name: &'a str,
    category: &'a str,
    units: &'a str,
    quota: Decimal,
    period: &'a str,
    icon: &'a str,
    date: NaiveDate,
    logged: Decimal,
    remaining: Decimal,
    percent: Decimal,
    status: LimitStatus,
    summary: String,
    days_since_relapse: i64,
    total_points: Decimal,
}

impl<'a> LimitReport<'a> {
    fn for_day(limit: &'a Limit, date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            name: limit.name(),
            category: limit.category.as_str(),
            units: limit.units_name(),
            quota: limit.quota(),
            period: limit.period.as_str(),
            icon: limit.icon.as_str(),
            date,
            logged: limit.units_logged(date),
            remaining: limit.units_remaining(date),
            percent: limit.progress_percent(date),
            status: limit.status(date),
            summary: limit.progress_summary(date),
            days_since_relapse: limit.days_since_relapse(date),
            total_points: limit.total_points(today),
        }
    }
}

pub fn run(action: LimitAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = LimitStore::open()?;
    let mut collection = LimitCollection::from_limits(store.load_all()?);
    let today = super::today();

    match action {
        LimitAction::Add {
            name,
            category,
            quota,
            units,
            period,
            icon,
        } => {
            let category = parse_category(&category)?;
            let period = parse_period(&period)?;
            let config = Config::load_or_default();
            let units = units.unwrap_or_else(|| config.default_units_for(category).to_string());
            let icon = icon.unwrap_or_else(|| config.default_icon.clone());

            let limit = Limit::new(name, category, units, quota, period, icon, Utc::now())?;
            let name = limit.name().to_string();
            // The duplicate gate runs before the store sees anything.
            collection.add(limit)?;
            if let Some(limit) = collection.get(&name) {
                store.save(limit)?;
            }
            println!("Created limit '{name}'");
        }
        LimitAction::List { category } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let rows: Vec<LimitRow> = collection
                .limits()
                .iter()
                .filter(|l| category.map(|c| l.category == c).unwrap_or(true))
                .map(|l| LimitRow {
                    name: l.name(),
                    category: l.category.as_str(),
                    quota: l.quota(),
                    units: l.units_name(),
                    period: l.period.as_str(),
                    status: l.status(today),
                    summary: l.progress_summary(today),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        LimitAction::Show { name, back } => {
            let limit = collection
                .get(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;
            let mut cursor = DayCursor::new(limit, today);
            for _ in 0..back {
                if !cursor.step_back() {
                    break;
                }
            }
            let report = LimitReport::for_day(limit, cursor.selected(), today);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        LimitAction::Rename { name, new_name } => {
            collection.rename(&name, &new_name)?;
            if let Some(limit) = collection.get(&new_name) {
                store.save(limit)?;
            }
            println!("Renamed '{name}' to '{new_name}'");
        }
        LimitAction::SetQuota { name, quota } => {
            let limit = collection
                .get_mut(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;
            limit.set_quota(quota)?;
            store.save(limit)?;
            println!("Set quota for '{name}' to {quota}");
        }
        LimitAction::SetUnits { name, units } => {
            let limit = collection
                .get_mut(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;
            limit.set_units_name(units)?;
            store.save(limit)?;
            println!("Set units for '{name}' to {}", limit.units_name());
        }
        LimitAction::Delete { name } => {
            let removed = collection
                .remove(&name)
                .ok_or_else(|| format!("no limit named '{name}'"))?;
            store.delete(removed.id)?;
            println!("Deleted limit '{}'", removed.name());
        }
    }
    Ok(())
}
