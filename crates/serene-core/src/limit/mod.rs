//! Limit aggregate: log entries, day ledgers and the limit itself.

mod entry;
mod ledger;

pub use entry::{GeoPoint, LogEntry};
pub use ledger::DayLedger;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Consumption category. Closed set: an unrecognized tag is a decode
/// error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Drug,
    Activity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drug => "drug",
            Category::Activity => "activity",
        }
    }

    /// Strict tag parse; `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "food" => Some(Category::Food),
            "drug" => Some(Category::Drug),
            "activity" => Some(Category::Activity),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quota period. Stored and displayed only: every progress computation is
/// per-day regardless of the configured period (period rollup is
/// deliberately unimplemented).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// Strict tag parse; `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            "yearly" => Some(Period::Yearly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined quota target for a category of consumption.
///
/// A limit owns its day ledgers in creation order, keyed conceptually by
/// calendar day (at most one ledger per day). All derived progress and
/// streak figures live in [`crate::progress`] and are recomputed on every
/// call; the aggregate itself is a plain value with no storage handle, and
/// a repository persists it on command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub id: Uuid,
    name: String,
    pub category: Category,
    units_name: String,
    quota: Decimal,
    pub period: Period,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    ledgers: Vec<DayLedger>,
}

impl Limit {
    /// Create a new limit, validating name, units label and quota before
    /// anything else sees it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        category: Category,
        units_name: impl Into<String>,
        quota: Decimal,
        period: Period,
        icon: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let units_name = units_name.into();
        validate_name(&name)?;
        validate_units_name(&units_name)?;
        validate_quota(quota)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            category,
            units_name,
            quota,
            period,
            icon: icon.into(),
            created_at,
            ledgers: Vec::new(),
        })
    }

    /// Reassemble a limit from stored parts, re-checking the same
    /// invariants `new` enforces.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        name: String,
        category: Category,
        units_name: String,
        quota: Decimal,
        period: Period,
        icon: String,
        created_at: DateTime<Utc>,
        ledgers: Vec<DayLedger>,
    ) -> Result<Self, ValidationError> {
        validate_name(&name)?;
        validate_units_name(&units_name)?;
        validate_quota(quota)?;
        Ok(Self {
            id,
            name,
            category,
            units_name,
            quota,
            period,
            icon,
            created_at,
            ledgers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units_name(&self) -> &str {
        &self.units_name
    }

    pub fn quota(&self) -> Decimal {
        self.quota
    }

    /// Day ledgers in creation order.
    pub fn ledgers(&self) -> &[DayLedger] {
        &self.ledgers
    }

    /// Calendar day the limit was created; lower anchor for streaks.
    pub fn creation_day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Rename the limit. Uniqueness against sibling limits is the
    /// collection's responsibility.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_units_name(&mut self, units_name: impl Into<String>) -> Result<(), ValidationError> {
        let units_name = units_name.into();
        validate_units_name(&units_name)?;
        self.units_name = units_name;
        Ok(())
    }

    /// Change the quota. Applies to ledgers created from now on; existing
    /// snapshots keep the value they were created with.
    pub fn set_quota(&mut self, quota: Decimal) -> Result<(), ValidationError> {
        validate_quota(quota)?;
        self.quota = quota;
        Ok(())
    }

    /// Find the ledger for `day`, if one has been created.
    pub fn ledger(&self, day: NaiveDate) -> Option<&DayLedger> {
        self.ledgers.iter().find(|l| l.date == day)
    }

    /// Find or lazily create the ledger for `day`.
    ///
    /// Creation snapshots the current quota and appends the ledger to the
    /// storage order. Any call counts as a write: durable callers should
    /// persist the limit afterwards.
    pub fn ledger_mut(&mut self, day: NaiveDate) -> &mut DayLedger {
        match self.ledgers.iter().position(|l| l.date == day) {
            Some(idx) => &mut self.ledgers[idx],
            None => {
                self.ledgers.push(DayLedger::new(day, self.quota));
                let last = self.ledgers.len() - 1;
                &mut self.ledgers[last]
            }
        }
    }

    /// Append a log entry to `day`'s ledger.
    ///
    /// A zero amount is a no-op and records nothing, not even an empty
    /// entry. Reduction clamping happens at the call site (see
    /// [`crate::progress::reduction_delta`]); amounts arrive here already
    /// final.
    pub fn append_log(&mut self, day: NaiveDate, entry: LogEntry) {
        if entry.amount.is_zero() {
            return;
        }
        self.ledger_mut(day).entries.push(entry);
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn validate_units_name(units_name: &str) -> Result<(), ValidationError> {
    if units_name.trim().is_empty() {
        return Err(ValidationError::EmptyUnitsName);
    }
    Ok(())
}

fn validate_quota(quota: Decimal) -> Result<(), ValidationError> {
    if quota <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuota(quota));
    }
    Ok(())
}

/// Day-by-day navigation over a limit's history.
///
/// The selected day starts at today and steps one day at a time, bounded
/// inclusively by `[creation day + 1, today]`; steps outside the range are
/// refused rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCursor {
    selected: NaiveDate,
    lower: NaiveDate,
    upper: NaiveDate,
}

impl DayCursor {
    pub fn new(limit: &Limit, today: NaiveDate) -> Self {
        let lower = limit
            .creation_day()
            .checked_add_days(Days::new(1))
            .unwrap_or(today);
        Self {
            selected: today,
            lower,
            upper: today,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn can_step_back(&self) -> bool {
        self.selected > self.lower
    }

    pub fn can_step_forward(&self) -> bool {
        self.selected < self.upper
    }

    /// Move one day back; returns whether the cursor moved.
    pub fn step_back(&mut self) -> bool {
        if !self.can_step_back() {
            return false;
        }
        if let Some(prev) = self.selected.checked_sub_days(Days::new(1)) {
            self.selected = prev;
            return true;
        }
        false
    }

    /// Move one day forward; returns whether the cursor moved.
    pub fn step_forward(&mut self) -> bool {
        if !self.can_step_forward() {
            return false;
        }
        if let Some(next) = self.selected.checked_add_days(Days::new(1)) {
            self.selected = next;
            return true;
        }
        false
    }
}
