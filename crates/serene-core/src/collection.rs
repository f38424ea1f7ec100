//! The set of all limits for one user, with aggregate game status.
//!
//! Category-partitioned views are derived on demand, never stored. Name
//! uniqueness (case-insensitive) is enforced here, before any persistence
//! write happens.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::limit::{Category, Limit};
use crate::progress::LimitStatus;

/// Aggregate mood across every limit for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMood {
    /// Every limit is under its quota.
    Ok,
    /// At least one limit is exactly at its quota, and none is over.
    Caution,
    /// At least one limit is over its quota. Wins over Caution.
    Over,
}

/// Aggregate game standing across all limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    pub mood: GameMood,
    pub score: i64,
    pub score_label: String,
}

/// Owns every limit for a user and derives category views and game
/// status. Kept sorted by name.
#[derive(Debug, Default, Clone)]
pub struct LimitCollection {
    limits: Vec<Limit>,
}

impl LimitCollection {
    pub fn new() -> Self {
        Self { limits: Vec::new() }
    }

    /// Build from already-validated limits, e.g. loaded from storage.
    pub fn from_limits(mut limits: Vec<Limit>) -> Self {
        limits.sort_by(|a, b| a.name().cmp(b.name()));
        Self { limits }
    }

    pub fn limits(&self) -> &[Limit] {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&Limit> {
        self.limits
            .iter()
            .find(|l| l.name().eq_ignore_ascii_case(name))
    }

    /// Case-insensitive mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Limit> {
        self.limits
            .iter_mut()
            .find(|l| l.name().eq_ignore_ascii_case(name))
    }

    fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a limit, rejecting a case-insensitive duplicate name before
    /// anything is persisted.
    pub fn add(&mut self, limit: Limit) -> Result<(), ValidationError> {
        if self.contains_name(limit.name()) {
            return Err(ValidationError::DuplicateName(limit.name().to_string()));
        }
        self.limits.push(limit);
        self.limits.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(())
    }

    /// Rename a limit, with the same duplicate check as `add`.
    pub fn rename(&mut self, current: &str, new_name: &str) -> Result<(), ValidationError> {
        if !current.eq_ignore_ascii_case(new_name) && self.contains_name(new_name) {
            return Err(ValidationError::DuplicateName(new_name.to_string()));
        }
        let limit = self
            .get_mut(current)
            .ok_or_else(|| ValidationError::UnknownLimit(current.to_string()))?;
        limit.set_name(new_name)?;
        self.limits.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(())
    }

    /// Remove a limit by name, returning it. Removal cascades: the
    /// returned aggregate carries every day ledger and entry with it.
    pub fn remove(&mut self, name: &str) -> Option<Limit> {
        let idx = self
            .limits
            .iter()
            .position(|l| l.name().eq_ignore_ascii_case(name))?;
        Some(self.limits.remove(idx))
    }

    /// Limits in one category, in name order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Limit> {
        self.limits.iter().filter(move |l| l.category == category)
    }

    /// Tri-state mood for `today`: any over-limit limit wins, then any
    /// at-limit, otherwise ok.
    pub fn mood(&self, today: NaiveDate) -> GameMood {
        let mut at_limit = false;
        for limit in &self.limits {
            match limit.status(today) {
                LimitStatus::Over => return GameMood::Over,
                LimitStatus::At => at_limit = true,
                LimitStatus::Under => {}
            }
        }
        if at_limit {
            GameMood::Caution
        } else {
            GameMood::Ok
        }
    }

    /// Whole-number game score: `round(total points / 100 * 1000)`, half
    /// away from zero.
    pub fn game_score(&self, today: NaiveDate) -> i64 {
        let total: Decimal = self.limits.iter().map(|l| l.total_points(today)).sum();
        (total / Decimal::ONE_HUNDRED * Decimal::ONE_THOUSAND)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX) // saturate on overflow
    }

    /// Score rendered with point/points pluralization.
    pub fn score_label(&self, today: NaiveDate) -> String {
        let score = self.game_score(today);
        match score {
            0 => "You Have No Points".to_string(),
            1 => "1 point".to_string(),
            n => format!("{n} points"),
        }
    }

    /// Mood, score and label bundled for display.
    pub fn game_status(&self, today: NaiveDate) -> GameStatus {
        GameStatus {
            mood: self.mood(today),
            score: self.game_score(today),
            score_label: self.score_label(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit::{LogEntry, Period};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_limit(name: &str, category: Category, quota: Decimal) -> Limit {
        let created_at = Utc
            .from_utc_datetime(&day(2024, 3, 1).and_time(chrono::NaiveTime::MIN));
        Limit::new(name, category, "Units", quota, Period::Daily, "", created_at).unwrap()
    }

    fn log(limit: &mut Limit, day: NaiveDate, amount: Decimal) {
        limit.append_log(day, LogEntry::new(amount, Utc::now()));
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut collection = LimitCollection::new();
        collection
            .add(make_limit("Coffee", Category::Food, dec!(3)))
            .unwrap();
        let err = collection
            .add(make_limit("coffee", Category::Drug, dec!(1)))
            .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateName(_)));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn rename_checks_duplicates_but_allows_case_changes() {
        let mut collection = LimitCollection::new();
        collection
            .add(make_limit("Coffee", Category::Food, dec!(3)))
            .unwrap();
        collection
            .add(make_limit("Beer", Category::Food, dec!(2)))
            .unwrap();

        assert!(matches!(
            collection.rename("Beer", "COFFEE"),
            Err(ValidationError::DuplicateName(_))
        ));
        // Re-casing a limit's own name is not a collision.
        collection.rename("Coffee", "COFFEE").unwrap();
        assert!(collection.get("coffee").is_some());

        assert!(matches!(
            collection.rename("Tea", "Chai"),
            Err(ValidationError::UnknownLimit(_))
        ));
    }

    #[test]
    fn limits_stay_sorted_by_name() {
        let mut collection = LimitCollection::new();
        collection
            .add(make_limit("Wine", Category::Food, dec!(1)))
            .unwrap();
        collection
            .add(make_limit("Beer", Category::Food, dec!(2)))
            .unwrap();
        let names: Vec<_> = collection.limits().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["Beer", "Wine"]);
    }

    #[test]
    fn category_views_partition_the_collection() {
        let mut collection = LimitCollection::new();
        collection
            .add(make_limit("Coffee", Category::Food, dec!(3)))
            .unwrap();
        collection
            .add(make_limit("Cannabis", Category::Drug, dec!(1)))
            .unwrap();
        collection
            .add(make_limit("Runs", Category::Activity, dec!(1)))
            .unwrap();

        assert_eq!(collection.in_category(Category::Food).count(), 1);
        assert_eq!(collection.in_category(Category::Drug).count(), 1);
        assert_eq!(collection.in_category(Category::Activity).count(), 1);
    }

    #[test]
    fn mood_prioritizes_over_then_caution() {
        let today = day(2024, 3, 2);
        let mut collection = LimitCollection::new();

        let mut at = make_limit("At", Category::Food, dec!(2));
        log(&mut at, today, dec!(2));
        let mut over = make_limit("Over", Category::Food, dec!(2));
        log(&mut over, today, dec!(3));
        let under = make_limit("Under", Category::Food, dec!(2));

        collection.add(under).unwrap();
        assert_eq!(collection.mood(today), GameMood::Ok);

        collection.add(at).unwrap();
        assert_eq!(collection.mood(today), GameMood::Caution);

        collection.add(over).unwrap();
        assert_eq!(collection.mood(today), GameMood::Over);
    }

    #[test]
    fn game_score_rounds_the_scaled_point_total() {
        let today = day(2024, 3, 3);
        let mut collection = LimitCollection::new();

        // 60 points on one past day: 60 / 100 * 1000 = 600.
        let mut limit = make_limit("Coffee", Category::Food, dec!(10));
        log(&mut limit, day(2024, 3, 2), dec!(4));
        collection.add(limit).unwrap();

        assert_eq!(collection.game_score(today), 600);
        assert_eq!(collection.score_label(today), "600 points");
    }

    #[test]
    fn empty_collection_has_no_points() {
        let collection = LimitCollection::new();
        let today = day(2024, 3, 2);
        assert_eq!(collection.game_score(today), 0);
        assert_eq!(collection.score_label(today), "You Have No Points");
        assert_eq!(collection.mood(today), GameMood::Ok);
    }

    #[test]
    fn remove_cascades_the_whole_aggregate() {
        let mut collection = LimitCollection::new();
        let mut limit = make_limit("Coffee", Category::Food, dec!(3));
        log(&mut limit, day(2024, 3, 2), dec!(1));
        collection.add(limit).unwrap();

        let removed = collection.remove("coffee").unwrap();
        assert_eq!(removed.ledgers().len(), 1);
        assert!(collection.is_empty());
        assert!(collection.remove("coffee").is_none());
    }
}
