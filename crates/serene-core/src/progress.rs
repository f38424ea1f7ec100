//! Progress, streak and point queries over a limit's day ledgers.
//!
//! Every figure here is a pure re-derivation from the ledgers; nothing is
//! cached between calls. Day-level queries treat a day with no ledger as
//! zero units logged, so reads never create ledgers as a side effect.
//! Queries that depend on "today" take it as an argument instead of
//! consulting the wall clock.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::limit::Limit;

/// Where a day's logged total stands relative to the quota.
///
/// Exhaustive and mutually exclusive: strictly below, exactly equal, or
/// strictly above. The equal case is its own state and drives the caution
/// coloring, so the comparison is exact, not `<=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    /// Logged total is strictly below the quota.
    Under,
    /// Logged total equals the quota exactly.
    At,
    /// Logged total exceeds the quota. Days in this state are relapses.
    Over,
}

impl Limit {
    /// Units logged on `day`; zero when no ledger exists for the day.
    pub fn units_logged(&self, day: NaiveDate) -> Decimal {
        self.ledger(day)
            .map(|l| l.units_logged())
            .unwrap_or(Decimal::ZERO)
    }

    /// Units still available on `day`. Negative once the quota is
    /// exceeded.
    pub fn units_remaining(&self, day: NaiveDate) -> Decimal {
        self.quota() - self.units_logged(day)
    }

    /// Fraction of the quota consumed on `day`. May exceed one. The quota
    /// is guaranteed positive at every edit boundary, so the division is
    /// total.
    pub fn progress_ratio(&self, day: NaiveDate) -> Decimal {
        self.units_logged(day) / self.quota()
    }

    /// Classify `day` by its progress ratio.
    pub fn status(&self, day: NaiveDate) -> LimitStatus {
        let ratio = self.progress_ratio(day);
        if ratio < Decimal::ONE {
            LimitStatus::Under
        } else if ratio == Decimal::ONE {
            LimitStatus::At
        } else {
            LimitStatus::Over
        }
    }

    /// Date of the first stored over-limit day at or before `from`.
    ///
    /// The scan runs over the ledgers in storage order and the first match
    /// wins, so with out-of-order ledger creation this is not necessarily
    /// the most recent such day.
    pub fn last_over_limit_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.ledgers()
            .iter()
            .find(|l| l.units_logged() > self.quota() && l.date <= from)
            .map(|l| l.date)
    }

    /// Whole days of streak measured at `from`: the distance to the last
    /// over-limit day, or to the creation day when none is recorded.
    pub fn days_since_relapse(&self, from: NaiveDate) -> i64 {
        let anchor = self
            .last_over_limit_date(from)
            .unwrap_or_else(|| self.creation_day());
        from.signed_duration_since(anchor).num_days()
    }

    /// A day earns points when it has at least one entry, is not over the
    /// limit, and lies strictly in the past.
    pub fn eligible_for_points(&self, day: NaiveDate, today: NaiveDate) -> bool {
        let Some(ledger) = self.ledger(day) else {
            return false;
        };
        !ledger.entries.is_empty() && self.status(day) != LimitStatus::Over && day < today
    }

    /// Points earned for `day`: `(1 - progress ratio) * 100` when the day
    /// is eligible, zero otherwise. An exactly at-limit day is eligible
    /// but earns zero; an over-limit day is never eligible.
    pub fn points_for_day(&self, day: NaiveDate, today: NaiveDate) -> Decimal {
        if !self.eligible_for_points(day, today) {
            return Decimal::ZERO;
        }
        (Decimal::ONE - self.progress_ratio(day)) * Decimal::ONE_HUNDRED
    }

    /// Sum of points across every recorded day.
    pub fn total_points(&self, today: NaiveDate) -> Decimal {
        self.ledgers()
            .iter()
            .map(|l| self.points_for_day(l.date, today))
            .sum()
    }

    /// One-line progress summary for `day`.
    pub fn progress_summary(&self, day: NaiveDate) -> String {
        match self.status(day) {
            LimitStatus::At => "You Are At Your Limit".to_string(),
            LimitStatus::Under => format!(
                "{} {} Are Still Left",
                self.units_remaining(day),
                self.units_name()
            ),
            LimitStatus::Over => format!(
                "You Are Over By {} {}",
                -self.units_remaining(day),
                self.units_name()
            ),
        }
    }

    /// Progress percentage rounded to one decimal place for display.
    pub fn progress_percent(&self, day: NaiveDate) -> Decimal {
        (self.progress_ratio(day) * Decimal::ONE_THOUSAND)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            / Decimal::TEN
    }
}

/// Clamped delta for a requested reduction against the current day total.
///
/// The engine itself never clamps; callers compute the delta with this
/// rule and pass the result to `append_log`. When the requested reduction
/// would push the running total negative, the delta brings it to exactly
/// zero instead.
pub fn reduction_delta(current_total: Decimal, requested: Decimal) -> Decimal {
    if current_total - requested < Decimal::ZERO {
        -current_total
    } else {
        -requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit::{Category, LogEntry, Period};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn limit_with_quota(quota: Decimal, created: NaiveDate) -> Limit {
        let created_at = Utc.from_utc_datetime(&created.and_time(chrono::NaiveTime::MIN));
        Limit::new(
            "Coffee",
            Category::Food,
            "Cups",
            quota,
            Period::Daily,
            "cup.and.saucer",
            created_at,
        )
        .unwrap()
    }

    fn log(limit: &mut Limit, day: NaiveDate, amount: Decimal) {
        limit.append_log(day, LogEntry::new(amount, Utc::now()));
    }

    #[test]
    fn status_trichotomy_is_exact_at_the_boundary() {
        let created = day(2024, 3, 1);
        let d = day(2024, 3, 2);

        let mut limit = limit_with_quota(dec!(3), created);
        log(&mut limit, d, dec!(2.99));
        assert_eq!(limit.status(d), LimitStatus::Under);

        log(&mut limit, d, dec!(0.01));
        assert_eq!(limit.status(d), LimitStatus::At);
        assert_eq!(limit.units_remaining(d), Decimal::ZERO);

        log(&mut limit, d, dec!(1));
        assert_eq!(limit.status(d), LimitStatus::Over);
        assert_eq!(limit.units_remaining(d), dec!(-1));
    }

    #[test]
    fn missing_ledger_reads_as_zero() {
        let limit = limit_with_quota(dec!(3), day(2024, 3, 1));
        let d = day(2024, 3, 5);
        assert_eq!(limit.units_logged(d), Decimal::ZERO);
        assert_eq!(limit.units_remaining(d), dec!(3));
        assert_eq!(limit.status(d), LimitStatus::Under);
        // Reads never create a ledger.
        assert!(limit.ledgers().is_empty());
    }

    #[test]
    fn points_for_an_under_limit_past_day() {
        let mut limit = limit_with_quota(dec!(10), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(4));
        assert_eq!(limit.points_for_day(d, day(2024, 3, 3)), dec!(60));
    }

    #[test]
    fn at_limit_day_earns_zero_points() {
        let mut limit = limit_with_quota(dec!(10), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(10));
        assert!(limit.eligible_for_points(d, day(2024, 3, 3)));
        assert_eq!(limit.points_for_day(d, day(2024, 3, 3)), Decimal::ZERO);
    }

    #[test]
    fn over_limit_day_is_ineligible() {
        let mut limit = limit_with_quota(dec!(10), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(12));
        assert!(!limit.eligible_for_points(d, day(2024, 3, 3)));
        assert_eq!(limit.points_for_day(d, day(2024, 3, 3)), Decimal::ZERO);
    }

    #[test]
    fn today_and_empty_days_earn_nothing() {
        let mut limit = limit_with_quota(dec!(10), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(4));
        // Same-day totals never score, no matter how far under.
        assert_eq!(limit.points_for_day(d, d), Decimal::ZERO);
        // A ledger with no entries never scores either.
        limit.ledger_mut(day(2024, 3, 3));
        assert_eq!(
            limit.points_for_day(day(2024, 3, 3), day(2024, 3, 4)),
            Decimal::ZERO
        );
    }

    #[test]
    fn total_points_skips_ineligible_days() {
        let mut limit = limit_with_quota(dec!(10), day(2024, 3, 1));
        log(&mut limit, day(2024, 3, 2), dec!(4)); // 60 points
        log(&mut limit, day(2024, 3, 3), dec!(12)); // over, 0
        log(&mut limit, day(2024, 3, 4), dec!(5)); // 50 points
        assert_eq!(limit.total_points(day(2024, 3, 5)), dec!(110));
    }

    #[test]
    fn streak_measures_from_creation_when_clean() {
        let created = day(2024, 3, 1);
        let mut limit = limit_with_quota(dec!(3), created);
        log(&mut limit, day(2024, 3, 4), dec!(1));
        let from = day(2024, 3, 10); // creation + 9
        assert_eq!(limit.last_over_limit_date(from), None);
        assert_eq!(limit.days_since_relapse(from), 9);
    }

    #[test]
    fn streak_measures_from_relapse_day() {
        let mut limit = limit_with_quota(dec!(3), day(2024, 3, 1));
        log(&mut limit, day(2024, 3, 4), dec!(4));
        assert_eq!(limit.days_since_relapse(day(2024, 3, 10)), 6);
    }

    #[test]
    fn relapse_scan_is_first_match_in_storage_order() {
        let mut limit = limit_with_quota(dec!(3), day(2024, 3, 1));
        // Logged out of chronological order: the later relapse is stored
        // first, and the scan returns it even though 3/2 is older.
        log(&mut limit, day(2024, 3, 6), dec!(5));
        log(&mut limit, day(2024, 3, 2), dec!(5));
        assert_eq!(
            limit.last_over_limit_date(day(2024, 3, 10)),
            Some(day(2024, 3, 6))
        );
    }

    #[test]
    fn relapse_scan_ignores_days_after_from() {
        let mut limit = limit_with_quota(dec!(3), day(2024, 3, 1));
        log(&mut limit, day(2024, 3, 8), dec!(5));
        assert_eq!(limit.last_over_limit_date(day(2024, 3, 5)), None);
        assert_eq!(limit.days_since_relapse(day(2024, 3, 5)), 4);
        // A relapse on the query day itself counts ("not strictly after").
        assert_eq!(
            limit.last_over_limit_date(day(2024, 3, 8)),
            Some(day(2024, 3, 8))
        );
    }

    #[test]
    fn reduction_clamps_to_zero_total() {
        assert_eq!(reduction_delta(dec!(3), dec!(5)), dec!(-3));
        assert_eq!(reduction_delta(dec!(3), dec!(2)), dec!(-2));
        assert_eq!(reduction_delta(dec!(3), dec!(3)), dec!(-3));
        assert_eq!(reduction_delta(Decimal::ZERO, dec!(4)), Decimal::ZERO);
    }

    #[test]
    fn reduction_applied_through_append_never_goes_negative() {
        let mut limit = limit_with_quota(dec!(10), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(3));
        let delta = reduction_delta(limit.units_logged(d), dec!(5));
        log(&mut limit, d, delta);
        assert_eq!(limit.units_logged(d), Decimal::ZERO);
    }

    #[test]
    fn progress_summary_strings() {
        let mut limit = limit_with_quota(dec!(3), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(1));
        assert_eq!(limit.progress_summary(d), "2 Cups Are Still Left");
        log(&mut limit, d, dec!(2));
        assert_eq!(limit.progress_summary(d), "You Are At Your Limit");
        log(&mut limit, d, dec!(1));
        assert_eq!(limit.progress_summary(d), "You Are Over By 1 Cups");
    }

    #[test]
    fn progress_percent_rounds_to_one_decimal() {
        let mut limit = limit_with_quota(dec!(3), day(2024, 3, 1));
        let d = day(2024, 3, 2);
        log(&mut limit, d, dec!(1));
        assert_eq!(limit.progress_percent(d), dec!(33.3));
        log(&mut limit, d, dec!(1));
        assert_eq!(limit.progress_percent(d), dec!(66.7));
    }

    proptest! {
        #[test]
        fn units_logged_is_the_sum_of_amounts(
            amounts in prop::collection::vec(-1000i64..1000, 0..20)
        ) {
            let mut limit = limit_with_quota(dec!(7), day(2024, 3, 1));
            let d = day(2024, 3, 2);
            let mut expected = Decimal::ZERO;
            for a in amounts {
                let amount = Decimal::from(a);
                log(&mut limit, d, amount);
                expected += amount;
            }
            prop_assert_eq!(limit.units_logged(d), expected);
        }

        #[test]
        fn status_matches_direct_comparison(
            logged in 0i64..200,
            quota in 1i64..100,
        ) {
            let quota = Decimal::from(quota);
            let logged = Decimal::from(logged);
            let mut limit = limit_with_quota(quota, day(2024, 3, 1));
            let d = day(2024, 3, 2);
            log(&mut limit, d, logged);

            let expected = if logged < quota {
                LimitStatus::Under
            } else if logged == quota {
                LimitStatus::At
            } else {
                LimitStatus::Over
            };
            prop_assert_eq!(limit.status(d), expected);
        }
    }
}
