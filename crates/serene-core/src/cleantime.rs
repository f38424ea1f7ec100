//! Global clean-time tracking.
//!
//! A single device-wide marker, independent of per-limit streaks: the user
//! may reset their clean date explicitly, and the streak is measured from
//! the most recent reset. Resets append to a history; the latest record is
//! the current clean date.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Append-only history of clean-date resets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanTime {
    resets: Vec<DateTime<Utc>>,
}

impl CleanTime {
    pub fn new() -> Self {
        Self { resets: Vec::new() }
    }

    pub fn from_resets(resets: Vec<DateTime<Utc>>) -> Self {
        Self { resets }
    }

    pub fn resets(&self) -> &[DateTime<Utc>] {
        &self.resets
    }

    /// Current clean date, if one has ever been recorded.
    pub fn current(&self) -> Option<DateTime<Utc>> {
        self.resets.last().copied()
    }

    /// Current clean date, lazily initialized to `now` on first use.
    /// Callers that persist the history should save after this returns a
    /// freshly initialized date.
    pub fn current_or_init(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.resets.last() {
            Some(date) => *date,
            None => {
                self.resets.push(now);
                now
            }
        }
    }

    /// Record a new clean date. Future dates are rejected before the
    /// history changes.
    pub fn reset(&mut self, date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if date > now {
            return Err(ValidationError::FutureCleanDate);
        }
        self.resets.push(date);
        Ok(())
    }

    /// Clean streak between the current clean date and `today`, rendered
    /// as the most significant non-zero unit: years, months, weeks or
    /// days.
    pub fn streak_label(&self, today: NaiveDate) -> String {
        match self.current() {
            Some(clean) => format_span(clean.date_naive(), today),
            None => "0 days".to_string(),
        }
    }
}

/// Most-significant-unit span between two days: "2 years", "3 weeks",
/// "1 day". Months and years are calendar-accurate, not 30/365-day
/// approximations.
fn format_span(from: NaiveDate, to: NaiveDate) -> String {
    let days = to.signed_duration_since(from).num_days().max(0);
    let months = whole_months_between(from, to) as i64;
    let years = months / 12;

    if years >= 1 {
        plural(years, "year")
    } else if months >= 1 {
        plural(months, "month")
    } else if days >= 7 {
        plural(days / 7, "week")
    } else {
        plural(days, "day")
    }
}

fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let raw = (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if raw <= 0 {
        return 0;
    }
    let mut months = raw as u32;
    // Back off while the partial month has not completed yet.
    while months > 0 {
        let advanced = from.checked_add_months(Months::new(months));
        match advanced {
            Some(date) if date <= to => break,
            _ => months -= 1,
        }
    }
    months
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day(y, m, d).and_time(chrono::NaiveTime::MIN))
    }

    #[test]
    fn initializes_lazily_and_keeps_the_first_date() {
        let mut clean = CleanTime::new();
        assert!(clean.current().is_none());

        let now = at(2024, 3, 1);
        assert_eq!(clean.current_or_init(now), now);
        // A second call does not re-initialize.
        assert_eq!(clean.current_or_init(at(2024, 4, 1)), now);
        assert_eq!(clean.resets().len(), 1);
    }

    #[test]
    fn latest_reset_wins() {
        let mut clean = CleanTime::new();
        let now = at(2024, 6, 1);
        clean.reset(at(2024, 3, 1), now).unwrap();
        clean.reset(at(2024, 5, 1), now).unwrap();
        assert_eq!(clean.current(), Some(at(2024, 5, 1)));
        assert_eq!(clean.resets().len(), 2);
    }

    #[test]
    fn future_resets_are_rejected() {
        let mut clean = CleanTime::new();
        let now = at(2024, 3, 1);
        let err = clean.reset(at(2024, 3, 2), now).unwrap_err();
        assert!(matches!(err, ValidationError::FutureCleanDate));
        assert!(clean.current().is_none());
    }

    #[test]
    fn streak_label_picks_the_most_significant_unit() {
        let mut clean = CleanTime::new();
        let now = at(2024, 1, 1);
        clean.reset(now, now).unwrap();

        assert_eq!(clean.streak_label(day(2024, 1, 1)), "0 days");
        assert_eq!(clean.streak_label(day(2024, 1, 2)), "1 day");
        assert_eq!(clean.streak_label(day(2024, 1, 7)), "6 days");
        assert_eq!(clean.streak_label(day(2024, 1, 8)), "1 week");
        assert_eq!(clean.streak_label(day(2024, 1, 22)), "3 weeks");
        assert_eq!(clean.streak_label(day(2024, 2, 1)), "1 month");
        assert_eq!(clean.streak_label(day(2024, 11, 20)), "10 months");
        assert_eq!(clean.streak_label(day(2025, 1, 1)), "1 year");
        assert_eq!(clean.streak_label(day(2026, 3, 1)), "2 years");
    }

    #[test]
    fn partial_months_do_not_count() {
        assert_eq!(format_span(day(2023, 1, 31), day(2023, 2, 27)), "3 weeks");
        // Month-end clamping: Jan 31 + 1 month lands on Feb 28, so the
        // last day of February completes the month.
        assert_eq!(format_span(day(2023, 1, 31), day(2023, 2, 28)), "1 month");
        assert_eq!(format_span(day(2023, 1, 15), day(2023, 2, 14)), "4 weeks");
        assert_eq!(format_span(day(2023, 1, 15), day(2023, 2, 15)), "1 month");
    }

    #[test]
    fn empty_history_reads_as_zero_days() {
        let clean = CleanTime::new();
        assert_eq!(clean.streak_label(day(2024, 1, 1)), "0 days");
    }
}
