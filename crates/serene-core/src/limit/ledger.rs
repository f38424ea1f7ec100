//! One calendar day's logged entries and quota snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LogEntry;

/// The logged entries attributed to one calendar day for one limit.
///
/// At most one ledger exists per (limit, day). Ledgers are created lazily
/// on first write touching a day and appended to indefinitely; they are
/// only removed when the owning limit is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLedger {
    /// Calendar day this ledger covers.
    pub date: NaiveDate,
    /// Entries in recording order, which is not necessarily timestamp
    /// order.
    pub entries: Vec<LogEntry>,
    /// Quota in effect when this ledger was created. Later quota edits on
    /// the owning limit do not rewrite this snapshot.
    pub quota_snapshot: Decimal,
}

impl DayLedger {
    pub fn new(date: NaiveDate, quota_snapshot: Decimal) -> Self {
        Self {
            date,
            entries: Vec::new(),
            quota_snapshot,
        }
    }

    /// Total units logged for the day: the sum of every entry amount.
    pub fn units_logged(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_ledger_logs_zero() {
        let ledger = DayLedger::new(day(2024, 3, 1), dec!(3));
        assert_eq!(ledger.units_logged(), Decimal::ZERO);
    }

    #[test]
    fn units_logged_sums_mixed_signs() {
        let mut ledger = DayLedger::new(day(2024, 3, 1), dec!(10));
        for amount in [dec!(2.5), dec!(4), dec!(-1.5)] {
            ledger.entries.push(LogEntry::new(amount, Utc::now()));
        }
        assert_eq!(ledger.units_logged(), dec!(5.0));
    }

    #[test]
    fn amounts_survive_json_round_trip_exactly() {
        let mut ledger = DayLedger::new(day(2024, 3, 1), dec!(1.10));
        ledger.entries.push(LogEntry::new(dec!(0.30), Utc::now()));
        let json = serde_json::to_string(&ledger).unwrap();
        let decoded: DayLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, ledger);
        // Scale is preserved: 0.30 stays "0.30", not "0.3".
        assert!(json.contains("\"0.30\""));
        assert!(json.contains("\"1.10\""));
    }
}
