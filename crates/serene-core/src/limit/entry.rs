//! A single recorded consumption delta.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Geographic coordinate optionally attached to a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One recorded consumption delta against a limit.
///
/// Entries are immutable once appended: corrections are recorded as new
/// entries with a negative amount, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Signed quantity; positive is consumption, negative is a correction.
    pub amount: Decimal,
    /// Wall-clock time the entry was recorded.
    pub logged_at: DateTime<Utc>,
    /// Opaque reference to an attached photo. Never interpreted by the
    /// engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Where the entry was recorded, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl LogEntry {
    pub fn new(amount: Decimal, logged_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            logged_at,
            photo: None,
            location: None,
        }
    }

    /// Attach a photo reference.
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Attach a recording location.
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}
