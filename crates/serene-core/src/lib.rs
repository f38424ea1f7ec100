//! # Serene Core Library
//!
//! Core business logic for Serene, a consumption-limit tracker: users
//! define limits (food, drug or activity categories with a quota), log
//! consumption against them day by day, and read back progress, streaks
//! and points. All operations are available via the CLI binary; any GUI
//! is a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Limit model**: plain value aggregates ([`Limit`], [`DayLedger`],
//!   [`LogEntry`]) with lazily created per-day ledgers
//! - **Progress engine**: pure per-day quota arithmetic, relapse streaks
//!   and point scoring, re-derived on every call with no caching
//! - **Collection**: category-partitioned views and the aggregate game
//!   status across all limits
//! - **Storage**: SQLite-backed repository plus TOML configuration; the
//!   domain types hold no storage handles and persist only on command
//! - **Export**: password-protected encrypted containers
//!
//! Amounts are exact decimals end to end; nothing in the engine touches
//! floating point. Everything is synchronous and single-writer: each
//! mutation completes, including its persistence write, before the next
//! operation is accepted.

pub mod cleantime;
pub mod collection;
pub mod error;
pub mod export;
pub mod limit;
pub mod progress;
pub mod storage;

pub use cleantime::CleanTime;
pub use collection::{GameMood, GameStatus, LimitCollection};
pub use error::{CoreError, ExportError, StoreError, ValidationError};
pub use limit::{Category, DayCursor, DayLedger, GeoPoint, Limit, LogEntry, Period};
pub use progress::{reduction_delta, LimitStatus};
pub use storage::{data_dir, Config, LimitStore};
