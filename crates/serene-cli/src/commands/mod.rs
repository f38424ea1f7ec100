pub mod clean;
pub mod config;
pub mod data;
pub mod game;
pub mod limit;
pub mod log;

use chrono::{Local, NaiveDate};

/// Today in the local calendar; every command resolves it once.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
