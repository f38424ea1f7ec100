mod config;
pub mod database;

pub use config::Config;
pub use database::LimitStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Returns `~/.config/serene[-dev]/` based on SERENE_ENV, or the
/// directory named by SERENE_DATA_DIR when set.
///
/// Set SERENE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    if let Ok(dir) = std::env::var("SERENE_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SERENE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("serene-dev")
    } else {
        base_dir.join("serene")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
    Ok(dir)
}
