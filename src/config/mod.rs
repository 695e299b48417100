pub mod setting;

pub use setting::Settings;

use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Application data directory, created on first use. Holds the database
/// file and the settings file.
pub fn get_data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .ok_or_else(|| AppError::config("could not determine user data directory"))?
        .join("clipvault");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default path of the SQLite database file.
pub fn get_database_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("clipboard.db"))
}

/// Default path of the settings file.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("settings.json"))
}
