use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_PRIMARY_TABLE: &str = "school";
pub const DEFAULT_IDENTITY_HEADER: &str = "UnitID";
pub const DATABASE_FILE: &str = "school_data.sqlite";

/// Run settings, optionally read from a JSON file. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database file
    pub database: PathBuf,
    /// Name of the primary table
    pub primary_table: String,
    /// CSV header holding the identity every table shares
    pub identity_header: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            primary_table: DEFAULT_PRIMARY_TABLE.to_string(),
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `table.column` the secondary tables reference
    pub fn foreign_key(&self) -> String {
        format!("{}.{}", self.primary_table, self.identity_header)
    }
}

/// `school_data.sqlite` in the platform data directory, or in the working
/// directory when there is none
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "csv-db-populator")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}
