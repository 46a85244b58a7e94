//! Application configuration management

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::catalog::items::LIBRARY_ITEMS_CSV;
use crate::catalog::libraries::LIBRARIES_CSV;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (only used for log output)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// Directory holding `libraries.csv` and `library_items.csv`
    pub csv_db_path: PathBuf,

    /// Root of the ID-keyed item folders (`<media_root>/<item id>/metadata.json`)
    pub media_root: PathBuf,

    /// Export destination pre-filled in the web form
    pub default_export_path: String,

    /// Whether item listings run the folder-name match check unless told otherwise
    pub match_check: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            csv_db_path: env::var("ABS_CSV_DB_PATH")
                .unwrap_or_else(|_| "/abs-data/csv_db".to_string())
                .into(),

            media_root: env::var("ABS_MEDIA_ROOT")
                .unwrap_or_else(|_| "/media/Audiobooks".to_string())
                .into(),

            default_export_path: env::var("ABS_EXPORT_DEFAULT_PATH")
                .unwrap_or_else(|_| "/exported_audiobooks".to_string()),

            match_check: env::var("ABS_MATCH_CHECK")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }

    /// Path of the libraries table inside the CSV export directory
    pub fn libraries_csv(&self) -> PathBuf {
        self.csv_db_path.join(LIBRARIES_CSV)
    }

    /// Path of the library items table inside the CSV export directory
    pub fn library_items_csv(&self) -> PathBuf {
        self.csv_db_path.join(LIBRARY_ITEMS_CSV)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
