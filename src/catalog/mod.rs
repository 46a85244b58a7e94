//! Read-only catalog backed by the Audiobookshelf CSV export
//!
//! The export directory holds `libraries.csv` and `library_items.csv`. Both are
//! re-read on every request so a fresh export is picked up without a restart.

pub mod items;
pub mod libraries;

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

pub use items::{ItemRepository, LibraryItem};
pub use libraries::{LibraryRecord, LibraryRepository};

/// Errors raised while reading the CSV catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("catalog read task failed: {0}")]
    Task(String),
}

/// Catalog wrapper providing repository access
#[derive(Debug, Clone)]
pub struct Catalog {
    csv_dir: PathBuf,
}

impl Catalog {
    /// Create a catalog over a CSV export directory
    pub fn new(csv_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
        }
    }

    pub fn csv_dir(&self) -> &Path {
        &self.csv_dir
    }

    /// Whether the libraries table is present (used by readiness checks)
    pub fn is_available(&self) -> bool {
        self.csv_dir.join(libraries::LIBRARIES_CSV).is_file()
    }

    pub fn libraries(&self) -> LibraryRepository {
        LibraryRepository::new(self.csv_dir.join(libraries::LIBRARIES_CSV))
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.csv_dir.join(items::LIBRARY_ITEMS_CSV))
    }

    /// Run a catalog read on the blocking pool
    pub async fn read<T, F>(&self, f: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&Catalog) -> Result<T, CatalogError> + Send + 'static,
        T: Send + 'static,
    {
        let catalog = self.clone();
        tokio::task::spawn_blocking(move || f(&catalog))
            .await
            .map_err(|e| CatalogError::Task(e.to_string()))?
    }
}

/// Read every row of a CSV file with a header line.
///
/// A missing file yields no rows. Rows that fail to deserialize are skipped
/// with a warning; a broken header or I/O failure is an error.
pub(crate) fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    if !path.exists() {
        warn!(path = %path.display(), "CSV file does not exist");
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    // Header errors are fatal for the whole file
    reader.headers().map_err(|source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) if e.is_io_error() => {
                return Err(CatalogError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!(path = %path.display(), line = idx + 2, error = %e, "Skipping malformed CSV row");
            }
        }
    }

    Ok(rows)
}
