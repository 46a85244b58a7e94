//! Library item catalog repository

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{CatalogError, read_rows};

pub const LIBRARY_ITEMS_CSV: &str = "library_items.csv";

/// Raw row from `library_items.csv`; only the columns the exporter needs
#[derive(Debug, Clone, Deserialize)]
struct LibraryItemRow {
    #[serde(default)]
    id: String,
    #[serde(rename = "libraryId", default)]
    library_id: String,
    #[serde(rename = "mediaType", default)]
    media_type: String,
    #[serde(rename = "isMissing", default)]
    is_missing: String,
    #[serde(rename = "relPath", default)]
    rel_path: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "authorNamesFirstLast", default)]
    author_names_first_last: String,
}

impl LibraryItemRow {
    fn is_present_book_in(&self, library_id: &str) -> bool {
        self.library_id == library_id
            && self.media_type == "book"
            && matches!(self.is_missing.as_str(), "0" | "false" | "False")
    }
}

/// A book item as exposed to the exporter and matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: String,
    /// Human-readable path relative to the library root, possibly empty
    pub relative_path: String,
    pub title: String,
    /// One or more comma-separated author names
    pub author: String,
}

impl From<LibraryItemRow> for LibraryItem {
    fn from(row: LibraryItemRow) -> Self {
        Self {
            id: row.id,
            relative_path: row.rel_path,
            title: row.title,
            author: row.author_names_first_last,
        }
    }
}

pub struct ItemRepository {
    path: PathBuf,
}

impl ItemRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the present book items of a library, in file order
    pub fn list_by_library(&self, library_id: &str) -> Result<Vec<LibraryItem>, CatalogError> {
        let rows: Vec<LibraryItemRow> = read_rows(&self.path)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.is_present_book_in(library_id))
            .map(LibraryItem::from)
            .collect())
    }
}
