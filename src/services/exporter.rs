//! Metadata and cover export from the ID-keyed media root
//!
//! Audiobookshelf keeps `metadata.json` and `cover.jpg` under
//! `<media_root>/<item id>/`. Export copies them to
//! `<export_root>/<relative path>/` so they sit next to the audio files in a
//! path-organized tree. Destination folders are only created when there is
//! something to copy.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError, LibraryItem};

pub const METADATA_FILE: &str = "metadata.json";
pub const COVER_FILE: &str = "cover.jpg";

/// Result of copying one file of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FileCopyStatus {
    Copied,
    /// Source and destination are the same file
    Exists,
    /// Not present in the source folder
    Missing,
    Error(String),
    NotApplicable,
}

impl FileCopyStatus {
    /// Whether the destination now holds the file
    pub fn is_present(&self) -> bool {
        matches!(self, FileCopyStatus::Copied | FileCopyStatus::Exists)
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            FileCopyStatus::Copied => "copied",
            FileCopyStatus::Exists => "exists",
            FileCopyStatus::Missing => "missing",
            FileCopyStatus::Error(_) => "error",
            FileCopyStatus::NotApplicable => "info",
        }
    }

    pub fn label(&self) -> String {
        match self {
            FileCopyStatus::Copied => "Copied".to_string(),
            FileCopyStatus::Exists => "Already exists".to_string(),
            FileCopyStatus::Missing => "Missing in source".to_string(),
            FileCopyStatus::Error(e) => format!("Error: {}", e),
            FileCopyStatus::NotApplicable => "N/A".to_string(),
        }
    }
}

/// Overall status of one row in the export results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Success,
    Skipped,
    Error,
    Info,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Success => "success",
            OverallStatus::Skipped => "skipped",
            OverallStatus::Error => "error",
            OverallStatus::Info => "info",
        }
    }
}

/// One row of export results. `item_id` is `None` for export-root messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemExportOutcome {
    pub item_id: Option<String>,
    pub metadata: FileCopyStatus,
    pub cover: FileCopyStatus,
    pub overall: OverallStatus,
    pub message: String,
}

impl ItemExportOutcome {
    fn root_message(overall: OverallStatus, message: String) -> Self {
        Self {
            item_id: None,
            metadata: FileCopyStatus::NotApplicable,
            cover: FileCopyStatus::NotApplicable,
            overall,
            message,
        }
    }
}

/// Results of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub outcomes: Vec<ItemExportOutcome>,
    /// Items whose metadata.json is present at the destination
    pub metadata_total: usize,
    /// Items whose cover.jpg is present at the destination
    pub cover_total: usize,
}

impl ExportSummary {
    /// True when any item failed or had nothing to copy.
    /// Export-root info rows are not counted.
    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(|o| match o.item_id {
            Some(_) => matches!(o.overall, OverallStatus::Error | OverallStatus::Skipped),
            None => o.overall == OverallStatus::Error,
        })
    }
}

/// Exporter configuration
#[derive(Debug, Clone)]
pub struct Exporter {
    media_root: PathBuf,
}

impl Exporter {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Source folder of an item (`<media_root>/<id>`)
    pub fn source_folder(&self, item_id: &str) -> PathBuf {
        self.media_root.join(item_id)
    }

    /// Export items sequentially into `export_root`, creating it if needed
    pub async fn export_items(&self, items: &[LibraryItem], export_root: &Path) -> ExportSummary {
        let mut summary = ExportSummary::default();

        if !export_root.is_dir() {
            match fs::create_dir_all(export_root).await {
                Ok(()) => {
                    info!(path = %export_root.display(), "Created export root");
                    summary.outcomes.push(ItemExportOutcome::root_message(
                        OverallStatus::Info,
                        format!("Created export directory '{}'", export_root.display()),
                    ));
                }
                Err(e) => {
                    warn!(path = %export_root.display(), error = %e, "Cannot create export root");
                    summary.outcomes.push(ItemExportOutcome::root_message(
                        OverallStatus::Error,
                        format!(
                            "Error: export directory '{}' does not exist and cannot be created: {}",
                            export_root.display(),
                            e
                        ),
                    ));
                    return summary;
                }
            }
        }

        for item in items {
            let outcome = self.export_item(item, export_root).await;
            if outcome.metadata.is_present() {
                summary.metadata_total += 1;
            }
            if outcome.cover.is_present() {
                summary.cover_total += 1;
            }
            summary.outcomes.push(outcome);
        }

        info!(
            items = items.len(),
            metadata = summary.metadata_total,
            covers = summary.cover_total,
            "Export finished"
        );

        summary
    }

    /// Copy metadata.json and cover.jpg of one item, if present in the source
    pub async fn export_item(&self, item: &LibraryItem, export_root: &Path) -> ItemExportOutcome {
        let source_folder = self.source_folder(&item.id);
        let metadata_source = source_folder.join(METADATA_FILE);
        let cover_source = source_folder.join(COVER_FILE);

        let has_metadata = fs::try_exists(&metadata_source).await.unwrap_or(false);
        let has_cover = fs::try_exists(&cover_source).await.unwrap_or(false);

        if !has_metadata && !has_cover {
            info!(item_id = %item.id, "Nothing to export");
            return ItemExportOutcome {
                item_id: Some(item.id.clone()),
                metadata: FileCopyStatus::Missing,
                cover: FileCopyStatus::Missing,
                overall: OverallStatus::Skipped,
                message: "No files to copy".to_string(),
            };
        }

        let Some(dest_folder) = destination_folder(export_root, &item.relative_path) else {
            warn!(item_id = %item.id, path = %item.relative_path, "Rejected relative path");
            return ItemExportOutcome {
                item_id: Some(item.id.clone()),
                metadata: FileCopyStatus::NotApplicable,
                cover: FileCopyStatus::NotApplicable,
                overall: OverallStatus::Error,
                message: format!(
                    "Relative path '{}' escapes the export directory",
                    item.relative_path
                ),
            };
        };

        if !dest_folder.is_dir() {
            if let Err(e) = fs::create_dir_all(&dest_folder).await {
                warn!(item_id = %item.id, path = %dest_folder.display(), error = %e, "Cannot create destination folder");
                return ItemExportOutcome {
                    item_id: Some(item.id.clone()),
                    metadata: FileCopyStatus::NotApplicable,
                    cover: FileCopyStatus::NotApplicable,
                    overall: OverallStatus::Error,
                    message: format!("Error creating destination folder: {}", e),
                };
            }
        }

        let metadata = if has_metadata {
            copy_file(&metadata_source, &dest_folder.join(METADATA_FILE)).await
        } else {
            FileCopyStatus::Missing
        };
        let cover = if has_cover {
            copy_file(&cover_source, &dest_folder.join(COVER_FILE)).await
        } else {
            FileCopyStatus::Missing
        };

        let failed = matches!(metadata, FileCopyStatus::Error(_))
            || matches!(cover, FileCopyStatus::Error(_));
        let (overall, message) = if failed {
            (OverallStatus::Error, "Errors occurred".to_string())
        } else {
            (OverallStatus::Success, "OK".to_string())
        };

        if failed {
            warn!(item_id = %item.id, metadata = ?metadata, cover = ?cover, "Export failed");
        } else {
            info!(item_id = %item.id, dest = %dest_folder.display(), "Exported item");
        }

        ItemExportOutcome {
            item_id: Some(item.id.clone()),
            metadata,
            cover,
            overall,
            message,
        }
    }
}

/// Copy a single file; copying a file onto itself reports [FileCopyStatus::Exists]
async fn copy_file(source: &Path, dest: &Path) -> FileCopyStatus {
    if let (Ok(src), Ok(dst)) = (fs::canonicalize(source).await, fs::canonicalize(dest).await) {
        if src == dst {
            return FileCopyStatus::Exists;
        }
    }

    match fs::copy(source, dest).await {
        Ok(_) => FileCopyStatus::Copied,
        Err(e) => FileCopyStatus::Error(e.to_string()),
    }
}

/// Join a catalog relative path onto the export root.
/// Returns `None` for absolute paths or `..` components.
pub fn destination_folder(export_root: &Path, relative_path: &str) -> Option<PathBuf> {
    let mut dest = export_root.to_path_buf();
    for component in Path::new(relative_path).components() {
        match component {
            Component::Normal(part) => dest.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(dest)
}

/// Problems with an export request, reported back to the form or API caller
#[derive(Debug, Error)]
pub enum ExportRequestError {
    #[error("You must provide an export directory.")]
    MissingExportPath,

    #[error("No items were selected for export.")]
    NoItemsSelected,

    #[error("No library selected for export.")]
    NoLibrary,

    #[error("Library '{0}' was not found; export is not possible.")]
    UnknownLibrary(String),

    #[error("The selected library has no items to export.")]
    EmptyLibrary,

    #[error("The selected items do not belong to the library; export is not possible.")]
    SelectionNotInLibrary,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// An export request as submitted by the form or the JSON API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub export_path: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl ExportRequest {
    /// Validate the request and look up the selected items in the catalog.
    /// Returns the library ID and the selected items in selection order.
    pub fn resolve(
        &self,
        catalog: &Catalog,
    ) -> Result<(String, Vec<LibraryItem>), ExportRequestError> {
        if self.export_path.trim().is_empty() {
            return Err(ExportRequestError::MissingExportPath);
        }
        if self.items.is_empty() {
            return Err(ExportRequestError::NoItemsSelected);
        }
        if self.library.is_empty() {
            return Err(ExportRequestError::NoLibrary);
        }

        let library_id = catalog
            .libraries()
            .id_by_name(&self.library)?
            .ok_or_else(|| ExportRequestError::UnknownLibrary(self.library.clone()))?;

        let all_items = catalog.items().list_by_library(&library_id)?;
        if all_items.is_empty() {
            return Err(ExportRequestError::EmptyLibrary);
        }

        let by_id: HashMap<&str, &LibraryItem> =
            all_items.iter().map(|i| (i.id.as_str(), i)).collect();
        let selected: Vec<LibraryItem> = self
            .items
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|i| (*i).clone()))
            .collect();

        if selected.is_empty() {
            return Err(ExportRequestError::SelectionNotInLibrary);
        }

        Ok((library_id, selected))
    }
}
