//! Matching, reporting and export services

pub mod exporter;
pub mod folder_name_parser;
pub mod match_classifier;
pub mod match_report;
pub mod text_utils;

pub use exporter::{
    ExportRequest, ExportRequestError, ExportSummary, Exporter, FileCopyStatus,
    ItemExportOutcome, OverallStatus,
};
pub use folder_name_parser::{ParsedFolderName, parse_folder_name};
pub use match_classifier::{MatchBucket, MatchResult, MatchStatus, classify};
pub use match_report::{AnnotatedItem, MatchReport, annotate_items};
pub use text_utils::{normalize_text, similarity_ratio};
