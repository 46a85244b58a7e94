//! Batch match checks over catalog items

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::LibraryItem;
use crate::services::match_classifier::{MatchBucket, MatchResult, classify};

/// A catalog item with its (optional) folder-name match result
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedItem {
    #[serde(flatten)]
    pub item: LibraryItem,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_result: Option<MatchResult>,
}

/// Attach a match result to every item when `match_check` is on
pub fn annotate_items(items: Vec<LibraryItem>, match_check: bool) -> Vec<AnnotatedItem> {
    items
        .into_iter()
        .map(|item| {
            let match_result = match_check.then(|| {
                classify(&item.title, &item.author, Some(item.relative_path.as_str()))
            });
            AnnotatedItem { item, match_result }
        })
        .collect()
}

/// Per-bucket tallies for a batch of match results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub total: usize,
    pub buckets: BTreeMap<MatchBucket, usize>,
}

impl MatchReport {
    pub fn from_items(items: &[AnnotatedItem]) -> Self {
        let mut report = MatchReport {
            total: 0,
            buckets: MatchBucket::ALL.iter().map(|b| (*b, 0)).collect(),
        };
        for result in items.iter().filter_map(|i| i.match_result.as_ref()) {
            report.total += 1;
            *report.buckets.entry(result.match_status.bucket()).or_insert(0) += 1;
        }
        report
    }

    pub fn count(&self, bucket: MatchBucket) -> usize {
        self.buckets.get(&bucket).copied().unwrap_or(0)
    }
}
