//! Folder name vs. catalog metadata match classification
//!
//! Each library item carries a canonical title/author from the catalog and a
//! relative path whose last component is usually "<authors> - <title>". The
//! classifier parses that folder name and reports whether title, authors,
//! both or neither agree with the metadata.
//!
//! ## Matching rules
//! ```text
//! title   : substring either way, or similarity > TITLE_SIMILARITY_THRESHOLD
//! authors : any (metadata author, folder author) pair with
//!           similarity > AUTHOR_SIMILARITY_THRESHOLD
//! ```
//!
//! Classification never fails: missing paths and unparseable folder names
//! are ordinary outcomes ([MatchStatus::NoPath], [MatchStatus::ParseFailed]).

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::folder_name_parser::{folder_name_of, parse_folder_name};
use super::text_utils::{normalize_text, similarity_ratio};

/// Minimum similarity for a folder title to count as the catalog title
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Minimum similarity for a folder author to count as a catalog author
pub const AUTHOR_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Outcome of comparing folder-derived metadata with catalog metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Item has no relative path
    NoPath,
    /// Folder name does not follow "<authors> - <title>"
    ParseFailed,
    FullMatch,
    TitleOnly,
    AuthorsOnly,
    NoMatch,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::NoPath => "no_path",
            MatchStatus::ParseFailed => "parse_failed",
            MatchStatus::FullMatch => "full_match",
            MatchStatus::TitleOnly => "title_only",
            MatchStatus::AuthorsOnly => "authors_only",
            MatchStatus::NoMatch => "no_match",
        }
    }

    fn from_flags(title_match: bool, authors_match: bool) -> Self {
        match (title_match, authors_match) {
            (true, true) => MatchStatus::FullMatch,
            (true, false) => MatchStatus::TitleOnly,
            (false, true) => MatchStatus::AuthorsOnly,
            (false, false) => MatchStatus::NoMatch,
        }
    }

    /// Filter bucket shown in the UI; both failure kinds share one bucket
    pub fn bucket(&self) -> MatchBucket {
        match self {
            MatchStatus::NoPath | MatchStatus::ParseFailed => MatchBucket::ParseError,
            MatchStatus::FullMatch => MatchBucket::FullMatch,
            MatchStatus::TitleOnly => MatchBucket::TitleOnly,
            MatchStatus::AuthorsOnly => MatchBucket::AuthorsOnly,
            MatchStatus::NoMatch => MatchBucket::NoMatch,
        }
    }
}

/// The five filter toggles of the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBucket {
    FullMatch,
    TitleOnly,
    AuthorsOnly,
    NoMatch,
    ParseError,
}

impl MatchBucket {
    pub const ALL: [MatchBucket; 5] = [
        MatchBucket::FullMatch,
        MatchBucket::TitleOnly,
        MatchBucket::AuthorsOnly,
        MatchBucket::NoMatch,
        MatchBucket::ParseError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchBucket::FullMatch => "full_match",
            MatchBucket::TitleOnly => "title_only",
            MatchBucket::AuthorsOnly => "authors_only",
            MatchBucket::NoMatch => "no_match",
            MatchBucket::ParseError => "parse_error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchBucket::FullMatch => "Full match",
            MatchBucket::TitleOnly => "Title only",
            MatchBucket::AuthorsOnly => "Authors only",
            MatchBucket::NoMatch => "No match",
            MatchBucket::ParseError => "Parse error",
        }
    }
}

/// Classification result for one item, with the parsed fields for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub folder_parsed: bool,
    pub match_status: MatchStatus,
    pub folder_name: String,
    pub parsed_title: String,
    pub parsed_authors: Vec<String>,
}

impl MatchResult {
    fn unparsed(match_status: MatchStatus, folder_name: String) -> Self {
        Self {
            folder_parsed: false,
            match_status,
            folder_name,
            parsed_title: String::new(),
            parsed_authors: Vec::new(),
        }
    }
}

/// Classify how well an item's folder name agrees with its catalog metadata.
///
/// `author` may hold several comma-separated names. `folder_path` is the
/// item's relative path; only its final component is parsed.
pub fn classify(title: &str, author: &str, folder_path: Option<&str>) -> MatchResult {
    let Some(path) = folder_path.filter(|p| !p.is_empty()) else {
        return MatchResult::unparsed(MatchStatus::NoPath, String::new());
    };

    let folder_name = folder_name_of(path).to_string();

    let parsed = match parse_folder_name(&folder_name) {
        Some(p) if !p.title.is_empty() && !p.authors.is_empty() => p,
        _ => return MatchResult::unparsed(MatchStatus::ParseFailed, folder_name),
    };

    let title_match = titles_match(title, &parsed.title);
    let authors_match = authors_match(author, &parsed.authors);
    let match_status = MatchStatus::from_flags(title_match, authors_match);

    trace!(
        folder_name = %folder_name,
        title_match,
        authors_match,
        status = match_status.as_str(),
        "Classified folder name"
    );

    MatchResult {
        folder_parsed: true,
        match_status,
        folder_name,
        parsed_title: parsed.title,
        parsed_authors: parsed.authors,
    }
}

/// Title agreement: containment in either direction or high similarity
pub fn titles_match(metadata_title: &str, parsed_title: &str) -> bool {
    let metadata = normalize_text(metadata_title);
    let parsed = normalize_text(parsed_title);

    metadata.contains(&parsed)
        || parsed.contains(&metadata)
        || similarity_ratio(&metadata, &parsed) > TITLE_SIMILARITY_THRESHOLD
}

/// Author agreement: any single metadata/folder author pair is similar enough.
/// Lenient for large co-author lists.
pub fn authors_match(metadata_author: &str, parsed_authors: &[String]) -> bool {
    let metadata_authors: Vec<String> = metadata_author.split(',').map(normalize_text).collect();
    let parsed_authors: Vec<String> = parsed_authors.iter().map(|a| normalize_text(a)).collect();

    metadata_authors.iter().any(|m| {
        parsed_authors
            .iter()
            .any(|p| similarity_ratio(m, p) > AUTHOR_SIMILARITY_THRESHOLD)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FOLDER: &str = "/x/Jan Kowalski - Wielka Podróż (2019)";

    #[test]
    fn test_full_match() {
        let result = classify("Wielka Podróż", "Jan Kowalski", Some(FOLDER));
        assert_eq!(result.match_status, MatchStatus::FullMatch);
        assert!(result.folder_parsed);
        assert_eq!(result.folder_name, "Jan Kowalski - Wielka Podróż (2019)");
        assert_eq!(result.parsed_title, "Wielka Podróż");
        assert_eq!(result.parsed_authors, vec!["Jan Kowalski"]);
    }

    #[test]
    fn test_no_match() {
        let result = classify("Coś Innego", "Ktoś Inny", Some(FOLDER));
        assert_eq!(result.match_status, MatchStatus::NoMatch);
        assert!(result.folder_parsed);
    }

    #[test]
    fn test_title_only() {
        let result = classify("Wielka Podróż", "Adam Mickiewicz", Some(FOLDER));
        assert_eq!(result.match_status, MatchStatus::TitleOnly);
    }

    #[test]
    fn test_authors_only() {
        let result = classify("Pan Tadeusz", "Jan Kowalski", Some(FOLDER));
        assert_eq!(result.match_status, MatchStatus::AuthorsOnly);
    }

    #[test]
    fn test_no_path() {
        for path in [None, Some("")] {
            let result = classify("Wielka Podróż", "Jan Kowalski", path);
            assert_eq!(result.match_status, MatchStatus::NoPath);
            assert!(!result.folder_parsed);
            assert_eq!(result.folder_name, "");
            assert!(result.parsed_title.is_empty());
            assert!(result.parsed_authors.is_empty());
        }
    }

    #[test]
    fn test_parse_failed() {
        let result = classify("Wielka Podróż", "Jan Kowalski", Some("/x/tylko jeden człon"));
        assert_eq!(result.match_status, MatchStatus::ParseFailed);
        assert!(!result.folder_parsed);
        assert_eq!(result.folder_name, "tylko jeden człon");
        assert!(result.parsed_title.is_empty());
        assert!(result.parsed_authors.is_empty());
    }

    #[test]
    fn test_parse_failed_on_empty_authors() {
        let result = classify("Tytuł", "Autor", Some("books/, - Tytuł"));
        assert_eq!(result.match_status, MatchStatus::ParseFailed);
    }

    #[test]
    fn test_diacritic_and_case_insensitive() {
        let result = classify(
            "WIELKA PODROZ",
            "jan kowalski",
            Some("Jan Kowalski - Wielka Podróż"),
        );
        assert_eq!(result.match_status, MatchStatus::FullMatch);
    }

    #[test]
    fn test_title_substring_matches() {
        assert!(titles_match("Wiedźmin: Krew elfów", "Krew elfów"));
        assert!(titles_match("Krew", "Krew elfów"));
        assert!(!titles_match("Pan Tadeusz", "Krew elfów"));
    }

    #[test]
    fn test_title_similarity_matches() {
        // no containment either way
        assert!(titles_match("Wielka Podróż", "Wielka Podrużż"));
    }

    #[test]
    fn test_title_threshold_is_strict() {
        // 7 of 10 characters shared: ratio is exactly 0.7
        assert_eq!(similarity_ratio("abcdefghij", "abcdefgxyz"), TITLE_SIMILARITY_THRESHOLD);
        assert!(!titles_match("abcdefghij", "abcdefgxyz"));
        // 8 of 10: 0.8
        assert!(titles_match("abcdefghij", "abcdefghxy"));
    }

    #[test]
    fn test_author_threshold_is_strict() {
        // 3 of 4 characters shared: ratio is exactly 0.75
        assert_eq!(similarity_ratio("abcd", "bcda"), AUTHOR_SIMILARITY_THRESHOLD);
        assert!(!authors_match("abcd", &["bcda".to_string()]));
        // 4 of 5: 0.8
        assert!(authors_match("abcde", &["abcdf".to_string()]));
    }

    #[test]
    fn test_any_author_pair_matches() {
        let parsed = vec!["Jan Kowalski".to_string()];
        assert!(authors_match("Anna Nowak, Jan Kowalski", &parsed));
        assert!(authors_match("Jan Kowalsky", &parsed));
        assert!(!authors_match("Anna Nowak", &parsed));
    }

    #[test]
    fn test_empty_metadata_author_never_matches() {
        let parsed = vec!["Jan Kowalski".to_string()];
        assert!(!authors_match("", &parsed));
    }

    #[test]
    fn test_failure_statuses_share_bucket() {
        assert_eq!(MatchStatus::NoPath.bucket(), MatchBucket::ParseError);
        assert_eq!(MatchStatus::ParseFailed.bucket(), MatchBucket::ParseError);
        assert_eq!(MatchStatus::FullMatch.bucket(), MatchBucket::FullMatch);
        assert_eq!(MatchStatus::NoMatch.bucket(), MatchBucket::NoMatch);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&MatchStatus::AuthorsOnly).unwrap();
        assert_eq!(json, "\"authors_only\"");
        assert_eq!(MatchStatus::AuthorsOnly.as_str(), "authors_only");
    }
}
