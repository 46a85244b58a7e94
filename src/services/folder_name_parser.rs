//! Folder name parser for audiobook directory names
//!
//! Parses folder names like:
//! - "Jan Kowalski - Wielka Podróż (2019)"
//! - "Autor A, Autor B - Tytuł czyta Jan Nowak [audiobook PL]"
//! - "Andrzej Sapkowski - Krew elfów cykl Wiedźmin tom 3"
//!
//! Cleanup runs as an ordered list of substitution rules (narrator credit,
//! bracketed tags, series, volume), then a single `<authors> - <title> (<year>)`
//! split at the first " - ". Anything that does not fit is reported as
//! unparseable rather than guessed at.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Author/title/year extracted from a folder name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFolderName {
    pub authors: Vec<String>,
    pub title: String,
    pub year: Option<String>,
}

/// A single pattern-substitution step applied before the structural split
#[derive(Debug)]
pub struct CleanupRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl CleanupRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("invalid cleanup pattern"),
            replacement,
        }
    }

    /// Apply this rule to every occurrence in `input`
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement)
            .into_owned()
    }
}

/// Cleanup rules in application order
pub static CLEANUP_RULES: Lazy<Vec<CleanupRule>> = Lazy::new(|| {
    vec![
        // "czyta Jan Nowak" (read by) up to the next '[' or end
        CleanupRule::new("narrator", r"(?i)czyta[^\[]*", ""),
        // "[audiobook PL]", "[mp3]"
        CleanupRule::new("brackets", r"\[.*?\]", ""),
        // "cykl Wiedźmin", "z cyklu Wiedźmin" (series) up to the next " -" or end;
        // the " -" is kept. Matches inside words too.
        CleanupRule::new("series", r"(?i)cykl.*?( -|$)", "${1}"),
        // "tom 3" (volume), also inside words
        CleanupRule::new("volume", r"(?i)tom\s*\d+", ""),
    ]
});

static STRUCTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<authors>.+?) - (?P<title>.+?)(?:\s*\((?P<year>\d{4})\))?$")
        .expect("invalid folder name pattern")
});

/// Run the cleanup rules over a raw folder name and trim the result
pub fn clean_folder_name(folder_name: &str) -> String {
    CLEANUP_RULES
        .iter()
        .fold(folder_name.to_string(), |acc, rule| rule.apply(&acc))
        .trim()
        .to_string()
}

/// Parse a folder name into authors, title and optional year.
///
/// Returns `None` when the cleaned name has no `<authors> - <title>` shape.
/// Splits at the first " - ", so hyphenated titles stay intact.
/// Author entries that are empty after trimming are dropped, so a name like
/// ", - Tytuł" yields no authors.
pub fn parse_folder_name(folder_name: &str) -> Option<ParsedFolderName> {
    let cleaned = clean_folder_name(folder_name);
    if cleaned.is_empty() {
        return None;
    }

    let caps = STRUCTURE_RE.captures(&cleaned)?;

    let authors: Vec<String> = caps
        .name("authors")
        .map(|m| m.as_str())
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();
    let title = caps
        .name("title")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let year = caps.name("year").map(|m| m.as_str().to_string());

    debug!(
        folder_name = folder_name,
        authors = ?authors,
        title = %title,
        year = ?year,
        "Parsed folder name"
    );

    Some(ParsedFolderName {
        authors,
        title,
        year,
    })
}

/// Final path component of a relative or absolute item path.
/// Accepts both '/' and '\' separators and ignores trailing separators.
pub fn folder_name_of(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
}
