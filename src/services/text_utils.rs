//! Shared text normalization and comparison utilities
//!
//! Folder names and catalog metadata are compared after folding case and
//! Polish diacritics, so "Łódź" and "lodz" compare equal.

use rapidfuzz::distance::indel;

/// Fold a single Polish diacritic to its ASCII base letter.
/// Both cases are listed so the table is correct regardless of call order.
fn fold_polish_diacritic(c: char) -> char {
    match c {
        'ą' | 'Ą' => 'a',
        'ć' | 'Ć' => 'c',
        'ę' | 'Ę' => 'e',
        'ł' | 'Ł' => 'l',
        'ń' | 'Ń' => 'n',
        'ó' | 'Ó' => 'o',
        'ś' | 'Ś' => 's',
        'ź' | 'Ź' | 'ż' | 'Ż' => 'z',
        other => other,
    }
}

/// Normalize text for comparison.
/// Lower-cases the input and folds Polish diacritics (ą→a, ł→l, ż/ź→z, ...).
///
/// Total and idempotent: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_text("Łukasz Łódź"), "lukasz lodz");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_polish_diacritic)
        .collect()
}

/// Calculate similarity between two strings (0.0 to 1.0).
///
/// Ratio of matched characters to total characters across both strings
/// (`2 * matches / (len_a + len_b)`), computed with rapidfuzz's Indel metric.
/// Symmetric in its arguments; two empty strings are identical.
///
/// The ratio is a single division of two counts, so boundary values such as
/// 14/20 compare equal to the literal `0.7`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    indel::similarity(a.chars(), b.chars()) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_folds_diacritics() {
        assert_eq!(normalize_text("zażółć gęślą jaźń"), "zazolc gesla jazn");
        assert_eq!(normalize_text("ZAŻÓŁĆ GĘŚLĄ JAŹŃ"), "zazolc gesla jazn");
        assert_eq!(normalize_text("Łukasz Łódź"), normalize_text("lukasz lodz"));
    }

    #[test]
    fn test_normalize_text_empty() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_text_idempotent() {
        for s in [
            "Wielka Podróż",
            "Stanisław Lem",
            "ŹDŹBŁO",
            "Jan Kowalski - Wielka Podróż (2019)",
            "straße",
            "",
        ] {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_normalize_text_leaves_other_characters() {
        assert_eq!(normalize_text("Tom 2: Ćma, [PL]"), "tom 2: cma, [pl]");
    }

    #[test]
    fn test_similarity_ratio() {
        assert!((similarity_ratio("hello", "hello") - 1.0).abs() < 0.001);
        assert!((similarity_ratio("hello", "hallo") - 0.8).abs() < 0.001);
        assert!(similarity_ratio("abc", "xyz") < 0.001);
        assert!((similarity_ratio("", "") - 1.0).abs() < 0.001);
        assert!(similarity_ratio("", "abc") < 0.001);
    }

    #[test]
    fn test_similarity_ratio_symmetric() {
        let pairs = [
            ("jan kowalski", "kowalski jan"),
            ("wielka podroz", "wielka podróż"),
            ("abcd", "bcda"),
            ("", "x"),
            ("sapkowski", "andrzej sapkowski"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        let r = similarity_ratio("andrzej sapkowski", "sapkowski");
        assert!(r > 0.0 && r < 1.0);
    }
}
