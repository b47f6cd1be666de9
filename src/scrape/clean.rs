//! Post-processing normalization for detail records
//!
//! Applied after raw extraction, before a record is finalized: list fields
//! get their elements trimmed, placeholder values collapse to empty, the
//! doubled-content artifact in Genres is corrected, and numeric-looking
//! fields are reduced to plain digit strings.

use crate::record::Record;

/// Placeholder the site uses for an absent list value
const NONE_PLACEHOLDER: &str = "None found";

/// Fields holding comma-separated lists
const LIST_FIELDS: &[&str] = &["Producers", "Licensors", "Genres"];

/// Fields holding counts with thousands separators
const COUNT_FIELDS: &[&str] = &["Members", "Favorites"];

/// Normalizes one detail record in place
pub fn normalize_detail(record: &mut Record) {
    for field in LIST_FIELDS {
        record.map_field(field, |v| clean_list_field(v));
    }
    record.map_field("Genres", |v| collapse_doubled(v));
    for field in COUNT_FIELDS {
        record.map_field(field, |v| strip_thousands(v));
    }
    record.map_field("Popularity", |v| strip_rank_prefix(v));
    record.map_field("Ranked", |v| leading_rank_token(v));
    record.map_field("Score", |v| truncate_score(v));
}

/// Trims each comma-separated element; the "None found" placeholder
/// collapses to an empty string
pub fn clean_list_field(value: &str) -> String {
    let elements: Vec<&str> = value.split(',').map(str::trim).collect();
    if elements.first() == Some(&NONE_PLACEHOLDER) {
        return String::new();
    }
    elements.join(", ")
}

/// Corrects the doubled-content artifact in list fields
///
/// Depending on the markup vintage the duplication shows up either as an
/// element that is its own text twice back-to-back ("ActionAction") or as
/// adjacent duplicate elements ("Action, Action"); both forms are collapsed.
pub fn collapse_doubled(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let halved: Vec<String> = value.split(", ").map(halve_if_doubled).collect();

    let mut collapsed: Vec<String> = Vec::with_capacity(halved.len());
    for element in halved {
        if collapsed.last() != Some(&element) {
            collapsed.push(element);
        }
    }
    collapsed.join(", ")
}

/// Halves an element whose second half repeats its first half exactly
fn halve_if_doubled(element: &str) -> String {
    let chars: Vec<char> = element.chars().collect();
    let half = chars.len() / 2;
    if !chars.is_empty() && chars.len() % 2 == 0 && chars[..half] == chars[half..] {
        chars[..half].iter().collect()
    } else {
        element.to_string()
    }
}

/// Strips thousands-separator commas ("1,234,567" -> "1234567")
pub fn strip_thousands(value: &str) -> String {
    value.replace(',', "")
}

/// Strips the rank-prefix marker ("#43" -> "43")
pub fn strip_rank_prefix(value: &str) -> String {
    value.strip_prefix('#').unwrap_or(value).to_string()
}

/// Keeps only the leading numeric token of a rank value, dropping the
/// prefix marker and the trailing explanatory text
pub fn leading_rank_token(value: &str) -> String {
    strip_rank_prefix(value)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect()
}

/// Truncates a score to its leading fixed-width (4-character) numeric token
pub fn truncate_score(value: &str) -> String {
    value
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .take(4)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::templates::detail;

    #[test]
    fn test_list_field_elements_trimmed() {
        assert_eq!(clean_list_field("Bones ,  Sunrise"), "Bones, Sunrise");
    }

    #[test]
    fn test_none_placeholder_collapses_to_empty() {
        assert_eq!(clean_list_field("None found"), "");
    }

    #[test]
    fn test_adjacent_duplicate_elements_collapse() {
        assert_eq!(
            collapse_doubled("Action, Action, Comedy, Comedy"),
            "Action, Comedy"
        );
    }

    #[test]
    fn test_doubled_element_text_is_halved() {
        assert_eq!(
            collapse_doubled("ActionAction, ComedyComedy"),
            "Action, Comedy"
        );
    }

    #[test]
    fn test_undoubled_elements_pass_through() {
        assert_eq!(collapse_doubled("Action, Sci-Fi"), "Action, Sci-Fi");
    }

    #[test]
    fn test_strip_thousands() {
        assert_eq!(strip_thousands("1,234,567"), "1234567");
    }

    #[test]
    fn test_strip_rank_prefix() {
        assert_eq!(strip_rank_prefix("#43"), "43");
        assert_eq!(strip_rank_prefix("43"), "43");
    }

    #[test]
    fn test_leading_rank_token_drops_trailing_text() {
        assert_eq!(leading_rank_token("#39"), "39");
        assert_eq!(leading_rank_token("#39 2 based on the top anime page"), "39");
    }

    #[test]
    fn test_truncate_score() {
        assert_eq!(truncate_score("8.751 (scored by 999,999 users)"), "8.75");
        assert_eq!(truncate_score("8.75"), "8.75");
    }

    #[test]
    fn test_non_numeric_score_cleans_to_empty() {
        assert_eq!(truncate_score("N/A"), "");
    }

    #[test]
    fn test_normalize_detail_record() {
        let mut record = detail::SCHEMA.record();
        record.set("Genres", "Action, Action, Comedy, Comedy");
        record.set("Members", "1,234,567");
        record.set("Favorites", "82,925");
        record.set("Producers", "None found");
        record.set("Popularity", "#43");
        record.set("Ranked", "#39 2 based on the top anime page");
        record.set("Score", "8.751 (scored by 999,999 users)");

        normalize_detail(&mut record);

        assert_eq!(record.get("Genres"), "Action, Comedy");
        assert_eq!(record.get("Members"), "1234567");
        assert_eq!(record.get("Favorites"), "82925");
        assert_eq!(record.get("Producers"), "");
        assert_eq!(record.get("Popularity"), "43");
        assert_eq!(record.get("Ranked"), "39");
        assert_eq!(record.get("Score"), "8.75");
    }
}
