//! Page templates
//!
//! Each page type (ranked list, detail, reviews, recommendations) has a
//! fixed DOM shape, a closed field schema, and its own extraction function
//! of the shape `extract(html, ...) -> records`.

pub mod detail;
pub mod list;
pub mod recommendations;
pub mod reviews;

use scraper::Selector;

/// Parses one of the compile-time selector constants declared by the
/// template modules. Entries are fixed strings, so a parse failure is a
/// build-time mistake, not a runtime condition.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("template selector constants are valid CSS")
}

/// Normalizes one extracted text fragment: newlines stripped, surrounding
/// whitespace trimmed
pub(crate) fn squash(text: &str) -> String {
    text.replace('\n', "").trim().to_string()
}
