//! Recommendation page template
//!
//! One record per recommendation block. A block is a bordered element that
//! contains a nested bordered element; within it the recommended title and
//! the recommendation count come from two fixed sub-elements. The slice
//! bounds below are the versioned contract for the page shape and are
//! validated before use.

use super::{selector, squash};
use crate::record::{Record, Schema};
use crate::{ScrapeError, ScrapeResult};
use scraper::Html;

/// Columns of the recommendation table; the first two are caller-supplied
pub static SCHEMA: Schema = Schema {
    name: "anime-recommendations",
    version: 1,
    fields: &[
        "Anime Title",
        "Anime URL",
        "Recommended Title",
        "No. of Recommendations",
    ],
};

const BLOCK_SELECTOR: &str = "div.borderClass";
const TITLE_SELECTOR: &str = "div[style=\"margin-bottom: 2px;\"]";
const COUNT_SELECTOR: &str = "div.spaceit";

/// The title block ends with a fixed-width inline widget caption
const TITLE_TRAILER_CHARS: usize = 13;

/// The count block reads "Recommended by <user> ... <n> more users"; the
/// fixed lead-in and tail around the number
const COUNT_PREFIX_CHARS: usize = 24;
const COUNT_SUFFIX_CHARS: usize = 10;

/// Extracts one record per recommendation block
///
/// Zero blocks where content was expected is a typed `Empty` error. A block
/// missing its title sub-element, or whose title is shorter than the fixed
/// trailer, is a page-level shape error.
pub fn extract(html: &str, anime_title: &str, anime_url: &str) -> ScrapeResult<Vec<Record>> {
    let document = Html::parse_document(html);

    let block_selector = selector(BLOCK_SELECTOR);
    // Only the outer bordered elements that wrap a nested bordered element
    // are recommendation blocks.
    let blocks: Vec<_> = document
        .select(&block_selector)
        .filter(|el| el.select(&block_selector).next().is_some())
        .collect();

    if blocks.is_empty() {
        return Err(ScrapeError::Empty {
            template: SCHEMA.name,
        });
    }

    let title_selector = selector(TITLE_SELECTOR);
    let count_selector = selector(COUNT_SELECTOR);

    let mut records = Vec::with_capacity(blocks.len());
    for block in blocks {
        let title_el = block
            .select(&title_selector)
            .next()
            .ok_or(ScrapeError::Shape {
                template: SCHEMA.name,
                unit: "title blocks",
                expected: 1,
                found: 0,
            })?;

        let raw_title = squash(&title_el.text().collect::<String>());
        let title_chars: Vec<char> = raw_title.chars().collect();
        if title_chars.len() <= TITLE_TRAILER_CHARS {
            return Err(ScrapeError::Shape {
                template: SCHEMA.name,
                unit: "title characters",
                expected: TITLE_TRAILER_CHARS + 1,
                found: title_chars.len(),
            });
        }
        let title: String = title_chars[..title_chars.len() - TITLE_TRAILER_CHARS]
            .iter()
            .collect();

        let count = block
            .select(&count_selector)
            .next()
            .map(|el| parse_count(&el.text().collect::<String>()))
            .unwrap_or(1);

        let mut record = SCHEMA.record();
        record.set("Anime Title", anime_title);
        record.set("Anime URL", anime_url);
        record.set("Recommended Title", title.trim_end());
        record.set("No. of Recommendations", count.to_string());
        records.push(record);
    }

    Ok(records)
}

/// Parses the "n more users" count out of the count block text; the block
/// counts additional recommenders, so the total is n + 1. A block that does
/// not carry a parseable number stands for a single recommendation.
fn parse_count(text: &str) -> i64 {
    let chars: Vec<char> = squash(text).chars().collect();
    if chars.len() <= COUNT_PREFIX_CHARS + COUNT_SUFFIX_CHARS {
        return 1;
    }
    let middle: String = chars[COUNT_PREFIX_CHARS..chars.len() - COUNT_SUFFIX_CHARS]
        .iter()
        .collect();
    middle.trim().parse::<i64>().map(|n| n + 1).unwrap_or(1)
}
