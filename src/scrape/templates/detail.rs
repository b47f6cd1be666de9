//! Detail page template
//!
//! Exactly one record per page. The side panel is walked as a sequence of
//! "Label: Value" text fragments; fragments without a colon, and labels
//! outside the closed schema, are discarded. The anime title and URL are
//! supplied by the caller, not parsed from the page.

use super::{selector, squash};
use crate::record::{Record, Schema};
use crate::{ScrapeError, ScrapeResult};
use scraper::Html;

/// Columns of the detail table; the first two are caller-supplied identity
pub static SCHEMA: Schema = Schema {
    name: "anime-detail",
    version: 1,
    fields: &[
        "Anime Title",
        "MAL Url",
        "English",
        "Japanese",
        "Type",
        "Episodes",
        "Status",
        "Aired",
        "Premiered",
        "Broadcast",
        "Producers",
        "Licensors",
        "Studios",
        "Source",
        "Genres",
        "Duration",
        "Rating",
        "Score",
        "Ranked",
        "Popularity",
        "Members",
        "Favorites",
        "Summary",
    ],
};

const SIDE_PANEL_SELECTOR: &str = "td.borderClass";
const PANEL_BLOCK_SELECTOR: &str = "div";
const SUMMARY_SELECTOR: &str = "p[itemprop=\"description\"]";
const SUMMARY_FALLBACK_SELECTOR: &str = "p";

/// Extracts the single metadata record of a detail page
///
/// # Arguments
///
/// * `html` - The detail page body
/// * `anime_title` - Identity column value, from the ranked list
/// * `anime_url` - Identity column value, from the ranked list
pub fn extract(html: &str, anime_title: &str, anime_url: &str) -> ScrapeResult<Record> {
    let document = Html::parse_document(html);

    let panel = document
        .select(&selector(SIDE_PANEL_SELECTOR))
        .next()
        .ok_or(ScrapeError::Shape {
            template: SCHEMA.name,
            unit: "side panels",
            expected: 1,
            found: 0,
        })?;

    let mut record = SCHEMA.record();

    for block in panel.select(&selector(PANEL_BLOCK_SELECTOR)) {
        let text = squash(&block.text().collect::<String>());
        let colon = match text.find(':') {
            Some(i) => i,
            None => continue,
        };
        let label = text[..colon].trim();
        let value = text[colon + 1..].trim();
        if SCHEMA.contains(label) {
            record.set(label, value);
        }
    }

    let summary = document
        .select(&selector(SUMMARY_SELECTOR))
        .next()
        .or_else(|| document.select(&selector(SUMMARY_FALLBACK_SELECTOR)).next());
    if let Some(paragraph) = summary {
        record.set("Summary", paragraph.text().collect::<String>().trim());
    }

    record.set("Anime Title", anime_title);
    record.set("MAL Url", anime_url);

    Ok(record)
}
