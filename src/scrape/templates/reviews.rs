//! Review page template
//!
//! One record per review block, extracted by fixed positional offsets into
//! the filtered list of non-empty text fragments within the block. The
//! offset table below is the versioned contract for the page shape: the
//! fragment count is validated before any indexing, and an insufficient
//! count is a typed shape error, never a silently truncated record.

use super::{selector, squash};
use crate::record::{Record, Schema};
use crate::{ScrapeError, ScrapeResult};
use scraper::Html;

/// Columns of the review table; the first two are caller-supplied identity
pub static SCHEMA: Schema = Schema {
    name: "anime-reviews",
    version: 1,
    fields: &[
        "Anime Title",
        "Anime URL",
        "Review Date",
        "Episodes Watched",
        "Username",
        "Review Likes",
        "Overall Rating",
        "Story Rating",
        "Animation Rating",
        "Sound Rating",
        "Character Rating",
        "Enjoyment Rating",
        "Review",
    ],
};

const BLOCK_SELECTOR: &str = "div.borderDark";

/// Fragment offset map, v1 page shape: which filtered fragment carries
/// which field. Offsets between the listed ones hold layout labels
/// ("Overall", "Story", ...) that are not themselves values.
const FIELD_OFFSETS: &[(usize, &str)] = &[
    (0, "Review Date"),
    (1, "Episodes Watched"),
    (4, "Username"),
    (8, "Review Likes"),
    (11, "Overall Rating"),
    (13, "Story Rating"),
    (15, "Animation Rating"),
    (17, "Sound Rating"),
    (19, "Character Rating"),
    (21, "Enjoyment Rating"),
];

/// First fragment of the review body
const BODY_START: usize = 22;

/// Fixed widget fragments trailing the review body
const TRAILER_FRAGMENTS: usize = 5;

/// Minimum fragments a block must hold before any offset is used; the
/// review body itself may be empty
pub const MIN_FRAGMENTS: usize = BODY_START + TRAILER_FRAGMENTS;

/// A tag fragment interleaved into some blocks, excluded before indexing
const EXCLUDED_MARKER: &str = "Preliminary";

/// Extracts one record per review block
///
/// Zero review blocks where content was expected is a typed `Empty` error,
/// recovered one layer up by the batch collector's one-shot retry.
pub fn extract(html: &str, anime_title: &str, anime_url: &str) -> ScrapeResult<Vec<Record>> {
    let document = Html::parse_document(html);

    let blocks: Vec<_> = document.select(&selector(BLOCK_SELECTOR)).collect();
    if blocks.is_empty() {
        return Err(ScrapeError::Empty {
            template: SCHEMA.name,
        });
    }

    let mut records = Vec::with_capacity(blocks.len());
    for block in blocks {
        let fragments: Vec<String> = block
            .text()
            .map(squash)
            .filter(|t| !t.is_empty() && t != EXCLUDED_MARKER)
            .collect();

        if fragments.len() < MIN_FRAGMENTS {
            return Err(ScrapeError::Shape {
                template: SCHEMA.name,
                unit: "text fragments",
                expected: MIN_FRAGMENTS,
                found: fragments.len(),
            });
        }

        let mut record = SCHEMA.record();
        for (offset, field) in FIELD_OFFSETS {
            record.set(field, fragments[*offset].as_str());
        }
        record.set(
            "Review",
            fragments[BODY_START..fragments.len() - TRAILER_FRAGMENTS].join("\n"),
        );
        record.set("Anime Title", anime_title);
        record.set("Anime URL", anime_url);
        records.push(record);
    }

    Ok(records)
}
