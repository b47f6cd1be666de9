//! Ranked-list page template
//!
//! One record per ranking row. A row missing its name/link anchor, info
//! block, or score cell is silently skipped; a missing ranking table is a
//! page-level shape error. A present-but-empty table is a legitimate
//! zero-record page.

use super::{selector, squash};
use crate::record::{Record, Schema};
use crate::{ScrapeError, ScrapeResult};
use scraper::Html;

/// Columns of the ranked-list table
pub static SCHEMA: Schema = Schema {
    name: "top-list",
    version: 1,
    fields: &[
        "Ranking",
        "Anime Title",
        "MAL Link",
        "Airing Type and Episode",
        "Airing Time",
        "No. of Members",
        "MAL Score",
    ],
};

const TABLE_SELECTOR: &str = "table.top-ranking-table";
const ROW_SELECTOR: &str = "tr.ranking-list";
const CELL_SELECTOR: &str = "td";
const ANCHOR_SELECTOR: &str = "a";
const INFO_SELECTOR: &str = "div.information";

/// Extracts one record per ranking row
pub fn extract(html: &str) -> ScrapeResult<Vec<Record>> {
    let document = Html::parse_document(html);

    let table = document
        .select(&selector(TABLE_SELECTOR))
        .next()
        .ok_or(ScrapeError::Shape {
            template: SCHEMA.name,
            unit: "ranking tables",
            expected: 1,
            found: 0,
        })?;

    let cell_selector = selector(CELL_SELECTOR);
    let anchor_selector = selector(ANCHOR_SELECTOR);
    let info_selector = selector(INFO_SELECTOR);

    let mut records = Vec::new();
    for row in table.select(&selector(ROW_SELECTOR)) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }

        // The first anchor in the title cell is the thumbnail; the second
        // carries the title text and link.
        let anchor = match cells[1].select(&anchor_selector).nth(1) {
            Some(a) => a,
            None => continue,
        };
        let href = match anchor.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        let info = match cells[1].select(&info_selector).next() {
            Some(i) => i,
            None => continue,
        };
        let info_text = info.text().collect::<String>();
        let info_lines: Vec<&str> = info_text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut record = SCHEMA.record();
        record.set("Ranking", squash(&cells[0].text().collect::<String>()));
        record.set("Anime Title", squash(&anchor.text().collect::<String>()));
        record.set("MAL Link", href);
        record.set(
            "Airing Type and Episode",
            info_lines.first().copied().unwrap_or(""),
        );
        record.set("Airing Time", info_lines.get(1).copied().unwrap_or(""));
        record.set("No. of Members", info_lines.get(2).copied().unwrap_or(""));
        record.set("MAL Score", squash(&cells[2].text().collect::<String>()));
        records.push(record);
    }

    Ok(records)
}
