use crate::record::{Record, Schema};
use crate::Result;
use std::path::Path;

/// Writes one CSV table: a header row of the schema's fields, then one row
/// per record
///
/// Column order always matches the declared field list exactly; a field
/// that was never extracted is written as an empty string, the column is
/// never omitted. Parent directories are created on demand.
pub fn write_table(path: &Path, schema: &Schema, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(schema.fields)?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer.flush()?;

    tracing::info!(
        rows = records.len(),
        table = schema.name,
        path = %path.display(),
        "wrote table"
    );
    Ok(())
}

/// Reduces a title to the alphanumeric characters usable in a filename
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::templates::list;

    #[test]
    fn test_write_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let mut record = list::SCHEMA.record();
        record.set("Ranking", "1");
        record.set("Anime Title", "Cowboy Bebop");
        record.set("MAL Link", "https://example.com/anime/1");

        write_table(&path, &list::SCHEMA, &[record]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Ranking,Anime Title,MAL Link,Airing Type and Episode,Airing Time,No. of Members,MAL Score"
        );
        // Unset fields are present as empty columns
        assert_eq!(
            lines.next().unwrap(),
            "1,Cowboy Bebop,https://example.com/anime/1,,,,"
        );
    }

    #[test]
    fn test_write_empty_table_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_table(&path, &list::SCHEMA, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Steins;Gate 0"), "SteinsGate0");
        assert_eq!(sanitize_title("Fate/Zero"), "FateZero");
        assert_eq!(sanitize_title("カウボーイビバップ"), "");
    }
}
