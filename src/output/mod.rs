//! Output module: CSV tables on disk
//!
//! One table per harvest stage, plus optional per-anime review and
//! recommendation files. File naming follows the aggregate table contents.

mod table;

pub use table::{sanitize_title, write_table};

use std::path::{Path, PathBuf};

/// Subdirectory for per-anime review files
pub const REVIEWS_SUBDIR: &str = "Reviews";

/// Subdirectory for per-anime recommendation files
pub const RECOMMENDATIONS_SUBDIR: &str = "Recommendations";

/// `Top {n} Anime MAL.csv`
pub fn top_list_path(dir: &Path, item_count: usize) -> PathBuf {
    dir.join(format!("Top {} Anime MAL.csv", item_count))
}

/// `{n} Anime Details MAL.csv`
pub fn details_path(dir: &Path, item_count: usize) -> PathBuf {
    dir.join(format!("{} Anime Details MAL.csv", item_count))
}

/// `MAL Anime Reviews.csv`
pub fn reviews_path(dir: &Path) -> PathBuf {
    dir.join("MAL Anime Reviews.csv")
}

/// `MAL Anime Recommendations.csv`
pub fn recommendations_path(dir: &Path) -> PathBuf {
    dir.join("MAL Anime Recommendations.csv")
}

/// `Reviews/Anime Review - {Title}.csv`
pub fn individual_reviews_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(REVIEWS_SUBDIR)
        .join(format!("Anime Review - {}.csv", sanitize_title(title)))
}

/// `Recommendations/Anime Recommendations - {Title}.csv`
pub fn individual_recommendations_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(RECOMMENDATIONS_SUBDIR).join(format!(
        "Anime Recommendations - {}.csv",
        sanitize_title(title)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_paths() {
        let dir = Path::new("Data");
        assert_eq!(
            top_list_path(dir, 1000),
            Path::new("Data/Top 1000 Anime MAL.csv")
        );
        assert_eq!(
            details_path(dir, 200),
            Path::new("Data/200 Anime Details MAL.csv")
        );
        assert_eq!(
            individual_reviews_path(dir, "Fate/Zero"),
            Path::new("Data/Reviews/Anime Review - FateZero.csv")
        );
    }
}
