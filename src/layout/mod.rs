use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::matcher::EpisodeMetadata;

/// Name of the season folder, e.g. `Season 04`
pub fn season_dir_name(metadata: &EpisodeMetadata) -> String {
    format!("Season {}", metadata.season)
}

/// Canonical episode filename: `Show - S01E01 - Title.ext`, or
/// `Show - S01E01.ext` when there is no title.
///
/// `extension` includes its leading dot, or is empty.
pub fn canonical_filename(show_name: &str, metadata: &EpisodeMetadata, extension: &str) -> String {
    match &metadata.title {
        Some(title) => format!(
            "{} - S{}E{} - {}{}",
            show_name, metadata.season, metadata.episode, title, extension
        ),
        None => format!(
            "{} - S{}E{}{}",
            show_name, metadata.season, metadata.episode, extension
        ),
    }
}

/// Destination path relative to the show folder. Does not touch the filesystem.
pub fn build_destination(show_name: &str, metadata: &EpisodeMetadata, extension: &str) -> PathBuf {
    PathBuf::from(season_dir_name(metadata)).join(canonical_filename(show_name, metadata, extension))
}

/// Create a directory and its parents if missing. Succeeds when it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metadata(season: &str, episode: &str, title: Option<&str>) -> EpisodeMetadata {
        EpisodeMetadata {
            season: season.to_string(),
            episode: episode.to_string(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_destination_with_title() {
        let dest = build_destination("Fringe", &metadata("04", "01", Some("Episode Title")), ".mp4");
        assert_eq!(dest, PathBuf::from("Season 04/Fringe - S04E01 - Episode Title.mp4"));
    }

    #[test]
    fn test_destination_without_title() {
        let dest = build_destination("Battlestar Galactica", &metadata("01", "12", None), ".mkv");
        assert_eq!(
            dest,
            PathBuf::from("Season 01/Battlestar Galactica - S01E12.mkv")
        );
    }

    #[test]
    fn test_untitled_is_titled_minus_title_segment() {
        let titled = canonical_filename("Fringe", &metadata("02", "03", Some("Night of Desirable Objects")), ".avi");
        let untitled = canonical_filename("Fringe", &metadata("02", "03", None), ".avi");
        assert_eq!(untitled, titled.replace(" - Night of Desirable Objects", ""));
    }

    #[test]
    fn test_no_dangling_separators() {
        let name = canonical_filename("Fringe", &metadata("04", "01", Some("Neither Here Nor There")), ".mkv");
        assert!(!name.contains(" -  - "));
        assert!(!name.contains("- ."));
        assert!(!name.ends_with(" .mkv"));

        let untitled = canonical_filename("Fringe", &metadata("04", "01", None), ".mkv");
        assert_eq!(untitled, "Fringe - S04E01.mkv");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let season_dir = temp_dir.path().join("Fringe/Season 04");

        ensure_dir(&season_dir).unwrap();
        assert!(season_dir.is_dir());
        ensure_dir(&season_dir).unwrap();
        assert!(season_dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_when_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("Fringe");
        fs::write(&blocker, "").unwrap();

        assert!(ensure_dir(&blocker.join("Season 04")).is_err());
    }
}
