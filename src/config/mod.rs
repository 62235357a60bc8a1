use std::env;
use std::path::PathBuf;

/// Video file extensions picked up from the source folder (lowercase, no dot)
pub const VIDEO_EXTENSIONS: &[&str] = &["m4v", "mp4", "mkv", "avi", "ts"];

/// Configuration for destination and source filtering behavior
#[derive(Debug, Clone)]
pub struct Config {
    pub dest_parent: PathBuf,
    pub partial_suffix: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dest_parent: env::var("SHOWSORT_DEST")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.dest_parent),
            partial_suffix: env::var("SHOWSORT_PARTIAL_SUFFIX")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.partial_suffix),
        }
    }

    /// Whether a lowercase extension (without the dot) is a recognized video type
    pub fn is_video_extension(ext: &str) -> bool {
        VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dest_parent: PathBuf::from("Media").join("Shows"),
            partial_suffix: ".part".to_string(),
        }
    }
}
