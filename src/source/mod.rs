use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

use crate::config::Config;

/// A candidate video file in the source folder
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    /// Extension with its leading dot, original case preserved
    pub extension: String,
}

impl SourceFile {
    /// Build a source file from a path if it is an eligible video
    pub fn from_path(path: &Path, partial_suffix: &str) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_string();
        if name.ends_with(partial_suffix) {
            trace!("Skipping partial download: {}", name);
            return None;
        }

        let ext = path.extension()?.to_string_lossy().to_string();
        if !Config::is_video_extension(&ext) {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            name,
            extension: format!(".{}", ext),
        })
    }
}

/// List eligible video files directly inside `source_dir`, sorted by filename.
/// Subdirectories are not descended into; symlinks to files are resolved.
pub fn collect_source_files(source_dir: &Path, partial_suffix: &str) -> Result<Vec<SourceFile>> {
    if !source_dir.exists() {
        return Err(anyhow!("Source directory does not exist: {:?}", source_dir));
    }

    if !source_dir.is_dir() {
        return Err(anyhow!("Path is not a directory: {:?}", source_dir));
    }

    let mut files: Vec<SourceFile> = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| SourceFile::from_path(entry.path(), partial_suffix))
        .collect();

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
