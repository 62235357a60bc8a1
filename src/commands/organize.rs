use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::layout::{build_destination, ensure_dir};
use crate::matcher::{match_episode, EpisodeMetadata};
use crate::profile::ShowProfile;
use crate::source::{collect_source_files, SourceFile};

/// Why a file was not copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// No pattern of the show matched the filename
    Unparseable,
    /// The destination is already taken, on disk or by an earlier file in this run
    DestinationExists,
    CopyFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unparseable => write!(f, "couldn't parse"),
            SkipReason::DestinationExists => write!(f, "destination already exists"),
            SkipReason::CopyFailed(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileStatus {
    Copied,
    WouldCopy,
    Skipped(SkipReason),
}

/// What happened to a single source file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source_name: String,
    pub metadata: Option<EpisodeMetadata>,
    /// Relative to the show folder
    pub destination: Option<PathBuf>,
    pub status: FileStatus,
}

/// Result of one organize pass
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    pub show: String,
    pub source_dir: PathBuf,
    pub destination_base: PathBuf,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
    pub copied: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Command to copy a show's episodes into the media server layout
pub struct OrganizeCommand<'a> {
    profile: &'a ShowProfile,
    source_dir: PathBuf,
    dest_parent: PathBuf,
    partial_suffix: String,
    dry_run: bool,
    force: bool,
}

impl<'a> OrganizeCommand<'a> {
    pub fn new(
        profile: &'a ShowProfile,
        source_dir: PathBuf,
        dest_parent: PathBuf,
        partial_suffix: String,
    ) -> Self {
        Self {
            profile,
            source_dir,
            dest_parent,
            partial_suffix,
            dry_run: false,
            force: false,
        }
    }

    /// Compute and report every action without writing anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Overwrite destinations that already exist
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Show folder under the destination parent
    pub fn destination_base(&self) -> PathBuf {
        self.dest_parent.join(&self.profile.output_dir_name)
    }

    /// Run a full pass over the source folder.
    ///
    /// Only a missing or unreadable source folder is an error; per-file
    /// problems end up as skipped outcomes in the report.
    pub fn execute(&self) -> Result<OrganizeReport> {
        let start_time = Instant::now();
        let dest_base = self.destination_base();

        if self.dry_run {
            info!("🔍 DRY RUN MODE - No files will be copied");
        }
        info!("Show: {}", self.profile.display_name);
        info!("Source directory: {:?}", self.source_dir);
        info!("Destination base: {:?}", dest_base);

        let files = collect_source_files(&self.source_dir, &self.partial_suffix)?;
        if files.is_empty() {
            warn!("No video files found in source directory: {:?}", self.source_dir);
        } else {
            info!("Found {} video files to process", files.len());
        }

        let mut planned = HashSet::new();
        let outcomes: Vec<FileOutcome> = files
            .iter()
            .map(|file| self.process_file(file, &dest_base, &mut planned))
            .collect();

        let copied = outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Copied | FileStatus::WouldCopy))
            .count();
        let skipped = outcomes.len() - copied;

        let report = OrganizeReport {
            show: self.profile.display_name.clone(),
            source_dir: self.source_dir.clone(),
            destination_base: dest_base,
            dry_run: self.dry_run,
            outcomes,
            copied,
            skipped,
            elapsed: start_time.elapsed(),
        };

        info!(
            "✅ Processing complete. {} copied, {} skipped in {:.2}s",
            report.copied,
            report.skipped,
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }

    fn process_file(
        &self,
        file: &SourceFile,
        dest_base: &Path,
        planned: &mut HashSet<PathBuf>,
    ) -> FileOutcome {
        let Some(metadata) = match_episode(&file.name, self.profile) else {
            warn!("⚠️ Skipping (couldn't parse): {}", file.name);
            return FileOutcome {
                source_name: file.name.clone(),
                metadata: None,
                destination: None,
                status: FileStatus::Skipped(SkipReason::Unparseable),
            };
        };

        let relative = build_destination(&self.profile.display_name, &metadata, &file.extension);
        let dest_file = dest_base.join(&relative);
        let prefix = if self.dry_run { "[DRY RUN] " } else { "" };
        info!("{}Copying: {} -> {}", prefix, file.name, relative.display());

        // Keyed case-insensitively so a dry run agrees with case-insensitive filesystems
        let batch_key = PathBuf::from(dest_file.to_string_lossy().to_lowercase());
        let taken = !planned.insert(batch_key) || dest_file.exists();
        let status = if taken && !self.force {
            warn!("⚠️ Skipping {}: {:?} already exists", file.name, dest_file);
            FileStatus::Skipped(SkipReason::DestinationExists)
        } else if self.dry_run {
            FileStatus::WouldCopy
        } else {
            match copy_preserving_times(&file.path, &dest_file) {
                Ok(()) => FileStatus::Copied,
                Err(e) => {
                    warn!("✗ Error copying {}: {:#}", file.name, e);
                    FileStatus::Skipped(SkipReason::CopyFailed(format!("{:#}", e)))
                }
            }
        };

        FileOutcome {
            source_name: file.name.clone(),
            metadata: Some(metadata),
            destination: Some(relative),
            status,
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &OrganizeReport) {
        for outcome in &report.outcomes {
            match (&outcome.status, &outcome.destination) {
                (FileStatus::Skipped(reason), _) => {
                    println!("⚠ Skipping ({}): {}", reason, outcome.source_name);
                }
                (status, Some(destination)) => {
                    let prefix = if report.dry_run { "[DRY RUN] " } else { "" };
                    let result = if *status == FileStatus::WouldCopy {
                        "✓ Would copy"
                    } else {
                        "✓ Success"
                    };
                    println!("{}Copying: {}", prefix, outcome.source_name);
                    println!("     To: {}", destination.display());
                    println!("     {}", result);
                }
                (_, None) => {}
            }
        }

        println!("{}", "=".repeat(70));
        if report.dry_run {
            println!("Dry run complete!");
            println!("  Would copy: {} files", report.copied);
        } else {
            println!("Processing complete!");
            println!("  Successfully copied: {} files", report.copied);
        }
        println!("  Skipped: {} files", report.skipped);
        println!("  Destination: {}", report.destination_base.display());
        println!("{}", "=".repeat(70));
    }
}

/// Copy file contents, then carry over access and modification times
fn copy_preserving_times(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }

    fs::copy(source, dest).with_context(|| format!("Failed to copy to {:?}", dest))?;

    let source_meta = fs::metadata(source)?;
    let times = FileTimes::new()
        .set_accessed(source_meta.accessed()?)
        .set_modified(source_meta.modified()?);
    File::options()
        .write(true)
        .open(dest)?
        .set_times(times)
        .with_context(|| format!("Failed to set timestamps on {:?}", dest))?;

    Ok(())
}
