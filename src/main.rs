//! # Showsort - TV episode organizer
//!
//! Copies a show's episode files from a download folder into the layout
//! Jellyfin and Plex expect, renaming them from season/episode/title
//! information found in the filename.
//!
//! ## Usage
//!
//! ```bash
//! # Organize Fringe files
//! showsort fringe FringeS04
//!
//! # Preview Battlestar Galactica without copying anything
//! showsort battlestar "Battlestar Galactica Season 1" --dry-run
//!
//! # Organize into a custom destination
//! showsort fringe FringeS04 --dest /path/to/media/Shows
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showsort::commands::organize::OrganizeCommand;
use showsort::config::Config;
use showsort::profile::ShowRegistry;

/// Showsort - copy TV episodes into a media server layout
#[derive(Parser)]
#[command(
    name = "showsort",
    about = "Organize TV show files into a Jellyfin/Plex compatible structure",
    long_about = "Copies video files into <dest>/<Show>/Season XX/Show - SXXEYY - Title.ext, \
                  using per-show filename patterns to find season, episode and title.",
    version
)]
struct Cli {
    /// Show to organize (e.g. fringe, battlestar)
    show: String,
    /// Source folder containing the video files
    source: PathBuf,
    /// Destination parent directory (default: $SHOWSORT_DEST or ./Media/Shows)
    #[arg(long, short = 'd')]
    dest: Option<PathBuf>,
    /// Show what would be done without actually copying files
    #[arg(long, short = 'n')]
    dry_run: bool,
    /// Overwrite episodes that already exist at the destination
    #[arg(long, short = 'f')]
    force: bool,
    /// JSON file with additional show definitions
    #[arg(long, env = "SHOWSORT_SHOWS_FILE")]
    shows_file: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();
    let registry = match &cli.shows_file {
        Some(path) => ShowRegistry::with_shows_file(path)?,
        None => ShowRegistry::builtin()?,
    };
    let profile = registry.get(&cli.show)?;
    let dest_parent = cli.dest.unwrap_or(config.dest_parent);

    info!(
        "Starting organize for show: {}, source: {:?}, dest: {:?}, dry run: {}",
        profile.key, cli.source, dest_parent, cli.dry_run
    );

    let cmd = OrganizeCommand::new(profile, cli.source, dest_parent, config.partial_suffix)
        .dry_run(cli.dry_run)
        .force(cli.force);
    let report = cmd.execute()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        cmd.print_report(&report);
    }

    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showsort=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
