use regex::Captures;
use serde::Serialize;
use tracing::{debug, trace};

use crate::profile::ShowProfile;

/// Season, episode and optional title extracted from a filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeMetadata {
    /// Always exactly two digits
    pub season: String,
    /// Always exactly two digits
    pub episode: String,
    pub title: Option<String>,
}

/// Render a captured number as two digits.
///
/// Returns `None` for non-numeric text or values above 99.
pub fn pad_two_digits(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: u32 = raw.parse().ok()?;
    if value > 99 {
        return None;
    }
    Some(format!("{:02}", value))
}

fn metadata_from_captures(caps: &Captures) -> Option<EpisodeMetadata> {
    let season = pad_two_digits(caps.get(1)?.as_str())?;
    let episode = pad_two_digits(caps.get(2)?.as_str())?;
    let title = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());

    Some(EpisodeMetadata {
        season,
        episode,
        title,
    })
}

/// Try the profile's patterns in order and return the first usable match.
///
/// `None` means the filename does not belong to the show or uses a naming
/// scheme none of its patterns recognize.
pub fn match_episode(filename: &str, profile: &ShowProfile) -> Option<EpisodeMetadata> {
    for pattern in &profile.patterns {
        let Some(caps) = pattern.captures(filename) else {
            continue;
        };

        match metadata_from_captures(&caps) {
            Some(metadata) => {
                trace!("'{}' matched pattern {}", filename, pattern.as_str());
                return Some(metadata);
            }
            None => {
                debug!(
                    "'{}' matched pattern {} but season/episode are not two-digit numbers",
                    filename,
                    pattern.as_str()
                );
            }
        }
    }

    None
}
