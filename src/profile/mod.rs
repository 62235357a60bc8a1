use anyhow::{anyhow, bail, Context, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A named show with its ordered filename patterns
#[derive(Debug, Clone)]
pub struct ShowProfile {
    pub key: String,
    pub display_name: String,
    /// Tried in order, first match wins. Compiled case-insensitively.
    pub patterns: Vec<Regex>,
    pub output_dir_name: String,
}

/// Serialized form of a show profile, as found in a shows file
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDefinition {
    pub key: String,
    pub name: String,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub output_name: Option<String>,
}

impl ShowProfile {
    /// Compile a profile from its definition.
    ///
    /// Every pattern must expose at least a season and an episode capture group.
    pub fn compile(definition: &ProfileDefinition) -> Result<Self> {
        if definition.patterns.is_empty() {
            bail!("Show '{}' has no filename patterns", definition.key);
        }

        let patterns = definition
            .patterns
            .iter()
            .map(|pattern| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| {
                        format!("Invalid pattern for show '{}': {}", definition.key, pattern)
                    })?;
                // captures_len counts the implicit whole-match group
                if regex.captures_len() < 3 {
                    return Err(anyhow!(
                        "Pattern for show '{}' needs season and episode groups: {}",
                        definition.key,
                        pattern
                    ));
                }
                Ok(regex)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            key: definition.key.to_lowercase(),
            display_name: definition.name.clone(),
            patterns,
            output_dir_name: definition
                .output_name
                .clone()
                .unwrap_or_else(|| definition.name.clone()),
        })
    }
}

/// Built-in profiles: a strict pattern with title, then a looser one without
fn builtin_definitions() -> Vec<ProfileDefinition> {
    vec![
        ProfileDefinition {
            key: "fringe".to_string(),
            name: "Fringe".to_string(),
            patterns: vec![
                r"Fringe\s+S(\d{2})E(\d{2})\s+(.+?)\s+\(.*?\)".to_string(),
                r"Fringe\s+S(\d{2})E(\d{2})".to_string(),
            ],
            output_name: Some("Fringe".to_string()),
        },
        ProfileDefinition {
            key: "battlestar".to_string(),
            name: "Battlestar Galactica".to_string(),
            patterns: vec![
                r"BSG\s+S(\d{2})E(\d{2})\s+(.+?)\s+\(.*?\)".to_string(),
                r"BSG\s+S(\d{2})E(\d{2})".to_string(),
            ],
            output_name: Some("Battlestar Galactica".to_string()),
        },
    ]
}

/// Immutable lookup table of show profiles, keyed by lowercase show key
#[derive(Debug, Clone)]
pub struct ShowRegistry {
    profiles: BTreeMap<String, ShowProfile>,
}

impl ShowRegistry {
    /// Registry containing only the built-in shows
    pub fn builtin() -> Result<Self> {
        Self::from_definitions(builtin_definitions())
    }

    /// Built-in shows plus the ones defined in a JSON shows file.
    /// A file entry replaces a built-in profile with the same key.
    pub fn with_shows_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read shows file: {:?}", path))?;
        let extra: Vec<ProfileDefinition> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse shows file: {:?}", path))?;
        debug!("Loaded {} show definitions from {:?}", extra.len(), path);

        let mut definitions = builtin_definitions();
        definitions.extend(extra);
        Self::from_definitions(definitions)
    }

    pub fn from_definitions(definitions: Vec<ProfileDefinition>) -> Result<Self> {
        let mut profiles = BTreeMap::new();
        for definition in &definitions {
            let profile = ShowProfile::compile(definition)?;
            profiles.insert(profile.key.clone(), profile);
        }
        Ok(Self { profiles })
    }

    /// Case-insensitive lookup. Unknown keys are an error listing the valid ones.
    pub fn get(&self, key: &str) -> Result<&ShowProfile> {
        self.profiles.get(&key.to_lowercase()).ok_or_else(|| {
            anyhow!(
                "Unknown show: {}. Available: {}",
                key,
                self.keys().join(", ")
            )
        })
    }

    /// Known show keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_registry() {
        let registry = ShowRegistry::builtin().unwrap();
        assert_eq!(registry.keys(), vec!["battlestar", "fringe"]);

        let fringe = registry.get("fringe").unwrap();
        assert_eq!(fringe.display_name, "Fringe");
        assert_eq!(fringe.output_dir_name, "Fringe");
        assert_eq!(fringe.patterns.len(), 2);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ShowRegistry::builtin().unwrap();
        let profile = registry.get("BattleStar").unwrap();
        assert_eq!(profile.display_name, "Battlestar Galactica");
    }

    #[test]
    fn test_unknown_show_lists_keys() {
        let registry = ShowRegistry::builtin().unwrap();
        let err = registry.get("lost").unwrap_err().to_string();
        assert!(err.contains("Unknown show: lost"));
        assert!(err.contains("battlestar, fringe"));
    }

    #[test]
    fn test_pattern_without_episode_group_is_rejected() {
        let definition = ProfileDefinition {
            key: "bad".to_string(),
            name: "Bad".to_string(),
            patterns: vec![r"Bad S(\d{2})".to_string()],
            output_name: None,
        };
        assert!(ShowProfile::compile(&definition).is_err());
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let definition = ProfileDefinition {
            key: "bad".to_string(),
            name: "Bad".to_string(),
            patterns: vec![r"Bad S(\d{2}E(\d{2})".to_string()],
            output_name: None,
        };
        assert!(ShowProfile::compile(&definition).is_err());
    }

    #[test]
    fn test_shows_file_adds_and_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let shows_file = temp_dir.path().join("shows.json");
        fs::write(
            &shows_file,
            r#"[
                {"key": "Expanse", "name": "The Expanse", "patterns": ["Expanse S(\\d{2})E(\\d{2})"]},
                {"key": "fringe", "name": "Fringe", "output_name": "Fringe (2008)", "patterns": ["Fringe S(\\d{2})E(\\d{2})"]}
            ]"#,
        )
        .unwrap();

        let registry = ShowRegistry::with_shows_file(&shows_file).unwrap();
        assert_eq!(registry.len(), 3);

        let expanse = registry.get("expanse").unwrap();
        assert_eq!(expanse.output_dir_name, "The Expanse");

        let fringe = registry.get("fringe").unwrap();
        assert_eq!(fringe.output_dir_name, "Fringe (2008)");
        assert_eq!(fringe.patterns.len(), 1);
    }

    #[test]
    fn test_missing_shows_file_is_error() {
        let result = ShowRegistry::with_shows_file(Path::new("/nonexistent/shows.json"));
        assert!(result.is_err());
    }
}
