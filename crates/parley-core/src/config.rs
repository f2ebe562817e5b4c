//! `parley.toml` loading and resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::exclusion::{DEFAULT_EXCLUDED_WORDS, ExclusionSet};
use crate::network::DEFAULT_TOP_SPEAKERS;
use crate::transcript::TranscriptLayout;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "parley.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub transcript: TranscriptLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_excluded_words")]
    pub excluded_words: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            excluded_words: default_excluded_words(),
        }
    }
}

impl InferenceConfig {
    #[must_use]
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::new(&self.excluded_words)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_top_speakers")]
    pub top_speakers: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            top_speakers: default_top_speakers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    User(PathBuf),
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub config: ParleyConfig,
    pub source: ConfigSource,
}

/// Parse one configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config_file(path: &Path) -> Result<ParleyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ParleyConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the configuration for one run.
///
/// Precedence: `explicit` (must exist) → `parley.toml` in `project_root` →
/// `<config dir>/parley/config.toml` → defaults.
///
/// # Errors
///
/// Returns an error if `explicit` cannot be read, or if the first file
/// found fails to parse.
pub fn resolve_config(explicit: Option<&Path>, project_root: &Path) -> Result<EffectiveConfig> {
    let user_path = dirs::config_dir().map(|dir| dir.join("parley/config.toml"));
    resolve_config_from(explicit, project_root, user_path.as_deref())
}

fn resolve_config_from(
    explicit: Option<&Path>,
    project_root: &Path,
    user_path: Option<&Path>,
) -> Result<EffectiveConfig> {
    if let Some(path) = explicit {
        return Ok(EffectiveConfig {
            config: load_config_file(path)?,
            source: ConfigSource::Explicit(path.to_path_buf()),
        });
    }

    let project_path = project_root.join(PROJECT_CONFIG_FILE);
    if project_path.exists() {
        return Ok(EffectiveConfig {
            config: load_config_file(&project_path)?,
            source: ConfigSource::Project(project_path),
        });
    }

    if let Some(path) = user_path.filter(|p| p.exists()) {
        return Ok(EffectiveConfig {
            config: load_config_file(path)?,
            source: ConfigSource::User(path.to_path_buf()),
        });
    }

    Ok(EffectiveConfig {
        config: ParleyConfig::default(),
        source: ConfigSource::Defaults,
    })
}

fn default_excluded_words() -> Vec<String> {
    DEFAULT_EXCLUDED_WORDS.iter().map(|w| (*w).to_string()).collect()
}

const fn default_top_speakers() -> usize {
    DEFAULT_TOP_SPEAKERS
}

const fn default_top_n() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_everything_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let eff = resolve_config_from(None, root.path(), None).expect("resolve");
        assert_eq!(eff.source, ConfigSource::Defaults);
        assert_eq!(eff.config.retention.top_speakers, 101);
        assert_eq!(eff.config.ranking.top_n, 3);
        assert_eq!(
            eff.config.inference.excluded_words,
            vec!["others", "ponies", "and", "all"]
        );
        assert_eq!(eff.config.transcript, TranscriptLayout::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            root.path().join(PROJECT_CONFIG_FILE),
            "[retention]\ntop_speakers = 10\n\n[transcript]\nhas_header = false\n",
        )
        .expect("write config");

        let eff = resolve_config_from(None, root.path(), None).expect("resolve");
        assert!(matches!(eff.source, ConfigSource::Project(_)));
        assert_eq!(eff.config.retention.top_speakers, 10);
        assert!(!eff.config.transcript.has_header);
        assert_eq!(eff.config.transcript.character_column, 2);
        assert_eq!(eff.config.ranking.top_n, 3);
    }

    #[test]
    fn explicit_path_wins_over_project_file() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(root.path().join(PROJECT_CONFIG_FILE), "[ranking]\ntop_n = 7\n")
            .expect("write project config");
        let explicit = root.path().join("custom.toml");
        std::fs::write(&explicit, "[ranking]\ntop_n = 5\n").expect("write explicit config");

        let eff = resolve_config_from(Some(&explicit), root.path(), None).expect("resolve");
        assert_eq!(eff.config.ranking.top_n, 5);
        assert_eq!(eff.source, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn user_file_is_the_last_resort() {
        let root = tempfile::tempdir().expect("temp dir");
        let user = root.path().join("user.toml");
        std::fs::write(&user, "[inference]\nexcluded_words = [\"crowd\"]\n").expect("write");

        let eff = resolve_config_from(None, root.path(), Some(&user)).expect("resolve");
        assert_eq!(eff.source, ConfigSource::User(user));
        let set = eff.config.inference.exclusion_set();
        assert!(!set.is_valid("crowd"));
        assert!(set.is_valid("all"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let root = tempfile::tempdir().expect("temp dir");
        let missing = root.path().join("nope.toml");
        assert!(resolve_config_from(Some(&missing), root.path(), None).is_err());
    }

    #[test]
    fn malformed_file_reports_path() {
        let root = tempfile::tempdir().expect("temp dir");
        let path = root.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "[retention\n").expect("write");
        let err = resolve_config_from(None, root.path(), None).expect_err("must fail");
        assert!(format!("{err:#}").contains("parley.toml"));
    }
}
