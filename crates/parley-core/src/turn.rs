//! A single recorded utterance in a dialogue transcript.

use serde::{Deserialize, Serialize};

/// One turn of dialogue: the episode it belongs to and who spoke.
///
/// Both fields are normalized on construction (trimmed, lower-cased) so
/// that the same character written as `"Twilight Sparkle"` and
/// `"twilight sparkle "` maps to a single graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    episode_id: String,
    character: String,
}

impl Turn {
    /// Build a turn, normalizing both fields.
    #[must_use]
    pub fn new(episode_id: &str, character: &str) -> Self {
        Self {
            episode_id: normalize(episode_id),
            character: normalize(character),
        }
    }

    /// The episode this turn belongs to.
    #[must_use]
    pub fn episode_id(&self) -> &str {
        &self.episode_id
    }

    /// The (normalized) speaking character.
    #[must_use]
    pub fn character(&self) -> &str {
        &self.character
    }
}

/// Canonical casing for episode ids and character names.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
