//! Turn-adjacency inference.
//!
//! # Heuristic
//!
//! A line of dialogue is assumed to be addressed to whoever speaks next.
//! Walking the transcript in order, every change of speaker inside one
//! episode yields a directed interaction `previous speaker → next speaker`,
//! and the next speaker becomes the new reference point.
//!
//! # State machine
//!
//! [`InteractionInferer`] holds two registers, the current speaker and the
//! previous episode id. For each incoming [`Turn`]:
//!
//! 1. **Episode boundary**: if the episode id differs from the previous
//!    turn's, forget the current speaker and skip the turn entirely. The
//!    last speaker of one episode never addresses the first of the next.
//! 2. **Repeat**: if the turn's character is the current speaker, skip it
//!    without resetting. `A, A, B` still yields `A → B`.
//! 3. **Group reference**: if the character fails the [`ExclusionSet`]
//!    test, forget the current speaker. A group never becomes a speaker.
//! 4. **Emit**: if a current speaker exists, emit `speaker → character`.
//!    The character becomes the current speaker either way.
//!
//! Because an invalid name is rejected before it can become the current
//! speaker, the speaker never needs to be re-validated.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::exclusion::ExclusionSet;
use crate::turn::Turn;

/// A directed edge increment: `from` was heard by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Interaction {
    /// The speaker of the earlier turn.
    pub from: String,
    /// The speaker of the following turn.
    pub to: String,
}

/// Counters describing what the inferer did with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InferenceStats {
    /// Turns consumed.
    pub turns: usize,
    /// Turns skipped because they opened a new episode.
    pub episode_resets: usize,
    /// Consecutive turns by the current speaker.
    pub repeats: usize,
    /// Turns attributed to a group reference.
    pub excluded: usize,
    /// Interactions emitted.
    pub interactions: usize,
}

/// Single-pass adjacency state machine.
///
/// The inferer is resumable: feeding a transcript in several chunks yields
/// exactly the same interactions as feeding it at once, as long as the
/// chunks arrive in order.
#[derive(Debug, Clone)]
pub struct InteractionInferer {
    exclusions: ExclusionSet,
    current_speaker: Option<String>,
    previous_episode: Option<String>,
    stats: InferenceStats,
}

impl InteractionInferer {
    /// Create an inferer with no speaker and no episode seen yet.
    #[must_use]
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self {
            exclusions,
            current_speaker: None,
            previous_episode: None,
            stats: InferenceStats::default(),
        }
    }

    /// Advance the state machine by one turn.
    ///
    /// Returns the interaction this turn completes, if any.
    pub fn observe(&mut self, turn: &Turn) -> Option<Interaction> {
        self.stats.turns += 1;

        let crossed_boundary = self
            .previous_episode
            .as_deref()
            .is_some_and(|prev| prev != turn.episode_id());

        if self.previous_episode.is_none() || crossed_boundary {
            self.previous_episode = Some(turn.episode_id().to_owned());
        }

        if crossed_boundary {
            self.current_speaker = None;
            self.stats.episode_resets += 1;
            return None;
        }

        if self.current_speaker.as_deref() == Some(turn.character()) {
            self.stats.repeats += 1;
            return None;
        }

        if !self.exclusions.is_valid(turn.character()) {
            self.current_speaker = None;
            self.stats.excluded += 1;
            return None;
        }

        let listener = turn.character().to_owned();
        let interaction = self.current_speaker.take().map(|speaker| Interaction {
            from: speaker,
            to: listener.clone(),
        });
        self.current_speaker = Some(listener);

        if interaction.is_some() {
            self.stats.interactions += 1;
        }
        interaction
    }

    /// Feed a batch of turns, collecting the interactions they produce.
    pub fn observe_all<'a, I>(&mut self, turns: I) -> Vec<Interaction>
    where
        I: IntoIterator<Item = &'a Turn>,
    {
        turns.into_iter().filter_map(|t| self.observe(t)).collect()
    }

    /// The character that the next valid turn will be attributed to.
    #[must_use]
    pub fn current_speaker(&self) -> Option<&str> {
        self.current_speaker.as_deref()
    }

    /// Running counters.
    #[must_use]
    pub const fn stats(&self) -> InferenceStats {
        self.stats
    }
}

impl Default for InteractionInferer {
    fn default() -> Self {
        Self::new(ExclusionSet::default())
    }
}

/// Run a fresh inferer over a whole transcript.
#[must_use]
#[instrument(skip_all)]
pub fn infer_interactions(turns: &[Turn], exclusions: ExclusionSet) -> Vec<Interaction> {
    let mut inferer = InteractionInferer::new(exclusions);
    let interactions = inferer.observe_all(turns);
    let stats = inferer.stats();
    debug!(
        turns = stats.turns,
        interactions = stats.interactions,
        episode_resets = stats.episode_resets,
        excluded = stats.excluded,
        "inferred interactions"
    );
    interactions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
