//! The game-engine collaborator seen from the task layer.

use crate::error::GameError;
use crate::id::Action;
use crate::snapshot::Snapshot;

/// How the game itself judges the episode after a step.
///
/// This is the game's own verdict, independent of any task triggers;
/// the task environment falls back on it when no trigger decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The game continues.
    Running,
    /// The agent reached the level's designated goal (e.g. the staircase).
    GoalReached,
    /// The agent died.
    Died,
    /// The game ended for any other reason.
    Aborted,
}

/// Result of advancing the game by one action.
#[derive(Clone, Debug)]
pub struct GameStep {
    /// State after the action.
    pub snapshot: Snapshot,
    /// The game's verdict on the episode.
    pub status: GameStatus,
}

/// An external game that produces one [`Snapshot`] per step.
///
/// Process management, level compilation, and the simulation itself live
/// behind this trait. Implementations are driven by exactly one task
/// environment and need not be `Sync`.
pub trait GameEngine {
    /// Start a new episode and return its first snapshot.
    fn reset(&mut self) -> Result<Snapshot, GameError>;

    /// Apply `action` and return the resulting state.
    fn step(&mut self, action: Action) -> Result<GameStep, GameError>;
}
