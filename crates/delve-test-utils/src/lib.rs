//! Test utilities and mock types for Delve development.
//!
//! Provides [`ScriptedGame`], a mock [`GameEngine`] that replays a fixed
//! list of steps, and snapshot [`fixtures`] for building small maps.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{room, DESCRIPTION_CAPACITY, FLOOR};

use delve_core::{Action, GameEngine, GameError, GameStatus, GameStep, Snapshot};

/// Mock implementation of [`GameEngine`].
///
/// [`reset`](GameEngine::reset) returns the initial snapshot and rewinds
/// the script; each [`step`](GameEngine::step) returns the next scripted
/// entry and records the action. Stepping past the end of the script, or
/// before the first reset, fails.
pub struct ScriptedGame {
    initial: Snapshot,
    script: Vec<GameStep>,
    cursor: Option<usize>,
    actions: Vec<Action>,
    resets: usize,
    fail_reset: bool,
}

impl ScriptedGame {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            initial,
            script: Vec::new(),
            cursor: None,
            actions: Vec::new(),
            resets: 0,
            fail_reset: false,
        }
    }

    /// Append a step that keeps the game running.
    pub fn then(self, snapshot: Snapshot) -> Self {
        self.then_with(snapshot, GameStatus::Running)
    }

    /// Append a step with an explicit game verdict.
    pub fn then_with(mut self, snapshot: Snapshot, status: GameStatus) -> Self {
        self.script.push(GameStep { snapshot, status });
        self
    }

    /// Make every reset fail.
    pub fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Actions received since construction, across episodes.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of successful resets.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl GameEngine for ScriptedGame {
    fn reset(&mut self) -> Result<Snapshot, GameError> {
        if self.fail_reset {
            return Err(GameError::ResetFailed {
                reason: "scripted failure".into(),
            });
        }
        self.cursor = Some(0);
        self.resets += 1;
        Ok(self.initial.clone())
    }

    fn step(&mut self, action: Action) -> Result<GameStep, GameError> {
        let cursor = self.cursor.as_mut().ok_or(GameError::NotStarted)?;
        let step = self
            .script
            .get(*cursor)
            .cloned()
            .ok_or_else(|| GameError::StepFailed {
                reason: format!("script exhausted after {} steps", *cursor),
            })?;
        *cursor += 1;
        self.actions.push(action);
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_script_after_each_reset() {
        let mut game = ScriptedGame::new(room(3, 3, (1, 1)).build())
            .then(room(3, 3, (2, 1)).message("one").build())
            .then_with(room(3, 3, (2, 2)).build(), GameStatus::Died);

        assert_eq!(game.step(Action(0)).unwrap_err(), GameError::NotStarted);
        game.reset().unwrap();
        assert_eq!(game.step(Action(1)).unwrap().snapshot.message(), "one");
        assert_eq!(game.step(Action(2)).unwrap().status, GameStatus::Died);
        assert!(game.step(Action(3)).is_err());

        game.reset().unwrap();
        assert_eq!(game.step(Action(4)).unwrap().snapshot.message(), "one");
        assert_eq!(game.actions(), &[Action(1), Action(2), Action(4)]);
        assert_eq!(game.resets(), 2);
    }

    #[test]
    fn failing_reset_reports_error() {
        let mut game = ScriptedGame::new(room(1, 1, (0, 0)).build()).failing_reset();
        assert!(matches!(game.reset(), Err(GameError::ResetFailed { .. })));
    }
}
