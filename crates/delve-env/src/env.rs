//! The task environment loop.
//!
//! [`TaskEnv`] drives one [`GameEngine`] through episodes. Each
//! [`step()`](TaskEnv::step) advances the game, extracts the observation,
//! asks the reward manager whether the task is complete, falls back on the
//! game's own verdict when it is not, and computes the step reward.
//!
//! # Ownership model
//!
//! A `TaskEnv` exclusively owns its game and its reward manager. Run one
//! environment per worker; give each its own manager with
//! [`RewardManager::fresh`].

use delve_core::{Action, Direction, GameEngine, GameStatus, Snapshot};
use delve_obs::{
    cell_description, field_contains, find_direction_of, key_in_inventory,
    neighborhood_descriptions, Neighborhood, ObsPlan, Observation,
};
use delve_reward::RewardManager;

use crate::config::{EnvError, TaskConfig};

// ── StepStatus ──────────────────────────────────────────────────

/// Outcome of one environment step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// The episode continues.
    Running,
    /// The task was completed.
    TaskSuccessful,
    /// The agent died.
    Death,
    /// The episode ended without success: step budget exhausted or the
    /// game aborted.
    Aborted,
}

impl StepStatus {
    /// Whether the episode is over.
    pub fn is_done(self) -> bool {
        self != Self::Running
    }
}

impl From<GameStatus> for StepStatus {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Running => Self::Running,
            GameStatus::GoalReached => Self::TaskSuccessful,
            GameStatus::Died => Self::Death,
            GameStatus::Aborted => Self::Aborted,
        }
    }
}

// ── StepResult ──────────────────────────────────────────────────

/// Result of a successful [`TaskEnv::step()`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Observation after the step.
    pub observation: Observation,
    /// Reward for the step, time penalty included.
    pub reward: f64,
    /// Episode status after the step.
    pub status: StepStatus,
}

impl StepResult {
    /// Whether the episode ended on this step.
    pub fn done(&self) -> bool {
        self.status.is_done()
    }
}

// ── TaskEnv ─────────────────────────────────────────────────────

/// A task layered over a game engine.
///
/// Created with [`new()`](TaskEnv::new); call [`reset()`](TaskEnv::reset)
/// before the first [`step()`](TaskEnv::step) of every episode.
///
/// When a [`RewardManager`] is supplied, it decides success and pays the
/// step reward. The game's own verdict (goal reached, death, abort) still
/// ends the episode when the manager has not, so a manager without
/// termination triggers can be layered over a reach-the-goal task.
/// Without a manager the reward is sparse: `reward_win` on success,
/// `reward_lose` on death or abort, zero otherwise.
pub struct TaskEnv<G: GameEngine> {
    game: G,
    config: TaskConfig,
    plan: ObsPlan,
    manager: Option<RewardManager>,
    last: Option<Snapshot>,
    steps: u32,
    frozen_steps: u32,
    done: bool,
}

impl<G: GameEngine> TaskEnv<G> {
    /// Create an environment. Validates `config` and resets `manager`.
    pub fn new(
        game: G,
        config: TaskConfig,
        manager: Option<RewardManager>,
    ) -> Result<Self, EnvError> {
        let plan = config.compile_plan()?;
        let manager = manager.map(|mut m| {
            if !m.is_empty() && !m.has_termination_conditions() {
                log::warn!(
                    "reward manager has {} triggers but none can end the episode",
                    m.len()
                );
            }
            m.reset();
            m
        });
        Ok(Self {
            game,
            config,
            plan,
            manager,
            last: None,
            steps: 0,
            frozen_steps: 0,
            done: false,
        })
    }

    /// Start a new episode and return its first observation.
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        if let Some(m) = self.manager.as_mut() {
            m.reset();
        }
        let snapshot = self.game.reset()?;
        let observation = self.plan.execute(&snapshot)?;
        self.last = Some(snapshot);
        self.steps = 0;
        self.frozen_steps = 0;
        self.done = false;
        log::debug!("episode reset");
        Ok(observation)
    }

    /// Apply `action` and advance the episode by one step.
    ///
    /// # Errors
    ///
    /// [`EnvError::NotReset`] before the first reset,
    /// [`EnvError::EpisodeOver`] after the episode ended, and any game or
    /// observation failure. A game failure leaves the episode where it
    /// was. An observation failure ends the episode before any trigger
    /// sees the step, so no reward is earned for it.
    pub fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        if self.done {
            return Err(EnvError::EpisodeOver);
        }
        let prev = self.last.take().ok_or(EnvError::NotReset)?;
        let step = match self.game.step(action) {
            Ok(step) => step,
            Err(e) => {
                self.last = Some(prev);
                return Err(e.into());
            }
        };
        let curr = step.snapshot;
        self.steps += 1;

        let observation = match self.plan.execute(&curr) {
            Ok(observation) => observation,
            Err(e) => {
                self.last = Some(curr);
                self.done = true;
                log::warn!(
                    "episode ended after {} steps: observation failed: {e}",
                    self.steps
                );
                return Err(e.into());
            }
        };

        let task_done = match self.manager.as_mut() {
            Some(m) => m.evaluate_step(&prev, action, &curr),
            None => false,
        };
        let mut status = if task_done {
            StepStatus::TaskSuccessful
        } else {
            StepStatus::from(step.status)
        };
        if status == StepStatus::Running && self.steps >= self.config.max_episode_steps {
            status = StepStatus::Aborted;
        }

        let reward = self.task_reward(status) + self.time_penalty(&prev, &curr);
        self.last = Some(curr);
        self.done = status.is_done();

        log::debug!(
            "step {} action {} status {:?} reward {}",
            self.steps,
            action,
            status,
            reward
        );
        if self.done {
            log::info!("episode ended after {} steps: {:?}", self.steps, status);
        }
        Ok(StepResult {
            observation,
            reward,
            status,
        })
    }

    fn task_reward(&mut self, status: StepStatus) -> f64 {
        if let Some(m) = self.manager.as_mut() {
            return m.collect_reward();
        }
        match status {
            StepStatus::TaskSuccessful => self.config.reward_win,
            StepStatus::Running => 0.0,
            StepStatus::Death | StepStatus::Aborted => self.config.reward_lose,
        }
    }

    fn time_penalty(&mut self, prev: &Snapshot, curr: &Snapshot) -> f64 {
        let elapsed = curr.turn().saturating_sub(prev.turn());
        if elapsed == 0 {
            self.frozen_steps += 1;
        } else {
            self.frozen_steps = 0;
        }
        self.config
            .penalty_mode
            .penalty(self.frozen_steps, self.config.penalty_step)
            + elapsed as f64 * self.config.penalty_time
    }

    // ── Snapshot queries ────────────────────────────────────────

    /// The latest snapshot, if an episode has started.
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    fn snapshot(&self) -> Result<&Snapshot, EnvError> {
        self.last.as_ref().ok_or(EnvError::NotReset)
    }

    /// Descriptions of the 3x3 block around the agent, row-major.
    pub fn neighbor_descriptions(&self) -> Result<Neighborhood, EnvError> {
        let snap = self.snapshot()?;
        Ok(neighborhood_descriptions(
            snap.screen_descriptions(),
            snap.position(),
        )?)
    }

    /// Direction of the first neighboring cell whose description contains
    /// `name`.
    pub fn direction_of(&self, name: &str) -> Result<Option<Direction>, EnvError> {
        let snap = self.snapshot()?;
        Ok(find_direction_of(
            name,
            snap.screen_descriptions(),
            snap.position(),
        )?)
    }

    /// Whether any cell on the map is described as containing `name`.
    pub fn screen_contains(&self, name: &str) -> Result<bool, EnvError> {
        let snap = self.snapshot()?;
        Ok(field_contains(name, snap.screen_descriptions()))
    }

    /// Description of the cell at `(x, y)`.
    pub fn screen_description(&self, x: i32, y: i32) -> Result<String, EnvError> {
        let snap = self.snapshot()?;
        cell_description(snap.screen_descriptions(), x, y).map_err(EnvError::from)
    }

    /// Inventory letter of the first item whose description contains
    /// `name`.
    pub fn key_in_inventory(&self, name: &str) -> Result<Option<u8>, EnvError> {
        Ok(key_in_inventory(self.snapshot()?, name))
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The configuration this environment was built from.
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// The compiled observation plan.
    pub fn plan(&self) -> &ObsPlan {
        &self.plan
    }

    /// The reward manager, if any.
    pub fn manager(&self) -> Option<&RewardManager> {
        self.manager.as_ref()
    }

    /// The underlying game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Steps taken this episode.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Whether the current episode has ended.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Drop the environment and return its game.
    pub fn into_game(self) -> G {
        self.game
    }
}

impl<G: GameEngine> std::fmt::Debug for TaskEnv<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnv")
            .field("config", &self.config)
            .field("manager", &self.manager)
            .field("steps", &self.steps)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{ObsError, Position};
    use delve_reward::TriggerSpec;
    use delve_test_utils::{room, ScriptedGame};

    fn quiet_config() -> TaskConfig {
        TaskConfig {
            penalty_step: 0.0,
            ..TaskConfig::default()
        }
        .with_keys(&["chars_crop", "message"])
    }

    fn game() -> ScriptedGame {
        ScriptedGame::new(room(5, 5, (2, 2)).turn(1).build())
            .then(room(5, 5, (3, 2)).turn(2).build())
            .then_with(room(5, 5, (4, 2)).turn(3).build(), GameStatus::GoalReached)
    }

    #[test]
    fn step_before_reset_is_rejected() {
        let mut env = TaskEnv::new(game(), quiet_config(), None).unwrap();
        assert_eq!(env.step(Action(0)).unwrap_err(), EnvError::NotReset);
        assert_eq!(env.neighbor_descriptions().unwrap_err(), EnvError::NotReset);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = TaskConfig {
            max_episode_steps: 0,
            ..quiet_config()
        };
        assert!(matches!(
            TaskEnv::new(game(), cfg, None),
            Err(EnvError::Config(_))
        ));
    }

    #[test]
    fn sparse_reward_on_goal() {
        let mut env = TaskEnv::new(game(), quiet_config(), None).unwrap();
        env.reset().unwrap();
        let first = env.step(Action(1)).unwrap();
        assert_eq!((first.status, first.reward), (StepStatus::Running, 0.0));
        let second = env.step(Action(1)).unwrap();
        assert_eq!(second.status, StepStatus::TaskSuccessful);
        assert_eq!(second.reward, 1.0);
        assert_eq!(env.step(Action(1)).unwrap_err(), EnvError::EpisodeOver);
    }

    #[test]
    fn game_failure_keeps_last_snapshot() {
        let mut env = TaskEnv::new(
            ScriptedGame::new(room(3, 3, (1, 1)).build()),
            quiet_config(),
            None,
        )
        .unwrap();
        env.reset().unwrap();
        assert!(matches!(env.step(Action(0)), Err(EnvError::Game(_))));
        assert!(env.last_snapshot().is_some());
    }

    #[test]
    fn observation_failure_ends_episode_before_triggers_fire() {
        let mut manager = RewardManager::new();
        let id = manager.add_trigger(TriggerSpec::coordinate((3, 2)).build().unwrap());
        let bare = Snapshot::builder(5, 5, 32)
            .position(Position::new(3, 2))
            .turn(2)
            .build();
        let game = ScriptedGame::new(room(5, 5, (2, 2)).turn(1).build()).then(bare);
        let mut env = TaskEnv::new(game, quiet_config(), Some(manager)).unwrap();
        env.reset().unwrap();

        assert_eq!(
            env.step(Action(1)).unwrap_err(),
            EnvError::Obs(ObsError::MissingField {
                name: "chars".into()
            })
        );
        assert!(env.is_done());
        assert_eq!(env.last_snapshot().map(|s| s.position()), Some(Position::new(3, 2)));
        assert_eq!(env.manager().and_then(|m| m.is_satisfied(id)), Some(false));
        assert_eq!(env.step(Action(1)).unwrap_err(), EnvError::EpisodeOver);
    }

    #[test]
    fn manager_is_reset_at_construction_and_reset() {
        let mut manager = RewardManager::new();
        let id = manager.add_trigger(TriggerSpec::coordinate((3, 2)).build().unwrap());
        let mut env = TaskEnv::new(game(), quiet_config(), Some(manager)).unwrap();
        env.reset().unwrap();
        let r = env.step(Action(0)).unwrap();
        assert_eq!(r.status, StepStatus::TaskSuccessful);
        assert_eq!(r.reward, 1.0);
        assert_eq!(env.manager().and_then(|m| m.is_satisfied(id)), Some(true));
        env.reset().unwrap();
        assert_eq!(env.manager().and_then(|m| m.is_satisfied(id)), Some(false));
    }

    #[test]
    fn snapshot_queries_use_last_snapshot() {
        let mut env = TaskEnv::new(game(), quiet_config(), None).unwrap();
        env.reset().unwrap();
        let n = env.neighbor_descriptions().unwrap();
        assert_eq!(n.len(), 9);
        assert_eq!(n[4], "human caveman called Agent");
        assert!(env.screen_contains("floor").unwrap());
        assert_eq!(env.direction_of("floor").unwrap(), Some(Direction::NorthWest));
        assert_eq!(env.screen_description(0, 0).unwrap(), "floor of a room");
        assert!(matches!(
            env.screen_description(9, 9),
            Err(EnvError::Obs(ObsError::OutOfBounds { .. }))
        ));
        assert_eq!(env.key_in_inventory("apple").unwrap(), None);
    }
}
