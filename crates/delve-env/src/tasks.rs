//! Preset task configurations.
//!
//! Each preset returns a [`TaskConfig`] (and, where the task has one, a
//! [`RewardManager`]) that callers may adjust before building a
//! [`TaskEnv`].

use delve_core::{ConfigError, GameEngine};
use delve_reward::{RewardManager, TriggerSpec};

use crate::config::{EnvError, TaskConfig};
use crate::env::TaskEnv;

/// Maze-style navigation: reach the goal within 100 steps, observing a
/// cropped view of map characters and colors.
pub fn navigation_config() -> TaskConfig {
    TaskConfig {
        max_episode_steps: 100,
        ..TaskConfig::default()
    }
    .with_keys(&["chars_crop", "colors_crop"])
}

/// Skill acquisition: 250 steps, with messages, inventory and cell
/// descriptions in the observation.
pub fn skill_config() -> TaskConfig {
    TaskConfig {
        max_episode_steps: 250,
        ..TaskConfig::default()
    }
    .with_keys(&[
        "chars_crop",
        "colors_crop",
        "screen_descriptions_crop",
        "message",
        "inv_strs",
        "inv_letters",
    ])
}

/// The memory challenge's reward manager: hearing a squeak (reward 0) or
/// killing the grid bug (reward 1) each ends the episode.
pub fn memory_manager() -> Result<RewardManager, ConfigError> {
    let mut manager = RewardManager::new();
    manager.add_trigger(
        TriggerSpec::message(["squeak"])
            .reward(0.0)
            .terminal_sufficient(true)
            .terminal_required(true)
            .build()?,
    );
    manager.add_trigger(
        TriggerSpec::kill("grid bug")
            .terminal_sufficient(true)
            .terminal_required(true)
            .build()?,
    );
    Ok(manager)
}

/// Navigation settings with the memory challenge's 5000-step budget.
pub fn memory_config() -> TaskConfig {
    TaskConfig {
        max_episode_steps: 5000,
        ..navigation_config()
    }
}

/// The memory challenge over `game`.
pub fn memory_task<G: GameEngine>(game: G) -> Result<TaskEnv<G>, EnvError> {
    TaskEnv::new(game, memory_config(), Some(memory_manager()?))
}
