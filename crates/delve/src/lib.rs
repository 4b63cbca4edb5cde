//! Delve: episode outcome, reward composition and observation windowing
//! for reinforcement-learning tasks over a grid roguelike.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Delve sub-crates. For most users, adding `delve` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use delve::prelude::*;
//!
//! // A task that succeeds as soon as the agent hears a squeak.
//! let mut manager = RewardManager::new();
//! manager.add_trigger(
//!     TriggerSpec::message(["squeak"])
//!         .terminal_sufficient(true)
//!         .build()
//!         .unwrap(),
//! );
//! manager.reset();
//!
//! let prev = Snapshot::builder(3, 3, 16).position((1, 1)).build();
//! let curr = Snapshot::builder(3, 3, 16)
//!     .position((1, 1))
//!     .message("You hear a squeak.")
//!     .describe(1, 0, "doorway")
//!     .build();
//! assert!(manager.evaluate_step(&prev, Action(0), &curr));
//! assert_eq!(manager.collect_reward(), 1.0);
//!
//! let door = find_direction_of("doorway", curr.screen_descriptions(), curr.position());
//! assert_eq!(door, Ok(Some(Direction::North)));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `delve-core` | Positions, actions, directions, grids, snapshots, errors |
//! | [`obs`] | `delve-obs` | Crop windows, cell descriptions, observation plans |
//! | [`reward`] | `delve-reward` | Triggers and the reward manager |
//! | [`env`] | `delve-env` | Task configuration, environment loop, presets |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and errors (`delve-core`).
///
/// Contains [`types::Snapshot`], the [`types::GameEngine`] collaborator
/// trait, and the compass [`types::Direction`] table.
pub use delve_core as types;

/// Observation windows and cell descriptions (`delve-obs`).
pub use delve_obs as obs;

/// Triggers and episode outcome (`delve-reward`).
///
/// [`reward::RewardManager`] evaluates [`reward::TriggerSpec`]s each step.
pub use delve_reward as reward;

/// Task environment loop (`delve-env`).
///
/// [`env::TaskEnv`] layers a task over a game; [`env::tasks`] has presets.
pub use delve_env as env;

/// Common imports for typical Delve usage.
///
/// ```rust
/// use delve::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use delve_core::{
        Action, Direction, GameEngine, GameStatus, GameStep, Grid, Position, Snapshot, TextGrid,
    };

    // Errors
    pub use delve_core::{ConfigError, GameError, ObsError};

    // Observation
    pub use delve_obs::{
        cell_description, crop, field_contains, find_direction_of, neighbor_index_to_direction,
        neighborhood_descriptions, CropWindow, ObsKey, ObsPlan, Observation,
    };

    // Reward
    pub use delve_reward::{RewardManager, TriggerSpec};

    // Environment
    pub use delve_env::{EnvError, StepResult, StepStatus, TaskConfig, TaskEnv};
}
