//! Task environments over an external roguelike game.
//!
//! A [`TaskEnv`] wraps a [`GameEngine`](delve_core::GameEngine) with a
//! validated [`TaskConfig`], an optional
//! [`RewardManager`](delve_reward::RewardManager), and an observation plan.
//! [`tasks`] holds the preset configurations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod env;
pub mod tasks;

pub use config::{EnvError, PenaltyMode, TaskConfig, WindowConfig, DEFAULT_OBSERVATION_KEYS};
pub use env::{StepResult, StepStatus, TaskEnv};
