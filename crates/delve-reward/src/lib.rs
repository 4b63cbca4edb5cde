//! Trigger-based reward composition and episode termination.
//!
//! A [`RewardManager`] owns an ordered list of [`TriggerSpec`]s. Each step
//! it evaluates every trigger on the transition `(prev, action, curr)`,
//! accumulates the rewards of those that fired, and decides whether the
//! task is complete:
//!
//! - any `terminal_sufficient` trigger firing ends the episode;
//! - otherwise the episode ends once every `terminal_required` trigger has
//!   fired at least once.
//!
//! ```
//! use delve_core::{Action, Snapshot};
//! use delve_reward::{RewardManager, TriggerSpec};
//!
//! let mut manager = RewardManager::new();
//! manager.add_trigger(TriggerSpec::kill("grid bug").build().unwrap());
//! manager.reset();
//!
//! let prev = Snapshot::builder(1, 1, 8).build();
//! let curr = Snapshot::builder(1, 1, 8).message("You kill the grid bug!").build();
//! assert!(manager.evaluate_step(&prev, Action(0), &curr));
//! assert_eq!(manager.collect_reward(), 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod manager;
pub mod trigger;

pub use manager::{RewardFn, RewardManager};
pub use trigger::{TriggerBuilder, TriggerConfig, TriggerKind, TriggerSpec, TriggerState};
