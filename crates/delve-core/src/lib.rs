//! Core types and traits for the Delve task layer.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: agent positions and
//! actions, the eight-direction movement table, dense 2-D grids, the
//! per-step [`Snapshot`] produced by the game collaborator, the
//! [`GameEngine`] trait through which that collaborator is driven, and
//! the error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod grid;
pub mod id;
pub mod snapshot;
pub mod traits;

pub use direction::Direction;
pub use error::{ConfigError, GameError, ObsError};
pub use grid::{trim_at_sentinel, Grid, TextGrid};
pub use id::{Action, Position, TriggerId};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use traits::{GameEngine, GameStatus, GameStep};
