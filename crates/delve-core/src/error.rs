//! Error types for the Delve task layer.
//!
//! Organized by when they surface: configuration errors are fatal at
//! construction time, observation errors are raised by lookups against a
//! snapshot, and game errors wrap failures of the external game engine.

use std::error::Error;
use std::fmt;

use crate::id::Position;

/// Errors detected while validating task, trigger, or window configuration.
///
/// All of these are fatal and surface before the first episode starts.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A crop window dimension is even, so the window has no center cell.
    EvenWindowDimension {
        /// Which dimension (`"height"` or `"width"`).
        name: &'static str,
        /// The configured value.
        value: usize,
    },
    /// A trigger kind name was not recognized.
    UnknownTriggerKind {
        /// The unrecognized kind.
        kind: String,
    },
    /// A trigger kind is missing one of its kind-specific parameters.
    MissingParameter {
        /// The trigger kind.
        kind: &'static str,
        /// The parameter that is missing or empty.
        parameter: &'static str,
    },
    /// A reward or penalty value is NaN or infinite.
    NonFiniteReward {
        /// Which value was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An observation key is unknown or not supported.
    UnsupportedObservationKey {
        /// The rejected key.
        key: String,
    },
    /// The episode step budget is zero.
    ZeroStepBudget,
    /// A snapshot field does not share the snapshot's grid dimensions.
    DimensionMismatch {
        /// Name of the offending field.
        field: String,
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        actual: (usize, usize),
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvenWindowDimension { name, value } => {
                write!(f, "window {name} must be odd, got {value}")
            }
            Self::UnknownTriggerKind { kind } => write!(f, "unknown trigger kind '{kind}'"),
            Self::MissingParameter { kind, parameter } => {
                write!(f, "{kind} trigger is missing parameter '{parameter}'")
            }
            Self::NonFiniteReward { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            Self::UnsupportedObservationKey { key } => {
                write!(f, "observation key '{key}' is not supported")
            }
            Self::ZeroStepBudget => write!(f, "max_episode_steps must be at least 1"),
            Self::DimensionMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field '{field}' has shape {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

impl Error for ConfigError {}

/// Errors from lookups and extraction against a [`Snapshot`](crate::Snapshot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObsError {
    /// A coordinate lies outside the field.
    OutOfBounds {
        /// The offending coordinate.
        position: Position,
        /// Field rows.
        rows: usize,
        /// Field columns.
        cols: usize,
    },
    /// A snapshot does not carry a field the observation plan needs.
    MissingField {
        /// Name of the missing field.
        name: String,
    },
}

impl fmt::Display for ObsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                rows,
                cols,
            } => write!(f, "position {position} out of bounds for {rows}x{cols} field"),
            Self::MissingField { name } => write!(f, "snapshot has no field '{name}'"),
        }
    }
}

impl Error for ObsError {}

/// Errors reported by the external game engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// The engine failed to start or restart an episode.
    ResetFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The engine failed while advancing one step.
    StepFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// `step` was called before the first `reset`.
    NotStarted,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResetFailed { reason } => write!(f, "game reset failed: {reason}"),
            Self::StepFailed { reason } => write!(f, "game step failed: {reason}"),
            Self::NotStarted => write!(f, "game stepped before reset"),
        }
    }
}

impl Error for GameError {}
