//! Task configuration, validation, and the environment error type.
//!
//! [`TaskConfig`] is the builder-input for a [`TaskEnv`](crate::TaskEnv).
//! [`validate()`](TaskConfig::validate) checks every structural invariant
//! up front so that a constructed environment never fails on
//! configuration mid-episode.

use std::error::Error;
use std::fmt;

use delve_core::{ConfigError, GameError, ObsError};
use delve_obs::{CropWindow, ObsKey, ObsPlan};

// ── WindowConfig ───────────────────────────────────────────────────

/// Size and padding of the agent-centered observation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Window rows. Must be odd. Default: 5.
    pub height: usize,
    /// Window columns. Must be odd. Default: 5.
    pub width: usize,
    /// Value written into cells outside the map. Default: 0.
    pub pad: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            height: CropWindow::DEFAULT_SIZE,
            width: CropWindow::DEFAULT_SIZE,
            pad: 0,
        }
    }
}

impl WindowConfig {
    /// Validate the dimensions and produce the crop window.
    pub fn crop_window(&self) -> Result<CropWindow, ConfigError> {
        CropWindow::new(self.height, self.width, self.pad)
    }
}

// ── PenaltyMode ────────────────────────────────────────────────────

/// How the per-step penalty grows while the in-game clock is frozen.
///
/// A step is *frozen* when it does not advance the game's move counter
/// (menus, invalid moves, messages). `n` below is the number of
/// consecutive frozen steps including this one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PenaltyMode {
    /// `penalty_step` on every frozen step.
    #[default]
    Constant,
    /// `2^n * penalty_step`.
    Exp,
    /// `n^2 * penalty_step`.
    Square,
    /// `n * penalty_step`.
    Linear,
    /// `penalty_step` on every step, frozen or not.
    Always,
}

impl PenaltyMode {
    /// Penalty for a step after `frozen_steps` consecutive frozen steps.
    pub fn penalty(self, frozen_steps: u32, penalty_step: f64) -> f64 {
        let n = f64::from(frozen_steps);
        match self {
            Self::Constant if frozen_steps > 0 => penalty_step,
            Self::Constant => 0.0,
            Self::Exp => 2f64.powf(n) * penalty_step,
            Self::Square => n * n * penalty_step,
            Self::Linear => n * penalty_step,
            Self::Always => penalty_step,
        }
    }
}

// ── EnvError ───────────────────────────────────────────────────────

/// Errors surfaced by [`TaskEnv`](crate::TaskEnv).
#[derive(Clone, Debug, PartialEq)]
pub enum EnvError {
    /// The task configuration is invalid.
    Config(ConfigError),
    /// The game engine failed.
    Game(GameError),
    /// Observation extraction failed.
    Obs(ObsError),
    /// `step` or a snapshot query was called before `reset`.
    NotReset,
    /// `step` was called after the episode ended.
    EpisodeOver,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Game(e) => write!(f, "game: {e}"),
            Self::Obs(e) => write!(f, "observation: {e}"),
            Self::NotReset => write!(f, "environment used before reset"),
            Self::EpisodeOver => write!(f, "episode is over; call reset"),
        }
    }
}

impl Error for EnvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Game(e) => Some(e),
            Self::Obs(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EnvError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<GameError> for EnvError {
    fn from(e: GameError) -> Self {
        Self::Game(e)
    }
}

impl From<ObsError> for EnvError {
    fn from(e: ObsError) -> Self {
        Self::Obs(e)
    }
}

// ── TaskConfig ─────────────────────────────────────────────────────

/// Observation keys used when none are configured: every field a game
/// snapshot may carry.
pub const DEFAULT_OBSERVATION_KEYS: [&str; 10] = [
    "glyphs",
    "chars",
    "colors",
    "specials",
    "screen_descriptions",
    "message",
    "inv_strs",
    "inv_letters",
    "tty_chars",
    "tty_colors",
];

/// Complete configuration of a task environment.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskConfig {
    /// Observation window for `_crop` keys.
    pub window: WindowConfig,
    /// Observation entries, in output order.
    pub observation_keys: Vec<String>,
    /// Step budget per episode. Default: 200.
    pub max_episode_steps: u32,
    /// Reward for a successful episode when no reward manager is used.
    /// Default: 1.
    pub reward_win: f64,
    /// Reward for death or abort when no reward manager is used.
    /// Default: 0.
    pub reward_lose: f64,
    /// Base penalty scaled by [`penalty_mode`](TaskConfig::penalty_mode).
    /// Default: -0.01.
    pub penalty_step: f64,
    /// Penalty per elapsed in-game turn. Default: 0.
    pub penalty_time: f64,
    /// Growth of the frozen-clock penalty. Default: [`PenaltyMode::Constant`].
    pub penalty_mode: PenaltyMode,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            observation_keys: DEFAULT_OBSERVATION_KEYS.map(String::from).to_vec(),
            max_episode_steps: 200,
            reward_win: 1.0,
            reward_lose: 0.0,
            penalty_step: -0.01,
            penalty_time: 0.0,
            penalty_mode: PenaltyMode::Constant,
        }
    }
}

impl TaskConfig {
    /// Replace the observation keys.
    pub fn with_keys<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.observation_keys = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Window must have a center cell.
        self.window.crop_window()?;
        // 2. Episodes must be able to take at least one step.
        if self.max_episode_steps == 0 {
            return Err(ConfigError::ZeroStepBudget);
        }
        // 3. Reward terms must be finite.
        for (name, value) in [
            ("reward_win", self.reward_win),
            ("reward_lose", self.reward_lose),
            ("penalty_step", self.penalty_step),
            ("penalty_time", self.penalty_time),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteReward { name, value });
            }
        }
        // 4. Every key must be known.
        ObsKey::parse_all(&self.observation_keys)?;
        Ok(())
    }

    /// Validate and compile the observation plan.
    pub fn compile_plan(&self) -> Result<ObsPlan, ConfigError> {
        self.validate()?;
        let keys = ObsKey::parse_all(&self.observation_keys)?;
        Ok(ObsPlan::compile(&keys, self.window.crop_window()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = TaskConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.compile_plan().unwrap().keys().count(), 10);
    }

    #[test]
    fn even_window_rejected() {
        let mut cfg = TaskConfig::default();
        cfg.window.width = 4;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EvenWindowDimension {
                name: "width",
                value: 4
            })
        );
    }

    #[test]
    fn zero_step_budget_rejected() {
        let cfg = TaskConfig {
            max_episode_steps: 0,
            ..TaskConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroStepBudget));
    }

    #[test]
    fn non_finite_reward_rejected() {
        let cfg = TaskConfig {
            penalty_time: f64::INFINITY,
            ..TaskConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonFiniteReward {
                name: "penalty_time",
                ..
            })
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let cfg = TaskConfig::default().with_keys(&["chars_crop", "pixel"]);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedObservationKey {
                key: "pixel".into()
            })
        );
    }

    #[test]
    fn penalty_modes() {
        let p = -0.5;
        assert_eq!(PenaltyMode::Constant.penalty(0, p), 0.0);
        assert_eq!(PenaltyMode::Constant.penalty(3, p), -0.5);
        assert_eq!(PenaltyMode::Exp.penalty(0, p), -0.5);
        assert_eq!(PenaltyMode::Exp.penalty(3, p), -4.0);
        assert_eq!(PenaltyMode::Square.penalty(3, p), -4.5);
        assert_eq!(PenaltyMode::Linear.penalty(3, p), -1.5);
        assert_eq!(PenaltyMode::Always.penalty(0, p), -0.5);
    }

    proptest! {
        #[test]
        fn penalty_scales_with_penalty_step(
            frozen in 0u32..20,
            step in -2.0f64..2.0,
        ) {
            for mode in [
                PenaltyMode::Constant,
                PenaltyMode::Exp,
                PenaltyMode::Square,
                PenaltyMode::Linear,
                PenaltyMode::Always,
            ] {
                let unit = mode.penalty(frozen, 1.0);
                prop_assert!(unit >= 0.0);
                let scaled = mode.penalty(frozen, step);
                prop_assert!((scaled - unit * step).abs() < 1e-9 * (1.0 + unit));
            }
        }

        #[test]
        fn growing_modes_never_shrink(frozen in 0u32..20) {
            for mode in [PenaltyMode::Exp, PenaltyMode::Square, PenaltyMode::Linear] {
                prop_assert!(mode.penalty(frozen + 1, 1.0) >= mode.penalty(frozen, 1.0));
            }
        }
    }

    #[test]
    fn env_error_chains_source() {
        let err = EnvError::from(ConfigError::ZeroStepBudget);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("config: "));
        assert!(EnvError::NotReset.source().is_none());
    }
}
