//! The episode outcome engine: trigger evaluation, reward accumulation and
//! the AND/OR termination decision.

use std::fmt;
use std::sync::Arc;

use delve_core::{Action, ConfigError, Snapshot, TriggerId};

use crate::trigger::{TriggerConfig, TriggerSpec, TriggerState};

/// A user-supplied reward term evaluated on every step.
///
/// Implemented for any `Fn(&Snapshot, Action, &Snapshot) -> f64` closure
/// that is `Send + Sync`.
pub trait RewardFn: Send + Sync {
    /// Reward contributed by the transition `prev --action--> curr`.
    fn reward(&self, prev: &Snapshot, action: Action, curr: &Snapshot) -> f64;
}

impl<F> RewardFn for F
where
    F: Fn(&Snapshot, Action, &Snapshot) -> f64 + Send + Sync,
{
    fn reward(&self, prev: &Snapshot, action: Action, curr: &Snapshot) -> f64 {
        self(prev, action, curr)
    }
}

/// Evaluates triggers on each step, pays their rewards and decides when
/// the task is complete.
///
/// Trigger configuration is shared behind an [`Arc`]; per-episode state
/// lives in a parallel vector indexed by [`TriggerId`]. Cloning a manager
/// therefore shares the configuration and copies the state, and
/// [`fresh`](RewardManager::fresh) gives a duplicate with cleared state for
/// a parallel environment instance.
///
/// # Termination
///
/// [`evaluate_step`](RewardManager::evaluate_step) returns `true` when a
/// `terminal_sufficient` trigger fired during that call, or when at least
/// one `terminal_required` trigger exists and every such trigger has been
/// satisfied this episode. A manager with neither kind of trigger never
/// terminates; the caller decides with its own goal check.
///
/// # Call order
///
/// Call [`reset`](RewardManager::reset) before each episode, then per step
/// [`evaluate_step`](RewardManager::evaluate_step) followed by exactly one
/// [`collect_reward`](RewardManager::collect_reward).
#[derive(Clone, Default)]
pub struct RewardManager {
    triggers: Arc<Vec<TriggerSpec>>,
    state: Vec<TriggerState>,
    custom: Vec<Arc<dyn RewardFn>>,
    pending: f64,
}

impl RewardManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager from loosely-typed trigger descriptions, in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] any description produces.
    pub fn from_configs(configs: &[TriggerConfig]) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        for config in configs {
            manager.add_trigger(TriggerSpec::from_config(config)?);
        }
        Ok(manager)
    }

    /// Append a trigger. Evaluation follows insertion order.
    pub fn add_trigger(&mut self, trigger: TriggerSpec) -> TriggerId {
        let id = TriggerId(self.state.len() as u32);
        Arc::make_mut(&mut self.triggers).push(trigger);
        self.state.push(TriggerState::default());
        id
    }

    /// Add a reward term evaluated on every step after the triggers.
    pub fn add_custom_reward_fn(&mut self, f: impl RewardFn + 'static) {
        self.custom.push(Arc::new(f));
    }

    /// Clear every trigger's episode state and the reward accumulator.
    pub fn reset(&mut self) {
        self.state.fill(TriggerState::default());
        self.pending = 0.0;
    }

    /// Evaluate every trigger on one transition and decide termination.
    ///
    /// All triggers run on every call, in insertion order. A trigger that
    /// is already satisfied and not repeatable is skipped: it neither pays
    /// again nor counts as fired for sufficiency.
    pub fn evaluate_step(&mut self, prev: &Snapshot, action: Action, curr: &Snapshot) -> bool {
        let mut sufficient_fired = false;
        for (i, (spec, state)) in self.triggers.iter().zip(&mut self.state).enumerate() {
            if state.satisfied && !spec.repeatable() {
                continue;
            }
            if !spec.kind().fires(prev, action, curr, state) {
                continue;
            }
            log::debug!(
                "trigger {} ({}) fired, reward {}",
                i,
                spec.kind().name(),
                spec.reward()
            );
            state.satisfied = true;
            self.pending += spec.reward();
            sufficient_fired |= spec.terminal_sufficient();
        }

        for f in &self.custom {
            self.pending += f.reward(prev, action, curr);
        }

        let terminated = sufficient_fired || self.required_complete();
        if terminated {
            log::info!(
                "task complete (sufficient trigger: {}, pending reward {})",
                sufficient_fired,
                self.pending
            );
        }
        terminated
    }

    /// Take the reward accumulated since the last call, leaving zero.
    pub fn collect_reward(&mut self) -> f64 {
        let reward = std::mem::take(&mut self.pending);
        log::debug!("collected reward {}", reward);
        reward
    }

    fn required_complete(&self) -> bool {
        let mut required = self
            .triggers
            .iter()
            .zip(&self.state)
            .filter(|(spec, _)| spec.terminal_required())
            .peekable();
        required.peek().is_some() && required.all(|(_, state)| state.satisfied)
    }

    /// Whether the trigger has fired this episode. `None` for an unknown id.
    pub fn is_satisfied(&self, id: TriggerId) -> Option<bool> {
        self.state.get(id.0 as usize).map(|s| s.satisfied)
    }

    /// Configured triggers in evaluation order.
    pub fn triggers(&self) -> &[TriggerSpec] {
        &self.triggers
    }

    /// Number of triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Whether no triggers are configured.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Whether any trigger can end the episode.
    pub fn has_termination_conditions(&self) -> bool {
        self.triggers
            .iter()
            .any(|t| t.terminal_required() || t.terminal_sufficient())
    }

    /// A duplicate sharing this manager's configuration with cleared
    /// episode state.
    pub fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }
}

impl fmt::Debug for RewardManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardManager")
            .field("triggers", &self.triggers)
            .field("state", &self.state)
            .field("custom", &self.custom.len())
            .field("pending", &self.pending)
            .finish()
    }
}
