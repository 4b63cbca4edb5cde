//! Trigger configuration and per-kind firing predicates.
//!
//! A trigger is a predicate over one step transition `(prev, action,
//! curr)`. Its configuration ([`TriggerSpec`]) is immutable once built;
//! the only per-episode state a trigger has lives in the owning
//! [`RewardManager`](crate::RewardManager) as a [`TriggerState`].

use delve_core::{Action, ConfigError, Position, Snapshot};

/// Message prefixes the game uses to report that the agent killed something.
const KILL_PREFIXES: [&str; 3] = ["You kill the ", "You destroy the ", "You kill "];

/// What a trigger watches for.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerKind {
    /// Any of `messages` appears in the step's message.
    Message {
        /// Substrings to look for.
        messages: Vec<String>,
    },
    /// The step's message reports that the agent killed `monster`.
    Kill {
        /// Monster name as it appears in kill messages.
        monster: String,
    },
    /// The agent stands on `position` after the step.
    Coordinate {
        /// Target cell.
        position: Position,
    },
    /// The agent stepped onto a cell that, before the step, was described
    /// as containing `name`.
    Location {
        /// Substring of the target cell's description.
        name: String,
    },
    /// An inventory slot mentions `name` after the step.
    InventoryContains {
        /// Substring of the item description.
        name: String,
    },
    /// The agent performed `action` while standing on a cell described as
    /// containing `name` when the agent entered it.
    LocationAction {
        /// Substring of the cell's description.
        name: String,
        /// The action that must be taken there.
        action: Action,
    },
}

impl TriggerKind {
    /// Short kind name, as used in [`TriggerConfig::kind`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Kill { .. } => "kill",
            Self::Coordinate { .. } => "coordinate",
            Self::Location { .. } => "location",
            Self::InventoryContains { .. } => "inventory",
            Self::LocationAction { .. } => "location_action",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let kind = self.name();
        let missing = |parameter| Err(ConfigError::MissingParameter { kind, parameter });
        match self {
            Self::Message { messages } => {
                if messages.is_empty() || messages.iter().any(String::is_empty) {
                    return missing("messages");
                }
            }
            Self::Kill { monster } if monster.is_empty() => return missing("monster"),
            Self::Location { name }
            | Self::InventoryContains { name }
            | Self::LocationAction { name, .. }
                if name.is_empty() =>
            {
                return missing("name")
            }
            _ => {}
        }
        Ok(())
    }

    /// Evaluate this predicate on one transition, updating the trigger's
    /// episode state where the kind needs memory across steps.
    pub(crate) fn fires(
        &self,
        prev: &Snapshot,
        action: Action,
        curr: &Snapshot,
        state: &mut TriggerState,
    ) -> bool {
        match self {
            Self::Message { messages } => messages.iter().any(|m| curr.message().contains(m)),
            Self::Kill { monster } => reports_kill_of(curr.message(), monster),
            Self::Coordinate { position } => curr.position() == *position,
            Self::Location { name } => stepped_onto(prev, curr, name),
            Self::InventoryContains { name } => curr.inv_strs().iter().any(|s| s.contains(name)),
            Self::LocationAction {
                name,
                action: wanted,
            } => {
                // The action was taken from `prev`'s cell, so test first and
                // only then remember where `curr` stands.
                let fired = state.on_location && action == *wanted;
                if prev.position() != curr.position() {
                    state.on_location = stepped_onto(prev, curr, name);
                }
                fired
            }
        }
    }
}

fn reports_kill_of(message: &str, monster: &str) -> bool {
    KILL_PREFIXES.iter().any(|prefix| {
        message
            .match_indices(prefix)
            .any(|(i, _)| message[i + prefix.len()..].starts_with(monster))
    })
}

/// Whether the cell the agent occupies in `curr` was described in `prev`
/// as containing `name`.
fn stepped_onto(prev: &Snapshot, curr: &Snapshot, name: &str) -> bool {
    let pos = curr.position();
    prev.screen_descriptions()
        .text(pos.x, pos.y)
        .map(|text| String::from_utf8_lossy(text).contains(name))
        .unwrap_or(false)
}

/// Per-episode mutable state of one trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    /// The trigger has fired at least once this episode.
    pub satisfied: bool,
    /// `LocationAction` only: the agent currently stands on the location.
    pub on_location: bool,
}

/// Immutable configuration of one trigger.
///
/// Built through [`TriggerBuilder`], which validates kind parameters and
/// the reward value. Builder defaults: reward `1.0`, not repeatable,
/// terminal-required, not terminal-sufficient.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSpec {
    kind: TriggerKind,
    reward: f64,
    repeatable: bool,
    terminal_required: bool,
    terminal_sufficient: bool,
}

impl TriggerSpec {
    /// Start a builder for an arbitrary kind.
    pub fn builder(kind: TriggerKind) -> TriggerBuilder {
        TriggerBuilder {
            kind,
            reward: 1.0,
            repeatable: false,
            terminal_required: true,
            terminal_sufficient: false,
        }
    }

    /// Fires when any of `messages` appears in the step's message.
    pub fn message<I, S>(messages: I) -> TriggerBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(TriggerKind::Message {
            messages: messages.into_iter().map(Into::into).collect(),
        })
    }

    /// Fires when the agent kills `monster`.
    pub fn kill(monster: impl Into<String>) -> TriggerBuilder {
        Self::builder(TriggerKind::Kill {
            monster: monster.into(),
        })
    }

    /// Fires when the agent stands on `position`.
    pub fn coordinate(position: impl Into<Position>) -> TriggerBuilder {
        Self::builder(TriggerKind::Coordinate {
            position: position.into(),
        })
    }

    /// Fires when the agent steps onto a cell described as `name`.
    pub fn location(name: impl Into<String>) -> TriggerBuilder {
        Self::builder(TriggerKind::Location { name: name.into() })
    }

    /// Fires when an inventory item mentions `name`.
    pub fn inventory_contains(name: impl Into<String>) -> TriggerBuilder {
        Self::builder(TriggerKind::InventoryContains { name: name.into() })
    }

    /// Fires when `action` is taken while standing on `name`.
    pub fn location_action(name: impl Into<String>, action: Action) -> TriggerBuilder {
        Self::builder(TriggerKind::LocationAction {
            name: name.into(),
            action,
        })
    }

    /// Fires when the agent finishes eating `food`.
    pub fn eat(food: &str) -> TriggerBuilder {
        let mut messages = vec![
            format!("This {food} is delicious"),
            "Blecch!  Rotten food!".to_string(),
            "last bite of your meal".to_string(),
        ];
        match food {
            "apple" => {
                messages.push("Delicious!  Must be a Macintosh!".into());
                messages.push("Core dumped.".into());
            }
            "pear" => messages.push("Core dumped.".into()),
            _ => {}
        }
        Self::message(messages)
    }

    /// Fires when the agent wields `weapon`.
    pub fn wield(weapon: &str) -> TriggerBuilder {
        Self::message([
            format!("{weapon} wields itself to your hand!"),
            format!("{weapon} (weapon in hand)"),
        ])
    }

    /// Fires when the agent puts on `armor`.
    pub fn wear(armor: &str) -> TriggerBuilder {
        Self::message([format!("You are now wearing a {armor}")])
    }

    /// Fires when the agent puts on an amulet.
    pub fn amulet() -> TriggerBuilder {
        Self::message(["amulet (being worn)."])
    }

    /// Build a trigger from a loosely-typed task description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTriggerKind`] for an unrecognized
    /// `kind`, [`ConfigError::MissingParameter`] when the kind's parameter
    /// is absent, and any error [`TriggerBuilder::build`] reports.
    pub fn from_config(config: &TriggerConfig) -> Result<Self, ConfigError> {
        let name = |kind: &'static str| {
            config
                .name
                .clone()
                .ok_or(ConfigError::MissingParameter {
                    kind,
                    parameter: "name",
                })
        };
        let kind = match config.kind.as_str() {
            "message" => TriggerKind::Message {
                messages: config.messages.clone(),
            },
            "kill" => TriggerKind::Kill {
                monster: config.name.clone().ok_or(ConfigError::MissingParameter {
                    kind: "kill",
                    parameter: "monster",
                })?,
            },
            "coordinate" => TriggerKind::Coordinate {
                position: config.position.ok_or(ConfigError::MissingParameter {
                    kind: "coordinate",
                    parameter: "position",
                })?,
            },
            "location" => TriggerKind::Location {
                name: name("location")?,
            },
            "inventory" => TriggerKind::InventoryContains {
                name: name("inventory")?,
            },
            "location_action" => TriggerKind::LocationAction {
                name: name("location_action")?,
                action: config.action.ok_or(ConfigError::MissingParameter {
                    kind: "location_action",
                    parameter: "action",
                })?,
            },
            other => {
                return Err(ConfigError::UnknownTriggerKind {
                    kind: other.to_string(),
                })
            }
        };
        Self::builder(kind)
            .reward(config.reward)
            .repeatable(config.repeatable)
            .terminal_required(config.terminal_required)
            .terminal_sufficient(config.terminal_sufficient)
            .build()
    }

    /// What this trigger watches for.
    pub fn kind(&self) -> &TriggerKind {
        &self.kind
    }

    /// Reward paid each time the trigger fires.
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Whether the trigger may fire more than once per episode.
    pub fn repeatable(&self) -> bool {
        self.repeatable
    }

    /// Whether the trigger must be satisfied for the task to be complete.
    pub fn terminal_required(&self) -> bool {
        self.terminal_required
    }

    /// Whether firing alone ends the episode.
    pub fn terminal_sufficient(&self) -> bool {
        self.terminal_sufficient
    }
}

/// Builder for [`TriggerSpec`].
#[derive(Clone, Debug)]
pub struct TriggerBuilder {
    kind: TriggerKind,
    reward: f64,
    repeatable: bool,
    terminal_required: bool,
    terminal_sufficient: bool,
}

impl TriggerBuilder {
    /// Reward paid on firing (default: 1.0).
    pub fn reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    /// Allow firing on every matching step (default: false).
    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    /// Require this trigger for task completion (default: true).
    pub fn terminal_required(mut self, required: bool) -> Self {
        self.terminal_required = required;
        self
    }

    /// Let this trigger alone end the episode (default: false).
    pub fn terminal_sufficient(mut self, sufficient: bool) -> Self {
        self.terminal_sufficient = sufficient;
        self
    }

    /// Validate and build the trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] if the kind's parameter is
    /// empty, or [`ConfigError::NonFiniteReward`] if the reward is NaN or
    /// infinite.
    pub fn build(self) -> Result<TriggerSpec, ConfigError> {
        self.kind.validate()?;
        if !self.reward.is_finite() {
            return Err(ConfigError::NonFiniteReward {
                name: "reward",
                value: self.reward,
            });
        }
        Ok(TriggerSpec {
            kind: self.kind,
            reward: self.reward,
            repeatable: self.repeatable,
            terminal_required: self.terminal_required,
            terminal_sufficient: self.terminal_sufficient,
        })
    }
}

/// Loosely-typed trigger description as supplied by a task definition.
///
/// Only the parameters relevant to `kind` are read:
///
/// | kind | parameters |
/// |---|---|
/// | `message` | `messages` |
/// | `kill` | `name` (monster) |
/// | `coordinate` | `position` |
/// | `location`, `inventory` | `name` |
/// | `location_action` | `name`, `action` |
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerConfig {
    /// Trigger kind name.
    pub kind: String,
    /// Reward paid on firing.
    pub reward: f64,
    /// Whether the trigger may fire more than once per episode.
    pub repeatable: bool,
    /// Whether the trigger is required for completion.
    pub terminal_required: bool,
    /// Whether firing alone ends the episode.
    pub terminal_sufficient: bool,
    /// Message substrings.
    pub messages: Vec<String>,
    /// Monster, item, or location name.
    pub name: Option<String>,
    /// Target coordinate.
    pub position: Option<Position>,
    /// Required action.
    pub action: Option<Action>,
}

impl TriggerConfig {
    /// A description of `kind` with the builder defaults and no parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            reward: 1.0,
            repeatable: false,
            terminal_required: true,
            terminal_sufficient: false,
            messages: Vec::new(),
            name: None,
            position: None,
            action: None,
        }
    }
}
