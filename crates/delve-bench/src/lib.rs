//! Benchmark profiles for the Delve task layer.
//!
//! - [`reference_snapshot`]: a full-size 21x79 map with seeded terrain
//! - [`reference_walk`]: a seeded random walk of snapshots over that map
//! - [`reference_manager`]: a reward manager with one trigger of each kind

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use delve_core::{Action, ConfigError, Direction, Grid, Position, Snapshot};
use delve_reward::{RewardManager, TriggerBuilder, TriggerSpec};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Map rows of a full game screen.
pub const ROWS: usize = 21;
/// Map columns of a full game screen.
pub const COLS: usize = 79;
/// Description buffer size per cell.
pub const DESCRIPTION_CAPACITY: usize = 80;

const TERRAIN: [(&str, u8); 6] = [
    ("floor of a room", b'.'),
    ("dark part of a room", b' '),
    ("wall", b'|'),
    ("doorway", b'.'),
    ("corridor", b'#'),
    ("fountain", b'{'),
];

const MESSAGES: [&str; 5] = [
    "",
    "You hear a squeak.",
    "You kill the grid bug!",
    "The jackal bites!",
    "You see here an apple.",
];

/// Build a 21x79 map with seeded terrain and the agent at a seeded cell.
pub fn reference_snapshot(seed: u64) -> Result<Snapshot, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let x = rng.random_range(0..COLS as i32);
    let y = rng.random_range(0..ROWS as i32);
    terrain_snapshot(&mut rng, Position::new(x, y), 0, "")
}

fn terrain_snapshot(
    rng: &mut ChaCha8Rng,
    agent: Position,
    turn: u64,
    message: &str,
) -> Result<Snapshot, ConfigError> {
    let mut chars = Grid::filled(ROWS, COLS, b' ' as u16);
    let mut colors = Grid::filled(ROWS, COLS, 0u16);
    let mut builder = Snapshot::builder(ROWS, COLS, DESCRIPTION_CAPACITY)
        .position(agent)
        .message(message)
        .turn(turn);
    for y in 0..ROWS as i32 {
        for x in 0..COLS as i32 {
            let (text, ch) = TERRAIN[rng.random_range(0..TERRAIN.len())];
            builder = builder.describe(x, y, text);
            if let Some(c) = chars.get_mut(x, y) {
                *c = u16::from(ch);
            }
            if let Some(c) = colors.get_mut(x, y) {
                *c = rng.random_range(0..16);
            }
        }
    }
    builder = builder.describe(agent.x, agent.y, "human rogue called Agent");
    Ok(builder.grid("chars", chars)?.grid("colors", colors)?.build())
}

/// A seeded random walk of `len` snapshots (plus the start) with the
/// actions taken between them.
///
/// Each step moves the agent one cell in a random compass direction,
/// clamped to the map, and picks a random message.
pub fn reference_walk(seed: u64, len: usize) -> Result<(Vec<Snapshot>, Vec<Action>), ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pos = Position::new(COLS as i32 / 2, ROWS as i32 / 2);
    let mut snapshots = Vec::with_capacity(len + 1);
    let mut actions = Vec::with_capacity(len);
    snapshots.push(terrain_snapshot(&mut rng, pos, 0, "")?);
    for turn in 1..=len as u64 {
        let action = rng.random_range(0..8u32);
        let dir = Direction::ALL[action as usize];
        let (dx, dy) = dir.offset();
        pos = Position::new(
            (pos.x + dx).clamp(0, COLS as i32 - 1),
            (pos.y + dy).clamp(0, ROWS as i32 - 1),
        );
        let message = MESSAGES[rng.random_range(0..MESSAGES.len())];
        snapshots.push(terrain_snapshot(&mut rng, pos, turn, message)?);
        actions.push(Action(action));
    }
    Ok((snapshots, actions))
}

/// A reward manager with one trigger of each kind, none of which can end
/// the episode, so a benchmark loop never short-circuits.
pub fn reference_manager() -> Result<RewardManager, ConfigError> {
    let mut m = RewardManager::new();
    let optional = |b: TriggerBuilder| b.terminal_required(false).repeatable(true).build();
    m.add_trigger(optional(TriggerSpec::message(["squeak", "bites"]))?);
    m.add_trigger(optional(TriggerSpec::kill("grid bug"))?);
    m.add_trigger(optional(TriggerSpec::coordinate((10, 10)))?);
    m.add_trigger(optional(TriggerSpec::location("fountain"))?);
    m.add_trigger(optional(TriggerSpec::inventory_contains("apple"))?);
    m.add_trigger(optional(TriggerSpec::location_action("doorway", Action(3)))?);
    m.reset();
    Ok(m)
}
