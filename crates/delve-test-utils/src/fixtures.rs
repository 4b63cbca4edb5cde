//! Reusable snapshot fixtures.
//!
//! [`room`] builds a lit rectangular room with the agent standing in it,
//! the common starting point for navigation and trigger tests. Cells can
//! then be overridden with [`SnapshotBuilder::describe`].

use delve_core::{Grid, Position, Snapshot, SnapshotBuilder};

/// Description of an empty floor cell.
pub const FLOOR: &str = "floor of a room";

/// Per-cell description capacity used by the fixtures.
pub const DESCRIPTION_CAPACITY: usize = 80;

/// A `rows x cols` room of [`FLOOR`] with the agent at `agent`.
///
/// The snapshot carries a `chars` grid of `.` with `@` under the agent,
/// and a matching `colors` grid.
pub fn room(rows: usize, cols: usize, agent: impl Into<Position>) -> SnapshotBuilder {
    let agent = agent.into();
    let mut chars = Grid::filled(rows, cols, b'.' as u16);
    if let Some(c) = chars.get_mut(agent.x, agent.y) {
        *c = b'@' as u16;
    }
    let mut builder = Snapshot::builder(rows, cols, DESCRIPTION_CAPACITY).position(agent);
    for y in 0..rows as i32 {
        for x in 0..cols as i32 {
            builder = builder.describe(x, y, FLOOR);
        }
    }
    builder = builder.describe(agent.x, agent.y, "human caveman called Agent");
    builder
        .grid("chars", chars)
        .and_then(|b| b.grid("colors", Grid::filled(rows, cols, 7)))
        .expect("fixture grids match the room shape")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_has_floor_and_agent() {
        let snap = room(3, 4, (1, 2)).build();
        let d = snap.screen_descriptions();
        assert_eq!(d.text(0, 0), Some(FLOOR.as_bytes()));
        assert_eq!(d.text(1, 2), Some(&b"human caveman called Agent"[..]));
        let chars = snap.grid("chars").unwrap();
        assert_eq!(chars.get(1, 2), Some(&(b'@' as u16)));
        assert_eq!(chars.get(3, 0), Some(&(b'.' as u16)));
        assert_eq!(snap.shape(), (3, 4));
    }
}
