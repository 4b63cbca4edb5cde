//! The per-step observation snapshot produced by the game collaborator.

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::grid::{Grid, TextGrid};
use crate::id::Position;

/// Immutable bundle of everything the game reports after one step.
///
/// A snapshot is produced once per step by the game engine and is only
/// ever read by the task layer. All 2-D fields share the dimensions of
/// [`screen_descriptions`](Snapshot::screen_descriptions); the
/// [`SnapshotBuilder`] enforces this.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    position: Position,
    message: String,
    screen_descriptions: TextGrid,
    grids: IndexMap<String, Grid<u16>>,
    inv_strs: Vec<String>,
    inv_letters: Vec<u8>,
    tty_cursor: Option<Position>,
    turn: u64,
}

impl Snapshot {
    /// Start building a snapshot over a `rows x cols` map whose cell
    /// descriptions hold up to `description_capacity` bytes each.
    pub fn builder(rows: usize, cols: usize, description_capacity: usize) -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: Snapshot {
                position: Position::default(),
                message: String::new(),
                screen_descriptions: TextGrid::new(rows, cols, description_capacity),
                grids: IndexMap::new(),
                inv_strs: Vec::new(),
                inv_letters: Vec::new(),
                tty_cursor: None,
                turn: 0,
            },
        }
    }

    /// The agent's position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The message shown this step; empty if there was none.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Per-cell textual descriptions of the map.
    pub fn screen_descriptions(&self) -> &TextGrid {
        &self.screen_descriptions
    }

    /// `(rows, cols)` shared by every 2-D field of this snapshot.
    pub fn shape(&self) -> (usize, usize) {
        self.screen_descriptions.shape()
    }

    /// A named opaque 2-D field (`glyphs`, `chars`, `colors`, ...).
    pub fn grid(&self, name: &str) -> Option<&Grid<u16>> {
        self.grids.get(name)
    }

    /// All named 2-D fields in insertion order.
    pub fn grids(&self) -> impl Iterator<Item = (&str, &Grid<u16>)> {
        self.grids.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Inventory item descriptions, one per slot.
    pub fn inv_strs(&self) -> &[String] {
        &self.inv_strs
    }

    /// Inventory letters, parallel to [`inv_strs`](Snapshot::inv_strs).
    pub fn inv_letters(&self) -> &[u8] {
        &self.inv_letters
    }

    /// Terminal cursor position, if the game reports one.
    pub fn tty_cursor(&self) -> Option<Position> {
        self.tty_cursor
    }

    /// In-game move counter.
    pub fn turn(&self) -> u64 {
        self.turn
    }
}

/// Builder for [`Snapshot`].
///
/// The description grid is fixed at construction; named grids added with
/// [`grid`](SnapshotBuilder::grid) must match its dimensions.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Set the agent's position.
    pub fn position(mut self, position: impl Into<Position>) -> Self {
        self.snapshot.position = position.into();
        self
    }

    /// Set this step's message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.snapshot.message = message.into();
        self
    }

    /// Set the description of one cell. Out-of-bounds cells are ignored.
    pub fn describe(mut self, x: i32, y: i32, text: &str) -> Self {
        self.snapshot.screen_descriptions.set_text(x, y, text);
        self
    }

    /// Replace the whole description grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DimensionMismatch`] if `descriptions` does not
    /// have the shape this builder was created with.
    pub fn descriptions(mut self, descriptions: TextGrid) -> Result<Self, ConfigError> {
        let expected = self.snapshot.screen_descriptions.shape();
        if descriptions.shape() != expected {
            return Err(ConfigError::DimensionMismatch {
                field: "screen_descriptions".into(),
                expected,
                actual: descriptions.shape(),
            });
        }
        self.snapshot.screen_descriptions = descriptions;
        Ok(self)
    }

    /// Attach a named 2-D field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DimensionMismatch`] if the grid's shape
    /// differs from the description grid's.
    pub fn grid(mut self, name: impl Into<String>, grid: Grid<u16>) -> Result<Self, ConfigError> {
        let name = name.into();
        let expected = self.snapshot.screen_descriptions.shape();
        if grid.shape() != expected {
            return Err(ConfigError::DimensionMismatch {
                field: name,
                expected,
                actual: grid.shape(),
            });
        }
        self.snapshot.grids.insert(name, grid);
        Ok(self)
    }

    /// Add one inventory slot.
    pub fn inventory_item(mut self, letter: u8, description: impl Into<String>) -> Self {
        self.snapshot.inv_letters.push(letter);
        self.snapshot.inv_strs.push(description.into());
        self
    }

    /// Set the terminal cursor position.
    pub fn tty_cursor(mut self, cursor: impl Into<Position>) -> Self {
        self.snapshot.tty_cursor = Some(cursor.into());
        self
    }

    /// Set the in-game move counter.
    pub fn turn(mut self, turn: u64) -> Self {
        self.snapshot.turn = turn;
        self
    }

    /// Finish the snapshot.
    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let snap = Snapshot::builder(3, 4, 16)
            .position((1, 2))
            .message("You hear a squeak.")
            .describe(1, 1, "doorway")
            .inventory_item(b'a', "a +1 long sword (weapon in hand)")
            .turn(7)
            .build();
        assert_eq!(snap.position(), Position::new(1, 2));
        assert_eq!(snap.message(), "You hear a squeak.");
        assert_eq!(snap.screen_descriptions().text(1, 1), Some(&b"doorway"[..]));
        assert_eq!(snap.inv_letters(), b"a");
        assert_eq!(snap.turn(), 7);
        assert_eq!(snap.shape(), (3, 4));
        assert_eq!(snap.tty_cursor(), None);
    }

    #[test]
    fn grid_shape_must_match_descriptions() {
        let err = Snapshot::builder(3, 4, 16)
            .grid("glyphs", Grid::filled(4, 3, 0))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DimensionMismatch {
                field: "glyphs".into(),
                expected: (3, 4),
                actual: (4, 3),
            }
        );
    }

    #[test]
    fn grids_keep_insertion_order() {
        let snap = Snapshot::builder(1, 1, 4)
            .grid("glyphs", Grid::filled(1, 1, 1))
            .unwrap()
            .grid("chars", Grid::filled(1, 1, 2))
            .unwrap()
            .build();
        let names: Vec<&str> = snap.grids().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["glyphs", "chars"]);
        assert_eq!(snap.grid("chars").and_then(|g| g.get(0, 0)), Some(&2));
    }
}
