//! The eight compass directions and their movement key codes.

use std::fmt;

/// A one-cell move in one of the eight compass directions.
///
/// Each direction carries its canonical movement key (`y k u h l b j n`)
/// and its `(dx, dy)` offset, where `dy` grows downwards (towards the
/// bottom of the map).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// North-west (`y`).
    NorthWest,
    /// North (`k`).
    North,
    /// North-east (`u`).
    NorthEast,
    /// West (`h`).
    West,
    /// East (`l`).
    East,
    /// South-west (`b`).
    SouthWest,
    /// South (`j`).
    South,
    /// South-east (`n`).
    SouthEast,
}

/// Row-major 3x3 neighborhood order; slot 4 is the center cell.
const NEIGHBOR_TABLE: [Option<Direction>; 9] = [
    Some(Direction::NorthWest),
    Some(Direction::North),
    Some(Direction::NorthEast),
    Some(Direction::West),
    None,
    Some(Direction::East),
    Some(Direction::SouthWest),
    Some(Direction::South),
    Some(Direction::SouthEast),
];

impl Direction {
    /// All eight directions in neighborhood scan order.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Map a row-major 3x3 neighborhood index to the direction that moves
    /// the agent onto that cell.
    ///
    /// Index 4 is the agent's own cell and maps to `None`, as does any
    /// index outside `0..9`.
    pub fn from_neighbor_index(index: usize) -> Option<Direction> {
        NEIGHBOR_TABLE.get(index).copied().flatten()
    }

    /// The row-major 3x3 neighborhood index of the cell this direction
    /// points at.
    pub fn neighbor_index(self) -> usize {
        let (dx, dy) = self.offset();
        ((dy + 1) * 3 + (dx + 1)) as usize
    }

    /// ASCII movement key for this direction.
    pub fn keycode(self) -> u8 {
        match self {
            Self::NorthWest => b'y',
            Self::North => b'k',
            Self::NorthEast => b'u',
            Self::West => b'h',
            Self::East => b'l',
            Self::SouthWest => b'b',
            Self::South => b'j',
            Self::SouthEast => b'n',
        }
    }

    /// Parse a movement key back into a direction.
    pub fn from_keycode(key: u8) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.keycode() == key)
    }

    /// `(dx, dy)` offset of a one-cell move.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::NorthWest => (-1, -1),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
            Self::SouthWest => (-1, 1),
            Self::South => (0, 1),
            Self::SouthEast => (1, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keycode() as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_table_matches_movement_keys() {
        let keys: Vec<Option<u8>> = (0..9)
            .map(|i| Direction::from_neighbor_index(i).map(Direction::keycode))
            .collect();
        assert_eq!(
            keys,
            vec![
                Some(b'y'),
                Some(b'k'),
                Some(b'u'),
                Some(b'h'),
                None,
                Some(b'l'),
                Some(b'b'),
                Some(b'j'),
                Some(b'n'),
            ]
        );
    }

    #[test]
    fn out_of_range_index_is_none() {
        assert_eq!(Direction::from_neighbor_index(9), None);
        assert_eq!(Direction::from_neighbor_index(usize::MAX), None);
    }

    #[test]
    fn neighbor_index_inverts_table() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_neighbor_index(d.neighbor_index()), Some(d));
        }
    }

    #[test]
    fn keycode_roundtrip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_keycode(d.keycode()), Some(d));
        }
        assert_eq!(Direction::from_keycode(b'x'), None);
    }

    #[test]
    fn north_moves_up_the_map() {
        assert_eq!(Direction::North.offset(), (0, -1));
        assert_eq!(Direction::North.to_string(), "k");
    }
}
