//! Textual cell descriptions and the agent's 3x3 neighborhood.
//!
//! Descriptions come from the snapshot's `screen_descriptions` grid, where
//! each cell is a fixed-capacity byte buffer terminated by a zero byte.
//! The neighborhood helpers scan the 3x3 block around an anchor in
//! row-major order (rows `y-1..=y+1` outer, columns `x-1..=x+1` inner), so
//! index 4 is always the anchor itself.

use delve_core::{Direction, ObsError, Position, TextGrid};
use smallvec::SmallVec;

/// The nine descriptions of a 3x3 neighborhood, row-major, center at 4.
pub type Neighborhood = SmallVec<[String; 9]>;

/// Index of the anchor cell within a [`Neighborhood`].
pub const CENTER_INDEX: usize = 4;

/// Decode the description of cell `(x, y)`.
///
/// The buffer is trimmed at its first zero byte and decoded as UTF-8;
/// invalid sequences are replaced rather than rejected.
///
/// # Errors
///
/// Returns [`ObsError::OutOfBounds`] if `(x, y)` lies outside `field`.
pub fn cell_description(field: &TextGrid, x: i32, y: i32) -> Result<String, ObsError> {
    let text = field.text(x, y).ok_or(ObsError::OutOfBounds {
        position: Position::new(x, y),
        rows: field.rows(),
        cols: field.cols(),
    })?;
    Ok(String::from_utf8_lossy(text).into_owned())
}

/// Descriptions of the 3x3 block centered on `anchor`.
///
/// # Errors
///
/// Returns [`ObsError::OutOfBounds`] if any of the nine cells lies outside
/// `field`, i.e. if the anchor sits on the field's border.
pub fn neighborhood_descriptions(
    field: &TextGrid,
    anchor: Position,
) -> Result<Neighborhood, ObsError> {
    let mut out = Neighborhood::new();
    for dy in -1..=1 {
        for dx in -1..=1 {
            let cell = anchor.checked_offset(dx, dy).ok_or(ObsError::OutOfBounds {
                position: anchor,
                rows: field.rows(),
                cols: field.cols(),
            })?;
            out.push(cell_description(field, cell.x, cell.y)?);
        }
    }
    Ok(out)
}

/// Direction that moves the agent onto neighborhood cell `index`.
///
/// `None` for the center cell (index 4) and for indices outside `0..9`.
pub fn neighbor_index_to_direction(index: usize) -> Option<Direction> {
    Direction::from_neighbor_index(index)
}

/// Direction of the first neighboring cell whose description contains
/// `name`, scanning in neighborhood order.
///
/// The lowest index wins when several cells match. A match on the center
/// cell counts as found-but-directionless and yields `None`, as does no
/// match at all.
///
/// # Errors
///
/// Propagates [`ObsError::OutOfBounds`] from
/// [`neighborhood_descriptions`].
pub fn find_direction_of(
    name: &str,
    field: &TextGrid,
    anchor: Position,
) -> Result<Option<Direction>, ObsError> {
    let neighbors = neighborhood_descriptions(field, anchor)?;
    Ok(neighbors
        .iter()
        .position(|d| d.contains(name))
        .and_then(neighbor_index_to_direction))
}

/// Whether any cell of the whole field has a description containing `name`.
///
/// Cells are decoded the same way as [`cell_description`], so both agree
/// on descriptions holding invalid UTF-8.
pub fn field_contains(name: &str, field: &TextGrid) -> bool {
    (0..field.rows() as i32).any(|y| {
        (0..field.cols() as i32).any(|x| {
            field
                .text(x, y)
                .is_some_and(|text| String::from_utf8_lossy(text).contains(name))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 field of "floor of a room" with the given overrides.
    fn room(overrides: &[(i32, i32, &str)]) -> TextGrid {
        let mut t = TextGrid::new(5, 5, 32);
        for y in 0..5 {
            for x in 0..5 {
                t.set_text(x, y, "floor of a room");
            }
        }
        for &(x, y, text) in overrides {
            t.set_text(x, y, text);
        }
        t
    }

    #[test]
    fn cell_description_trims_sentinel() {
        let t = room(&[(2, 3, "fountain")]);
        assert_eq!(cell_description(&t, 2, 3).unwrap(), "fountain");
    }

    #[test]
    fn cell_description_out_of_bounds() {
        let t = room(&[]);
        assert_eq!(
            cell_description(&t, 5, 0),
            Err(ObsError::OutOfBounds {
                position: Position::new(5, 0),
                rows: 5,
                cols: 5
            })
        );
        assert!(cell_description(&t, 0, -1).is_err());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut bytes = vec![0u8; 4];
        bytes[0] = b'a';
        bytes[1] = 0xff;
        let t = TextGrid::from_bytes(1, 1, 4, bytes).unwrap();
        assert_eq!(cell_description(&t, 0, 0).unwrap(), "a\u{fffd}");
    }

    #[test]
    fn neighborhood_is_row_major_with_center_at_four() {
        let t = room(&[(2, 2, "door")]);
        let n = neighborhood_descriptions(&t, Position::new(2, 2)).unwrap();
        assert_eq!(n.len(), 9);
        for (i, d) in n.iter().enumerate() {
            if i == CENTER_INDEX {
                assert_eq!(d, "door");
            } else {
                assert_eq!(d, "floor of a room");
            }
        }
    }

    #[test]
    fn neighborhood_order_follows_rows_then_columns() {
        let t = room(&[(1, 1, "nw"), (3, 1, "ne"), (1, 3, "sw"), (2, 3, "s")]);
        let n = neighborhood_descriptions(&t, Position::new(2, 2)).unwrap();
        assert_eq!(n[0], "nw");
        assert_eq!(n[2], "ne");
        assert_eq!(n[6], "sw");
        assert_eq!(n[7], "s");
    }

    #[test]
    fn neighborhood_on_border_is_out_of_bounds() {
        let t = room(&[]);
        assert!(matches!(
            neighborhood_descriptions(&t, Position::new(0, 2)),
            Err(ObsError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn neighborhood_at_coordinate_limits_is_out_of_bounds() {
        let t = TextGrid::new(3, 3, 4);
        for anchor in [Position::new(i32::MAX, 1), Position::new(1, i32::MIN)] {
            assert!(matches!(
                neighborhood_descriptions(&t, anchor),
                Err(ObsError::OutOfBounds { rows: 3, cols: 3, .. })
            ));
        }
        assert!(find_direction_of("door", &t, Position::new(i32::MIN, 1)).is_err());
    }

    #[test]
    fn finds_door_to_the_north() {
        let t = room(&[(2, 1, "doorway")]);
        let dir = find_direction_of("door", &t, Position::new(2, 2)).unwrap();
        assert_eq!(dir, neighbor_index_to_direction(1));
        assert_eq!(dir, Some(Direction::North));
    }

    #[test]
    fn lowest_index_wins() {
        let t = room(&[(3, 3, "closed door"), (1, 2, "open door")]);
        let dir = find_direction_of("door", &t, Position::new(2, 2)).unwrap();
        assert_eq!(dir, Some(Direction::West));
    }

    #[test]
    fn center_match_shadows_later_neighbors() {
        let t = room(&[(2, 2, "open door"), (3, 3, "closed door")]);
        let n = neighborhood_descriptions(&t, Position::new(2, 2)).unwrap();
        assert_eq!(n[8], "closed door");
        assert_eq!(find_direction_of("door", &t, Position::new(2, 2)).unwrap(), None);
    }

    #[test]
    fn absent_name_is_none() {
        let t = room(&[]);
        assert_eq!(
            find_direction_of("altar", &t, Position::new(2, 2)).unwrap(),
            None
        );
    }

    #[test]
    fn field_contains_scans_whole_field() {
        let t = room(&[(4, 4, "staircase down")]);
        assert!(field_contains("staircase", &t));
        assert!(!field_contains("altar", &t));
    }

    #[test]
    fn field_contains_ignores_bytes_after_sentinel() {
        let t = TextGrid::from_bytes(1, 1, 8, b"ab\0altar".to_vec()).unwrap();
        assert!(!field_contains("altar", &t));
        assert!(field_contains("ab", &t));
    }

    #[test]
    fn field_contains_agrees_with_cell_description_on_invalid_utf8() {
        let t = TextGrid::from_bytes(1, 1, 4, vec![b'a', 0xff, 0, 0]).unwrap();
        let text = cell_description(&t, 0, 0).unwrap();
        assert!(text.contains("a\u{fffd}"));
        assert!(field_contains("a\u{fffd}", &t));
        assert!(!field_contains("\u{ff}", &t));
    }
}
