//! Fixed-size, agent-centered crop windows.
//!
//! A [`CropWindow`] cuts a `height x width` view out of a full-map field so
//! that the anchor (normally the agent) always sits at the window's center
//! cell `(height / 2, width / 2)`. Cells that fall outside the map are
//! filled with a pad value instead of raising, so agents standing on the
//! map border still get a full-size window.

use delve_core::{ConfigError, Grid, Position, TextGrid};

/// Validated crop window dimensions plus the pad value for numeric fields.
///
/// Both dimensions must be odd; this is checked once in
/// [`new`](CropWindow::new) so cropping itself cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    height: usize,
    width: usize,
    pad: u16,
}

impl Default for CropWindow {
    /// [`DEFAULT_SIZE`](CropWindow::DEFAULT_SIZE) square window padded with
    /// zeros.
    fn default() -> Self {
        Self {
            height: Self::DEFAULT_SIZE,
            width: Self::DEFAULT_SIZE,
            pad: 0,
        }
    }
}

impl CropWindow {
    /// Side length of the default square window.
    pub const DEFAULT_SIZE: usize = 5;

    /// Create a window of `height x width` cells padded with `pad`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EvenWindowDimension`] if either dimension is
    /// even (zero included).
    pub fn new(height: usize, width: usize, pad: u16) -> Result<Self, ConfigError> {
        check_odd("height", height)?;
        check_odd("width", width)?;
        Ok(Self { height, width, pad })
    }

    /// Window height (rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Window width (columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pad value used by [`crop`](CropWindow::crop).
    pub fn pad(&self) -> u16 {
        self.pad
    }

    /// Window cell holding the anchor, as `(row, col)`.
    pub fn center(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// Top-left map coordinate covered by a window anchored at `anchor`.
    ///
    /// `None` when that corner lies below `i32::MIN`; every window cell on
    /// that axis is then negative and so outside any field.
    pub fn origin(&self, anchor: Position) -> Option<Position> {
        anchor.checked_offset(-((self.width / 2) as i32), -((self.height / 2) as i32))
    }

    /// Crop a numeric field, padding with this window's pad value.
    pub fn crop(&self, field: &Grid<u16>, anchor: Position) -> Grid<u16> {
        self.crop_with(field, anchor, self.pad)
    }

    /// Crop a field of any cell type with an explicit pad value.
    pub fn crop_with<T: Clone>(&self, field: &Grid<T>, anchor: Position, pad: T) -> Grid<T> {
        let Some(origin) = self.origin(anchor) else {
            return Grid::filled(self.height, self.width, pad);
        };
        let mut data = Vec::with_capacity(self.height * self.width);
        for r in 0..self.height as i32 {
            for c in 0..self.width as i32 {
                let cell = origin
                    .checked_offset(c, r)
                    .and_then(|p| field.get(p.x, p.y));
                data.push(cell.cloned().unwrap_or_else(|| pad.clone()));
            }
        }
        // Length is height * width by construction.
        Grid::from_vec(self.height, self.width, data)
            .unwrap_or_else(|| Grid::filled(self.height, self.width, pad))
    }

    /// Crop a description grid; cells outside the map are empty text.
    pub fn crop_text(&self, field: &TextGrid, anchor: Position) -> TextGrid {
        match self.origin(anchor) {
            Some(origin) => field.window(origin, self.height, self.width),
            None => TextGrid::new(self.height, self.width, field.capacity()),
        }
    }
}

/// Crop `field` to a `window_h x window_w` view centered on `anchor`.
///
/// One-shot form of [`CropWindow::crop_with`].
///
/// # Errors
///
/// Returns [`ConfigError::EvenWindowDimension`] if either dimension is even.
pub fn crop<T: Clone>(
    field: &Grid<T>,
    anchor: Position,
    window_h: usize,
    window_w: usize,
    pad: T,
) -> Result<Grid<T>, ConfigError> {
    check_odd("height", window_h)?;
    check_odd("width", window_w)?;
    let window = CropWindow {
        height: window_h,
        width: window_w,
        pad: 0,
    };
    Ok(window.crop_with(field, anchor, pad))
}

fn check_odd(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value % 2 == 1 {
        Ok(())
    } else {
        Err(ConfigError::EvenWindowDimension { name, value })
    }
}
