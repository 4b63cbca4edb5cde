//! Dense 2-D fields: [`Grid`] for scalar payloads and [`TextGrid`] for
//! per-cell fixed-capacity text buffers.

use crate::id::Position;

/// A row-major 2-D array of `rows * cols` cells.
///
/// Cells are addressed by [`Position`] with `x` as the column and `y` as
/// the row; `data[y * cols + x]` holds cell `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.
    ///
    /// Returns `None` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Flat row-major cell data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Flat index of `(x, y)`, or `None` if it lies outside the grid.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        flat_index(x, y, self.rows, self.cols)
    }

    /// Whether `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        self.index_of(pos.x, pos.y).is_some()
    }

    /// The cell at `(x, y)`.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index_of(x, y).map(|i| &self.data[i])
    }

    /// Mutable access to the cell at `(x, y)`.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.index_of(x, y).map(move |i| &mut self.data[i])
    }

    /// One row of the grid.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.rows {
            return None;
        }
        Some(&self.data[y * self.cols..(y + 1) * self.cols])
    }
}

/// A rows x cols field of fixed-capacity byte buffers holding text.
///
/// Each cell's text ends at the first zero byte. Writers always leave
/// room for that sentinel, so a cell never holds more than
/// `capacity - 1` bytes of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextGrid {
    rows: usize,
    cols: usize,
    capacity: usize,
    bytes: Vec<u8>,
}

impl TextGrid {
    /// Create an all-empty text grid.
    pub fn new(rows: usize, cols: usize, capacity: usize) -> Self {
        Self {
            rows,
            cols,
            capacity,
            bytes: vec![0; rows * cols * capacity],
        }
    }

    /// Wrap an existing `rows * cols * capacity` byte buffer.
    ///
    /// Returns `None` if the buffer length does not match.
    pub fn from_bytes(rows: usize, cols: usize, capacity: usize, bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() != rows * cols * capacity {
            return None;
        }
        Some(Self {
            rows,
            cols,
            capacity,
            bytes,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Byte capacity of each cell buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The raw buffer backing all cells.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The full fixed-capacity buffer of cell `(x, y)`, sentinel included.
    pub fn cell(&self, x: i32, y: i32) -> Option<&[u8]> {
        let i = flat_index(x, y, self.rows, self.cols)?;
        Some(&self.bytes[i * self.capacity..(i + 1) * self.capacity])
    }

    /// The text bytes of cell `(x, y)`, up to the first zero byte.
    pub fn text(&self, x: i32, y: i32) -> Option<&[u8]> {
        self.cell(x, y).map(trim_at_sentinel)
    }

    /// Overwrite cell `(x, y)` with `text`, truncated to `capacity - 1`
    /// bytes. Returns `false` if the cell is out of bounds.
    pub fn set_text(&mut self, x: i32, y: i32, text: &str) -> bool {
        let Some(i) = flat_index(x, y, self.rows, self.cols) else {
            return false;
        };
        let buf = &mut self.bytes[i * self.capacity..(i + 1) * self.capacity];
        buf.fill(0);
        let n = text.len().min(self.capacity.saturating_sub(1));
        buf[..n].copy_from_slice(&text.as_bytes()[..n]);
        true
    }

    /// Copy the whole buffer of one cell from `src` into cell `(x, y)`.
    ///
    /// Both grids must share the same capacity; out-of-bounds targets are
    /// ignored.
    pub(crate) fn copy_cell_from(&mut self, x: i32, y: i32, src: &[u8]) {
        if let Some(i) = flat_index(x, y, self.rows, self.cols) {
            let n = src.len().min(self.capacity);
            self.bytes[i * self.capacity..i * self.capacity + n].copy_from_slice(&src[..n]);
        }
    }

    /// Build the `height x width` sub-grid whose cell `(c, r)` copies cell
    /// `(origin.x + c, origin.y + r)` of `self`; cells that fall outside
    /// `self`, or past the `i32` range, stay empty.
    pub fn window(&self, origin: Position, height: usize, width: usize) -> TextGrid {
        let mut out = TextGrid::new(height, width, self.capacity);
        for r in 0..height as i32 {
            for c in 0..width as i32 {
                let src = origin
                    .checked_offset(c, r)
                    .and_then(|p| self.cell(p.x, p.y));
                if let Some(src) = src {
                    out.copy_cell_from(c, r, src);
                }
            }
        }
        out
    }
}

/// Trim a sentinel-terminated buffer at its first zero byte.
///
/// A buffer with no zero byte is returned whole.
pub fn trim_at_sentinel(buf: &[u8]) -> &[u8] {
    match buf.iter().position(|&b| b == 0) {
        Some(end) => &buf[..end],
        None => buf,
    }
}

fn flat_index(x: i32, y: i32, rows: usize, cols: usize) -> Option<usize> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= cols || y >= rows {
        return None;
    }
    Some(y * cols + x)
}
