use crate::color::Color;

// ============================================================================
// BLOCK SIZE
// ============================================================================

/// Number of physical image pixels that represent one logical cell on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
}

impl BlockSize {
    /// Panics on a zero dimension; block sizes are compile-time constants.
    pub const fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "block size must be positive");
        Self { width, height }
    }

    /// Physical pixels per block.
    pub const fn area(self) -> u32 {
        self.width * self.height
    }
}

/// Process-wide block size used by the editor.
pub const BLOCK_SIZE: BlockSize = BlockSize::new(8, 8);

/// Canvas size used when no file exists yet.
pub const DEFAULT_CANVAS_WIDTH: u32 = 32;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 32;

/// `width * height` computed in `usize`, so large sides cannot wrap in `u32`.
pub fn cell_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

// ============================================================================
// CANVAS
// ============================================================================

/// Fixed-size grid of colors, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<Color>,
}

impl Canvas {
    /// White canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::WHITE)
    }

    /// Canvas with every cell set to `color`. Zero dimensions are bumped to 1.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![color; cell_count(width, height)],
        }
    }

    /// Build a canvas from row-major cells.
    /// Returns `None` for zero dimensions or when `cells.len() != width * height`.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Color>) -> Option<Self> {
        if width == 0 || height == 0 || cells.len() != cell_count(width, height) {
            return None;
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, i: u32, j: u32) -> bool {
        i < self.width && j < self.height
    }

    /// Color of cell `(i, j)`.
    ///
    /// # Panics
    /// When `(i, j)` lies outside the grid.
    pub fn get(&self, i: u32, j: u32) -> Color {
        self.cells[self.index(i, j)]
    }

    /// Replace cell `(i, j)`. Always reports a change; the caller owns dirty tracking.
    ///
    /// # Panics
    /// When `(i, j)` lies outside the grid.
    pub fn paint(&mut self, i: u32, j: u32, color: Color) -> bool {
        let idx = self.index(i, j);
        self.cells[idx] = color;
        true
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Iterate `(i, j, color)` over all cells, top row first.
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, c)| (idx as u32 % w, idx as u32 / w, *c))
    }

    fn index(&self, i: u32, j: u32) -> usize {
        assert!(
            self.contains(i, j),
            "cell ({i}, {j}) outside {}x{} canvas",
            self.width,
            self.height
        );
        (j as usize) * (self.width as usize) + i as usize
    }
}
