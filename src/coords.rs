// ============================================================================
// COORDINATES — window space ↔ canvas cells
// ============================================================================
//
// Window space is centered: (0, 0) is the middle of the drawn canvas area.
// The physical extent carries one extra block on each axis as a visual border.

use crate::canvas::{BlockSize, Canvas};

/// Extra window space added around the physical extent on each axis.
pub const WINDOW_PADDING: f32 = 40.0;

/// A point in centered window coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowPoint {
    pub x: f32,
    pub y: f32,
}

impl WindowPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height in physical-pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

/// Physical size of the canvas area: `((W + 1) * Bw, (H + 1) * Bh)`.
pub fn physical_canvas_extent(canvas: &Canvas, block: BlockSize) -> Extent {
    Extent {
        width: ((canvas.width() + 1) * block.width) as f32,
        height: ((canvas.height() + 1) * block.height) as f32,
    }
}

/// Window size needed to show the canvas: physical extent plus [`WINDOW_PADDING`].
pub fn window_size(canvas: &Canvas, block: BlockSize) -> Extent {
    let extent = physical_canvas_extent(canvas, block);
    Extent {
        width: extent.width + WINDOW_PADDING,
        height: extent.height + WINDOW_PADDING,
    }
}

/// Cell under `point`, or `None` for points in the border or outside the canvas.
pub fn window_to_cell(canvas: &Canvas, block: BlockSize, point: WindowPoint) -> Option<(u32, u32)> {
    let extent = physical_canvas_extent(canvas, block);
    let x = point.x + extent.width / 2.0;
    let y = point.y + extent.height / 2.0;
    // NaN fails every comparison, so test for "inside" rather than "outside".
    if !(x >= 0.0 && x < extent.width && y >= 0.0 && y < extent.height) {
        return None;
    }
    let i = (x / block.width as f32).floor() as u32;
    let j = (y / block.height as f32).floor() as u32;
    canvas.contains(i, j).then_some((i, j))
}

/// Center of cell `(i, j)` in window coordinates.
pub fn cell_to_window(extent: Extent, block: BlockSize, cell: (u32, u32)) -> WindowPoint {
    let (i, j) = cell;
    WindowPoint {
        x: (i as f32 + 0.5) * block.width as f32 - extent.width / 2.0,
        y: (j as f32 + 0.5) * block.height as f32 - extent.height / 2.0,
    }
}
