use crate::canvas::{BlockSize, Canvas};
use crate::color::Color;
use crate::coords::{WindowPoint, window_to_cell};
use crate::io::{BmpFile, CanvasStore};
use crate::persistence::{PersistenceController, TickOutcome};

/// Color painted by the primary (left) button.
pub const PRIMARY_COLOR: Color = Color::BLACK;
/// Color painted by the secondary (right) button.
pub const SECONDARY_COLOR: Color = Color::WHITE;

/// Click (or drag sample) at a window position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintEvent {
    pub point: WindowPoint,
    pub use_secondary_color: bool,
}

/// Time elapsed since the previous frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickEvent {
    pub elapsed_seconds: f32,
}

/// Read-only snapshot handed to the renderer.
#[derive(Clone, Copy)]
pub struct CanvasView<'a> {
    pub canvas: &'a Canvas,
    pub block: BlockSize,
}

/// The single open document: canvas, save policy, and where it is saved to.
pub struct EditorState<S: CanvasStore = BmpFile> {
    store: S,
    canvas: Canvas,
    block: BlockSize,
    persistence: PersistenceController,

    /// Display name (derived from the store)
    pub name: String,
}

impl<S: CanvasStore> EditorState<S> {
    pub fn new(store: S, canvas: Canvas, block: BlockSize) -> Self {
        let name = store.label();
        Self {
            store,
            canvas,
            block,
            persistence: PersistenceController::default(),
            name,
        }
    }

    /// Start from a decode result; `None` means no file yet, so use a white canvas.
    pub fn open(
        store: S,
        loaded: Option<Canvas>,
        block: BlockSize,
        initial_width: u32,
        initial_height: u32,
    ) -> Self {
        let canvas = loaded.unwrap_or_else(|| {
            log_info!(
                "Creating new {}x{} canvas for {}",
                initial_width,
                initial_height,
                store.label()
            );
            Canvas::new(initial_width, initial_height)
        });
        Self::new(store, canvas, block)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn block(&self) -> BlockSize {
        self.block
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn persistence(&self) -> &PersistenceController {
        &self.persistence
    }

    pub fn view(&self) -> CanvasView<'_> {
        CanvasView {
            canvas: &self.canvas,
            block: self.block,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.persistence.is_dirty()
    }

    /// Resolve a paint event to a cell and paint it. Clicks off the canvas do nothing.
    pub fn handle_paint(&mut self, event: PaintEvent) -> Option<(u32, u32)> {
        let (i, j) = window_to_cell(&self.canvas, self.block, event.point)?;
        let color = if event.use_secondary_color {
            SECONDARY_COLOR
        } else {
            PRIMARY_COLOR
        };
        self.paint_cell(i, j, color);
        Some((i, j))
    }

    /// Paint one cell and mark the document dirty.
    ///
    /// # Panics
    /// When `(i, j)` lies outside the canvas.
    pub fn paint_cell(&mut self, i: u32, j: u32, color: Color) {
        if self.canvas.paint(i, j, color) {
            self.persistence.mark_dirty();
        }
    }

    pub fn handle_tick(&mut self, event: TickEvent) -> TickOutcome {
        let Self {
            store,
            canvas,
            persistence,
            ..
        } = self;
        let outcome = persistence.tick(event.elapsed_seconds, || store.save(canvas));
        if outcome == TickOutcome::Flushed {
            log_info!("Saved {}", self.name);
        }
        outcome
    }

    /// Save now if there are unsaved changes.
    pub fn flush_now(&mut self) -> TickOutcome {
        let Self {
            store,
            canvas,
            persistence,
            ..
        } = self;
        let outcome = persistence.flush_now(|| store.save(canvas));
        if outcome == TickOutcome::Flushed {
            log_info!("Saved {}", self.name);
        }
        outcome
    }

    /// Get the display title (name with dirty indicator)
    pub fn display_title(&self) -> String {
        if self.is_dirty() {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}
