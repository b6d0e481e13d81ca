use crate::color::{Color, encode_channel};
use crate::coords::{WindowPoint, cell_to_window, physical_canvas_extent};
use crate::io::BmpFile;
use crate::persistence::TickOutcome;
use crate::project::{CanvasView, EditorState, PRIMARY_COLOR, PaintEvent, SECONDARY_COLOR, TickEvent};
use crate::settings::EditorSettings;
use eframe::egui;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

const BACKGROUND: Color32 = Color32::from_gray(96);
const GRID_STROKE: Color32 = Color32::from_gray(160);
const SWATCH_SIZE: f32 = 12.0;

fn to_color32(c: Color) -> Color32 {
    let [r, g, b, a] = encode_channel(c);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

// ============================================================================
// APP — eframe shell around a single EditorState
// ============================================================================

pub struct PixelPadApp {
    editor: EditorState<BmpFile>,
    settings: EditorSettings,
    /// Set while the most recent flush attempt failed.
    save_failed: bool,
    last_title: String,
}

impl PixelPadApp {
    pub fn new(editor: EditorState<BmpFile>, settings: EditorSettings) -> Self {
        Self {
            editor,
            settings,
            save_failed: false,
            last_title: String::new(),
        }
    }

    /// Translate this frame's pointer state into at most one paint event.
    fn paint_event(ctx: &egui::Context, origin: Pos2) -> Option<PaintEvent> {
        let (pos, primary, secondary) = ctx.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.primary_down(),
                i.pointer.secondary_down(),
            )
        });
        if !primary && !secondary {
            return None;
        }
        let pos = pos?;
        Some(PaintEvent {
            point: WindowPoint::new(pos.x - origin.x, pos.y - origin.y),
            use_secondary_color: !primary,
        })
    }

    fn record_outcome(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Flushed => self.save_failed = false,
            TickOutcome::FlushFailed => self.save_failed = true,
            TickOutcome::Idle | TickOutcome::Pending => {}
        }
    }

    fn title(&self) -> String {
        let base = format!("PixelPad - {}", self.editor.display_title());
        if self.save_failed {
            format!("{} (save failed)", base)
        } else {
            base
        }
    }

    fn draw(&self, painter: &egui::Painter, origin: Pos2, panel: Rect) {
        let CanvasView { canvas, block } = self.editor.view();
        let extent = physical_canvas_extent(canvas, block);
        let cell_size = Vec2::new(block.width as f32, block.height as f32);

        for (i, j, color) in canvas.iter_cells() {
            let center = cell_to_window(extent, block, (i, j));
            let rect = Rect::from_center_size(origin + Vec2::new(center.x, center.y), cell_size);
            painter.rect_filled(rect, 0.0, to_color32(color));
            if self.settings.show_grid {
                painter.rect_stroke(rect, 0.0, Stroke::new(0.5, GRID_STROKE));
            }
        }

        // Decorative palette: the two paint colors in the bottom-left padding.
        let base = panel.left_bottom() + Vec2::new(4.0, -4.0 - SWATCH_SIZE);
        for (n, color) in [PRIMARY_COLOR, SECONDARY_COLOR].into_iter().enumerate() {
            let min = base + Vec2::new(n as f32 * (SWATCH_SIZE + 4.0), 0.0);
            let rect = Rect::from_min_size(min, Vec2::splat(SWATCH_SIZE));
            painter.rect_filled(rect, 2.0, to_color32(color));
            painter.rect_stroke(rect, 2.0, Stroke::new(1.0, GRID_STROKE));
        }
    }
}

impl eframe::App for PixelPadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Final best-effort save when the window closes ---
        if ctx.input(|i| i.viewport().close_requested()) {
            let outcome = self.editor.flush_now();
            if outcome == TickOutcome::FlushFailed {
                log_err!("Unsaved changes lost on exit: {}", self.editor.name);
            }
        }

        let dt = ctx.input(|i| i.stable_dt);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let panel = ui.max_rect();
                let origin = panel.center();

                // Events are applied in delivery order: paint first, then the tick.
                if let Some(event) = Self::paint_event(ctx, origin) {
                    self.editor.handle_paint(event);
                }
                let outcome = self.editor.handle_tick(TickEvent { elapsed_seconds: dt });
                self.record_outcome(outcome);

                self.draw(ui.painter(), origin, panel);
            });

        let title = self.title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }

        // Keep frames (and therefore ticks) coming until the canvas is saved.
        if self.editor.is_dirty() {
            ctx.request_repaint();
        }
    }
}
