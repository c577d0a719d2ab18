#![cfg(feature = "egui")]

use eframe::egui::{self, Align2, Color32, Pos2, Rect, Sense, Stroke, Vec2};

use super::TreeApp;
use crate::canvas::CanvasEvent;
use crate::drag::PointerId;
use crate::model::{BlockId, Point, Viewport};

/// Colours and stroke widths used when painting the tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeStyle {
    pub block_fill: Color32,
    pub block_border: Color32,
    pub add_fill: Color32,
    pub remove_fill: Color32,
    pub connector: Color32,
    pub dash: f32,
    pub gap: f32,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            block_fill: Color32::from_rgb(243, 232, 255),
            block_border: Color32::from_rgb(216, 180, 254),
            add_fill: Color32::from_rgb(168, 85, 247),
            remove_fill: Color32::from_rgb(239, 68, 68),
            connector: Color32::from_rgba_unmultiplied(0, 0, 0, 102),
            dash: 5.0,
            gap: 5.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coordinate helpers
// ────────────────────────────────────────────────────────────────────────────

fn to_screen(origin: Pos2, p: Point) -> Pos2 {
    Pos2::new(origin.x + p.x, origin.y + p.y)
}

fn from_screen(origin: Pos2, p: Pos2) -> Point {
    Point::new(p.x - origin.x, p.y - origin.y)
}

// ────────────────────────────────────────────────────────────────────────────
// Frame update
// ────────────────────────────────────────────────────────────────────────────

/// Draw the tree and feed this frame's input to the canvas.
///
/// Events are collected while drawing and applied as one batch at the end of
/// the frame, so a block removed this frame wins over a drag move aimed at it.
pub fn tree_update(app: &mut TreeApp, ui: &mut egui::Ui) {
    let avail = ui.available_rect_before_wrap();
    let origin = avail.min;
    let mut events: Vec<CanvasEvent> = Vec::new();

    let size = Viewport::new(avail.width(), avail.height());
    if size != app.canvas.viewport() {
        events.push(CanvasEvent::Resize {
            width: size.width,
            height: size.height,
        });
    }

    let scene = app.canvas.scene();
    let layout = *app.canvas.layout();
    let style = app.style;
    let painter = ui.painter_at(avail);

    // Connectors sit underneath the blocks
    for c in &scene.connectors {
        let points: Vec<Pos2> = c.path.iter().map(|p| to_screen(origin, *p)).collect();
        painter.extend(egui::Shape::dashed_line(
            &points,
            Stroke::new(1.0, style.connector),
            style.dash,
            style.gap,
        ));
    }

    let (pressed, released, pointer_pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });

    let mut drag_live = app.canvas.drags().session(PointerId::PRIMARY).is_some();
    let size = Vec2::new(layout.block_width, layout.block_height);
    for b in &scene.blocks {
        let r = Rect::from_min_size(to_screen(origin, Point::new(b.x, b.y)), size);
        let dragging = app.canvas.drags().is_dragging(b.id);

        painter.rect_filled(r, 2.0, style.block_fill);
        painter.rect_stroke(
            r,
            2.0,
            Stroke::new(2.0, style.block_border),
            egui::StrokeKind::Inside,
        );
        painter.text(
            Pos2::new(r.center().x, r.top() + 14.0),
            Align2::CENTER_CENTER,
            b.id.to_string(),
            egui::FontId::proportional(18.0),
            Color32::BLACK,
        );

        let resp = ui.interact(r, ui.id().with(("block", b.id.get())), Sense::click_and_drag());
        if resp.hovered() || dragging {
            let icon = if dragging {
                egui::CursorIcon::Grabbing
            } else {
                egui::CursorIcon::Grab
            };
            ui.ctx().set_cursor_icon(icon);
        }
        if pressed && resp.hovered() {
            if let Some(pos) = pointer_pos {
                let p = from_screen(origin, pos);
                events.push(CanvasEvent::Press {
                    block: b.id,
                    x: p.x,
                    y: p.y,
                    pointer: PointerId::PRIMARY,
                });
                drag_live = true;
            }
        }

        block_buttons(ui, r, b.id, b.removable, &style, &mut events);
    }

    // Document-level move/release listeners, live only while a drag is attached
    if drag_live {
        if let Some(pos) = pointer_pos {
            let p = from_screen(origin, pos);
            events.push(CanvasEvent::Move {
                x: p.x,
                y: p.y,
                pointer: PointerId::PRIMARY,
            });
        }
        if released {
            events.push(CanvasEvent::Release {
                pointer: PointerId::PRIMARY,
            });
        }
    }

    if !events.is_empty() {
        app.canvas.apply_batch(events);
        ui.ctx().request_repaint();
    }
}

fn block_buttons(
    ui: &mut egui::Ui,
    r: Rect,
    id: BlockId,
    removable: bool,
    style: &TreeStyle,
    events: &mut Vec<CanvasEvent>,
) {
    let pad = 4.0;
    let h = 20.0;
    let add_rect = Rect::from_min_size(
        Pos2::new(r.left() + pad, r.top() + 30.0),
        Vec2::new(r.width() - 2.0 * pad, h),
    );
    let add = egui::Button::new(egui::RichText::new("+").color(Color32::BLACK)).fill(style.add_fill);
    if ui.put(add_rect, add).clicked() {
        events.push(CanvasEvent::Add { parent: Some(id) });
    }

    if removable {
        let remove_rect = add_rect.translate(Vec2::new(0.0, h + pad));
        let remove =
            egui::Button::new(egui::RichText::new("-").color(Color32::BLACK)).fill(style.remove_fill);
        if ui.put(remove_rect, remove).clicked() {
            events.push(CanvasEvent::Remove { block: id });
        }
    }
}
