use eframe::egui;

use crate::model::{Point, SCENE_HEIGHT, SCENE_WIDTH};

use super::render::{draw_arrow, draw_placed, draw_selection, placed_corners_screen, rotate_vec2};
use super::{PaletteDrag, PaletteDragKind, RotateDrag, TrackApp};

/// Screen distance from the selected object's top edge to its rotate
/// handle.
const ROTATE_OFFSET_SCREEN: f32 = 28.0;
const HANDLE_SIZE_SCREEN: f32 = 12.0;

impl TrackApp {
    /// The stage: the background image scaled to the container width,
    /// with all interaction translated back into logical scene
    /// coordinates before it touches the scene.
    pub(super) fn show_canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let scale = ui.available_width() / SCENE_WIDTH;
        let size = egui::vec2(SCENE_WIDTH, SCENE_HEIGHT) * scale;
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let origin = rect.min;
        let painter = ui.painter_at(rect);
        let to_scene =
            |p: egui::Pos2| Point::new((p.x - origin.x) / scale, (p.y - origin.y) / scale);

        self.draw_stage_background(&painter, ctx, rect);

        let pointer = response.interact_pointer_pos();

        // Drop from the palette. The drop point is converted to scene
        // coordinates and runs the collision check inside the scene.
        if let Some(payload) = response.dnd_release_payload::<PaletteDrag>() {
            let at = response
                .hover_pos()
                .or(pointer)
                .map(to_scene)
                .map(|p| crate::scene::clamp_to_stage(p, egui::Vec2::ZERO));
            if let Some(at) = at {
                self.handle_drop(&payload, at);
            }
        }

        if response.double_clicked() {
            if let Some(hit) = pointer.map(to_scene).and_then(|p| self.topmost_hit(p)) {
                let was_sign = self.scene.remove(hit);
                if self.selection == Some(hit) {
                    self.selection = None;
                }
                if was_sign {
                    self.recompute();
                }
            }
        } else {
            if response.drag_started() || response.clicked() {
                let hit = pointer.map(to_scene).and_then(|p| self.topmost_hit(p));
                // Selecting one object moves the single handle to it;
                // clicking empty stage drops the selection entirely.
                self.selection = hit;
                if response.drag_started() {
                    self.drag_target = hit;
                    self.drag_moved_sign = false;
                }
            }
            if response.dragged() {
                if let Some(handle) = self.drag_target {
                    if let Some(current) = self.scene.get(handle).map(|p| p.position) {
                        let delta = response.drag_delta() / scale;
                        let proposed = Point::new(current.x + delta.x, current.y + delta.y);
                        self.drag_moved_sign |= self.scene.move_to(handle, proposed);
                    }
                }
            }
            if response.drag_stopped() {
                if self.drag_moved_sign {
                    self.recompute();
                }
                self.drag_target = None;
                self.drag_moved_sign = false;
            }
        }

        for arrow in &self.arrows {
            draw_arrow(&painter, origin, scale, arrow);
        }
        for placed in self.scene.items().to_vec() {
            let texture = self.textures.get(ctx, &placed.src);
            draw_placed(&painter, origin, scale, &placed, texture.as_ref());
            if self.selection == Some(placed.handle) {
                draw_selection(&painter, &placed_corners_screen(origin, scale, &placed));
            }
        }

        self.rotate_handle(ui, ctx, &painter, origin, scale);
    }

    fn draw_stage_background(
        &mut self,
        painter: &egui::Painter,
        ctx: &egui::Context,
        rect: egui::Rect,
    ) {
        let background = self.background_path.clone();
        match self.textures.get(ctx, &background) {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, 0.0, egui::Color32::from_gray(245));
                painter.rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(160)),
                    egui::StrokeKind::Middle,
                );
            }
        }
    }

    fn handle_drop(&mut self, payload: &PaletteDrag, at: Point) {
        match payload.kind {
            PaletteDragKind::Sign { id } => {
                let outcome = self.scene.place_sign(id, &payload.src, at);
                self.selection = Some(outcome.handle());
                self.recompute();
            }
            PaletteDragKind::Element => {
                let handle = self.scene.place_element(&payload.src, at);
                self.selection = Some(handle);
            }
        }
    }

    fn topmost_hit(&self, at: Point) -> Option<u64> {
        self.scene
            .items()
            .iter()
            .rev()
            .find(|p| p.bounds().contains(at.to_pos2()))
            .map(|p| p.handle)
    }

    /// The single rotate handle, attached to whatever is selected. The
    /// resulting angle snaps to quarter turns inside the scene.
    fn rotate_handle(
        &mut self,
        ui: &egui::Ui,
        ctx: &egui::Context,
        painter: &egui::Painter,
        origin: egui::Pos2,
        scale: f32,
    ) {
        let Some(selected) = self.selection else {
            self.rotate_drag = None;
            return;
        };
        let Some(placed) = self.scene.get(selected).cloned() else {
            self.rotate_drag = None;
            return;
        };
        if self.rotate_drag.is_some_and(|r| r.handle != selected) {
            self.rotate_drag = None;
        }

        let rot = placed.rotation.to_radians();
        let center = origin + placed.position.to_pos2().to_vec2() * scale;
        let top = center + rotate_vec2(egui::vec2(0.0, -placed.half_size().y * scale), rot);
        let handle_pos = top + rotate_vec2(egui::vec2(0.0, -ROTATE_OFFSET_SCREEN), rot);

        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255));
        painter.line_segment([top, handle_pos], stroke);
        painter.add(egui::Shape::circle_filled(
            handle_pos,
            HANDLE_SIZE_SCREEN * 0.5,
            egui::Color32::from_rgb(250, 250, 250),
        ));
        painter.add(egui::Shape::circle_stroke(
            handle_pos,
            HANDLE_SIZE_SCREEN * 0.5,
            stroke,
        ));

        let grab = egui::Rect::from_center_size(
            handle_pos,
            egui::vec2(HANDLE_SIZE_SCREEN, HANDLE_SIZE_SCREEN),
        );
        let id = ui.id().with(("rotate", selected));
        let resp = ui.interact(grab, id, egui::Sense::drag());
        if resp.drag_started() {
            self.rotate_drag = Some(RotateDrag { handle: selected });
        }
        if resp.dragged() {
            if let (Some(drag), Some(p)) = (self.rotate_drag, resp.interact_pointer_pos()) {
                let v = p - center;
                // The handle points "up" from the center at rotation 0.
                let degrees = v.y.atan2(v.x).to_degrees() + 90.0;
                self.scene.rotate_to(drag.handle, degrees);
            }
        }
        if resp.drag_stopped() {
            if let Some(drag) = self.rotate_drag.take() {
                if self.scene.get(drag.handle).is_some_and(|p| p.is_sign()) {
                    self.recompute();
                }
            }
        }
        if resp.hovered() || resp.dragged() {
            ctx.set_cursor_icon(egui::CursorIcon::Grab);
        }
    }
}
