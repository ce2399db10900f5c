use eframe::egui;

use crate::model::{Arrow, Placed, SIGN_STROKE_WIDTH, border_color32};

pub(super) fn rotate_vec2(v: egui::Vec2, angle: f32) -> egui::Vec2 {
    let sin = angle.sin();
    let cos = angle.cos();
    egui::vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Screen-space corners of a placed object, clockwise from top-left.
pub(super) fn placed_corners_screen(
    origin: egui::Pos2,
    scale: f32,
    placed: &Placed,
) -> [egui::Pos2; 4] {
    let center = origin + placed.position.to_pos2().to_vec2() * scale;
    let half = placed.half_size() * scale;
    let rot = placed.rotation.to_radians();
    let locals = [
        egui::vec2(-half.x, -half.y),
        egui::vec2(half.x, -half.y),
        egui::vec2(half.x, half.y),
        egui::vec2(-half.x, half.y),
    ];
    locals.map(|v| center + rotate_vec2(v, rot))
}

pub(super) fn draw_placed(
    painter: &egui::Painter,
    origin: egui::Pos2,
    scale: f32,
    placed: &Placed,
    texture: Option<&egui::TextureHandle>,
) {
    let corners = placed_corners_screen(origin, scale, placed);
    match texture {
        Some(texture) => {
            let center = origin + placed.position.to_pos2().to_vec2() * scale;
            let half = placed.half_size() * scale;
            let rect = egui::Rect::from_center_size(center, half * 2.0);
            let mut mesh = egui::Mesh::with_texture(texture.id());
            mesh.add_rect_with_uv(
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            let rot = placed.rotation.to_radians();
            for vertex in &mut mesh.vertices {
                let v = vertex.pos - center;
                vertex.pos = center + rotate_vec2(v, rot);
            }
            painter.add(egui::Shape::mesh(mesh));
        }
        None => {
            // Placeholder for a missing or undecodable icon.
            painter.add(egui::Shape::convex_polygon(
                corners.to_vec(),
                egui::Color32::from_gray(235),
                egui::Stroke::new(1.0, egui::Color32::from_gray(120)),
            ));
            let label = std::path::Path::new(&placed.src)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("?");
            let center = origin + placed.position.to_pos2().to_vec2() * scale;
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(60),
            );
        }
    }
    if let Some(id) = placed.sign_id() {
        painter.add(egui::Shape::closed_line(
            corners.to_vec(),
            egui::Stroke::new((SIGN_STROKE_WIDTH * scale).max(1.0), border_color32(id)),
        ));
    }
}

pub(super) fn draw_arrow(painter: &egui::Painter, origin: egui::Pos2, scale: f32, arrow: &Arrow) {
    let a = origin + arrow.start.to_pos2().to_vec2() * scale;
    let dir = rotate_vec2(egui::vec2(1.0, 0.0), arrow.rotation.to_radians());
    let b = a + dir * arrow.length * scale;
    let stroke = egui::Stroke::new((3.0 * scale).max(1.0), egui::Color32::from_gray(20));
    painter.line_segment([a, b], stroke);
    draw_arrowhead(painter, a, b, stroke);
}

pub(super) fn draw_arrowhead(
    painter: &egui::Painter,
    a: egui::Pos2,
    b: egui::Pos2,
    stroke: egui::Stroke,
) {
    let v = b - a;
    if v.length_sq() <= f32::EPSILON {
        return;
    }
    let dir = v.normalized();
    let size = (stroke.width * 4.0).max(8.0);
    let perp = egui::vec2(-dir.y, dir.x);
    let tip = b;
    let base = b - dir * size;
    let left = base + perp * (size * 0.5);
    let right = base - perp * (size * 0.5);
    painter.add(egui::Shape::convex_polygon(
        vec![tip, left, right],
        stroke.color,
        egui::Stroke::NONE,
    ));
}

pub(super) fn draw_selection(painter: &egui::Painter, corners: &[egui::Pos2; 4]) {
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255));
    painter.add(egui::Shape::closed_line(corners.to_vec(), stroke));
}
