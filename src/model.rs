use eframe::egui;
use serde::{Deserialize, Serialize};

/// Logical scene size. The stage is scaled uniformly to fit its container,
/// but every stored coordinate lives in this space.
pub const SCENE_WIDTH: f32 = 1896.0;
pub const SCENE_HEIGHT: f32 = 1264.0;

/// Placed objects occupy a fixed proportion of the scene.
pub const PLACED_WIDTH: f32 = SCENE_WIDTH / 10.0;
pub const PLACED_HEIGHT: f32 = SCENE_HEIGHT / 10.0;

/// Stroke width of the category border drawn around signs.
pub const SIGN_STROKE_WIDTH: f32 = 4.0;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.to_pos2() - self.to_pos2()).length()
    }
}

/// Obstacle category derived from the catalog sign id. The ranges are
/// inclusive on the low end; anything at or above 300 collapses into the
/// last category, anything at or below 2 (including bogus non-positive
/// ids) into the first.
pub fn category_for_id(id: i64) -> u8 {
    match id {
        i64::MIN..=2 => 1,
        3..=99 => 2,
        100..=199 => 3,
        200..=299 => 4,
        _ => 5,
    }
}

/// Border color name for a sign, keyed off the same ranges as the
/// categories. This is the string that ends up in the scene document.
pub fn border_color_name(id: i64) -> &'static str {
    match category_for_id(id) {
        1 => "black",
        2 => "green",
        3 => "blue",
        4 => "yellow",
        _ => "red",
    }
}

pub fn border_color32(id: i64) -> egui::Color32 {
    match category_for_id(id) {
        1 => egui::Color32::from_rgb(20, 20, 20),
        2 => egui::Color32::from_rgb(40, 140, 60),
        3 => egui::Color32::from_rgb(40, 90, 200),
        4 => egui::Color32::from_rgb(220, 190, 40),
        _ => egui::Color32::from_rgb(200, 40, 40),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacedKind {
    /// A catalog sign. The id drives the border color and the sequence
    /// table.
    Sign { id: i64 },
    /// A decorative track element. Same geometry as a sign but never part
    /// of the sequence.
    Element,
}

/// One object on the board. Center-anchored so rotation pivots on the
/// visual center; `handle` is scene-private identity for selection and is
/// never serialized.
#[derive(Clone, Debug, PartialEq)]
pub struct Placed {
    pub handle: u64,
    pub kind: PlacedKind,
    pub src: String,
    pub position: Point,
    /// Degrees, snapped to {0, 90, 180, 270} by interactive rotation.
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
}

impl Placed {
    pub fn is_sign(&self) -> bool {
        matches!(self.kind, PlacedKind::Sign { .. })
    }

    pub fn sign_id(&self) -> Option<i64> {
        match self.kind {
            PlacedKind::Sign { id } => Some(id),
            PlacedKind::Element => None,
        }
    }

    pub fn half_size(&self) -> egui::Vec2 {
        egui::vec2(self.width * 0.5, self.height * 0.5)
    }

    /// Drop-collision box: position minus half size, sized width x height.
    /// Rotation is deliberately ignored, matching the drop-replacement
    /// rule.
    pub fn hit_box(&self) -> egui::Rect {
        egui::Rect::from_center_size(self.position.to_pos2(), egui::vec2(self.width, self.height))
    }

    pub fn contains(&self, p: Point) -> bool {
        self.hit_box().contains(p.to_pos2())
    }

    /// Axis-aligned bounds of the rotated object, used for clamping and
    /// selection visuals.
    pub fn bounds(&self) -> egui::Rect {
        let rot = self.rotation.to_radians();
        let half = self.half_size();
        let sin = rot.sin().abs();
        let cos = rot.cos().abs();
        let ext = egui::vec2(half.x * cos + half.y * sin, half.x * sin + half.y * cos);
        egui::Rect::from_center_size(self.position.to_pos2(), ext * 2.0)
    }
}

/// Derived connector between two consecutive signs. Rebuilt wholesale on
/// every sequence recompute, never serialized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub start: Point,
    pub length: f32,
    /// Degrees from the first sign's center to the second's.
    pub rotation: f32,
}

/// One row of the numbered sequence table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceEntry {
    /// 1-based display number.
    pub number: usize,
    pub sign_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_buckets_match_the_table() {
        for id in [-5, 0, 1, 2] {
            assert_eq!(category_for_id(id), 1, "id {id}");
            assert_eq!(border_color_name(id), "black", "id {id}");
        }
        for id in [3, 50, 99] {
            assert_eq!(category_for_id(id), 2, "id {id}");
            assert_eq!(border_color_name(id), "green", "id {id}");
        }
        for id in [100, 150, 199] {
            assert_eq!(category_for_id(id), 3, "id {id}");
            assert_eq!(border_color_name(id), "blue", "id {id}");
        }
        for id in [200, 299] {
            assert_eq!(category_for_id(id), 4, "id {id}");
            assert_eq!(border_color_name(id), "yellow", "id {id}");
        }
        for id in [300, 1000] {
            assert_eq!(category_for_id(id), 5, "id {id}");
            assert_eq!(border_color_name(id), "red", "id {id}");
        }
    }

    #[test]
    fn hit_box_is_centered_and_ignores_rotation() {
        let p = Placed {
            handle: 1,
            kind: PlacedKind::Element,
            src: String::new(),
            position: Point::new(100.0, 80.0),
            rotation: 90.0,
            width: 40.0,
            height: 20.0,
        };
        let b = p.hit_box();
        assert_eq!(b.min, egui::pos2(80.0, 70.0));
        assert_eq!(b.max, egui::pos2(120.0, 90.0));
        assert!(p.contains(Point::new(80.0, 70.0)));
        assert!(!p.contains(Point::new(121.0, 80.0)));
    }

    #[test]
    fn bounds_swap_extents_at_quarter_turns() {
        let mut p = Placed {
            handle: 1,
            kind: PlacedKind::Element,
            src: String::new(),
            position: Point::new(0.0, 0.0),
            rotation: 0.0,
            width: 40.0,
            height: 20.0,
        };
        assert_eq!(p.bounds().size(), egui::vec2(40.0, 20.0));
        p.rotation = 90.0;
        let s = p.bounds().size();
        assert!((s.x - 20.0).abs() < 1e-3 && (s.y - 40.0).abs() < 1e-3);
    }
}
