use eframe::egui;

use crate::model::{
    Arrow, PLACED_HEIGHT, PLACED_WIDTH, Placed, PlacedKind, Point, SCENE_HEIGHT, SCENE_WIDTH,
    SequenceEntry,
};

/// Result of a palette drop: either a fresh object was appended, or the
/// drop landed inside an existing sign's box and replaced it in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Added(u64),
    Replaced(u64),
}

impl PlaceOutcome {
    pub fn handle(self) -> u64 {
        match self {
            PlaceOutcome::Added(h) | PlaceOutcome::Replaced(h) => h,
        }
    }
}

/// Single owner of the board state: track name plus one ordered list of
/// placed objects. Layer order is placement/load order, and that same
/// order drives the sequence table and the arrows. All mutation goes
/// through the methods below; the interaction controller and the
/// serializer both dispatch onto this one owner.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub track_name: String,
    items: Vec<Placed>,
    next_handle: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Placed] {
        &self.items
    }

    pub fn signs(&self) -> impl Iterator<Item = &Placed> {
        self.items.iter().filter(|p| p.is_sign())
    }

    pub fn sign_count(&self) -> usize {
        self.signs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, handle: u64) -> Option<&Placed> {
        self.items.iter().find(|p| p.handle == handle)
    }

    fn get_mut(&mut self, handle: u64) -> Option<&mut Placed> {
        self.items.iter_mut().find(|p| p.handle == handle)
    }

    fn allocate_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Drop a sign at `at`. If the point falls inside an existing sign's
    /// box, that sign keeps its position and rotation and only its id and
    /// icon change (first match in layer order wins). Otherwise a new sign
    /// is appended with rotation 0.
    pub fn place_sign(&mut self, id: i64, src: &str, at: Point) -> PlaceOutcome {
        if let Some(hit) = self
            .items
            .iter_mut()
            .find(|p| p.is_sign() && p.contains(at))
        {
            hit.kind = PlacedKind::Sign { id };
            hit.src = src.to_string();
            return PlaceOutcome::Replaced(hit.handle);
        }
        let handle = self.allocate_handle();
        self.items.push(Placed {
            handle,
            kind: PlacedKind::Sign { id },
            src: src.to_string(),
            position: at,
            rotation: 0.0,
            width: PLACED_WIDTH,
            height: PLACED_HEIGHT,
        });
        PlaceOutcome::Added(handle)
    }

    /// Drop a track element at `at`. Elements never replace signs and are
    /// never replaced themselves; each drop appends.
    pub fn place_element(&mut self, src: &str, at: Point) -> u64 {
        let handle = self.allocate_handle();
        self.items.push(Placed {
            handle,
            kind: PlacedKind::Element,
            src: src.to_string(),
            position: at,
            rotation: 0.0,
            width: PLACED_WIDTH,
            height: PLACED_HEIGHT,
        });
        handle
    }

    /// Move an object to `proposed`, clamped per axis so its rotated
    /// bounds stay inside the stage rectangle. Returns whether a sign
    /// moved (callers recompute the sequence only then).
    pub fn move_to(&mut self, handle: u64, proposed: Point) -> bool {
        let Some(p) = self.get_mut(handle) else {
            return false;
        };
        let half = p.bounds().size() * 0.5;
        p.position = clamp_to_stage(proposed, half);
        p.is_sign()
    }

    /// Set an object's rotation from an interactive rotate, snapped to the
    /// nearest quarter turn. Returns whether a sign rotated.
    pub fn rotate_to(&mut self, handle: u64, degrees: f32) -> bool {
        let Some(p) = self.get_mut(handle) else {
            return false;
        };
        p.rotation = snap_rotation(degrees);
        p.is_sign()
    }

    /// Restore a serialized rotation verbatim (load path only; saved
    /// documents may predate the quarter-turn snap).
    pub fn set_rotation(&mut self, handle: u64, degrees: f32) {
        if let Some(p) = self.get_mut(handle) {
            p.rotation = degrees;
        }
    }

    pub fn set_height(&mut self, handle: u64, height: f32) {
        if let Some(p) = self.get_mut(handle) {
            p.height = height;
        }
    }

    /// Destroy one object. Returns whether a sign was removed.
    pub fn remove(&mut self, handle: u64) -> bool {
        let Some(idx) = self.items.iter().position(|p| p.handle == handle) else {
            return false;
        };
        self.items.remove(idx).is_sign()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Numbered sequence entries in layer order, skipping signs with
    /// id <= 2. Skipped signs stay on the board and still chain arrows.
    pub fn sequence(&self) -> Vec<SequenceEntry> {
        let mut out = Vec::new();
        for sign in self.signs() {
            let id = sign.sign_id().unwrap_or_default();
            if id <= 2 {
                continue;
            }
            out.push(SequenceEntry {
                number: out.len() + 1,
                sign_id: id,
            });
        }
        out
    }

    /// One arrow per consecutive sign pair over the full, unfiltered sign
    /// order. The previous arrow set is always discarded wholesale; this
    /// builds the replacement from scratch, so recomputing twice with no
    /// intervening change yields identical arrows.
    pub fn arrows(&self) -> Vec<Arrow> {
        let signs: Vec<&Placed> = self.signs().collect();
        signs
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0].position, pair[1].position);
                let v = b.to_pos2() - a.to_pos2();
                Arrow {
                    start: a,
                    length: v.length(),
                    rotation: v.y.atan2(v.x).to_degrees(),
                }
            })
            .collect()
    }
}

/// Clamp a proposed center so `half` extents stay inside the stage,
/// independently per axis. An object larger than the stage (possible via
/// a loaded document's height) pins to its own half extent instead of
/// inverting the bounds.
pub fn clamp_to_stage(proposed: Point, half: egui::Vec2) -> Point {
    let hi_x = (SCENE_WIDTH - half.x).max(half.x);
    let hi_y = (SCENE_HEIGHT - half.y).max(half.y);
    Point {
        x: proposed.x.clamp(half.x.min(hi_x), hi_x),
        y: proposed.y.clamp(half.y.min(hi_y), hi_y),
    }
}

/// Snap an angle in degrees to the nearest of {0, 90, 180, 270}.
pub fn snap_rotation(degrees: f32) -> f32 {
    let snapped = (degrees / 90.0).round() * 90.0;
    snapped.rem_euclid(360.0)
}
