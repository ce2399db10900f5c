//! Scene document serialization.
//!
//! The on-disk format is a version-less JSON array: the first element is
//! the track name, every following element is one placed object in layer
//! order, tagged `"name": "Sign"` or `"name": "Element"`. Loading parses
//! the whole document into a staging structure before touching the live
//! scene, so a malformed file never costs the current board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Placed, PlacedKind, Point, border_color_name};
use crate::scene::Scene;

/// Default file name for saved scene documents.
pub const DEFAULT_FILE_NAME: &str = "konva_data.json";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("scene document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene document must be a JSON array")]
    NotAnArray,
    #[error("scene document is missing the leading track name")]
    MissingTrackName,
    #[error("record {index} is not a valid Sign/Element record: {source}")]
    BadRecord {
        index: usize,
        source: serde_json::Error,
    },
    #[error("record {index} carries a non-numeric sign id {id:?}")]
    BadSignId { index: usize, id: String },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "name")]
pub enum Record {
    Sign(SignRecord),
    Element(ElementRecord),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SignRecord {
    pub id: String,
    pub height: f32,
    pub rotation: f32,
    pub stroke: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f32,
    #[serde(rename = "offsetX")]
    pub offset_x: f32,
    #[serde(rename = "offsetY")]
    pub offset_y: f32,
    pub x: f32,
    pub y: f32,
    pub src: String,
    pub draggable: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ElementRecord {
    pub height: f32,
    pub rotation: f32,
    #[serde(rename = "offsetX")]
    pub offset_x: f32,
    #[serde(rename = "offsetY")]
    pub offset_y: f32,
    pub x: f32,
    pub y: f32,
    pub src: String,
    pub draggable: String,
}

/// Fully parsed document, ready to replay onto a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDocument {
    pub track_name: String,
    pub records: Vec<Record>,
}

fn record_for(placed: &Placed) -> Record {
    let half = placed.half_size();
    match placed.kind {
        PlacedKind::Sign { id } => Record::Sign(SignRecord {
            id: id.to_string(),
            height: placed.height,
            rotation: placed.rotation,
            stroke: border_color_name(id).to_string(),
            stroke_width: crate::model::SIGN_STROKE_WIDTH,
            offset_x: half.x,
            offset_y: half.y,
            x: placed.position.x,
            y: placed.position.y,
            src: placed.src.clone(),
            draggable: "true".to_string(),
        }),
        PlacedKind::Element => Record::Element(ElementRecord {
            height: placed.height,
            rotation: placed.rotation,
            offset_x: half.x,
            offset_y: half.y,
            x: placed.position.x,
            y: placed.position.y,
            src: placed.src.clone(),
            draggable: "true".to_string(),
        }),
    }
}

/// Serialize the scene in current layer order.
pub fn save_scene(scene: &Scene) -> Result<String, DocumentError> {
    let mut doc = Vec::with_capacity(scene.items().len() + 1);
    doc.push(serde_json::Value::String(scene.track_name.clone()));
    for placed in scene.items() {
        doc.push(serde_json::to_value(record_for(placed))?);
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a document into a staging structure without touching any scene.
pub fn parse_document(text: &str) -> Result<SceneDocument, DocumentError> {
    let root: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(values) = root else {
        return Err(DocumentError::NotAnArray);
    };
    let mut iter = values.into_iter().enumerate();
    let track_name = match iter.next() {
        Some((_, serde_json::Value::String(name))) => name,
        Some(_) | None => return Err(DocumentError::MissingTrackName),
    };
    let mut records = Vec::new();
    for (index, value) in iter {
        let record: Record = serde_json::from_value(value)
            .map_err(|source| DocumentError::BadRecord { index, source })?;
        if let Record::Sign(sign) = &record {
            if sign.id.trim().parse::<i64>().is_err() {
                return Err(DocumentError::BadSignId {
                    index,
                    id: sign.id.clone(),
                });
            }
        }
        records.push(record);
    }
    Ok(SceneDocument {
        track_name,
        records,
    })
}

/// Replace the scene with the parsed document. The board is cleared and
/// every record replays the normal placement path, so document order
/// becomes the new layer order and therefore the new sequence order.
pub fn restore_scene(scene: &mut Scene, doc: &SceneDocument) {
    scene.clear();
    scene.track_name = doc.track_name.clone();
    for record in &doc.records {
        match record {
            Record::Sign(sign) => {
                // Validated by parse_document.
                let id = sign.id.trim().parse::<i64>().unwrap_or_default();
                let outcome =
                    scene.place_sign(id, &sign.src, Point::new(sign.x, sign.y));
                scene.set_rotation(outcome.handle(), sign.rotation);
                scene.set_height(outcome.handle(), sign.height);
            }
            Record::Element(element) => {
                let handle =
                    scene.place_element(&element.src, Point::new(element.x, element.y));
                scene.set_rotation(handle, element.rotation);
                scene.set_height(handle, element.height);
            }
        }
    }
}

/// Parse-then-swap load: the live scene is only replaced once the whole
/// document parsed cleanly.
pub fn load_scene(scene: &mut Scene, text: &str) -> Result<(), DocumentError> {
    let doc = parse_document(text)?;
    restore_scene(scene, &doc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PLACED_WIDTH, SIGN_STROKE_WIDTH};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.track_name = "Club championship".to_string();
        scene.place_sign(12, "/images/signs/12.png", Point::new(400.0, 300.0));
        scene.place_element("/images/obstacleElements/cone.png", Point::new(900.0, 700.0));
        let o = scene.place_sign(205, "/images/signs/205.png", Point::new(1200.0, 500.0));
        scene.set_rotation(o.handle(), 180.0);
        scene
    }

    #[test]
    fn document_starts_with_track_name_and_preserves_layer_order() {
        let text = save_scene(&sample_scene()).unwrap();
        let values: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(values[0], serde_json::json!("Club championship"));
        assert_eq!(values[1]["name"], "Sign");
        assert_eq!(values[2]["name"], "Element");
        assert_eq!(values[3]["name"], "Sign");
        assert_eq!(values[3]["rotation"], 180.0);
    }

    #[test]
    fn sign_records_carry_stroke_and_string_id() {
        let text = save_scene(&sample_scene()).unwrap();
        let values: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        let sign = &values[1];
        assert_eq!(sign["id"], "12");
        assert_eq!(sign["stroke"], "green");
        assert_eq!(sign["strokeWidth"], SIGN_STROKE_WIDTH);
        assert_eq!(sign["draggable"], "true");
        assert_eq!(sign["offsetX"], PLACED_WIDTH / 2.0);
        let yellow = &values[3];
        assert_eq!(yellow["stroke"], "yellow");
        // Elements have neither id nor stroke.
        assert!(values[2].get("id").is_none());
        assert!(values[2].get("stroke").is_none());
    }

    #[test]
    fn round_trip_reproduces_the_board() {
        let scene = sample_scene();
        let text = save_scene(&scene).unwrap();
        let mut restored = Scene::new();
        load_scene(&mut restored, &text).unwrap();

        assert_eq!(restored.track_name, scene.track_name);
        assert_eq!(restored.items().len(), scene.items().len());
        for (a, b) in scene.items().iter().zip(restored.items()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.src, b.src);
            assert_eq!(a.position, b.position);
            assert_eq!(a.rotation, b.rotation);
            assert_eq!(a.height, b.height);
        }
        assert_eq!(restored.sequence(), scene.sequence());
        assert_eq!(restored.arrows(), scene.arrows());
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let text = save_scene(&sample_scene()).unwrap();
        let mut scene = Scene::new();
        load_scene(&mut scene, &text).unwrap();
        let first: Vec<Placed> = scene.items().to_vec();
        load_scene(&mut scene, &text).unwrap();
        // Handles are reallocated per load; everything visible matches.
        for (a, b) in first.iter().zip(scene.items()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!((a.position, a.rotation, a.src.as_str()), (b.position, b.rotation, b.src.as_str()));
        }
        assert_eq!(first.len(), scene.items().len());
    }

    #[test]
    fn malformed_json_leaves_the_scene_untouched() {
        let mut scene = sample_scene();
        let before = scene.items().to_vec();
        assert!(load_scene(&mut scene, "[\"name\", {\"truncated\"").is_err());
        assert_eq!(scene.items(), &before[..]);
        assert_eq!(scene.track_name, "Club championship");
    }

    #[test]
    fn non_array_document_is_rejected() {
        assert!(matches!(
            parse_document("{\"name\": \"Sign\"}"),
            Err(DocumentError::NotAnArray)
        ));
    }

    #[test]
    fn document_without_track_name_is_rejected() {
        assert!(matches!(
            parse_document("[]"),
            Err(DocumentError::MissingTrackName)
        ));
        assert!(matches!(
            parse_document("[{\"name\": \"Sign\"}]"),
            Err(DocumentError::MissingTrackName)
        ));
    }

    #[test]
    fn unknown_record_tag_is_a_bad_record() {
        let text = "[\"track\", {\"name\": \"Blob\", \"x\": 1.0}]";
        assert!(matches!(
            parse_document(text),
            Err(DocumentError::BadRecord { index: 1, .. })
        ));
    }

    #[test]
    fn non_numeric_sign_id_is_rejected_at_parse_time() {
        let text = r#"["track", {"name": "Sign", "id": "abc", "height": 10.0,
            "rotation": 0.0, "stroke": "green", "strokeWidth": 4.0,
            "offsetX": 5.0, "offsetY": 5.0, "x": 1.0, "y": 2.0,
            "src": "abc.png", "draggable": "true"}]"#;
        assert!(matches!(
            parse_document(text),
            Err(DocumentError::BadSignId { index: 1, .. })
        ));
    }

    #[test]
    fn loaded_oversized_height_drags_safely() {
        // Documents are free to carry a height taller than the stage;
        // dragging such an object must pin it, not panic.
        let text = r#"["track",
            {"name": "Sign", "id": "12", "height": 99999.0, "rotation": 0.0,
             "stroke": "green", "strokeWidth": 4.0,
             "offsetX": 94.8, "offsetY": 49999.5, "x": 400.0, "y": 300.0,
             "src": "12.png", "draggable": "true"}]"#;
        let mut scene = Scene::new();
        load_scene(&mut scene, text).unwrap();
        let handle = scene.items()[0].handle;
        assert!(scene.move_to(handle, Point::new(900.0, 600.0)));
        let p = scene.get(handle).unwrap().position;
        assert_eq!(p.x, 900.0);
        assert_eq!(p.y, 99999.0 / 2.0);
    }

    #[test]
    fn restore_replays_the_placement_path() {
        // Two sign records at the same spot: the second replays through
        // the collision check and replaces the first, exactly as a live
        // drop would.
        let text = r#"["track",
            {"name": "Sign", "id": "12", "height": 126.4, "rotation": 90.0,
             "stroke": "green", "strokeWidth": 4.0,
             "offsetX": 94.8, "offsetY": 63.2, "x": 400.0, "y": 300.0,
             "src": "12.png", "draggable": "true"},
            {"name": "Sign", "id": "205", "height": 126.4, "rotation": 0.0,
             "stroke": "yellow", "strokeWidth": 4.0,
             "offsetX": 94.8, "offsetY": 63.2, "x": 410.0, "y": 310.0,
             "src": "205.png", "draggable": "true"}]"#;
        let mut scene = Scene::new();
        load_scene(&mut scene, text).unwrap();
        assert_eq!(scene.items().len(), 1);
        let sign = &scene.items()[0];
        assert_eq!(sign.sign_id(), Some(205));
        assert_eq!(sign.position, Point::new(400.0, 300.0));
    }
}
