use eframe::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::{CATEGORY_COUNT, Obstacle, TrackElement, category_name};

use super::{PaletteDrag, PaletteDragKind, TrackApp};

const THUMB_SIZE: f32 = 36.0;

impl TrackApp {
    /// The palette panel: fuzzy-searchable obstacle list grouped by
    /// category, plus the unnumbered track elements. Every row is a drag
    /// source whose payload the stage resolves on drop.
    pub(super) fn show_palette(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.add(
                egui::TextEdit::singleline(&mut self.palette_query).hint_text("name or number"),
            );
        });
        ui.separator();

        let matcher = SkimMatcherV2::default();
        let query = self.palette_query.trim().to_string();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for category in 1..=CATEGORY_COUNT {
                let rows: Vec<Obstacle> = self
                    .catalog
                    .obstacles
                    .iter()
                    .filter(|o| o.category_id == category)
                    .filter(|o| {
                        query.is_empty()
                            || matcher
                                .fuzzy_match(&format!("{} {}", o.id, o.name), &query)
                                .is_some()
                    })
                    .cloned()
                    .collect();
                if rows.is_empty() {
                    continue;
                }
                egui::CollapsingHeader::new(category_name(category))
                    .default_open(!query.is_empty() || category == 1)
                    .show(ui, |ui| {
                        for obstacle in &rows {
                            self.obstacle_row(ui, ctx, obstacle);
                        }
                    });
            }

            let elements: Vec<TrackElement> = self
                .catalog
                .elements
                .iter()
                .filter(|e| {
                    query.is_empty() || matcher.fuzzy_match(&e.name, &query).is_some()
                })
                .cloned()
                .collect();
            if !elements.is_empty() {
                egui::CollapsingHeader::new("Track elements")
                    .default_open(!query.is_empty())
                    .show(ui, |ui| {
                        for element in &elements {
                            self.element_row(ui, ctx, element);
                        }
                    });
            }
        });
    }

    fn obstacle_row(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, obstacle: &Obstacle) {
        let src = obstacle.icon_path(&self.assets_dir).display().to_string();
        let payload = PaletteDrag {
            kind: PaletteDragKind::Sign { id: obstacle.id },
            src: src.clone(),
        };
        let id = ui.id().with(("palette-sign", obstacle.id));
        let texture = self.textures.get(ctx, &src);
        let response = ui
            .dnd_drag_source(id, payload, |ui| {
                ui.horizontal(|ui| {
                    match &texture {
                        Some(texture) => {
                            ui.image((texture.id(), egui::vec2(THUMB_SIZE, THUMB_SIZE)));
                        }
                        None => {
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(THUMB_SIZE, THUMB_SIZE),
                                egui::Sense::hover(),
                            );
                            ui.painter()
                                .rect_filled(rect, 2.0, egui::Color32::from_gray(235));
                        }
                    }
                    ui.label(format!("{}. {}", obstacle.id, obstacle.name));
                });
            })
            .response;
        if !obstacle.description.is_empty() {
            response.on_hover_text(&obstacle.description);
        }
    }

    fn element_row(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, element: &TrackElement) {
        let src = element.icon.display().to_string();
        let payload = PaletteDrag {
            kind: PaletteDragKind::Element,
            src: src.clone(),
        };
        let id = ui.id().with(("palette-element", &element.name));
        let texture = self.textures.get(ctx, &src);
        ui.dnd_drag_source(id, payload, |ui| {
            ui.horizontal(|ui| {
                if let Some(texture) = &texture {
                    ui.image((texture.id(), egui::vec2(THUMB_SIZE, THUMB_SIZE)));
                }
                ui.label(&element.name);
            });
        });
    }
}
