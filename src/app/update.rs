use eframe::egui;

use super::TrackApp;

impl eframe::App for TrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("track-toolbar").show(ctx, |ui| {
            self.show_toolbar(ui);
        });
        egui::TopBottomPanel::bottom("track-status").show(ctx, |ui| {
            self.show_status_bar(ui);
        });
        egui::SidePanel::left("obstacle-palette")
            .default_width(260.0)
            .show(ctx, |ui| {
                self.show_palette(ui, ctx);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_canvas(ui, ctx);
            });
        });
    }
}

impl TrackApp {
    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Track:");
            ui.add(
                egui::TextEdit::singleline(&mut self.scene.track_name)
                    .hint_text("track name")
                    .desired_width(220.0),
            );
            ui.separator();
            if ui.button("Save…").clicked() {
                self.save_dialog();
            }
            let quick = ui
                .button("Save")
                .on_hover_text(format!("Save to {}", self.save_path));
            if quick.clicked() {
                let path = std::path::PathBuf::from(&self.save_path);
                self.save_to(&path);
            }
            if ui.button("Load…").clicked() {
                self.load_dialog();
            }
            ui.separator();
            if ui.button("Clear board").clicked() {
                self.clear_board();
                self.status = Some("Board cleared".to_string());
            }
        });
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        if !self.sequence.is_empty() {
            ui.horizontal_wrapped(|ui| {
                ui.label("Sequence:");
                for entry in &self.sequence {
                    ui.label(format!("{}: {}", entry.number, entry.sign_id));
                }
            });
            ui.separator();
        }
        ui.horizontal(|ui| {
            if let Some(status) = &self.status {
                ui.label(status);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "{} signs, {} objects",
                    self.scene.sign_count(),
                    self.scene.items().len()
                ));
            });
        });
    }
}
