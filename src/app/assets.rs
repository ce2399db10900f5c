use std::collections::HashMap;

use eframe::egui;

/// Lazily decoded icon/background textures, keyed by source path. A path
/// that fails to decode is remembered as `None` so the failure is logged
/// once and the object renders as a placeholder instead of retrying every
/// frame.
#[derive(Default)]
pub(super) struct TextureStore {
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl TextureStore {
    pub fn get(&mut self, ctx: &egui::Context, src: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.get(src) {
            return cached.clone();
        }
        let loaded = load_texture(ctx, src);
        if loaded.is_none() {
            log::warn!("image asset {src:?} failed to load, using placeholder");
        }
        self.textures.insert(src.to_string(), loaded.clone());
        loaded
    }
}

fn load_texture(ctx: &egui::Context, src: &str) -> Option<egui::TextureHandle> {
    let img = match image::open(src) {
        Ok(img) => img,
        Err(_) => return None,
    };
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.as_flat_samples();
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
    Some(ctx.load_texture(src, color_image, egui::TextureOptions::LINEAR))
}
