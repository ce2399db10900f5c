use std::path::PathBuf;

use crate::catalog::{self, Catalog};
use crate::document;
use crate::model::{Arrow, SequenceEntry};
use crate::scene::Scene;

mod assets;
mod canvas;
mod palette;
mod render;
mod settings;
mod update;

/// Payload carried by a palette drag until it is dropped on the stage.
#[derive(Clone, Debug)]
pub(crate) struct PaletteDrag {
    pub kind: PaletteDragKind,
    pub src: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PaletteDragKind {
    Sign { id: i64 },
    Element,
}

/// Marker for an in-flight rotate on the single selected object.
#[derive(Clone, Copy, Debug)]
struct RotateDrag {
    handle: u64,
}

pub struct TrackApp {
    scene: Scene,
    catalog: Catalog,
    assets_dir: PathBuf,
    background_path: String,

    /// At most one object is selected at a time; its rotate handle is the
    /// only one that exists.
    selection: Option<u64>,
    drag_target: Option<u64>,
    drag_moved_sign: bool,
    rotate_drag: Option<RotateDrag>,

    /// Derived views, rebuilt by `recompute` after every sign mutation.
    sequence: Vec<SequenceEntry>,
    arrows: Vec<Arrow>,

    textures: assets::TextureStore,
    palette_query: String,
    status: Option<String>,
    save_path: String,
    settings_path: String,
}

impl TrackApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = std::path::PathBuf::from(home)
                .join(".config")
                .join("rallybane.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("settings.toml").exists() {
            return Some("settings.toml".to_string());
        }
        None
    }

    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path().unwrap_or_else(|| "settings.toml".to_string());
        let settings = settings::load_settings(&settings_path).unwrap_or_default();
        let assets_dir = PathBuf::from(&settings.assets_dir);

        let mut status = None;
        let catalog = match catalog::load_catalog(&assets_dir) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("catalog load failed: {e}");
                status = Some(format!("Catalog load failed: {e}"));
                Catalog::default()
            }
        };

        Self {
            scene: Scene::new(),
            catalog,
            assets_dir,
            background_path: settings.background_path,
            selection: None,
            drag_target: None,
            drag_moved_sign: false,
            rotate_drag: None,
            sequence: Vec::new(),
            arrows: Vec::new(),
            textures: assets::TextureStore::default(),
            palette_query: String::new(),
            status,
            save_path: settings.save_path,
            settings_path,
        }
    }

    /// Rebuild the sequence table and the arrow set from the current sign
    /// order. Old arrows are discarded wholesale, never patched.
    fn recompute(&mut self) {
        self.sequence = self.scene.sequence();
        self.arrows = self.scene.arrows();
    }

    fn settings_snapshot(&self) -> settings::AppSettings {
        settings::AppSettings {
            assets_dir: self.assets_dir.display().to_string(),
            background_path: self.background_path.clone(),
            save_path: self.save_path.clone(),
        }
    }

    fn persist_settings(&mut self) {
        let snapshot = self.settings_snapshot();
        if let Err(e) = settings::save_settings(&self.settings_path, &snapshot) {
            self.status = Some(format!("Settings save failed: {e}"));
        }
    }

    fn clear_board(&mut self) {
        self.scene.clear();
        self.selection = None;
        self.drag_target = None;
        self.rotate_drag = None;
        self.recompute();
    }

    fn save_to(&mut self, path: &std::path::Path) {
        match document::save_scene(&self.scene) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => {
                    log::info!("saved track to {}", path.display());
                    self.status = Some(format!("Saved {}", path.display()));
                }
                Err(e) => self.status = Some(format!("Save failed: {e}")),
            },
            Err(e) => self.status = Some(format!("Serialize failed: {e}")),
        }
    }

    fn save_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(document::DEFAULT_FILE_NAME)
            .add_filter("JSON", &["json"])
            .save_file()
        {
            self.save_path = path.display().to_string();
            self.save_to(&path);
            self.persist_settings();
        }
    }

    fn load_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            match std::fs::read_to_string(&path) {
                Ok(text) => self.load_from_text(&text, &path.display().to_string()),
                Err(e) => self.status = Some(format!("Read failed: {e}")),
            }
        }
    }

    /// Parse-then-swap: the board is only cleared and rebuilt once the
    /// whole document parsed. A bad file leaves the current track intact.
    fn load_from_text(&mut self, text: &str, origin: &str) {
        match document::load_scene(&mut self.scene, text) {
            Ok(()) => {
                self.selection = None;
                self.drag_target = None;
                self.rotate_drag = None;
                self.recompute();
                log::info!("loaded track from {origin}");
                self.status = Some(format!("Loaded {origin}"));
            }
            Err(e) => {
                log::warn!("load of {origin} failed: {e}");
                self.status = Some(format!("Load failed: {e}"));
            }
        }
    }
}
