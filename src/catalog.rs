//! The obstacle catalog that feeds the palette.
//!
//! Seeded from flat files under the assets directory:
//! `text/Names.txt` lists obstacles as `"<id>. <name>"`, one per line;
//! the description for id N lives in `text/N.txt`; sign icons are
//! `signs/<id>.png`; track elements are whatever files sit in
//! `obstacleElements/`. The editor only reads this data, never writes it.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::category_for_id;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Names.txt line {line_no} is not \"<id>. <name>\": {line:?}")]
    BadNameLine { line_no: usize, line: String },
    #[error("icon file name {name:?} carries no numeric sign id")]
    NoSignId { name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_id: u8,
}

impl Obstacle {
    pub fn icon_path(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join("signs").join(format!("{}.png", self.id))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackElement {
    pub name: String,
    pub icon: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub obstacles: Vec<Obstacle>,
    pub elements: Vec<TrackElement>,
}

pub const CATEGORY_COUNT: u8 = 5;

pub fn category_name(category_id: u8) -> &'static str {
    match category_id {
        1 => "Start & finish",
        2 => "Class 1",
        3 => "Class 2",
        4 => "Class 3",
        _ => "Champion",
    }
}

/// First run of ASCII digits in a file name. This is how a dropped icon's
/// source maps back to its catalog id; a name without digits is a catalog
/// defect and fails loading, not placement.
pub fn sign_id_from_filename(name: &str) -> Option<i64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = name[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn read_to_string(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_name_line(line_no: usize, line: &str) -> Result<(i64, String), CatalogError> {
    let bad = || CatalogError::BadNameLine {
        line_no,
        line: line.to_string(),
    };
    let (id_part, name_part) = line.split_once('.').ok_or_else(bad)?;
    let id = id_part.trim().parse::<i64>().map_err(|_| bad())?;
    let name = name_part.trim();
    if name.is_empty() {
        return Err(bad());
    }
    Ok((id, name.to_string()))
}

/// Load the full catalog from an assets directory. Obstacles come back
/// ordered by id; every file under `signs/` is checked to carry a numeric
/// id in its name up front so a drop can never fail to resolve one later.
pub fn load_catalog(assets_dir: &Path) -> Result<Catalog, CatalogError> {
    let names_path = assets_dir.join("text").join("Names.txt");
    let mut obstacles = Vec::new();
    for (idx, line) in read_to_string(&names_path)?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (id, name) = parse_name_line(idx + 1, line)?;
        let description_path = assets_dir.join("text").join(format!("{id}.txt"));
        let description = read_to_string(&description_path)?.trim().to_string();
        obstacles.push(Obstacle {
            id,
            name,
            description,
            category_id: category_for_id(id),
        });
    }
    obstacles.sort_by_key(|o| o.id);

    let elements_dir = assets_dir.join("obstacleElements");
    let mut elements = Vec::new();
    if elements_dir.is_dir() {
        let entries = std::fs::read_dir(&elements_dir).map_err(|source| CatalogError::Io {
            path: elements_dir.clone(),
            source,
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            elements.push(TrackElement { name, icon: path });
        }
        elements.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let signs_dir = assets_dir.join("signs");
    if signs_dir.is_dir() {
        let entries = std::fs::read_dir(&signs_dir).map_err(|source| CatalogError::Io {
            path: signs_dir.clone(),
            source,
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            if sign_id_from_filename(&name).is_none() {
                return Err(CatalogError::NoSignId { name });
            }
        }
    }

    log::info!(
        "catalog loaded: {} obstacles, {} elements",
        obstacles.len(),
        elements.len()
    );
    Ok(Catalog {
        obstacles,
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn seed_assets(dir: &Path) {
        write(
            &dir.join("text/Names.txt"),
            "205. Weave poles\n1. Start\n12. Left turn\n",
        );
        write(&dir.join("text/1.txt"), "Start of the course.\n");
        write(&dir.join("text/12.txt"), "Handler turns left.");
        write(&dir.join("text/205.txt"), "Dog weaves four poles.");
        write(&dir.join("obstacleElements/cone.png"), "png");
        write(&dir.join("obstacleElements/barrier.png"), "png");
        write(&dir.join("signs/1.png"), "png");
        write(&dir.join("signs/12.png"), "png");
        write(&dir.join("signs/205.png"), "png");
    }

    #[test]
    fn sign_id_uses_first_digit_run() {
        assert_eq!(sign_id_from_filename("205.png"), Some(205));
        assert_eq!(sign_id_from_filename("sign-12-old.png"), Some(12));
        assert_eq!(sign_id_from_filename("v2sign40.png"), Some(2));
        assert_eq!(sign_id_from_filename("cone.png"), None);
    }

    #[test]
    fn seeding_orders_by_id_and_assigns_categories() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let catalog = load_catalog(dir.path()).unwrap();

        let ids: Vec<i64> = catalog.obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 12, 205]);
        let categories: Vec<u8> = catalog.obstacles.iter().map(|o| o.category_id).collect();
        assert_eq!(categories, vec![1, 2, 4]);
        assert_eq!(catalog.obstacles[0].name, "Start");
        assert_eq!(catalog.obstacles[0].description, "Start of the course.");
    }

    #[test]
    fn seeding_picks_up_elements_by_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let catalog = load_catalog(dir.path()).unwrap();
        let names: Vec<&str> = catalog.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["barrier", "cone"]);
    }

    #[test]
    fn name_with_inner_periods_keeps_the_rest() {
        let (id, name) = parse_name_line(1, "100. Fig. 8 around cones").unwrap();
        assert_eq!(id, 100);
        assert_eq!(name, "Fig. 8 around cones");
    }

    #[test]
    fn sign_icon_without_digits_fails_loading() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        write(&dir.path().join("signs/blank.png"), "png");
        assert!(matches!(
            load_catalog(dir.path()),
            Err(CatalogError::NoSignId { name }) if name == "blank.png"
        ));
    }

    #[test]
    fn garbage_name_line_fails_loading() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        write(&dir.path().join("text/Names.txt"), "no id here\n");
        assert!(matches!(
            load_catalog(dir.path()),
            Err(CatalogError::BadNameLine { line_no: 1, .. })
        ));
    }

    #[test]
    fn missing_description_fails_loading() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        std::fs::remove_file(dir.path().join("text/12.txt")).unwrap();
        assert!(matches!(load_catalog(dir.path()), Err(CatalogError::Io { .. })));
    }
}
