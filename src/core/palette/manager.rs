use crate::core::palette::pack::{PackFile, validate_entry};
use crate::core::palette::table::ColourTable;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct ColourPack {
    name: String,
    maps: Vec<(String, ColourTable)>,
}

impl ColourPack {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map_names(&self) -> impl Iterator<Item = &str> {
        self.maps.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn table(&self, map: &str) -> Option<&ColourTable> {
        self.maps
            .iter()
            .find(|(name, _)| name == map)
            .map(|(_, table)| table)
    }
}

/// Loads colour packs from a directory of JSON files.
///
/// Loading never fails: unreadable files, unparsable JSON and invalid
/// entries are logged and skipped, a pack without a single valid map is
/// dropped, and a missing directory yields an empty manager.
#[derive(Debug, Default)]
pub struct PaletteManager {
    dir: Option<PathBuf>,
    packs: Vec<ColourPack>,
}

impl PaletteManager {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn load_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let packs = scan_directory(&dir);

        Self {
            dir: Some(dir),
            packs,
        }
    }

    /// Re-scans the directory this manager was loaded from.
    pub fn reload(&mut self) {
        if let Some(dir) = &self.dir {
            self.packs = scan_directory(dir);
        }
    }

    pub fn pack_names(&self) -> impl Iterator<Item = &str> {
        self.packs.iter().map(ColourPack::name)
    }

    #[must_use]
    pub fn pack(&self, name: &str) -> Option<&ColourPack> {
        self.packs.iter().find(|pack| pack.name == name)
    }

    #[must_use]
    pub fn table(&self, pack: &str, map: &str) -> Option<&ColourTable> {
        self.pack(pack).and_then(|pack| pack.table(map))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

fn scan_directory(dir: &Path) -> Vec<ColourPack> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("colour pack directory {:?} not readable: {}", dir, err);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut packs: Vec<ColourPack> = Vec::new();

    for path in files {
        let Some(pack) = load_pack_file(&path) else {
            continue;
        };

        if packs.iter().any(|existing| existing.name == pack.name) {
            log::warn!(
                "duplicate colour pack `{}` in {:?} ignored, first definition wins",
                pack.name,
                path
            );
            continue;
        }

        packs.push(pack);
    }

    packs
}

fn load_pack_file(path: &Path) -> Option<ColourPack> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("skipping colour pack {:?}: {}", path, err);
            return None;
        }
    };

    let file: PackFile = match serde_json::from_str(&text) {
        Ok(file) => file,
        Err(err) => {
            log::warn!("skipping colour pack {:?}: {}", path, err);
            return None;
        }
    };

    let mut maps: Vec<(String, ColourTable)> = Vec::new();
    for entry in &file.maps {
        match validate_entry(entry) {
            Ok((name, table)) => {
                if maps.iter().any(|(existing, _)| existing == &name) {
                    log::warn!(
                        "pack `{}`: duplicate map `{}` ignored",
                        file.pack_name,
                        name
                    );
                    continue;
                }
                maps.push((name, table));
            }
            Err(rejection) => {
                log::warn!("pack `{}`: {}", file.pack_name, rejection);
            }
        }
    }

    if maps.is_empty() {
        log::warn!(
            "colour pack `{}` in {:?} has no valid maps, dropped",
            file.pack_name,
            path
        );
        return None;
    }

    Some(ColourPack {
        name: file.pack_name,
        maps,
    })
}
