//! Named scenes: the built-in set plus any `*.json` files found on disk.

use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{RenderSettings, SceneError, SceneStore, Shape, ShapeKind};

const BUILTIN: [&str; 3] = [
    include_str!("../presets/main.json"),
    include_str!("../presets/snowman.json"),
    include_str!("../presets/carved.json"),
];

/// A complete scene: the three shape lists and the settings to render them with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePreset {
    pub name: String,
    #[serde(default)]
    pub spheres: Vec<Shape>,
    #[serde(default)]
    pub boxes: Vec<Shape>,
    #[serde(default)]
    pub toruses: Vec<Shape>,
    #[serde(default)]
    pub settings: RenderSettings,
}

impl ScenePreset {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshots a live scene so it can be written out and loaded back later.
    #[must_use]
    pub fn capture(name: impl Into<String>, store: &SceneStore, settings: &RenderSettings) -> Self {
        Self {
            name: name.into(),
            spheres: store.shapes(ShapeKind::Sphere).to_vec(),
            boxes: store.shapes(ShapeKind::Box).to_vec(),
            toruses: store.shapes(ShapeKind::Torus).to_vec(),
            settings: settings.clone(),
        }
    }
}

/// How a caller names a preset: by its name or by its position in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRef {
    Name(String),
    Index(usize),
}

impl FromStr for SceneRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<usize>()
            .map_or_else(|_| Self::Name(s.to_owned()), Self::Index))
    }
}

impl fmt::Display for SceneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: Vec<ScenePreset>,
}

impl PresetLibrary {
    /// The scenes compiled into the binary.
    pub fn builtin() -> Result<Self, SceneError> {
        let mut library = Self::default();
        for json in BUILTIN {
            library.insert(ScenePreset::from_json(json)?);
        }
        Ok(library)
    }

    /// Adds a preset, replacing any existing one with the same name
    /// (names compare case-insensitively).
    pub fn insert(&mut self, preset: ScenePreset) {
        match self.position(&preset.name) {
            Some(slot) => self.presets[slot] = preset,
            None => self.presets.push(preset),
        }
    }

    /// Loads every `*.json` file in `dir`, in file-name order. Returns how
    /// many presets were read.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, SceneError> {
        let io_error = |source| SceneError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let json = fs::read_to_string(path).map_err(|source| SceneError::Io {
                path: path.clone(),
                source,
            })?;
            let preset = ScenePreset::from_json(&json)?;
            debug!(name = %preset.name, path = %path.display(), "loaded scene preset");
            self.insert(preset);
        }
        info!(count = paths.len(), dir = %dir.display(), "scene presets loaded");
        Ok(paths.len())
    }

    pub fn get(&self, scene: &SceneRef) -> Result<&ScenePreset, SceneError> {
        let found = match scene {
            SceneRef::Name(name) => self.position(name).map(|slot| &self.presets[slot]),
            SceneRef::Index(index) => self.presets.get(*index),
        };
        found.ok_or_else(|| SceneError::UnknownPreset(scene.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|preset| preset.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.presets
            .iter()
            .position(|preset| preset.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_ref_parses_indices_and_names() {
        assert_eq!("2".parse::<SceneRef>().unwrap(), SceneRef::Index(2));
        assert_eq!(
            "snowman".parse::<SceneRef>().unwrap(),
            SceneRef::Name("snowman".into())
        );
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut library = PresetLibrary::default();
        let mut preset = ScenePreset::capture("Demo", &SceneStore::default(), &RenderSettings::default());
        library.insert(preset.clone());
        preset.name = "demo".into();
        preset.settings.mandelbulb = true;
        library.insert(preset);

        assert_eq!(library.len(), 1);
        let stored = library.get(&SceneRef::Name("DEMO".into())).unwrap();
        assert!(stored.settings.mandelbulb);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let library = PresetLibrary::default();
        assert!(matches!(
            library.get(&SceneRef::Index(0)),
            Err(SceneError::UnknownPreset(name)) if name == "#0"
        ));
    }
}
