use std::fs;
use std::path::PathBuf;

use scene::{
    PresetLibrary, RenderSettings, SceneCapacity, SceneError, ScenePreset, SceneRef, SceneStore,
    Shape, ShapeKind,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scene-presets-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn builtin_presets_load_into_a_default_store() {
    let library = PresetLibrary::builtin().expect("built-in presets parse");
    let names: Vec<_> = library.names().collect();
    println!("built-in scenes: {names:?}");
    assert_eq!(names, ["Main", "Snowman", "Carved"]);

    for index in 0..library.len() {
        let preset = library.get(&SceneRef::Index(index)).unwrap().clone();
        let mut store = SceneStore::new(SceneCapacity::default());
        store
            .replace(preset.spheres, preset.boxes, preset.toruses)
            .unwrap_or_else(|e| panic!("preset #{index} does not fit: {e}"));
        assert!(!store.is_empty(), "preset #{index} should not be empty");
    }
}

#[test]
fn lookup_by_name_ignores_case() {
    let library = PresetLibrary::builtin().unwrap();
    let main = library.get(&"main".parse().unwrap()).unwrap();
    assert_eq!(main.name, "Main");
    assert!(matches!(
        library.get(&SceneRef::Name("nope".into())),
        Err(SceneError::UnknownPreset(_))
    ));
}

#[test]
fn exported_scene_loads_back_from_a_directory() {
    let mut store = SceneStore::new(SceneCapacity::default());
    store.push(Shape::template(ShapeKind::Sphere)).unwrap();
    store.push(Shape::template(ShapeKind::Torus)).unwrap();
    let mut settings = RenderSettings::default();
    settings.weird_scene = true;

    let exported = ScenePreset::capture("Exported", &store, &settings);
    let dir = scratch_dir("export");
    fs::write(dir.join("exported.json"), exported.to_json().unwrap()).unwrap();
    fs::write(dir.join("notes.txt"), "not a scene").unwrap();

    let mut library = PresetLibrary::builtin().unwrap();
    let loaded = library.load_dir(&dir).expect("directory loads");
    assert_eq!(loaded, 1, "only json files are read");
    assert_eq!(library.len(), 4);

    let back = library.get(&SceneRef::Name("exported".into())).unwrap();
    assert_eq!(back, &exported);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_preset_reports_parse_error() {
    let dir = scratch_dir("broken");
    fs::write(dir.join("broken.json"), r#"{ "name": "Broken", "spheres": [ { "primitive": { "kind": "cone" } } ] }"#).unwrap();

    let mut library = PresetLibrary::default();
    let err = library.load_dir(&dir).unwrap_err();
    println!("error: {err}");
    assert!(matches!(err, SceneError::Parse(_)));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_directory_reports_io_error() {
    let mut library = PresetLibrary::default();
    let err = library
        .load_dir(&std::env::temp_dir().join("scene-presets-does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, SceneError::Io { .. }));
}
