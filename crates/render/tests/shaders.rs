use std::fs;
use std::path::Path;

use render::pipeline::BLIT_WGSL;

fn validate(shader_path_str: &str) -> naga::Module {
    let shader_path = Path::new(shader_path_str);
    let shader_source = match fs::read_to_string(shader_path) {
        Ok(s) => s,
        Err(e) => panic!("Failed to read shader file {shader_path:?}: {e}"),
    };
    let module = match naga::front::wgsl::parse_str(&shader_source) {
        Ok(m) => m,
        Err(e) => panic!(
            "WGSL parsing error in {shader_path:?}:\n{}",
            e.emit_to_string(&shader_source)
        ),
    };
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!(
            "WGSL validation error in {shader_path:?}:\n{}",
            e.emit_to_string(&shader_source)
        );
    }
    println!("Successfully parsed and validated {shader_path:?}");
    module
}

#[test]
fn blit_shader_validates() {
    let module = validate("../../shaders/blit.wgsl");
    let stages: Vec<(&str, naga::ShaderStage)> = module
        .entry_points
        .iter()
        .map(|entry| (entry.name.as_str(), entry.stage))
        .collect();
    assert_eq!(
        stages,
        vec![
            ("vs_main", naga::ShaderStage::Vertex),
            ("fs_main", naga::ShaderStage::Fragment)
        ]
    );
}

#[test]
fn embedded_blit_matches_file() {
    let on_disk = fs::read_to_string("../../shaders/blit.wgsl").unwrap();
    assert_eq!(on_disk, BLIT_WGSL);
}

#[test]
fn embedded_kernels_validate() {
    validate("../../shaders/raymarch.wgsl");
    let source = render::pipeline::load_raymarch_source(None).unwrap();
    assert!(source.contains("fn preprocess"));
    assert!(source.contains("fn render"));
}

#[test]
fn missing_shader_dir_is_an_error() {
    let err = render::pipeline::load_raymarch_source(Some(Path::new("/nonexistent/shaders")))
        .unwrap_err();
    println!("{err:#}");
    assert!(format!("{err:#}").contains("raymarch.wgsl"));
}
