//! Everything a tick reads: scene, settings, camera and frame geometry
//!
//! The frame loop owns exactly one [`FrameContext`]; commands are the only
//! way to change it from outside.

use scene::{
    PresetLibrary, RenderSettings, SceneCapacity, SceneError, ScenePreset, SceneRef, SceneStore,
    Shape, ShapeKind,
};
use tracing::{debug, info};

use crate::camera::{Camera, CameraController};
use crate::commands::{Command, Effect};
use crate::gpu_types::Uniforms;

pub struct FrameContext {
    store: SceneStore,
    settings: RenderSettings,
    camera: Camera,
    controller: CameraController,
    presets: PresetLibrary,
    scene: SceneRef,
    scene_name: String,
    resolution: u32,
    shapes_dirty: bool,
}

impl FrameContext {
    /// Builds a context with `scene` loaded from `presets`.
    pub fn new(
        presets: PresetLibrary,
        scene: SceneRef,
        resolution: u32,
        capacity: SceneCapacity,
        camera_speed: f32,
    ) -> Result<Self, SceneError> {
        let mut context = Self {
            store: SceneStore::new(capacity),
            settings: RenderSettings::default(),
            camera: Camera::default(),
            controller: CameraController::new(camera_speed),
            presets,
            scene: scene.clone(),
            scene_name: String::new(),
            resolution,
            shapes_dirty: true,
        };
        context.load(&scene)?;
        Ok(context)
    }

    /// Applies one command. A rejected command leaves the context untouched.
    pub fn apply(&mut self, command: Command) -> Result<Effect, SceneError> {
        match command {
            Command::AddShape(kind) => {
                self.insert(Shape::template(kind))?;
            }
            Command::InsertShape(shape) => {
                self.insert(shape)?;
            }
            Command::RemoveShape { kind, index } => {
                self.store.remove(kind, index)?;
                self.shapes_dirty = true;
            }
            Command::SetShapeField { kind, index, field } => {
                field.apply(self.store.get_mut(kind, index)?)?;
                self.shapes_dirty = true;
            }
            Command::LoadScene(scene) => self.load(&scene)?,
            Command::NewScene => {
                self.store.replace(
                    vec![Shape::template(ShapeKind::Sphere)],
                    Vec::new(),
                    Vec::new(),
                )?;
                self.shapes_dirty = true;
                info!("started a new scene");
            }
            Command::ResetScene => {
                let scene = self.scene.clone();
                self.load(&scene)?;
            }
            Command::ResetCamera => self.camera.reset(),
            Command::SetCameraVelocity {
                motion,
                axis,
                direction,
            } => self.controller.set_velocity(motion, axis, direction),
            Command::SetCameraSpeed(speed) => self.controller.set_speed(speed),
            Command::SetSetting(setting) => {
                if !self.settings.apply(setting) {
                    debug!(?setting, "setting addressed nothing");
                }
            }
            Command::SaveImage => return Ok(Effect::SaveImage),
            Command::ExportScene => {
                let preset = ScenePreset::capture(&self.scene_name, &self.store, &self.settings);
                return Ok(Effect::ExportScene(Box::new(preset)));
            }
        }
        Ok(Effect::None)
    }

    fn insert(&mut self, shape: Shape) -> Result<(), SceneError> {
        let kind = shape.kind();
        let index = self.store.push(shape)?;
        self.shapes_dirty = true;
        debug!(%kind, index, "shape added");
        Ok(())
    }

    /// Full replacement of store and settings from a preset.
    fn load(&mut self, scene: &SceneRef) -> Result<(), SceneError> {
        let preset = self.presets.get(scene)?.clone();
        self.store
            .replace(preset.spheres, preset.boxes, preset.toruses)?;
        self.settings = preset.settings;
        self.scene = scene.clone();
        self.scene_name = preset.name;
        self.shapes_dirty = true;
        info!(scene = %self.scene_name, counts = ?self.store.counts(), "scene loaded");
        Ok(())
    }

    /// The uniform block for a tick starting `time` seconds into the run.
    pub fn uniforms(&self, time: f32) -> Uniforms {
        Uniforms::new(
            time,
            self.resolution,
            self.store.counts(),
            &self.settings,
            &self.camera,
        )
    }

    /// Returns whether the shape buffers need uploading and clears the flag.
    pub fn take_shapes_dirty(&mut self) -> bool {
        std::mem::take(&mut self.shapes_dirty)
    }

    /// Integrates the camera over `dt` seconds.
    pub fn advance_camera(&mut self, dt: f32) {
        self.controller.update_camera(&mut self.camera, dt);
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ShapeField;
    use glam::Vec3;

    fn context() -> FrameContext {
        FrameContext::new(
            PresetLibrary::builtin().unwrap(),
            SceneRef::Name("main".into()),
            256,
            SceneCapacity::default(),
            5.0,
        )
        .unwrap()
    }

    #[test]
    fn starts_dirty_then_clears() {
        let mut context = context();
        assert!(context.take_shapes_dirty());
        assert!(!context.take_shapes_dirty());
        context.apply(Command::AddShape(ShapeKind::Torus)).unwrap();
        assert!(context.take_shapes_dirty());
    }

    #[test]
    fn rejected_edit_changes_nothing() {
        let mut context = context();
        context.take_shapes_dirty();
        let before = context.store().counts();
        let err = context
            .apply(Command::SetShapeField {
                kind: ShapeKind::Box,
                index: 99,
                field: ShapeField::Transform(Vec3::ONE),
            })
            .unwrap_err();
        assert!(matches!(err, SceneError::IndexOutOfRange { index: 99, .. }));
        assert_eq!(context.store().counts(), before);
        assert!(!context.take_shapes_dirty());
    }

    #[test]
    fn reset_scene_discards_edits() {
        let mut context = context();
        let original = context.store().counts();
        context.apply(Command::AddShape(ShapeKind::Sphere)).unwrap();
        assert_ne!(context.store().counts(), original);
        context.apply(Command::ResetScene).unwrap();
        assert_eq!(context.store().counts(), original);
        assert_eq!(context.scene_name(), "Main");
    }

    #[test]
    fn new_scene_is_a_single_sphere() {
        let mut context = context();
        context.apply(Command::NewScene).unwrap();
        assert_eq!(context.store().total(), 1);
        assert_eq!(
            context.store().get(ShapeKind::Sphere, 0),
            Some(&Shape::template(ShapeKind::Sphere))
        );
    }

    #[test]
    fn export_snapshots_the_live_scene() {
        let mut context = context();
        context.apply(Command::AddShape(ShapeKind::Box)).unwrap();
        let Effect::ExportScene(preset) = context.apply(Command::ExportScene).unwrap() else {
            panic!("export should produce a snapshot");
        };
        assert_eq!(preset.name, "Main");
        assert_eq!(preset.boxes.len(), context.store().counts().boxes);
    }
}
