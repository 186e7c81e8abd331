//! Edits the outside world can make to a running frame loop
//!
//! Keyboard handling, the CLI and tests all speak this vocabulary instead of
//! reaching into renderer state.

use glam::{Vec3, Vec4};
use scene::{Operator, Primitive, Rgb, SceneError, SceneRef, Setting, Shape, ShapeKind};

use crate::camera::{Axis, Direction, Motion};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Appends the template shape of a kind
    AddShape(ShapeKind),
    /// Appends a fully specified shape
    InsertShape(Shape),
    RemoveShape { kind: ShapeKind, index: usize },
    SetShapeField {
        kind: ShapeKind,
        index: usize,
        field: ShapeField,
    },
    /// Replaces the scene with a preset
    LoadScene(SceneRef),
    /// One default sphere and nothing else
    NewScene,
    /// Reloads the current preset, discarding edits
    ResetScene,
    ResetCamera,
    SetCameraVelocity {
        motion: Motion,
        axis: Axis,
        direction: Direction,
    },
    SetCameraSpeed(f32),
    SetSetting(Setting),
    SaveImage,
    ExportScene,
}

/// One editable field of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeField {
    Transform(Vec3),
    Primitive(Primitive),
    Rotation(Vec3),
    Op(Operator),
    Color(Rgb),
    AnimateTransform(Vec4),
    AnimateRotation(Vec4),
}

impl ShapeField {
    /// Writes the field into `shape`. Only a primitive of another kind is
    /// refused.
    pub fn apply(self, shape: &mut Shape) -> Result<(), SceneError> {
        match self {
            Self::Transform(transform) => shape.transform = transform,
            Self::Primitive(primitive) => shape.set_primitive(primitive)?,
            Self::Rotation(rotation) => shape.rotation = rotation,
            Self::Op(op) => shape.op = op,
            Self::Color(color) => shape.color = color,
            Self::AnimateTransform(animation) => shape.animate_transform = animation,
            Self::AnimateRotation(animation) => shape.animate_rotation = animation,
        }
        Ok(())
    }
}

/// Work a command leaves for the owner of the GPU or the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Read back the frame buffer after the next completed tick
    SaveImage,
    /// Write this snapshot out
    ExportScene(Box<scene::ScenePreset>),
}
