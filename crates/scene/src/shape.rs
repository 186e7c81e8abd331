//! The shape model: primitive geometry plus placement, CSG operator, color
//! and animation.

use std::fmt;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::{Rgb, SceneError};

/// The three primitive families. The discriminant is the `kindId` the
/// shaders see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Sphere,
    Box,
    Torus,
}

impl ShapeKind {
    /// Kinds in buffer concatenation order.
    pub const ALL: [Self; 3] = [Self::Sphere, Self::Box, Self::Torus];

    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Sphere => 0,
            Self::Box => 1,
            Self::Torus => 2,
        }
    }

    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Sphere),
            1 => Some(Self::Box),
            2 => Some(Self::Torus),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Torus => "torus",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific size parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Sphere {
        radius: f32,
    },
    Box {
        half_extents: Vec3,
        #[serde(default)]
        rounding: f32,
    },
    Torus {
        major: f32,
        minor: f32,
    },
}

impl Primitive {
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
            Self::Torus { .. } => ShapeKind::Torus,
        }
    }

    /// The four-wide size slot as the kernels read it.
    #[must_use]
    pub fn size(&self) -> [f32; 4] {
        match *self {
            Self::Sphere { radius } => [radius, 0.0, 0.0, 0.0],
            Self::Box {
                half_extents,
                rounding,
            } => [half_extents.x, half_extents.y, half_extents.z, rounding],
            Self::Torus { major, minor } => [major, minor, 0.0, 0.0],
        }
    }
}

/// CSG operator: `selector` picks the combination (0 union, 1 subtract,
/// 2 intersect; anything else folds as a union) and `params[0]` is the
/// smoothing radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Operator {
    pub selector: f32,
    #[serde(default)]
    pub params: [f32; 3],
}

impl Operator {
    pub const UNION: f32 = 0.0;
    pub const SUBTRACT: f32 = 1.0;
    pub const INTERSECT: f32 = 2.0;

    #[must_use]
    pub const fn new(selector: f32, smoothing: f32) -> Self {
        Self {
            selector,
            params: [smoothing, 0.0, 0.0],
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.selector, self.params[0], self.params[1], self.params[2]]
    }
}

/// A single implicit primitive in the scene.
///
/// The primitive is private so a shape never changes kind once it has been
/// created; use [`Shape::set_primitive`] to resize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    primitive: Primitive,
    pub transform: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub op: Operator,
    pub color: Rgb,
    /// Oscillation amplitude (xyz) and angular frequency (w) of the position.
    #[serde(default)]
    pub animate_transform: Vec4,
    /// Spin axis rates (xyz) and overall speed (w) of the rotation.
    #[serde(default)]
    pub animate_rotation: Vec4,
}

impl Shape {
    #[must_use]
    pub fn new(primitive: Primitive, transform: Vec3, color: Rgb) -> Self {
        Self {
            primitive,
            transform,
            rotation: Vec3::ZERO,
            op: Operator::default(),
            color,
            animate_transform: Vec4::ZERO,
            animate_rotation: Vec4::ZERO,
        }
    }

    /// The shape a fresh "add" command inserts for `kind`.
    #[must_use]
    pub fn template(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Sphere => Self::new(
                Primitive::Sphere { radius: 1.0 },
                Vec3::new(0.0, 1.0, 0.0),
                Rgb::RED,
            )
            .with_op(Operator::new(Operator::UNION, 0.2)),
            ShapeKind::Box => Self::new(
                Primitive::Box {
                    half_extents: Vec3::splat(0.5),
                    rounding: 0.1,
                },
                Vec3::new(0.0, 2.0, 0.0),
                Rgb::BLUE,
            )
            .with_op(Operator::new(Operator::UNION, 0.01)),
            ShapeKind::Torus => Self::new(
                Primitive::Torus {
                    major: 0.5,
                    minor: 0.5,
                },
                Vec3::new(0.0, 2.0, 0.0),
                Rgb::BLUE,
            )
            .with_op(Operator::new(Operator::UNION, 0.01)),
        }
    }

    #[must_use]
    pub fn with_op(mut self, op: Operator) -> Self {
        self.op = op;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, transform: Vec4, rotation: Vec4) -> Self {
        self.animate_transform = transform;
        self.animate_rotation = rotation;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.primitive.kind()
    }

    #[must_use]
    pub const fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Replaces the size parameters. The new primitive must be of the same kind.
    pub fn set_primitive(&mut self, primitive: Primitive) -> Result<(), SceneError> {
        if primitive.kind() != self.kind() {
            return Err(SceneError::KindMismatch {
                expected: self.kind(),
                found: primitive.kind(),
            });
        }
        self.primitive = primitive;
        Ok(())
    }
}
