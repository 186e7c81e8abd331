//! Scene data for the ray marcher.
//!
//! Shapes live in three fixed-capacity collections (one per primitive kind).
//! The composition order that the render kernel folds them in is derived
//! from the shapes' operator selectors, never stored.

pub mod color;
pub mod composition;
pub mod presets;
pub mod settings;
pub mod shape;
pub mod store;

mod error;

pub use color::Rgb;
pub use composition::{composition_order, CompositionEntry};
pub use error::SceneError;
pub use presets::{PresetLibrary, ScenePreset, SceneRef};
pub use settings::{Flag, RenderSettings, Setting};
pub use shape::{Operator, Primitive, Shape, ShapeKind};
pub use store::{SceneCapacity, SceneStore, ShapeCounts, MAX_BOXES, MAX_SPHERES, MAX_TORUSES};
