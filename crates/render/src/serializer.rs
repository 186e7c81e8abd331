//! Scene serialization into the kernels' buffers
//!
//! Converts the scene store into `ShapeGpu` / `ShapeInfoGpu` records and the
//! frame state into `Uniforms`, then hands the bytes to a backend.

use compute::{BufferSlot, ComputeBackend};
use scene::{composition_order, SceneCapacity, SceneStore};
use tracing::trace;

use crate::gpu_types::{ShapeGpu, ShapeInfoGpu, Uniforms};

/// Shape records in buffer order: spheres, boxes, toruses.
pub fn pack_shapes(store: &SceneStore) -> Vec<ShapeGpu> {
    store.iter().map(ShapeGpu::from).collect()
}

/// Composition steps in the order the render kernel folds them.
pub fn pack_shape_infos(store: &SceneStore) -> Vec<ShapeInfoGpu> {
    composition_order(store)
        .into_iter()
        .map(ShapeInfoGpu::from)
        .collect()
}

/// Scene buffer writer
///
/// Knows the capacity the device buffers were allocated for.
pub struct SceneBuffers {
    capacity: SceneCapacity,
}

impl SceneBuffers {
    pub fn new(capacity: SceneCapacity) -> Self {
        Self { capacity }
    }

    pub fn write_uniforms<B: ComputeBackend + ?Sized>(&self, backend: &mut B, uniforms: &Uniforms) {
        backend.write_buffer(BufferSlot::Uniforms, bytemuck::bytes_of(uniforms));
    }

    /// Uploads shapes and their composition order. An empty scene writes
    /// nothing; the counts in the uniforms keep the kernels off the stale data.
    ///
    /// Returns the number of shapes written.
    pub fn write_shapes<B: ComputeBackend + ?Sized>(&self, backend: &mut B, store: &SceneStore) -> usize {
        debug_assert!(
            store.total() <= self.capacity.total(),
            "scene holds {} shapes but the buffers fit {}",
            store.total(),
            self.capacity.total()
        );
        let shapes = pack_shapes(store);
        if shapes.is_empty() {
            trace!("empty scene, shape buffers left as they are");
            return 0;
        }
        let infos = pack_shape_infos(store);
        backend.write_buffer(BufferSlot::Shapes, bytemuck::cast_slice(&shapes));
        backend.write_buffer(BufferSlot::ShapeInfo, bytemuck::cast_slice(&infos));
        trace!(shapes = shapes.len(), "shape buffers written");
        shapes.len()
    }
}
