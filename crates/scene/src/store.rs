//! Fixed-capacity, kind-partitioned shape storage.

use tracing::debug;

use crate::{SceneError, Shape, ShapeKind};

pub const MAX_SPHERES: usize = 20;
pub const MAX_BOXES: usize = 20;
pub const MAX_TORUSES: usize = 20;

/// Per-kind capacity. Device buffers are sized from [`SceneCapacity::total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCapacity {
    pub spheres: usize,
    pub boxes: usize,
    pub toruses: usize,
}

impl SceneCapacity {
    #[must_use]
    pub const fn for_kind(&self, kind: ShapeKind) -> usize {
        match kind {
            ShapeKind::Sphere => self.spheres,
            ShapeKind::Box => self.boxes,
            ShapeKind::Torus => self.toruses,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.spheres + self.boxes + self.toruses
    }
}

impl Default for SceneCapacity {
    fn default() -> Self {
        Self {
            spheres: MAX_SPHERES,
            boxes: MAX_BOXES,
            toruses: MAX_TORUSES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeCounts {
    pub spheres: usize,
    pub boxes: usize,
    pub toruses: usize,
}

impl ShapeCounts {
    #[must_use]
    pub const fn for_kind(&self, kind: ShapeKind) -> usize {
        match kind {
            ShapeKind::Sphere => self.spheres,
            ShapeKind::Box => self.boxes,
            ShapeKind::Torus => self.toruses,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.spheres + self.boxes + self.toruses
    }
}

/// The authoritative scene: three insertion-ordered collections.
///
/// Every mutation keeps each collection within its capacity and keeps every
/// shape in the collection of its own kind.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    capacity: SceneCapacity,
    spheres: Vec<Shape>,
    boxes: Vec<Shape>,
    toruses: Vec<Shape>,
}

impl SceneStore {
    #[must_use]
    pub fn new(capacity: SceneCapacity) -> Self {
        Self {
            capacity,
            spheres: Vec::with_capacity(capacity.spheres),
            boxes: Vec::with_capacity(capacity.boxes),
            toruses: Vec::with_capacity(capacity.toruses),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> SceneCapacity {
        self.capacity
    }

    #[must_use]
    pub fn shapes(&self, kind: ShapeKind) -> &[Shape] {
        match kind {
            ShapeKind::Sphere => &self.spheres,
            ShapeKind::Box => &self.boxes,
            ShapeKind::Torus => &self.toruses,
        }
    }

    fn shapes_mut(&mut self, kind: ShapeKind) -> &mut Vec<Shape> {
        match kind {
            ShapeKind::Sphere => &mut self.spheres,
            ShapeKind::Box => &mut self.boxes,
            ShapeKind::Torus => &mut self.toruses,
        }
    }

    #[must_use]
    pub fn counts(&self) -> ShapeCounts {
        ShapeCounts {
            spheres: self.spheres.len(),
            boxes: self.boxes.len(),
            toruses: self.toruses.len(),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts().total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All shapes in buffer order: spheres, then boxes, then toruses.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.spheres
            .iter()
            .chain(self.boxes.iter())
            .chain(self.toruses.iter())
    }

    /// Appends a shape to its kind's collection and returns its index there.
    pub fn push(&mut self, shape: Shape) -> Result<usize, SceneError> {
        let kind = shape.kind();
        let capacity = self.capacity.for_kind(kind);
        let shapes = self.shapes_mut(kind);
        if shapes.len() >= capacity {
            return Err(SceneError::CapacityExceeded { kind, capacity });
        }
        shapes.push(shape);
        Ok(shapes.len() - 1)
    }

    #[must_use]
    pub fn get(&self, kind: ShapeKind, index: usize) -> Option<&Shape> {
        self.shapes(kind).get(index)
    }

    pub fn get_mut(&mut self, kind: ShapeKind, index: usize) -> Result<&mut Shape, SceneError> {
        self.shapes_mut(kind)
            .get_mut(index)
            .ok_or(SceneError::IndexOutOfRange { kind, index })
    }

    /// Removes a shape; later shapes of the same kind shift down by one.
    pub fn remove(&mut self, kind: ShapeKind, index: usize) -> Result<Shape, SceneError> {
        let shapes = self.shapes_mut(kind);
        if index >= shapes.len() {
            return Err(SceneError::IndexOutOfRange { kind, index });
        }
        Ok(shapes.remove(index))
    }

    /// Swaps in three new collections wholesale.
    ///
    /// Nothing is changed unless every list fits its capacity and holds only
    /// shapes of its kind.
    pub fn replace(
        &mut self,
        spheres: Vec<Shape>,
        boxes: Vec<Shape>,
        toruses: Vec<Shape>,
    ) -> Result<(), SceneError> {
        for (kind, shapes) in ShapeKind::ALL.into_iter().zip([&spheres, &boxes, &toruses]) {
            let capacity = self.capacity.for_kind(kind);
            if shapes.len() > capacity {
                return Err(SceneError::CapacityExceeded { kind, capacity });
            }
            if let Some(stray) = shapes.iter().find(|shape| shape.kind() != kind) {
                return Err(SceneError::KindMismatch {
                    expected: kind,
                    found: stray.kind(),
                });
            }
        }
        self.spheres = spheres;
        self.boxes = boxes;
        self.toruses = toruses;
        debug!(counts = ?self.counts(), "scene store replaced");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.spheres.clear();
        self.boxes.clear();
        self.toruses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SceneStore {
        SceneStore::new(SceneCapacity {
            spheres: 2,
            boxes: 1,
            toruses: 1,
        })
    }

    #[test]
    fn push_returns_partition_index() {
        let mut store = small();
        assert_eq!(store.push(Shape::template(ShapeKind::Box)).unwrap(), 0);
        assert_eq!(store.push(Shape::template(ShapeKind::Sphere)).unwrap(), 0);
        assert_eq!(store.push(Shape::template(ShapeKind::Sphere)).unwrap(), 1);
        assert_eq!(
            store.counts(),
            ShapeCounts {
                spheres: 2,
                boxes: 1,
                toruses: 0
            }
        );
        assert_eq!(store.total(), 3);
    }

    #[test]
    fn push_rejects_overflow() {
        let mut store = small();
        store.push(Shape::template(ShapeKind::Torus)).unwrap();
        let err = store.push(Shape::template(ShapeKind::Torus)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::CapacityExceeded {
                kind: ShapeKind::Torus,
                capacity: 1
            }
        ));
        assert_eq!(store.shapes(ShapeKind::Torus).len(), 1);
    }

    #[test]
    fn iteration_concatenates_by_kind() {
        let mut store = small();
        store.push(Shape::template(ShapeKind::Torus)).unwrap();
        store.push(Shape::template(ShapeKind::Box)).unwrap();
        store.push(Shape::template(ShapeKind::Sphere)).unwrap();
        let kinds: Vec<_> = store.iter().map(Shape::kind).collect();
        assert_eq!(kinds, ShapeKind::ALL);
    }

    #[test]
    fn remove_shifts_later_shapes() {
        let mut store = small();
        store.push(Shape::template(ShapeKind::Sphere)).unwrap();
        let mut second = Shape::template(ShapeKind::Sphere);
        second.transform.x = 4.0;
        store.push(second.clone()).unwrap();

        store.remove(ShapeKind::Sphere, 0).unwrap();
        assert_eq!(store.get(ShapeKind::Sphere, 0), Some(&second));
        assert!(matches!(
            store.remove(ShapeKind::Sphere, 1),
            Err(SceneError::IndexOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn replace_is_all_or_nothing() {
        let mut store = small();
        store.push(Shape::template(ShapeKind::Box)).unwrap();

        let too_many = vec![Shape::template(ShapeKind::Sphere); 3];
        assert!(store.replace(too_many, Vec::new(), Vec::new()).is_err());
        assert_eq!(store.counts().boxes, 1);

        let wrong_kind = vec![Shape::template(ShapeKind::Torus)];
        assert!(matches!(
            store.replace(wrong_kind, Vec::new(), Vec::new()),
            Err(SceneError::KindMismatch {
                expected: ShapeKind::Sphere,
                found: ShapeKind::Torus
            })
        ));
        assert_eq!(store.counts().boxes, 1);

        store
            .replace(vec![Shape::template(ShapeKind::Sphere)], Vec::new(), Vec::new())
            .unwrap();
        assert_eq!(
            store.counts(),
            ShapeCounts {
                spheres: 1,
                boxes: 0,
                toruses: 0
            }
        );
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut store = SceneStore::new(SceneCapacity::default());
        store.push(Shape::template(ShapeKind::Sphere)).unwrap();
        store.get_mut(ShapeKind::Sphere, 0).unwrap().transform.y = 3.0;
        assert_eq!(store.get(ShapeKind::Sphere, 0).unwrap().transform.y, 3.0);
        assert!(store.get_mut(ShapeKind::Box, 0).is_err());
    }
}
