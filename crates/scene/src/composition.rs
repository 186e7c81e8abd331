//! Order in which the render kernel folds shapes together.

use crate::{SceneStore, ShapeKind};

/// One shape's slot in the composition sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionEntry {
    pub kind: ShapeKind,
    /// Position inside the shape's own kind collection.
    pub index: u32,
    /// The shape's operator selector, the sort key.
    pub operator: f32,
}

impl CompositionEntry {
    /// `(kindId, index, selector, 0)` as stored in the shape-info buffer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_array(self) -> [f32; 4] {
        [self.kind.id() as f32, self.index as f32, self.operator, 0.0]
    }
}

/// Lists every shape, spheres then boxes then toruses, and stable-sorts the
/// list ascending by operator selector.
///
/// Selectors compare under IEEE total ordering with `-0.0` folded into
/// `0.0`, so NaN selectors land at the ends instead of poisoning the sort.
#[must_use]
pub fn composition_order(store: &SceneStore) -> Vec<CompositionEntry> {
    let mut entries: Vec<CompositionEntry> = ShapeKind::ALL
        .into_iter()
        .flat_map(|kind| {
            store
                .shapes(kind)
                .iter()
                .zip(0u32..)
                .map(move |(shape, index)| CompositionEntry {
                    kind,
                    index,
                    operator: shape.op.selector,
                })
        })
        .collect();
    entries.sort_by(|a, b| sort_key(a.operator).total_cmp(&sort_key(b.operator)));
    entries
}

fn sort_key(selector: f32) -> f32 {
    if selector == 0.0 {
        0.0
    } else {
        selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operator, SceneCapacity, Shape};

    fn with_selector(kind: ShapeKind, selector: f32) -> Shape {
        Shape::template(kind).with_op(Operator::new(selector, 0.1))
    }

    fn store_of(shapes: &[(ShapeKind, f32)]) -> SceneStore {
        let mut store = SceneStore::new(SceneCapacity::default());
        for &(kind, selector) in shapes {
            store.push(with_selector(kind, selector)).unwrap();
        }
        store
    }

    #[test]
    fn empty_store_has_no_entries() {
        assert!(composition_order(&SceneStore::default()).is_empty());
    }

    #[test]
    fn sphere_union_then_box_subtract() {
        let store = store_of(&[(ShapeKind::Sphere, 0.0), (ShapeKind::Box, 1.0)]);
        let arrays: Vec<_> = composition_order(&store)
            .into_iter()
            .map(CompositionEntry::to_array)
            .collect();
        assert_eq!(arrays, vec![[0.0, 0.0, 0.0, 0.0], [1.0, 0.0, 1.0, 0.0]]);
    }

    #[test]
    fn sorted_ascending_and_stable() {
        let store = store_of(&[
            (ShapeKind::Sphere, 2.0),
            (ShapeKind::Sphere, 0.0),
            (ShapeKind::Box, 1.0),
            (ShapeKind::Box, 0.0),
            (ShapeKind::Torus, 0.0),
            (ShapeKind::Torus, 1.0),
        ]);
        let order: Vec<_> = composition_order(&store)
            .into_iter()
            .map(|entry| (entry.kind, entry.index, entry.operator))
            .collect();
        assert_eq!(
            order,
            vec![
                (ShapeKind::Sphere, 1, 0.0),
                (ShapeKind::Box, 1, 0.0),
                (ShapeKind::Torus, 0, 0.0),
                (ShapeKind::Box, 0, 1.0),
                (ShapeKind::Torus, 1, 1.0),
                (ShapeKind::Sphere, 0, 2.0),
            ]
        );
    }

    #[test]
    fn negative_zero_keeps_insertion_order() {
        let store = store_of(&[(ShapeKind::Sphere, 0.0), (ShapeKind::Sphere, -0.0)]);
        let indices: Vec<_> = composition_order(&store).iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn nan_selector_does_not_break_the_sort() {
        let store = store_of(&[
            (ShapeKind::Sphere, f32::NAN),
            (ShapeKind::Sphere, 1.0),
            (ShapeKind::Sphere, 0.0),
        ]);
        let indices: Vec<_> = composition_order(&store).iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }
}
