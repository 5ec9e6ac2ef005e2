//! Uniform spatial grid for broad-phase collision queries
//!
//! Rebuilt from scratch each tick. An entity is bucketed into every cell its
//! bounding box touches, so entities larger than a cell still work. Queries
//! return each candidate once, in insertion order.

use std::collections::HashMap;

use super::collision::{Aabb, EntityRef};

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    entries: Vec<(EntityRef, Aabb)>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Drop every entry; cell vectors keep their allocations
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn cell_of(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    /// Inclusive cell range covered by a box
    fn cell_range(&self, bounds: &Aabb) -> (i32, i32, i32, i32) {
        let max = bounds.max();
        (
            self.cell_of(bounds.min.x),
            self.cell_of(bounds.min.y),
            self.cell_of(max.x),
            self.cell_of(max.y),
        )
    }

    pub fn insert(&mut self, entity: EntityRef, bounds: Aabb) {
        let slot = self.entries.len();
        self.entries.push((entity, bounds));

        let (x0, y0, x1, y1) = self.cell_range(&bounds);
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                self.cells.entry((cx, cy)).or_default().push(slot);
            }
        }
    }

    /// Candidates whose cells overlap `bounds`. Broad phase only: callers
    /// still run the exact test.
    pub fn query_near(&self, bounds: &Aabb) -> Vec<EntityRef> {
        let (x0, y0, x1, y1) = self.cell_range(bounds);
        let mut slots = Vec::new();
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    slots.extend_from_slice(bucket);
                }
            }
        }
        slots.sort_unstable();
        slots.dedup();
        slots.into_iter().map(|slot| self.entries[slot].0).collect()
    }
}
