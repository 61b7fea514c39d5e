//! Spatial hash broad phase
//!
//! Entities are bucketed into fixed-size grid cells keyed by
//! `floor(position / cell_size)`. A circle is inserted into every cell its
//! bounding box overlaps, so two circles can only collide if they share a
//! cell. Candidate pairs are deduplicated by key pair. Callers still run the
//! exact narrow-phase test: the grid is a conservative over-approximation.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::entity::EntityKey;

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<EntityKey>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    /// Compute grid cell coordinates for a world position
    #[inline]
    fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Cells overlapped by a circle's bounding box
    fn cells_for(&self, pos: Vec2, radius: f32) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (x0, y0) = self.cell_of(pos - Vec2::splat(radius));
        let (x1, y1) = self.cell_of(pos + Vec2::splat(radius));
        (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| (x, y)))
    }

    /// Clear all buckets, keeping allocations
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.cells.retain(|_, v| !v.is_empty());
    }

    pub fn insert(&mut self, key: EntityKey, pos: Vec2, radius: f32) {
        for cell in self.cells_for(pos, radius) {
            self.cells.entry(cell).or_default().push(key);
        }
    }

    /// Build a grid from `(key, center, radius)` triples
    pub fn build(cell_size: f32, items: impl IntoIterator<Item = (EntityKey, Vec2, f32)>) -> Self {
        let mut grid = Self::new(cell_size);
        for (key, pos, radius) in items {
            grid.insert(key, pos, radius);
        }
        grid
    }

    /// Keys sharing any cell with the given circle, sorted and deduplicated
    pub fn query(&self, pos: Vec2, radius: f32) -> Vec<EntityKey> {
        let mut found: Vec<EntityKey> = self
            .cells_for(pos, radius)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Every unordered pair that shares at least one cell, in stable order
    pub fn potential_collisions(&self) -> Vec<(EntityKey, EntityKey)> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for bucket in self.cells.values() {
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    if a == b {
                        continue;
                    }
                    let pair = if a < b { (a, b) } else { (b, a) };
                    if seen.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
        }
        // HashMap iteration order is unspecified; keep resolution order stable
        pairs.sort_unstable();
        pairs
    }
}
