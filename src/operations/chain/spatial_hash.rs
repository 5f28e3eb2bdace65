use std::collections::HashMap;

use crate::math::Point2;

/// Uniform grid over points with cells one tolerance wide.
///
/// Any point within `cell` of a query point lies in the query's cell or
/// one of its eight neighbors.
#[derive(Debug)]
pub(super) struct SpatialHash {
    cell: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialHash {
    pub(super) fn new(cell: f64) -> Self {
        Self {
            cell,
            buckets: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn key(&self, p: &Point2) -> (i64, i64) {
        // Float-to-int casts saturate, so far-out coordinates stay valid keys.
        ((p.x / self.cell).floor() as i64, (p.y / self.cell).floor() as i64)
    }

    pub(super) fn insert(&mut self, p: &Point2, index: usize) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(index);
    }

    /// Indices stored in the 3×3 block of cells around `p`, ascending.
    pub(super) fn candidates(&self, p: &Point2) -> Vec<usize> {
        let (kx, ky) = self.key(p);
        let mut out = Vec::new();
        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                let key = (kx.saturating_add(dx), ky.saturating_add(dy));
                if let Some(bucket) = self.buckets.get(&key) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
