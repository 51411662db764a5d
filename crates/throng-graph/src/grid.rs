//! Uniform bucket grid over route-point positions.

use std::collections::HashMap;

use throng_core::{RoutePointId, Vec2};

type Cell = (i64, i64);

/// Buckets route points by square cell for nearest and radius queries.
#[derive(Clone, Debug)]
pub(crate) struct BucketGrid {
    cell_size: f64,
    buckets: HashMap<Cell, Vec<(RoutePointId, Vec2)>>,
    min_cell: Cell,
    max_cell: Cell,
}

impl BucketGrid {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            buckets: HashMap::new(),
            min_cell: (i64::MAX, i64::MAX),
            max_cell: (i64::MIN, i64::MIN),
        }
    }

    fn cell_of(&self, p: Vec2) -> Cell {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Nearest cell inside the occupied range.
    fn clamp(&self, cell: Cell) -> Cell {
        (
            cell.0.clamp(self.min_cell.0, self.max_cell.0),
            cell.1.clamp(self.min_cell.1, self.max_cell.1),
        )
    }

    pub(crate) fn insert(&mut self, id: RoutePointId, p: Vec2) {
        let cell = self.cell_of(p);
        self.min_cell = (self.min_cell.0.min(cell.0), self.min_cell.1.min(cell.1));
        self.max_cell = (self.max_cell.0.max(cell.0), self.max_cell.1.max(cell.1));
        self.buckets.entry(cell).or_default().push((id, p));
    }

    /// Entries within `radius` of `p`, unordered.
    pub(crate) fn within(&self, p: Vec2, radius: f64) -> Vec<(RoutePointId, Vec2)> {
        let mut out = Vec::new();
        if self.buckets.is_empty() {
            return out;
        }
        let lo = self.clamp(self.cell_of(Vec2::new(p.x - radius, p.y - radius)));
        let hi = self.clamp(self.cell_of(Vec2::new(p.x + radius, p.y + radius)));
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                if let Some(bucket) = self.buckets.get(&(cx, cy)) {
                    out.extend(bucket.iter().filter(|(_, q)| p.distance(*q) < radius));
                }
            }
        }
        out
    }

    /// Closest entry to `p`. Ties go to the smaller id.
    ///
    /// The search starts from the occupied cell range nearest `p`, so its
    /// cost is bounded by the extent of the grid however far away `p` is.
    pub(crate) fn nearest(&self, p: Vec2) -> Option<RoutePointId> {
        if self.buckets.is_empty() {
            return None;
        }
        let center = self.clamp(self.cell_of(p));
        let max_ring = [
            center.0.abs_diff(self.min_cell.0),
            self.max_cell.0.abs_diff(center.0),
            center.1.abs_diff(self.min_cell.1),
            self.max_cell.1.abs_diff(center.1),
        ]
        .into_iter()
        .max()
        .map_or(0, |ring| i64::try_from(ring).unwrap_or(i64::MAX));

        let mut best: Option<(RoutePointId, f64)> = None;
        for ring in 0..=max_ring {
            for cell in ring_cells(center, ring) {
                let Some(bucket) = self.buckets.get(&cell) else {
                    continue;
                };
                for &(id, q) in bucket {
                    let d = p.distance(q);
                    let better = match best {
                        None => true,
                        Some((bid, bd)) => d < bd || (d == bd && id < bid),
                    };
                    if better {
                        best = Some((id, d));
                    }
                }
            }
            // Anything in ring + 1 is at least `ring * cell_size` away. This
            // holds for a clamped centre too: `p` sits on or beyond its edge.
            if let Some((_, bd)) = best {
                if bd < ring as f64 * self.cell_size {
                    break;
                }
            }
        }
        best.map(|(id, _)| id)
    }
}

fn ring_cells(center: Cell, ring: i64) -> Vec<Cell> {
    if ring == 0 {
        return vec![center];
    }
    let mut cells = Vec::with_capacity((8 * ring) as usize);
    for dx in -ring..=ring {
        cells.push((center.0 + dx, center.1 - ring));
        cells.push((center.0 + dx, center.1 + ring));
    }
    for dy in (-ring + 1)..ring {
        cells.push((center.0 - ring, center.1 + dy));
        cells.push((center.0 + ring, center.1 + dy));
    }
    cells
}
