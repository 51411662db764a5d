//! A route graph made of a single chain of points.

use smallvec::SmallVec;
use throng_core::{RouteGraph, RoutePointId, Vec2};

/// Route points `0..n` linked in order, optionally closed into a loop.
///
/// `RoutePointId(i)` is the i-th point. Steps advance by
/// `round(step / spacing)` points (at least one); open chains dead-end at
/// both ends. Junctions added with [`with_junction`](ChainGraph::with_junction)
/// are symmetric.
#[derive(Clone, Debug)]
pub struct ChainGraph {
    positions: Vec<Vec2>,
    looped: bool,
    spacing: f64,
    junctions: Vec<SmallVec<[RoutePointId; 4]>>,
}

impl ChainGraph {
    /// `n` points along the x axis at `(i * spacing, 0)`.
    pub fn line(n: usize, spacing: f64) -> Self {
        let positions = (0..n).map(|i| Vec2::new(i as f64 * spacing, 0.0)).collect();
        Self::with_spacing(positions, false, spacing)
    }

    /// Like [`line`](ChainGraph::line) but the last point links back to the first.
    pub fn looped(n: usize, spacing: f64) -> Self {
        let positions = (0..n).map(|i| Vec2::new(i as f64 * spacing, 0.0)).collect();
        Self::with_spacing(positions, true, spacing)
    }

    /// Arbitrary positions with unit step spacing.
    pub fn from_positions(positions: Vec<Vec2>, looped: bool) -> Self {
        Self::with_spacing(positions, looped, 1.0)
    }

    fn with_spacing(positions: Vec<Vec2>, looped: bool, spacing: f64) -> Self {
        let junctions = vec![SmallVec::new(); positions.len()];
        Self {
            positions,
            looped,
            spacing,
            junctions,
        }
    }

    /// Link points `a` and `b` as a junction in both directions.
    pub fn with_junction(mut self, a: u64, b: u64) -> Self {
        self.junctions[a as usize].push(RoutePointId(b));
        self.junctions[b as usize].push(RoutePointId(a));
        self
    }

    /// Number of route points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn stride(&self, step: f64) -> usize {
        ((step / self.spacing).round() as usize).max(1)
    }

    fn offset(&self, point: RoutePointId, delta: isize) -> Option<RoutePointId> {
        let n = self.positions.len() as isize;
        let i = point.0 as isize;
        if i >= n {
            return None;
        }
        let j = i + delta;
        if self.looped {
            Some(RoutePointId(j.rem_euclid(n) as u64))
        } else if (0..n).contains(&j) {
            Some(RoutePointId(j as u64))
        } else {
            None
        }
    }
}

impl RouteGraph for ChainGraph {
    fn nearest_point(&self, position: Vec2) -> Option<RoutePointId> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.positions.iter().enumerate() {
            let d = position.distance(*p);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| RoutePointId(i as u64))
    }

    fn next_point(&self, point: RoutePointId, step: f64) -> Option<RoutePointId> {
        self.offset(point, self.stride(step) as isize)
    }

    fn previous_point(&self, point: RoutePointId, step: f64) -> Option<RoutePointId> {
        self.offset(point, -(self.stride(step) as isize))
    }

    fn adjacent_points(&self, point: RoutePointId) -> SmallVec<[RoutePointId; 4]> {
        self.junctions
            .get(point.0 as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn position_of(&self, point: RoutePointId) -> Option<Vec2> {
        self.positions.get(point.0 as usize).copied()
    }
}
