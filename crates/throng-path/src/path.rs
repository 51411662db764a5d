//! Incremental lookahead path buffer.
//!
//! A [`PathBuffer`] holds the route points an agent is about to walk
//! through, nearest first. Each tick it is topped up to
//! [`PathParams::lookahead`] points by walking the route graph in the
//! buffer's [`ExtendDirection`], occasionally turning onto a neighbouring
//! route at a junction, and then the points the agent has already reached
//! are dropped from the front.

use std::collections::VecDeque;

use throng_core::{PathError, RandomSource, RouteGraph, RoutePointId, Vec2};

/// Tuning for path construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathParams {
    /// Number of route points kept buffered ahead of the agent. Default: 20.
    pub lookahead: usize,
    /// Probability per extension step of turning at a junction. Default: 0.01.
    pub branch_probability: f64,
    /// Distance under which a route point counts as reached. Default: 1.0.
    pub arrival_radius: f64,
    /// Distance along the route between consecutive buffered points. Default: 1.0.
    pub step_length: f64,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            lookahead: 20,
            branch_probability: 0.01,
            arrival_radius: 1.0,
            step_length: 1.0,
        }
    }
}

/// Which way along the current route the buffer grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtendDirection {
    /// Follow [`RouteGraph::next_point`].
    #[default]
    Forward,
    /// Follow [`RouteGraph::previous_point`].
    Backward,
}

impl ExtendDirection {
    fn from_coin(heads: bool) -> Self {
        if heads {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// Ordered lookahead of route points owned by a single agent.
///
/// Front is the next point to walk towards; back is the farthest point
/// of the lookahead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathBuffer {
    points: VecDeque<RoutePointId>,
    direction: ExtendDirection,
}

impl PathBuffer {
    /// An empty buffer extending forward.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer extending in `direction`.
    pub fn with_direction(direction: ExtendDirection) -> Self {
        Self {
            points: VecDeque::new(),
            direction,
        }
    }

    /// Number of buffered route points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the buffer holds no route points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Buffered route points, nearest first.
    pub fn points(&self) -> impl ExactSizeIterator<Item = RoutePointId> + '_ {
        self.points.iter().copied()
    }

    /// The next route point to walk towards.
    pub fn front(&self) -> Option<RoutePointId> {
        self.points.front().copied()
    }

    /// Current extension direction.
    pub fn direction(&self) -> ExtendDirection {
        self.direction
    }

    /// Drop all buffered points. The next extension re-seeds from the
    /// agent's position.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Grow the buffer towards `params.lookahead` points.
    ///
    /// An empty buffer is first seeded with the route point nearest to
    /// `position`. Each step draws once from `rng`: below
    /// `branch_probability` the first junction neighbour of the tail is
    /// appended and the direction re-rolled; otherwise one step is taken
    /// along the route. A dead end stops extension.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoPath`] if the buffer is still shorter than
    /// the lookahead when extension stops. The points gathered so far are
    /// kept.
    pub fn extend(
        &mut self,
        graph: &dyn RouteGraph,
        rng: &mut dyn RandomSource,
        params: &PathParams,
        position: Vec2,
    ) -> Result<(), PathError> {
        if self.points.is_empty() {
            match graph.nearest_point(position) {
                Some(seed) => self.points.push_back(seed),
                None => return Err(self.no_path(params)),
            }
        }

        while self.points.len() < params.lookahead {
            let Some(&tail) = self.points.back() else {
                break;
            };

            if rng.next_f64() < params.branch_probability {
                if let Some(&branch) = graph.adjacent_points(tail).first() {
                    self.points.push_back(branch);
                    self.direction = ExtendDirection::from_coin(rng.coin());
                    continue;
                }
            }

            let next = match self.direction {
                ExtendDirection::Forward => graph.next_point(tail, params.step_length),
                ExtendDirection::Backward => graph.previous_point(tail, params.step_length),
            };
            match next {
                Some(point) => self.points.push_back(point),
                None => break,
            }
        }

        if self.points.len() < params.lookahead {
            return Err(self.no_path(params));
        }
        Ok(())
    }

    /// Drop the route points the agent at `position` has already reached.
    ///
    /// Only the first half of the buffer is scanned. The cut lands just
    /// after the last scanned point within `arrival_radius`; if none is
    /// that close nothing is dropped. Returns the number of points dropped.
    pub fn trim(&mut self, graph: &dyn RouteGraph, params: &PathParams, position: Vec2) -> usize {
        let half = self.points.len() / 2;
        let mut cut = 0;
        for (i, &point) in self.points.iter().take(half).enumerate() {
            let Some(point_pos) = graph.position_of(point) else {
                continue;
            };
            if position.distance(point_pos) < params.arrival_radius {
                cut = i + 1;
            }
        }
        self.points.drain(..cut);
        cut
    }

    /// Extend, trim, and return the position of the new front point as
    /// the immediate steering target.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoPath`] if extension falls short of the
    /// lookahead or the front point has no position in `graph`.
    pub fn extend_and_trim(
        &mut self,
        graph: &dyn RouteGraph,
        rng: &mut dyn RandomSource,
        params: &PathParams,
        position: Vec2,
    ) -> Result<Vec2, PathError> {
        self.extend(graph, rng, params, position)?;
        self.trim(graph, params, position);
        self.front()
            .and_then(|point| graph.position_of(point))
            .ok_or_else(|| self.no_path(params))
    }

    fn no_path(&self, params: &PathParams) -> PathError {
        PathError::NoPath {
            buffered: self.points.len(),
            lookahead: params.lookahead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use throng_test_utils::{ChainGraph, ScriptedRandom};

    fn params(lookahead: usize, branch_probability: f64) -> PathParams {
        PathParams {
            lookahead,
            branch_probability,
            ..PathParams::default()
        }
    }

    fn ids(buf: &PathBuffer) -> Vec<u64> {
        buf.points().map(|p| p.0).collect()
    }

    #[test]
    fn seeds_extends_and_trims_short_chain() {
        // A→B→C→D at unit spacing, agent standing on A.
        let graph = ChainGraph::line(4, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(3, 0.0);
        let mut buf = PathBuffer::new();

        buf.extend(&graph, &mut rng, &p, Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(ids(&buf), vec![0, 1, 2]);

        let dropped = buf.trim(&graph, &p, Vec2::new(0.2, 0.0));
        assert_eq!(dropped, 1);
        assert_eq!(ids(&buf), vec![1, 2]);
        assert_eq!(graph.position_of(buf.front().unwrap()), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn extend_and_trim_returns_front_position() {
        let graph = ChainGraph::line(4, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let mut buf = PathBuffer::new();
        let target = buf
            .extend_and_trim(&graph, &mut rng, &params(3, 0.0), Vec2::new(0.0, 0.1))
            .unwrap();
        assert_eq!(target, Vec2::new(1.0, 0.0));
        assert_eq!(ids(&buf), vec![1, 2]);
    }

    #[test]
    fn no_point_in_radius_trims_nothing() {
        let graph = ChainGraph::line(30, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(6, 0.0);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &p, Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(buf.trim(&graph, &p, Vec2::new(0.0, 5.0)), 0);
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn trim_cuts_after_last_reached_point() {
        // Points 0..6 on a line; agent sits between 1 and 2, within 1.0 of both.
        let graph = ChainGraph::line(10, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(6, 0.0);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &p, Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(buf.trim(&graph, &p, Vec2::new(1.5, 0.0)), 3);
        assert_eq!(ids(&buf), vec![3, 4, 5]);
    }

    #[test]
    fn trim_only_scans_first_half() {
        let graph = ChainGraph::line(10, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(4, 0.0);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &p, Vec2::new(0.0, 0.0)).unwrap();
        // Agent is on point 3, which lies in the unscanned back half.
        assert_eq!(buf.trim(&graph, &p, Vec2::new(3.0, 0.0)), 0);
        assert_eq!(ids(&buf), vec![0, 1, 2, 3]);
    }

    #[test]
    fn dead_end_reports_no_path_and_keeps_points() {
        let graph = ChainGraph::line(3, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let mut buf = PathBuffer::new();
        let err = buf
            .extend_and_trim(&graph, &mut rng, &params(20, 0.0), Vec2::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::NoPath {
                buffered: 3,
                lookahead: 20
            }
        );
        assert_eq!(ids(&buf), vec![0, 1, 2]);
    }

    #[test]
    fn empty_graph_reports_no_path() {
        let graph = ChainGraph::from_positions(Vec::new(), false);
        let mut rng = ScriptedRandom::constant(0.5);
        let mut buf = PathBuffer::new();
        let err = buf
            .extend(&graph, &mut rng, &params(3, 0.0), Vec2::ZERO)
            .unwrap_err();
        assert_eq!(
            err,
            PathError::NoPath {
                buffered: 0,
                lookahead: 3
            }
        );
    }

    #[test]
    fn backward_direction_walks_previous_points() {
        let graph = ChainGraph::line(10, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let mut buf = PathBuffer::with_direction(ExtendDirection::Backward);
        buf.extend(&graph, &mut rng, &params(4, 0.0), Vec2::new(6.0, 0.0))
            .unwrap();
        assert_eq!(ids(&buf), vec![6, 5, 4, 3]);
    }

    #[test]
    fn step_length_skips_points() {
        let graph = ChainGraph::line(20, 0.5);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = PathParams {
            lookahead: 4,
            branch_probability: 0.0,
            step_length: 1.0,
            ..PathParams::default()
        };
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &p, Vec2::ZERO).unwrap();
        assert_eq!(ids(&buf), vec![0, 2, 4, 6]);
    }

    #[test]
    fn branch_appends_junction_and_rerolls_direction() {
        // Main line 0..10, plus a spur 10..20 reachable from point 0.
        let graph = ChainGraph::line(20, 1.0).with_junction(0, 15);
        // Draw 1: 0.0 < p → branch; draw 2: coin 0.9 → Backward; then no more branches.
        let mut rng = ScriptedRandom::new(vec![0.0, 0.9, 0.5, 0.5, 0.5]);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &params(4, 0.5), Vec2::ZERO)
            .unwrap();
        assert_eq!(ids(&buf), vec![0, 15, 14, 13]);
        assert_eq!(buf.direction(), ExtendDirection::Backward);
    }

    #[test]
    fn branch_without_junction_falls_through_to_step() {
        let graph = ChainGraph::line(10, 1.0);
        let mut rng = ScriptedRandom::constant(0.0);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &params(3, 1.0), Vec2::ZERO)
            .unwrap();
        assert_eq!(ids(&buf), vec![0, 1, 2]);
        assert_eq!(buf.direction(), ExtendDirection::Forward);
    }

    #[test]
    fn extension_stops_at_lookahead() {
        let graph = ChainGraph::looped(8, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(20, 0.0);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &p, Vec2::ZERO).unwrap();
        assert_eq!(buf.len(), 20);
        buf.extend(&graph, &mut rng, &p, Vec2::ZERO).unwrap();
        assert_eq!(buf.len(), 20);
    }

    #[test]
    fn repeated_call_with_same_position_is_stable() {
        let graph = ChainGraph::line(100, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(20, 0.0);
        let mut buf = PathBuffer::new();
        let pos = Vec2::new(0.0, 0.0);
        let first = buf.extend_and_trim(&graph, &mut rng, &p, pos).unwrap();
        let after_first = buf.clone();
        let second = buf.extend_and_trim(&graph, &mut rng, &p, pos).unwrap();
        assert_eq!(first, second);
        assert_eq!(ids(&after_first)[..], ids(&buf)[..after_first.len()]);
        assert_eq!(buf.front(), after_first.front());
    }

    #[test]
    fn clear_reseeds_from_position() {
        let graph = ChainGraph::line(50, 1.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let p = params(3, 0.0);
        let mut buf = PathBuffer::new();
        buf.extend(&graph, &mut rng, &p, Vec2::ZERO).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        buf.extend(&graph, &mut rng, &p, Vec2::new(30.2, 0.0))
            .unwrap();
        assert_eq!(ids(&buf), vec![30, 31, 32]);
    }

    proptest! {
        #[test]
        fn trim_leaves_a_suffix(
            start in 0usize..40,
            lookahead in 1usize..25,
            ax in -5.0f64..70.0,
            ay in -2.0f64..2.0,
        ) {
            let graph = ChainGraph::line(80, 1.0);
            let mut rng = ScriptedRandom::constant(0.5);
            let p = params(lookahead, 0.0);
            let mut buf = PathBuffer::new();
            buf.extend(&graph, &mut rng, &p, Vec2::new(start as f64, 0.0)).unwrap();
            let before = ids(&buf);
            let dropped = buf.trim(&graph, &p, Vec2::new(ax, ay));
            let after = ids(&buf);
            prop_assert!(dropped <= before.len() / 2);
            prop_assert_eq!(&before[dropped..], &after[..]);
        }
    }
}
