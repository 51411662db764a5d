//! Sidewalk network built from resampled polylines.

use smallvec::SmallVec;
use throng_core::{Bounds, RouteGraph, RoutePointId, Vec2};
use tracing::debug;

use crate::error::GraphError;
use crate::grid::BucketGrid;

/// One resampled sidewalk.
#[derive(Clone, Debug)]
struct Route {
    points: Vec<Vec2>,
    closed: bool,
    junctions: Vec<SmallVec<[RoutePointId; 4]>>,
}

/// Route-point graph over a set of sidewalk polylines.
///
/// Each polyline is resampled at a fixed `spacing` of arc length. Walking
/// forward follows vertex order; closed polylines wrap around, open ones
/// dead-end at both ends. A route point's junctions are the nearest point
/// on every *other* polyline within `junction_radius`, nearest first.
///
/// Route point handles pack `(route << 32) | index` and are only meaningful
/// to the graph that issued them.
///
/// # Examples
///
/// ```
/// use throng_core::{RouteGraph, Vec2};
/// use throng_graph::PolylineGraph;
///
/// let graph = PolylineGraph::builder()
///     .spacing(1.0)
///     .open(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)])
///     .build()
///     .unwrap();
/// assert_eq!(graph.point_count(), 11);
///
/// let start = graph.nearest_point(Vec2::new(2.2, 0.4)).unwrap();
/// let next = graph.next_point(start, 1.0).unwrap();
/// assert_eq!(graph.position_of(next), Some(Vec2::new(3.0, 0.0)));
/// ```
#[derive(Clone, Debug)]
pub struct PolylineGraph {
    routes: Vec<Route>,
    spacing: f64,
    junction_radius: f64,
    index: BucketGrid,
}

/// Builder for [`PolylineGraph`].
///
/// Defaults: spacing 1.0, junction radius 1.5.
#[derive(Clone, Debug)]
pub struct PolylineGraphBuilder {
    spacing: f64,
    junction_radius: f64,
    polylines: Vec<(Vec<Vec2>, bool)>,
}

fn encode(route: usize, index: usize) -> RoutePointId {
    RoutePointId(((route as u64) << 32) | index as u64)
}

fn decode(id: RoutePointId) -> (usize, usize) {
    ((id.0 >> 32) as usize, (id.0 & 0xFFFF_FFFF) as usize)
}

impl PolylineGraph {
    /// Start building a graph.
    pub fn builder() -> PolylineGraphBuilder {
        PolylineGraphBuilder {
            spacing: 1.0,
            junction_radius: 1.5,
            polylines: Vec::new(),
        }
    }

    /// Resampling spacing in metres.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Junction radius in metres.
    pub fn junction_radius(&self) -> f64 {
        self.junction_radius
    }

    /// Number of polylines.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Total number of route points.
    pub fn point_count(&self) -> usize {
        self.routes.iter().map(|r| r.points.len()).sum()
    }

    /// Every route point handle, route by route in walking order.
    pub fn point_ids(&self) -> impl Iterator<Item = RoutePointId> + '_ {
        self.routes
            .iter()
            .enumerate()
            .flat_map(|(r, route)| (0..route.points.len()).map(move |i| encode(r, i)))
    }

    /// Number of route points that have at least one junction.
    pub fn junction_count(&self) -> usize {
        self.routes
            .iter()
            .flat_map(|r| r.junctions.iter())
            .filter(|j| !j.is_empty())
            .count()
    }

    /// Bounding box of every route point.
    pub fn bounds(&self) -> Bounds {
        let mut it = self.routes.iter().flat_map(|r| r.points.iter().copied());
        let first = it.next().unwrap_or(Vec2::ZERO);
        let (min, max) = it.fold((first, first), |(lo, hi), p| {
            (
                Vec2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Vec2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Bounds::new(min, max)
    }

    fn route(&self, id: RoutePointId) -> Option<(&Route, usize)> {
        let (r, i) = decode(id);
        let route = self.routes.get(r)?;
        (i < route.points.len()).then_some((route, i))
    }

    fn stride(&self, step: f64) -> usize {
        let s = (step / self.spacing).round();
        if s.is_finite() && s >= 1.0 {
            s as usize
        } else {
            1
        }
    }

    fn walk(&self, id: RoutePointId, step: f64, forward: bool) -> Option<RoutePointId> {
        let (route, i) = self.route(id)?;
        let (r, _) = decode(id);
        let n = route.points.len();
        let stride = self.stride(step);
        let j = if route.closed {
            let stride = stride % n;
            if forward {
                (i + stride) % n
            } else {
                (i + n - stride) % n
            }
        } else if forward {
            let j = i.checked_add(stride)?;
            if j >= n {
                return None;
            }
            j
        } else {
            i.checked_sub(stride)?
        };
        Some(encode(r, j))
    }
}

impl RouteGraph for PolylineGraph {
    fn nearest_point(&self, position: Vec2) -> Option<RoutePointId> {
        self.index.nearest(position)
    }

    fn next_point(&self, point: RoutePointId, step: f64) -> Option<RoutePointId> {
        self.walk(point, step, true)
    }

    fn previous_point(&self, point: RoutePointId, step: f64) -> Option<RoutePointId> {
        self.walk(point, step, false)
    }

    fn adjacent_points(&self, point: RoutePointId) -> SmallVec<[RoutePointId; 4]> {
        match self.route(point) {
            Some((route, i)) => route.junctions[i].clone(),
            None => SmallVec::new(),
        }
    }

    fn position_of(&self, point: RoutePointId) -> Option<Vec2> {
        self.route(point).map(|(route, i)| route.points[i])
    }
}

impl PolylineGraphBuilder {
    /// Set the resampling spacing (default: 1.0).
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the junction radius (default: 1.5). Zero disables junctions.
    pub fn junction_radius(mut self, radius: f64) -> Self {
        self.junction_radius = radius;
        self
    }

    /// Add a closed polyline; the last vertex links back to the first.
    pub fn closed(mut self, vertices: Vec<Vec2>) -> Self {
        self.polylines.push((vertices, true));
        self
    }

    /// Add an open polyline with dead ends at both ends.
    pub fn open(mut self, vertices: Vec<Vec2>) -> Self {
        self.polylines.push((vertices, false));
        self
    }

    /// Add one closed sidewalk ring per city block.
    ///
    /// Blocks are `block` metres square, separated by `street` metres, laid
    /// out in a `cols` x `rows` grid starting at `origin`. Each ring sits
    /// `inset` metres inside its block. Rings on opposite sides of a street
    /// are `street + 2 * inset` apart, so pick a junction radius above that
    /// to let pedestrians cross.
    pub fn block_grid(
        mut self,
        origin: Vec2,
        cols: usize,
        rows: usize,
        block: f64,
        street: f64,
        inset: f64,
    ) -> Self {
        let pitch = block + street;
        for row in 0..rows {
            for col in 0..cols {
                let x0 = origin.x + col as f64 * pitch + inset;
                let y0 = origin.y + row as f64 * pitch + inset;
                let x1 = origin.x + col as f64 * pitch + block - inset;
                let y1 = origin.y + row as f64 * pitch + block - inset;
                self.polylines.push((
                    vec![
                        Vec2::new(x0, y0),
                        Vec2::new(x1, y0),
                        Vec2::new(x1, y1),
                        Vec2::new(x0, y1),
                    ],
                    true,
                ));
            }
        }
        self
    }

    /// Resample all polylines, link junctions and build the spatial index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for invalid spacing or radius, an empty
    /// builder, or a degenerate polyline.
    pub fn build(self) -> Result<PolylineGraph, GraphError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(GraphError::InvalidSpacing {
                value: self.spacing,
            });
        }
        if !self.junction_radius.is_finite() || self.junction_radius < 0.0 {
            return Err(GraphError::InvalidRadius {
                value: self.junction_radius,
            });
        }
        if self.polylines.is_empty() {
            return Err(GraphError::Empty);
        }
        if u32::try_from(self.polylines.len()).is_err() {
            return Err(GraphError::TooManyPolylines {
                count: self.polylines.len(),
            });
        }

        let mut routes = Vec::with_capacity(self.polylines.len());
        for (index, (vertices, closed)) in self.polylines.iter().enumerate() {
            let points = resample(vertices, *closed, self.spacing)
                .ok_or(GraphError::DegeneratePolyline { index })?;
            if u32::try_from(points.len()).is_err() {
                return Err(GraphError::TooManyPoints {
                    index,
                    count: points.len(),
                });
            }
            let junctions = vec![SmallVec::new(); points.len()];
            routes.push(Route {
                points,
                closed: *closed,
                junctions,
            });
        }

        let cell = self.spacing.max(self.junction_radius);
        let mut index = BucketGrid::new(cell);
        for (r, route) in routes.iter().enumerate() {
            for (i, &p) in route.points.iter().enumerate() {
                index.insert(encode(r, i), p);
            }
        }

        if self.junction_radius > 0.0 {
            link_junctions(&mut routes, &index, self.junction_radius);
        }

        let graph = PolylineGraph {
            routes,
            spacing: self.spacing,
            junction_radius: self.junction_radius,
            index,
        };
        debug!(
            routes = graph.route_count(),
            points = graph.point_count(),
            junctions = graph.junction_count(),
            "built polyline graph"
        );
        Ok(graph)
    }
}

/// Sample `vertices` every `spacing` metres of arc length, starting at the
/// first vertex. Closed polylines stop short of the wrap back to the start.
fn resample(vertices: &[Vec2], closed: bool, spacing: f64) -> Option<Vec<Vec2>> {
    if vertices.len() < 2 || vertices.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut path: Vec<Vec2> = vertices.to_vec();
    if closed {
        path.push(vertices[0]);
    }
    let total: f64 = path.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total < spacing * 0.5 {
        return None;
    }

    let mut points = Vec::new();
    let mut s = 0.0;
    let mut seg = 0;
    let mut seg_start = 0.0;
    while if closed { s < total - 1e-9 } else { s <= total + 1e-9 } {
        // Advance to the segment containing arc length `s`.
        while seg + 1 < path.len() - 1 && seg_start + path[seg].distance(path[seg + 1]) < s {
            seg_start += path[seg].distance(path[seg + 1]);
            seg += 1;
        }
        let a = path[seg];
        let b = path[seg + 1];
        let len = a.distance(b);
        let t = if len > 0.0 {
            ((s - seg_start) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        points.push(a + (b - a) * t);
        s += spacing;
    }
    Some(points)
}

fn link_junctions(routes: &mut [Route], index: &BucketGrid, radius: f64) {
    for r in 0..routes.len() {
        for i in 0..routes[r].points.len() {
            let p = routes[r].points[i];
            let mut near = index.within(p, radius);
            near.retain(|(id, _)| decode(*id).0 != r);
            near.sort_by(|(ia, qa), (ib, qb)| {
                p.distance(*qa)
                    .total_cmp(&p.distance(*qb))
                    .then(ia.cmp(ib))
            });
            let mut seen_routes: SmallVec<[usize; 4]> = SmallVec::new();
            let mut links = SmallVec::new();
            for (id, _) in near {
                let other = decode(id).0;
                if !seen_routes.contains(&other) {
                    seen_routes.push(other);
                    links.push(id);
                }
            }
            routes[r].junctions[i] = links;
        }
    }
}
