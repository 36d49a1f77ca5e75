use std::sync::OnceLock;

use geo::{Line, LineLocatePoint, Point};
use log::trace;
use petgraph::graph::DiGraph;
use petgraph::prelude::EdgeRef;
use petgraph::Direction;
use rstar::{RTree, RTreeObject, AABB};
use smallvec::SmallVec;

use crate::candidate::{EdgeProjection, PathLocation, Side};
use crate::geo::{bearing, great_circle, METERS_PER_DEGREE_LAT};
use crate::graph::{EdgeIx, EdgeView, NodeIx, RoadReader};

/// Stored attributes of one directed edge.
#[derive(Clone, Copy, Debug)]
struct EdgeData {
    length: f64,
    speed: f64,
    bearing: f64,
}

/// An edge lifted into the spatial index, with its endpoint
/// coordinates denormalised so queries never touch the graph.
#[derive(Debug)]
struct SpatialEdge {
    id: EdgeIx,
    source: [f64; 2],
    target: [f64; 2],
}

impl SpatialEdge {
    /// Clamped projection parameter of `point` onto the segment, in `[0, 1]`.
    fn locate(&self, point: &[f64; 2]) -> f64 {
        let dx = self.target[0] - self.source[0];
        let dy = self.target[1] - self.source[1];

        let length2 = dx * dx + dy * dy;
        if length2 == 0.0 {
            return 0.0;
        }

        let t = ((point[0] - self.source[0]) * dx + (point[1] - self.source[1]) * dy) / length2;
        t.clamp(0.0, 1.0)
    }
}

impl RTreeObject for SpatialEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.source, self.target)
    }
}

impl rstar::PointDistance for SpatialEdge {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let t = self.locate(point);

        let x = self.source[0] + t * (self.target[0] - self.source[0]);
        let y = self.source[1] + t * (self.target[1] - self.source[1]);

        let dx = point[0] - x;
        let dy = point[1] - y;
        dx * dx + dy * dy
    }
}

/// An in-memory road network.
///
/// Nodes carry positions; edges are directed, so a bidirectional way
/// is inserted as a forward/backward [pair](RoadGraph::add_edge_pair).
/// Edge length and bearing are derived from the endpoint positions at
/// insertion.
///
/// The spatial index over edges is built lazily on the first
/// projection query and invalidated by any mutation, keeping
/// construction linear for callers that never project.
#[derive(Debug, Default)]
pub struct RoadGraph {
    graph: DiGraph<Point, EdgeData>,
    index: OnceLock<RTree<SpatialEdge>>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the network.
    pub fn size(&self) -> usize {
        self.graph.node_count()
    }

    pub fn add_node(&mut self, position: Point) -> NodeIx {
        self.index = OnceLock::new();
        self.graph.add_node(position)
    }

    /// Inserts a directed edge from `source` to `target`, travelled
    /// at `speed` meters per second. Length and bearing come from the
    /// endpoint positions.
    ///
    /// Panics if either endpoint is not in the graph.
    pub fn add_edge(&mut self, source: NodeIx, target: NodeIx, speed: f64) -> EdgeIx {
        let a = *self
            .graph
            .node_weight(source)
            .expect("edge source not found in road graph");
        let b = *self
            .graph
            .node_weight(target)
            .expect("edge target not found in road graph");

        let data = EdgeData {
            length: great_circle(a, b),
            speed,
            bearing: bearing(a, b),
        };

        self.index = OnceLock::new();
        self.graph.add_edge(source, target, data)
    }

    /// Inserts a bidirectional way as two directed edges.
    pub fn add_edge_pair(&mut self, a: NodeIx, b: NodeIx, speed: f64) -> (EdgeIx, EdgeIx) {
        (self.add_edge(a, b, speed), self.add_edge(b, a, speed))
    }

    fn index(&self) -> &RTree<SpatialEdge> {
        self.index.get_or_init(|| {
            let edges = self
                .graph
                .edge_references()
                .map(|edge| {
                    let source = self.graph[edge.source()];
                    let target = self.graph[edge.target()];

                    SpatialEdge {
                        id: edge.id(),
                        source: [source.x(), source.y()],
                        target: [target.x(), target.y()],
                    }
                })
                .collect::<Vec<_>>();

            RTree::bulk_load(edges)
        })
    }

    /// All edges within `radius` meters of `point`, each with the
    /// projected position, the percent-along of that projection, and
    /// the side of the edge the point falls on.
    pub fn nearest_projected(
        &self,
        point: Point,
        radius: f64,
    ) -> impl Iterator<Item = (EdgeIx, Point, f64, Side)> + '_ {
        // Degree radius generous enough to cover the meter radius in
        // both axes at this latitude.
        let cos_lat = point.y().to_radians().cos().max(1e-6);
        let degrees = radius / (METERS_PER_DEGREE_LAT * cos_lat);

        self.index()
            .locate_within_distance([point.x(), point.y()], degrees * degrees)
            .filter_map(move |spatial| {
                let source = Point::new(spatial.source[0], spatial.source[1]);
                let target = Point::new(spatial.target[0], spatial.target[1]);

                let percent_along = Line::new(source.0, target.0)
                    .line_locate_point(&point)
                    .unwrap_or_else(|| spatial.locate(&[point.x(), point.y()]));

                let projected = Point::new(
                    source.x() + percent_along * (target.x() - source.x()),
                    source.y() + percent_along * (target.y() - source.y()),
                );

                // The square index query over-approximates; re-check in meters.
                if great_circle(point, projected) > radius {
                    return None;
                }

                let cross = (target.x() - source.x()) * (point.y() - source.y())
                    - (target.y() - source.y()) * (point.x() - source.x());

                let side = if cross.abs() < 1e-12 {
                    Side::Neither
                } else if cross > 0.0 {
                    Side::Left
                } else {
                    Side::Right
                };

                Some((spatial.id, projected, percent_along, side))
            })
    }

    /// Projects a position onto the network as a [`PathLocation`],
    /// collecting every edge within `radius` meters. Returns `None`
    /// when no edge is in range.
    ///
    /// The location's position is the nearest of the projections.
    pub fn path_location(&self, point: Point, radius: f64) -> Option<PathLocation> {
        let mut nearest: Option<(f64, Point)> = None;
        let mut edges = SmallVec::new();

        for (edge, projected, percent_along, side) in self.nearest_projected(point, radius) {
            let distance = great_circle(point, projected);

            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, projected));
            }

            edges.push(EdgeProjection {
                edge,
                percent_along,
                side,
            });
        }

        let (distance, position) = nearest?;
        trace!(
            "projected ({}, {}) onto {} edge(s), nearest {:.1}m away",
            point.x(),
            point.y(),
            edges.len(),
            distance
        );

        Some(PathLocation::new(position, edges))
    }
}

impl RoadReader for RoadGraph {
    fn edge(&self, edge: EdgeIx) -> Option<EdgeView> {
        let (source, target) = self.graph.edge_endpoints(edge)?;
        let data = self.graph.edge_weight(edge)?;

        Some(EdgeView {
            id: edge,
            source,
            target,
            length: data.length,
            speed: data.speed,
            // Straight segments; curved geometry would carry distinct headings.
            start_bearing: data.bearing,
            end_bearing: data.bearing,
        })
    }

    fn leaving(&self, node: NodeIx) -> SmallVec<[EdgeIx; 4]> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.id())
            .collect()
    }

    fn position(&self, node: NodeIx) -> Option<Point> {
        self.graph.node_weight(node).copied()
    }
}
