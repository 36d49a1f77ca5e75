//! Road-network access for the shortest-path expander.
//!
//! The expander only ever sees the [`RoadReader`] trait, so any
//! tiled or memory-mapped graph source can stand in for the
//! in-memory [`RoadGraph`] provided here.

#[doc(hidden)]
pub mod road;
#[doc(hidden)]
mod test;

#[doc(inline)]
pub use road::RoadGraph;

use geo::Point;
use smallvec::SmallVec;

/// Index of a node within the road graph.
pub type NodeIx = petgraph::graph::NodeIndex;

/// Index of a directed edge within the road graph.
pub type EdgeIx = petgraph::graph::EdgeIndex;

/// A [flyweight] view of one directed edge.
///
/// Bidirectional ways are stored as two directed edges, each with its
/// own index, so a view never carries a direction flag of its own.
/// Bearings are degrees clockwise from due-north; [start](#field.start_bearing)
/// is the heading leaving the source, [end](#field.end_bearing) the heading
/// arriving at the target.
///
/// [flyweight]: https://refactoring.guru/design-patterns/flyweight
#[derive(Clone, Copy, Debug)]
pub struct EdgeView {
    pub id: EdgeIx,
    pub source: NodeIx,
    pub target: NodeIx,

    /// Arc length of the edge in meters.
    pub length: f64,

    /// Travel speed along the edge in meters per second.
    pub speed: f64,

    pub start_bearing: f64,
    pub end_bearing: f64,
}

/// Read-only access to a road network.
///
/// Implementations are expected to be cheap to query; the expander
/// calls [`edge`](RoadReader::edge) once per relaxation. A reader may
/// be shared read-only between matcher instances.
pub trait RoadReader {
    /// Resolve a directed edge to its view, if it exists.
    fn edge(&self, edge: EdgeIx) -> Option<EdgeView>;

    /// All directed edges leaving `node`.
    fn leaving(&self, node: NodeIx) -> SmallVec<[EdgeIx; 4]>;

    /// The position of `node`, if it exists.
    fn position(&self, node: NodeIx) -> Option<Point>;
}

impl<R> RoadReader for &R
where
    R: RoadReader,
{
    #[inline]
    fn edge(&self, edge: EdgeIx) -> Option<EdgeView> {
        (**self).edge(edge)
    }

    #[inline]
    fn leaving(&self, node: NodeIx) -> SmallVec<[EdgeIx; 4]> {
        (**self).leaving(node)
    }

    #[inline]
    fn position(&self, node: NodeIx) -> Option<Point> {
        (**self).position(node)
    }
}
