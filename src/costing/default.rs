use crate::costing::{Cost, ModeCosting};
use crate::graph::EdgeView;

/// Distance-proportional mode costing.
///
/// The cost accumulator is the path length in meters and travel time
/// follows each edge's stored speed, with no additional turn
/// penalties beyond the angular table. This is the mode the matcher
/// falls back to when no vehicle profile is configured; it makes the
/// route-cost accumulator directly comparable to the great-circle
/// distance in the transition formula.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceCosting;

impl ModeCosting for DistanceCosting {
    fn allowed(&self, edge: &EdgeView) -> bool {
        edge.speed > 0.0 && edge.length.is_finite()
    }

    fn edge_cost(&self, edge: &EdgeView) -> Cost {
        Cost {
            cost: edge.length,
            secs: edge.length / edge.speed,
        }
    }

    fn turn_cost(&self, _prev: &EdgeView, _next: &EdgeView, _angle: f64) -> f64 {
        0.0
    }
}
