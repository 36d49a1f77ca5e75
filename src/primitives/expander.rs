use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::candidate::PathLocation;
use crate::costing::{Cost, ModeCosting, TurnCostTable};
use crate::geo::{turn_angle, DistanceApproximator};
use crate::graph::{EdgeIx, NodeIx, RoadReader};
use crate::primitives::{Label, LabelSet};

/// Destination projections gathered per directed edge, so a single
/// relaxation discovers every arrival the edge carries.
type DestinationEdges = FxHashMap<EdgeIx, SmallVec<[(u32, f64); 2]>>;

/// A bounded, best-first, one-origin to many-destinations expansion
/// over directed edges.
///
/// One expansion amortises the search across every destination: the
/// frontier keeps growing until each destination has produced its
/// cheapest arrival or no label survives the distance and time
/// ceilings. Turn penalties are folded into the running cost at every
/// junction, and each label remembers the penalty paid at its own
/// edge's origin.
pub struct Expander<'a, R, M>
where
    R: RoadReader,
    M: ModeCosting,
{
    reader: &'a R,
    costing: &'a M,
    turn_costs: &'a TurnCostTable,
}

impl<'a, R, M> Expander<'a, R, M>
where
    R: RoadReader,
    M: ModeCosting,
{
    pub fn new(reader: &'a R, costing: &'a M, turn_costs: &'a TurnCostTable) -> Self {
        Self {
            reader,
            costing,
            turn_costs,
        }
    }

    /// Expands from `locations[origin]` towards every other location.
    ///
    /// Reached labels accumulate in `labels`; the returned vector is
    /// parallel to `locations`, holding the best arrival's label index
    /// per destination (`None` when unreached, and always `None` at
    /// the origin slot). `max_distance` meters and `max_time` seconds
    /// bound every partial path; the `approximator`, anchored at the
    /// target measurement, biases the pop order once a label's edge
    /// ends more than `search_radius` meters out.
    ///
    /// `inbound` is the label that reached the origin candidate in the
    /// previous transition, seeding the turn penalty of the first
    /// junction; without it the origin departs turn-free.
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &self,
        locations: &[&PathLocation],
        origin: usize,
        labels: &mut LabelSet,
        approximator: &DistanceApproximator,
        search_radius: f64,
        inbound: Option<Label>,
        max_distance: f64,
        max_time: f64,
    ) -> Vec<Option<u32>> {
        let mut results: Vec<Option<u32>> = vec![None; locations.len()];
        let mut remaining = locations.len().saturating_sub(1);

        let destinations = Self::destination_edges(locations, origin);

        // Cheapest frontier cost per fully-traversed edge.
        let mut best: FxHashMap<EdgeIx, f64> = FxHashMap::default();
        let mut settled: FxHashSet<EdgeIx> = FxHashSet::default();

        self.seed(
            locations[origin],
            inbound,
            &destinations,
            labels,
            approximator,
            search_radius,
            max_time,
            &mut best,
        );

        while remaining > 0 {
            let Some((index, destination)) = labels.pop() else {
                break;
            };

            // Arrival labels terminate; the first pop per destination
            // is its best by (cost, insertion index).
            if let Some(destination) = destination {
                let slot = &mut results[destination as usize];
                if slot.is_none() {
                    *slot = Some(index);
                    remaining -= 1;
                }
                continue;
            }

            let label = *labels.label(index);
            if !settled.insert(label.edge) {
                continue;
            }

            let Some(view) = self.reader.edge(label.edge) else {
                continue;
            };

            for next_id in self.reader.leaving(view.target) {
                let Some(next) = self.reader.edge(next_id) else {
                    continue;
                };
                if !self.costing.allowed(&next) {
                    continue;
                }

                let angle = turn_angle(view.end_bearing, next.start_bearing);
                let turn =
                    self.turn_costs.cost(angle) + self.costing.turn_cost(&view, &next, angle);
                let edge_cost = self.costing.edge_cost(&next);

                // Arrivals on this edge, costed over the destination's
                // fraction of it.
                if let Some(arrivals) = destinations.get(&next_id) {
                    for &(destination, percent_along) in arrivals {
                        if results[destination as usize].is_some() {
                            continue;
                        }

                        let arrival = Label {
                            edge: next_id,
                            predecessor: Some(index),
                            cost: label.cost
                                + Cost::new(turn, 0.0)
                                + edge_cost.scaled(percent_along),
                            distance: label.distance + next.length * percent_along,
                            turn_cost: turn,
                        };

                        if arrival.cost.secs <= max_time {
                            labels.put(arrival, arrival.cost.cost, Some(destination));
                        }
                    }
                }

                // Full traversal towards the next junction.
                let relaxed = Label {
                    edge: next_id,
                    predecessor: Some(index),
                    cost: label.cost + Cost::new(turn, 0.0) + edge_cost,
                    distance: label.distance + next.length,
                    turn_cost: turn,
                };

                if relaxed.distance > max_distance || relaxed.cost.secs > max_time {
                    continue;
                }

                if best
                    .get(&next_id)
                    .is_some_and(|&cheapest| cheapest <= relaxed.cost.cost)
                {
                    continue;
                }

                let sortcost =
                    relaxed.cost.cost + self.remaining_estimate(next.target, approximator, search_radius);
                if labels.put(relaxed, sortcost, None).is_some() {
                    best.insert(next_id, relaxed.cost.cost);
                }
            }
        }

        trace!(
            "expansion settled {} edge(s), {} label(s), {} destination(s) unreached",
            settled.len(),
            labels.len(),
            remaining
        );

        results
    }

    /// Inserts the origin labels: per projected origin edge, the
    /// remainder of the edge towards its end node, plus any
    /// destination sharing the edge at a farther percent-along.
    /// The label set's own ceiling bounds seed distances.
    #[allow(clippy::too_many_arguments)]
    fn seed(
        &self,
        origin: &PathLocation,
        inbound: Option<Label>,
        destinations: &DestinationEdges,
        labels: &mut LabelSet,
        approximator: &DistanceApproximator,
        search_radius: f64,
        max_time: f64,
        best: &mut FxHashMap<EdgeIx, f64>,
    ) {
        for projection in &origin.edges {
            let Some(view) = self.reader.edge(projection.edge) else {
                continue;
            };
            if !self.costing.allowed(&view) {
                continue;
            }

            // Turn penalty of departing onto this edge, seeded by the
            // label that arrived here in the previous transition.
            // Continuing along the arrival edge itself turns nothing.
            let turn = match inbound {
                Some(arrived) if arrived.edge != view.id => self
                    .reader
                    .edge(arrived.edge)
                    .map(|prev| {
                        let angle = turn_angle(prev.end_bearing, view.start_bearing);
                        self.turn_costs.cost(angle) + self.costing.turn_cost(&prev, &view, angle)
                    })
                    .unwrap_or_default(),
                _ => 0.0,
            };

            let edge_cost = self.costing.edge_cost(&view);

            if let Some(arrivals) = destinations.get(&view.id) {
                for &(destination, percent_along) in arrivals {
                    if percent_along < projection.percent_along {
                        continue;
                    }

                    let fraction = percent_along - projection.percent_along;
                    let arrival = Label {
                        edge: view.id,
                        predecessor: None,
                        cost: Cost::new(turn, 0.0) + edge_cost.scaled(fraction),
                        distance: view.length * fraction,
                        turn_cost: turn,
                    };

                    if arrival.cost.secs <= max_time {
                        labels.put(arrival, arrival.cost.cost, Some(destination));
                    }
                }
            }

            let fraction = 1.0 - projection.percent_along;
            let seed = Label {
                edge: view.id,
                predecessor: None,
                cost: Cost::new(turn, 0.0) + edge_cost.scaled(fraction),
                distance: view.length * fraction,
                turn_cost: turn,
            };

            if seed.cost.secs > max_time {
                continue;
            }

            if best
                .get(&view.id)
                .is_some_and(|&cheapest| cheapest <= seed.cost.cost)
            {
                continue;
            }

            let sortcost =
                seed.cost.cost + self.remaining_estimate(view.target, approximator, search_radius);
            if labels.put(seed, sortcost, None).is_some() {
                best.insert(view.id, seed.cost.cost);
            }
        }
    }

    fn destination_edges(locations: &[&PathLocation], origin: usize) -> DestinationEdges {
        let mut destinations = DestinationEdges::default();

        for (index, location) in locations.iter().enumerate() {
            if index == origin {
                continue;
            }

            for projection in &location.edges {
                destinations
                    .entry(projection.edge)
                    .or_default()
                    .push((index as u32, projection.percent_along));
            }
        }

        destinations
    }

    /// Straight-line remainder towards the target measurement; zero
    /// within the measurement's search radius so near labels order
    /// purely by cost.
    #[inline]
    fn remaining_estimate(
        &self,
        node: NodeIx,
        approximator: &DistanceApproximator,
        search_radius: f64,
    ) -> f64 {
        self.reader
            .position(node)
            .map(|position| (approximator.approx(position) - search_radius).max(0.0))
            .unwrap_or_default()
    }
}
