//! The transition cost functor: the single callable the Viterbi
//! driver invokes to price moving between candidates of adjacent
//! columns.
//!
//! The first `cost` against a left candidate routes it to every
//! yet-unreached candidate of the right column in one bounded
//! expansion; the reached labels persist on the left candidate, so
//! the remaining right-column queries are cache reads. Budgets keep
//! each expansion local: the distance budget is the great-circle
//! distance scaled by a factor and clamped to the breakage distance,
//! the time budget the elapsed clock scaled likewise.

#[doc(hidden)]
pub mod config;

#[doc(inline)]
pub use config::TransitionConfig;

use std::sync::Arc;

use log::debug;

use crate::candidate::CandidateId;
use crate::costing::{ModeCosting, TurnCostTable};
use crate::error::MatchError;
use crate::geo::{great_circle, DistanceApproximator};
use crate::graph::RoadReader;
use crate::layer::Layers;
use crate::primitives::{Expander, LabelSet};
use crate::viterbi::ViterbiLookup;

/// The sentinel returned when no route connects two candidates
/// within budget: "no transition".
///
/// Callers must interpret it as a breakage, never as a large cost.
pub const NO_TRANSITION: f64 = -1.0;

/// Combines a reached label with the straight-line expectations into
/// the scalar transition cost.
///
/// The two absolute terms penalise detours in space and time jointly;
/// `inv_beta` is `1/β` and controls how forgiving the model is. The
/// turn cost of intermediate junctions is already inside
/// `route_distance`; `turn_cost` is the penalty at the final reached
/// edge, reported additively on top.
#[inline]
pub fn calculate_transition_cost(
    turn_cost: f64,
    route_distance: f64,
    gc_distance: f64,
    route_time: f64,
    clock_distance: f64,
    inv_beta: f64,
) -> f64 {
    turn_cost
        + inv_beta * ((route_distance - gc_distance).abs() + (route_time - clock_distance).abs())
}

/// The transition cost model of one matcher instance.
///
/// Borrows its collaborators for the duration of a trace: the road
/// [reader](RoadReader), the mode [costing](ModeCosting), the Viterbi
/// [predecessor lookup](ViterbiLookup), and the [trellis](Layers)
/// whose candidates carry the route caches. Single-threaded
/// cooperative; every call returns synchronously.
pub struct TransitionCost<'a, R, M, V>
where
    R: RoadReader,
    M: ModeCosting,
    V: ViterbiLookup,
{
    reader: &'a R,
    costing: &'a M,
    viterbi: &'a V,
    layers: &'a Layers,

    turn_costs: TurnCostTable,
    inv_beta: f64,
    config: TransitionConfig,
}

impl<'a, R, M, V> TransitionCost<'a, R, M, V>
where
    R: RoadReader,
    M: ModeCosting,
    V: ViterbiLookup,
{
    /// Builds the model, validating the configuration and
    /// precomputing `1/β` and the turn cost table.
    pub fn new(
        config: TransitionConfig,
        reader: &'a R,
        costing: &'a M,
        viterbi: &'a V,
        layers: &'a Layers,
    ) -> Result<Self, MatchError> {
        config.validate()?;

        Ok(Self {
            reader,
            costing,
            viterbi,
            layers,
            turn_costs: TurnCostTable::new(config.turn_penalty_factor),
            inv_beta: config.beta.recip(),
            config,
        })
    }

    /// The configuration the model was built with.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// The turn cost table shared with the expander.
    pub fn turn_costs(&self) -> &TurnCostTable {
        &self.turn_costs
    }

    /// The transition cost of moving from `lhs` to `rhs`.
    ///
    /// Routes the left candidate on first use, then answers from its
    /// cache. Returns a non-negative finite cost, or
    /// [`NO_TRANSITION`] when `rhs` was unreachable within budget.
    ///
    /// Panics when `lhs` has a Viterbi predecessor whose candidate
    /// has not been routed yet; the driver must route columns in time
    /// order.
    pub fn cost(&self, lhs: CandidateId, rhs: CandidateId) -> f64 {
        let left = self
            .layers
            .candidate(lhs)
            .expect("left candidate not found in trellis");

        if !left.routed() {
            self.update_route(lhs, rhs);
        }

        let Some(label) = left.last_label(rhs) else {
            return NO_TRANSITION;
        };

        let left_meas = self
            .layers
            .measurement(lhs.layer)
            .expect("left measurement not found in trellis");
        let right_meas = self
            .layers
            .measurement(rhs.layer)
            .expect("right measurement not found in trellis");

        calculate_transition_cost(
            label.turn_cost,
            label.cost.cost,
            great_circle(left_meas.position, right_meas.position),
            label.cost.secs,
            left_meas.clock_distance(right_meas),
            self.inv_beta,
        )
    }

    /// The expander's distance and time ceilings for a transition
    /// spanning `gc` meters and `clk` seconds.
    ///
    /// The distance budget never exceeds the breakage distance.
    pub(crate) fn ceilings(&self, gc: f64, clk: f64) -> (f64, f64) {
        let max_distance = (gc * self.config.max_route_distance_factor)
            .min(self.config.breakage_distance)
            .ceil();
        let max_time = (clk * self.config.max_route_time_factor).ceil();

        (max_distance, max_time)
    }

    /// Routes `lhs` to every right-column candidate the Viterbi
    /// search has not reached yet, and persists the results on the
    /// left candidate.
    fn update_route(&self, lhs: CandidateId, rhs: CandidateId) {
        let left = self
            .layers
            .candidate(lhs)
            .expect("left candidate not found in trellis");

        // The arrival label of the previous transition seeds the turn
        // angle at this search's origin. Its existence is the
        // driver's contract: predecessors route before successors.
        let inbound = match self.viterbi.predecessor(lhs) {
            Some(pred) => {
                let pred_state = self
                    .layers
                    .candidate(pred)
                    .expect("predecessor candidate not found in trellis");

                if !pred_state.routed() {
                    panic!("predecessor {pred:?} of {lhs:?} is not yet routed");
                }

                pred_state.last_label(lhs)
            }
            None => None,
        };

        let right_layer = self
            .layers
            .layer(rhs.layer)
            .expect("right layer not found in trellis");
        let left_meas = self
            .layers
            .measurement(lhs.layer)
            .expect("left measurement not found in trellis");
        let right_meas = right_layer.origin();

        // Destinations: every right candidate nothing has reached
        // yet, with the origin prepended at index zero.
        let mut locations = Vec::with_capacity(right_layer.len() + 1);
        locations.push(left.location());

        let mut unreached = Vec::with_capacity(right_layer.len());
        for candidate in right_layer.candidates() {
            if self.viterbi.predecessor(candidate.id()).is_none() {
                locations.push(candidate.location());
                unreached.push(candidate.id());
            }
        }

        let gc = great_circle(left_meas.position, right_meas.position);
        let clk = left_meas.clock_distance(right_meas);
        let (max_distance, max_time) = self.ceilings(gc, clk);

        debug!(
            "routing {lhs:?}: {} unreached destination(s), {max_distance:.0}m / {max_time:.0}s ceilings",
            unreached.len()
        );

        // Coincident measurements yield a zero distance budget; the
        // floor keeps the label set able to hold zero-length arrivals.
        let mut labels = LabelSet::new(max_distance.max(1.0));
        let approximator = DistanceApproximator::new(right_meas.position);

        let results = Expander::new(self.reader, self.costing, &self.turn_costs).search(
            &locations,
            0,
            &mut labels,
            &approximator,
            right_meas.search_radius,
            inbound,
            max_distance,
            max_time,
        );

        left.set_route(&unreached, &results[1..], Arc::new(labels));
    }
}
