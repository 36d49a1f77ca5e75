//! Transition costing core for Hidden-Markov map matching.
//!
//! Given the candidate columns of a noisy trace, the
//! [`TransitionCost`] functor prices the move between a candidate at
//! one time step and a candidate at the next: one bounded
//! shortest-path expansion per left candidate, amortised across the
//! whole right column and cached on the left candidate thereafter.
//!
//! ### Example
//!
//! ```rust,no_run
//! use stitch::{
//!     CandidateId, DistanceCosting, Layers, PredecessorTable, RoadGraph, TransitionConfig,
//!     TransitionCost, NO_TRANSITION,
//! };
//!
//! fn price(graph: &RoadGraph, layers: &Layers) -> stitch::Result<()> {
//!     let costing = DistanceCosting;
//!     let viterbi = PredecessorTable::new();
//!
//!     let model =
//!         TransitionCost::new(TransitionConfig::default(), graph, &costing, &viterbi, layers)?;
//!
//!     let cost = model.cost(CandidateId::new(0, 0), CandidateId::new(1, 0));
//!     if cost == NO_TRANSITION {
//!         // The trace breaks between these columns.
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod candidate;
pub mod costing;
pub mod error;
pub mod geo;
pub mod graph;
pub mod layer;
pub mod primitives;
pub mod transition;
pub mod viterbi;

#[doc(inline)]
pub use candidate::{Candidate, CandidateId, EdgeProjection, PathLocation, Side};
#[doc(inline)]
pub use costing::{Cost, DistanceCosting, ModeCosting, TurnCostTable};
#[doc(inline)]
pub use error::MatchError;
#[doc(inline)]
pub use graph::{EdgeIx, EdgeView, NodeIx, RoadGraph, RoadReader};
#[doc(inline)]
pub use layer::{Layer, Layers, Measurement};
#[doc(inline)]
pub use primitives::{Expander, Label, LabelSet};
#[doc(inline)]
pub use transition::{calculate_transition_cost, TransitionConfig, TransitionCost, NO_TRANSITION};
#[doc(inline)]
pub use viterbi::{PredecessorTable, ViterbiLookup};

pub type Result<T> = std::result::Result<T, MatchError>;
