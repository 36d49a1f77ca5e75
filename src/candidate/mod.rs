//! Candidates are the hidden states of the match: projections of a
//! measurement onto the road network, one column of them per
//! measurement. Each candidate additionally owns the route cache
//! filled the first time the matcher expands from it.

#[doc(hidden)]
mod test;

use std::cell::OnceCell;
use std::fmt::Debug;
use std::sync::Arc;

use geo::Point;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::graph::EdgeIx;
use crate::primitives::{Label, LabelSet};

/// Identifies a candidate within the trellis: the [layer](#field.layer)
/// it belongs to (the time column) and its [index](#field.index) within
/// that layer.
///
/// Ordering is lexicographic, layer first, so ids sort by time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId {
    pub layer: u32,
    pub index: u32,
}

impl CandidateId {
    pub fn new(layer: u32, index: u32) -> Self {
        Self { layer, index }
    }
}

/// Which side of a directed edge a projected position fell on,
/// looking along the direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Neither,
    Left,
    Right,
}

/// One directed edge a measurement was projected onto.
#[derive(Clone, Copy, Debug)]
pub struct EdgeProjection {
    pub edge: EdgeIx,

    /// Fraction of the edge travelled before reaching the projected
    /// position, in `[0, 1]`.
    pub percent_along: f64,

    pub side: Side,
}

/// The projection of a measurement onto the road network: a snapped
/// position plus the directed edges it may lie on.
///
/// Immutable once produced; the expander consumes locations as search
/// origins and destinations.
#[derive(Clone, Debug)]
pub struct PathLocation {
    pub position: Point,
    pub edges: SmallVec<[EdgeProjection; 2]>,
}

impl PathLocation {
    pub fn new(position: Point, edges: SmallVec<[EdgeProjection; 2]>) -> Self {
        Self { position, edges }
    }

    /// A location on a single edge.
    pub fn on_edge(position: Point, edge: EdgeIx, percent_along: f64) -> Self {
        Self {
            position,
            edges: smallvec![EdgeProjection {
                edge,
                percent_along,
                side: Side::Neither,
            }],
        }
    }
}

/// The labels persisted on a candidate once it has been routed.
struct RouteInfo {
    labels: Arc<LabelSet>,

    /// Best reached label, by index into [`labels`](#field.labels),
    /// for each right-neighbour candidate the expansion was aimed at.
    reached: FxHashMap<CandidateId, u32>,
}

impl Debug for RouteInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteInfo")
            .field("labels", &self.labels.len())
            .field("reached", &self.reached.len())
            .finish()
    }
}

/// A hidden state of the match: one projection of one measurement,
/// together with the route cache produced when the matcher first
/// expands from it.
///
/// The cache is a [`OnceCell`]: it fills exactly once, inside the
/// transition functor's route update, which is what makes repeated
/// `cost` calls against the same left candidate read-only.
#[derive(Debug)]
pub struct Candidate {
    id: CandidateId,
    location: PathLocation,
    route: OnceCell<RouteInfo>,
}

impl Candidate {
    pub fn new(id: CandidateId, location: PathLocation) -> Self {
        Self {
            id,
            location,
            route: OnceCell::new(),
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn location(&self) -> &PathLocation {
        &self.location
    }

    /// Whether this candidate has been routed to its right column yet.
    pub fn routed(&self) -> bool {
        self.route.get().is_some()
    }

    /// The label that reached `target` from this candidate, if the
    /// expansion got there within budget.
    pub fn last_label(&self, target: CandidateId) -> Option<Label> {
        let route = self.route.get()?;
        let index = *route.reached.get(&target)?;

        Some(*route.labels.label(index))
    }

    /// The full label set produced when this candidate was routed.
    ///
    /// Shared ownership: labels referenced through
    /// [`last_label`](Candidate::last_label) stay valid as long as any
    /// holder of the set survives.
    pub fn label_set(&self) -> Option<Arc<LabelSet>> {
        self.route.get().map(|route| Arc::clone(&route.labels))
    }

    /// Persists an expansion's results on this candidate, marking it
    /// routed. `targets` and `results` are the expander's parallel
    /// lists; unreached targets carry no entry.
    ///
    /// Panics if the candidate was already routed, or if the lists
    /// disagree in length; both are caller bugs.
    pub(crate) fn set_route(
        &self,
        targets: &[CandidateId],
        results: &[Option<u32>],
        labels: Arc<LabelSet>,
    ) {
        let reached = targets
            .iter()
            .zip_eq(results)
            .filter_map(|(target, result)| result.map(|index| (*target, index)))
            .collect::<FxHashMap<_, _>>();

        let info = RouteInfo { labels, reached };
        assert!(
            self.route.set(info).is_ok(),
            "candidate {:?} routed twice",
            self.id
        );
    }
}
