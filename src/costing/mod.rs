//! Mode costing is the seam between the expander and a travel mode.
//!
//! The expander asks a [`ModeCosting`] whether an edge may be
//! traversed, what traversing it costs, and what an edge-to-edge turn
//! costs beyond the angular table. Swapping the mode object swaps the
//! vehicle without touching the search.

#[doc(hidden)]
pub mod default;
#[doc(hidden)]
pub mod turn;

#[doc(inline)]
pub use default::DistanceCosting;
#[doc(inline)]
pub use turn::TurnCostTable;

use std::ops::{Add, AddAssign};

use crate::graph::EdgeView;

/// A routing cost accumulator: the mode's unitless
/// [cost](#field.cost), monotonic in path length, alongside the
/// travel time in [seconds](#field.secs).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cost {
    pub cost: f64,
    pub secs: f64,
}

impl Cost {
    pub fn new(cost: f64, secs: f64) -> Self {
        Self { cost, secs }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Both accumulators scaled by `fraction`, for partial edges.
    #[inline]
    pub fn scaled(&self, fraction: f64) -> Self {
        Self {
            cost: self.cost * fraction,
            secs: self.secs * fraction,
        }
    }
}

impl Add for Cost {
    type Output = Cost;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Cost {
            cost: self.cost + rhs.cost,
            secs: self.secs + rhs.secs,
        }
    }
}

impl AddAssign for Cost {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.cost += rhs.cost;
        self.secs += rhs.secs;
    }
}

/// Routing costs for one travel mode.
///
/// Shared by reference and treated as immutable for the duration of a
/// trace.
pub trait ModeCosting {
    /// Whether the mode may traverse this edge at all.
    fn allowed(&self, edge: &EdgeView) -> bool;

    /// Cost and travel time of traversing the whole edge.
    fn edge_cost(&self, edge: &EdgeView) -> Cost;

    /// Mode-specific penalty for turning off `prev` onto `next` at
    /// `angle` degrees, added on top of the angular table.
    fn turn_cost(&self, prev: &EdgeView, next: &EdgeView, angle: f64) -> f64;
}

impl<M> ModeCosting for &M
where
    M: ModeCosting,
{
    #[inline]
    fn allowed(&self, edge: &EdgeView) -> bool {
        (**self).allowed(edge)
    }

    #[inline]
    fn edge_cost(&self, edge: &EdgeView) -> Cost {
        (**self).edge_cost(edge)
    }

    #[inline]
    fn turn_cost(&self, prev: &EdgeView, next: &EdgeView, angle: f64) -> f64 {
        (**self).turn_cost(prev, next, angle)
    }
}
