use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// The numeric knobs of the transition costing model, fixed at
/// construction.
///
/// Any tree-shaped configuration source flattens into this struct
/// before the model is built; every field has a serving default, so a
/// partial document deserialises cleanly.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Scale of the transition-cost Laplace term. Larger values
    /// forgive larger detours. Must be strictly positive.
    pub beta: f64,

    /// Hard ceiling, in meters, on any single route search. Beyond
    /// it the matcher declares a breakage.
    pub breakage_distance: f64,

    /// Multiplier on the great-circle distance forming the
    /// per-transition distance budget.
    pub max_route_distance_factor: f64,

    /// Multiplier on the inter-measurement elapsed time forming the
    /// per-transition time budget.
    pub max_route_time_factor: f64,

    /// Amplitude of the turn-angle penalty. Zero disables angular
    /// costing. Must be non-negative.
    pub turn_penalty_factor: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            beta: 3.0,
            breakage_distance: 2_000.0,
            max_route_distance_factor: 5.0,
            max_route_time_factor: 5.0,
            turn_penalty_factor: 0.0,
        }
    }
}

impl TransitionConfig {
    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.beta <= 0.0 || self.beta.is_nan() {
            return Err(MatchError::InvalidBeta(self.beta));
        }

        if self.turn_penalty_factor < 0.0 || self.turn_penalty_factor.is_nan() {
            return Err(MatchError::InvalidTurnPenalty(self.turn_penalty_factor));
        }

        Ok(())
    }
}
