use std::fmt;

/// Failures surfaced by the transition costing core.
///
/// Only configuration is fallible here; an unreachable destination is
/// not an error (it is the
/// [`NO_TRANSITION`](crate::transition::NO_TRANSITION) sentinel), and
/// contract violations by the driver are programmer errors that
/// panic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchError {
    /// β must be strictly positive; it scales the Laplace term.
    InvalidBeta(f64),

    /// The turn penalty factor must be non-negative.
    InvalidTurnPenalty(f64),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::InvalidBeta(beta) => {
                write!(f, "beta must be strictly positive, got {beta}")
            }
            MatchError::InvalidTurnPenalty(factor) => {
                write!(f, "turn penalty factor must be non-negative, got {factor}")
            }
        }
    }
}

impl std::error::Error for MatchError {}
