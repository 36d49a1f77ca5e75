use crate::geo::fold_angle;

/// Half-life, in degrees, of the turn penalty decay.
const DECAY_DEGREES: f64 = 45.0;

/// Precomputed turn penalties per integer degree of turn angle.
///
/// Index `i` holds `turn_penalty_factor * exp(-i / 45)`: a zero-degree
/// continuation pays the full factor, a U-turn decays to
/// `factor * e^-4`. A zero factor yields an all-zero table, disabling
/// angular costing entirely.
///
/// Lookups fold the queried angle into `[0, 180]` and round to the
/// nearest degree, so callers may pass raw bearing differences.
#[derive(Clone, Debug)]
pub struct TurnCostTable {
    factor: f64,
    table: [f64; 181],
}

impl TurnCostTable {
    pub fn new(turn_penalty_factor: f64) -> Self {
        let mut table = [0.0; 181];

        if turn_penalty_factor != 0.0 {
            for (degree, entry) in table.iter_mut().enumerate() {
                *entry = turn_penalty_factor * (-(degree as f64) / DECAY_DEGREES).exp();
            }
        }

        Self {
            factor: turn_penalty_factor,
            table,
        }
    }

    /// The penalty factor this table was built with.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Penalty for a turn of `angle` degrees.
    #[inline]
    pub fn cost(&self, angle: f64) -> f64 {
        self.table[fold_angle(angle).round() as usize]
    }

    /// The raw per-degree table.
    pub fn as_slice(&self) -> &[f64] {
        &self.table
    }
}
