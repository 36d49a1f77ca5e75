//! Geometric and temporal primitives shared by the
//! transition costing pipeline.


use geo::{Bearing, Distance, Haversine, Point};

/// Meters spanned by one degree of latitude.
pub(crate) const METERS_PER_DEGREE_LAT: f64 = 110_574.0;

/// Meters spanned by one degree of longitude at the equator.
pub(crate) const METERS_PER_DEGREE_LNG: f64 = 111_320.0;

/// Spherical arc length, in meters, between two positions.
///
/// Symmetric in its arguments; `great_circle(a, b) == great_circle(b, a)`.
#[inline]
pub fn great_circle(a: Point, b: Point) -> f64 {
    Haversine.distance(a, b)
}

/// Initial bearing, in degrees clockwise from due-north, of the
/// great-circle segment from `a` to `b`.
#[inline]
pub fn bearing(a: Point, b: Point) -> f64 {
    Haversine.bearing(a, b)
}

/// Folds an angle, in degrees, into the `[0, 180]` range.
///
/// Any signed or wrapped input maps onto the unsigned angular
/// difference it represents. `180.4` folds to `179.6`, `-0.3`
/// folds to `0.3`, `359.9` folds to `0.1`.
#[inline]
pub fn fold_angle(degrees: f64) -> f64 {
    let wrapped = degrees.abs() % 360.0;

    if wrapped > 180.0 {
        360.0 - wrapped
    } else {
        wrapped
    }
}

/// Unsigned angular difference between two bearings,
/// folded into `[0, 180]` degrees.
#[inline]
pub fn turn_angle(prev_bearing: f64, next_bearing: f64) -> f64 {
    fold_angle(next_bearing - prev_bearing)
}

/// A flat-earth distance approximator anchored at a fixed position.
///
/// Precomputes the meters-per-degree scale at the anchor's latitude so
/// repeated queries cost two multiplications and a square root. Accurate
/// to well under a percent at the sub-breakage distances the expander
/// operates over, which is all the tiebreaking heuristic requires; exact
/// distances always go through [`great_circle`].
#[derive(Clone, Copy, Debug)]
pub struct DistanceApproximator {
    anchor: Point,
    meters_per_lng: f64,
}

impl DistanceApproximator {
    pub fn new(anchor: Point) -> Self {
        let meters_per_lng = METERS_PER_DEGREE_LNG * anchor.y().to_radians().cos();

        Self {
            anchor,
            meters_per_lng,
        }
    }

    /// The anchor this approximator measures against.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Approximate meters between the anchor and `position`.
    #[inline]
    pub fn approx(&self, position: Point) -> f64 {
        let dx = (position.x() - self.anchor.x()) * self.meters_per_lng;
        let dy = (position.y() - self.anchor.y()) * METERS_PER_DEGREE_LAT;

        (dx * dx + dy * dy).sqrt()
    }
}
