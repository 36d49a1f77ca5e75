//! Layers are the time columns of the match: one per measurement,
//! each holding the candidates that measurement projected onto the
//! network. The [`Layers`] container is the trellis the transition
//! functor walks, with constant-time access by layer index.

#[doc(hidden)]
mod test;

use geo::Point;

use crate::candidate::{Candidate, CandidateId, PathLocation};

/// A single positional observation.
///
/// Immutable once produced. The [search radius](#field.search_radius)
/// is the soft bound the expander uses to relax snapping around this
/// measurement's candidates.
#[derive(Clone, Copy, Debug)]
pub struct Measurement {
    /// Geographic coordinate as (lng, lat).
    pub position: Point,

    /// Observation time, in epoch seconds.
    pub epoch_secs: f64,

    /// Candidate search radius, in meters.
    pub search_radius: f64,
}

impl Measurement {
    pub fn new(position: Point, epoch_secs: f64, search_radius: f64) -> Self {
        Self {
            position,
            epoch_secs,
            search_radius,
        }
    }

    /// Elapsed seconds from this measurement to `other`.
    ///
    /// Measurements are time-ordered, so the result is non-negative
    /// for any later measurement; coincident fixes yield zero.
    #[inline]
    pub fn clock_distance(&self, other: &Measurement) -> f64 {
        other.epoch_secs - self.epoch_secs
    }
}

/// One time column: the measurement it observes and every candidate
/// it projected onto the network.
pub struct Layer {
    origin: Measurement,
    candidates: Vec<Candidate>,
}

impl Layer {
    /// The measurement this layer was generated from.
    pub fn origin(&self) -> &Measurement {
        &self.origin
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, index: u32) -> Option<&Candidate> {
        self.candidates.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// The trellis: all layers of a trace in time order.
///
/// Owned by the matcher; the transition functor reads it by
/// reference. Destroying the trellis destroys its candidates and
/// releases their label sets.
#[derive(Default)]
pub struct Layers {
    layers: Vec<Layer>,
}

impl Layers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next time column, assigning candidate ids within
    /// it. Layers must be pushed in trace order.
    pub fn push(&mut self, origin: Measurement, locations: Vec<PathLocation>) -> u32 {
        let layer = self.layers.len() as u32;

        let candidates = locations
            .into_iter()
            .enumerate()
            .map(|(index, location)| {
                Candidate::new(CandidateId::new(layer, index as u32), location)
            })
            .collect();

        self.layers.push(Layer {
            origin,
            candidates,
        });

        layer
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The column at `layer`. O(1).
    pub fn layer(&self, layer: u32) -> Option<&Layer> {
        self.layers.get(layer as usize)
    }

    /// The measurement observed at `layer`. O(1).
    pub fn measurement(&self, layer: u32) -> Option<&Measurement> {
        self.layer(layer).map(Layer::origin)
    }

    /// The candidate identified by `id`, if the trellis holds it.
    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.layer(id.layer)?.get(id.index)
    }

    pub fn first(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn last(&self) -> Option<&Layer> {
        self.layers.last()
    }
}
