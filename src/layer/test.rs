#![cfg(test)]

use approx::assert_ulps_eq;
use geo::wkt;

use crate::candidate::{CandidateId, PathLocation};
use crate::graph::EdgeIx;
use crate::layer::{Layers, Measurement};

fn measurement(epoch_secs: f64) -> Measurement {
    Measurement::new(wkt! { POINT(151.19 -33.88) }, epoch_secs, 50.0)
}

fn locations(count: usize) -> Vec<PathLocation> {
    (0..count)
        .map(|index| {
            PathLocation::on_edge(wkt! { POINT(151.19 -33.88) }, EdgeIx::new(index), 0.25)
        })
        .collect()
}

#[test]
fn push_assigns_ids_in_trace_order() {
    let mut layers = Layers::new();

    assert_eq!(layers.push(measurement(0.0), locations(2)), 0);
    assert_eq!(layers.push(measurement(10.0), locations(3)), 1);
    assert_eq!(layers.len(), 2);

    let second = layers.layer(1).expect("second layer");
    assert_eq!(second.len(), 3);

    for (index, candidate) in second.candidates().iter().enumerate() {
        assert_eq!(candidate.id(), CandidateId::new(1, index as u32));
    }
}

#[test]
fn getters_resolve_by_id() {
    let mut layers = Layers::new();
    layers.push(measurement(0.0), locations(1));
    layers.push(measurement(10.0), locations(2));

    let id = CandidateId::new(1, 1);
    assert_eq!(layers.candidate(id).expect("candidate").id(), id);

    assert!(layers.candidate(CandidateId::new(1, 2)).is_none());
    assert!(layers.candidate(CandidateId::new(2, 0)).is_none());
    assert!(layers.layer(2).is_none());

    assert_ulps_eq!(layers.measurement(1).expect("measurement").epoch_secs, 10.0);
    assert_eq!(layers.first().expect("first").len(), 1);
    assert_eq!(layers.last().expect("last").len(), 2);
}

#[test]
fn clock_distance_is_elapsed_seconds() {
    let earlier = measurement(100.0);
    let later = measurement(130.0);

    assert_ulps_eq!(earlier.clock_distance(&later), 30.0);
    assert_ulps_eq!(earlier.clock_distance(&earlier), 0.0);
}
