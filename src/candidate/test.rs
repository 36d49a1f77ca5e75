#![cfg(test)]

use std::sync::Arc;

use geo::Point;
use smallvec::smallvec;

use crate::candidate::{Candidate, CandidateId, EdgeProjection, PathLocation, Side};
use crate::costing::Cost;
use crate::graph::EdgeIx;
use crate::primitives::{Label, LabelSet};

fn location() -> PathLocation {
    PathLocation::new(
        Point::new(151.19, -33.88),
        smallvec![EdgeProjection {
            edge: EdgeIx::new(0),
            percent_along: 0.5,
            side: Side::Neither,
        }],
    )
}

fn label_set_with(costs: &[f64]) -> Arc<LabelSet> {
    let mut labels = LabelSet::new(1_000.0);

    for (index, cost) in costs.iter().enumerate() {
        let label = Label {
            edge: EdgeIx::new(index),
            predecessor: None,
            cost: Cost::new(*cost, *cost / 10.0),
            distance: *cost,
            turn_cost: 0.0,
        };

        labels.put(label, *cost, None);
    }

    Arc::new(labels)
}

#[test]
fn routing_fills_the_cache_once() {
    let candidate = Candidate::new(CandidateId::new(0, 0), location());
    assert!(!candidate.routed());
    assert!(candidate.label_set().is_none());

    let targets = [CandidateId::new(1, 0), CandidateId::new(1, 1)];
    let results = [Some(0), None];
    candidate.set_route(&targets, &results, label_set_with(&[42.0]));

    assert!(candidate.routed());

    let reached = candidate.last_label(targets[0]).expect("reached target");
    assert_eq!(reached.cost.cost, 42.0);

    // The second target was unreached, so the cache misses.
    assert!(candidate.last_label(targets[1]).is_none());
}

#[test]
#[should_panic(expected = "routed twice")]
fn routing_twice_is_a_bug() {
    let candidate = Candidate::new(CandidateId::new(0, 0), location());

    candidate.set_route(&[], &[], label_set_with(&[]));
    candidate.set_route(&[], &[], label_set_with(&[]));
}

#[test]
fn label_set_is_held_by_shared_ownership() {
    let candidate = Candidate::new(CandidateId::new(0, 0), location());
    candidate.set_route(
        &[CandidateId::new(1, 0)],
        &[Some(0)],
        label_set_with(&[7.0]),
    );

    let first = candidate.label_set().expect("routed");
    let second = candidate.label_set().expect("routed");
    assert!(Arc::ptr_eq(&first, &second));

    // Labels resolved through the cache stay valid through the Arc.
    assert_eq!(first.label(0).cost.cost, 7.0);
}

#[test]
fn ids_order_by_layer_then_index() {
    let mut ids = vec![
        CandidateId::new(1, 0),
        CandidateId::new(0, 2),
        CandidateId::new(0, 0),
        CandidateId::new(1, 1),
    ];
    ids.sort();

    assert_eq!(
        ids,
        vec![
            CandidateId::new(0, 0),
            CandidateId::new(0, 2),
            CandidateId::new(1, 0),
            CandidateId::new(1, 1),
        ]
    );
}
