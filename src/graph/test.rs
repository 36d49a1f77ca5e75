#![cfg(test)]

use approx::assert_relative_eq;
use geo::{Destination, Haversine, Point};

use crate::candidate::Side;
use crate::graph::{RoadGraph, RoadReader};

fn anchor() -> Point {
    Point::new(151.19, -33.88)
}

fn east(from: Point, meters: f64) -> Point {
    Haversine.destination(from, 90.0, meters)
}

fn north(from: Point, meters: f64) -> Point {
    Haversine.destination(from, 0.0, meters)
}

#[test]
fn edge_views_carry_derived_geometry() {
    let mut graph = RoadGraph::new();
    let a = graph.add_node(anchor());
    let b = graph.add_node(east(anchor(), 100.0));
    let (forward, backward) = graph.add_edge_pair(a, b, 10.0);

    let view = graph.edge(forward).expect("forward edge");
    assert_eq!(view.source, a);
    assert_eq!(view.target, b);
    assert_relative_eq!(view.length, 100.0, max_relative = 1e-6);
    assert_relative_eq!(view.start_bearing, 90.0, epsilon = 1e-2);

    let reverse = graph.edge(backward).expect("backward edge");
    assert_eq!(reverse.source, b);
    assert_relative_eq!(
        reverse.start_bearing.rem_euclid(360.0),
        270.0,
        epsilon = 1e-2
    );

    assert_eq!(graph.leaving(a).len(), 1);
    assert_eq!(graph.leaving(b).len(), 1);
    assert_eq!(graph.size(), 2);
}

#[test]
fn projection_finds_both_directions_of_a_way() {
    let mut graph = RoadGraph::new();
    let a = graph.add_node(anchor());
    let b = graph.add_node(east(anchor(), 100.0));
    graph.add_edge_pair(a, b, 10.0);

    let midpoint = east(anchor(), 50.0);
    let off_road = north(midpoint, 10.0);

    let projected = graph.nearest_projected(off_road, 30.0).collect::<Vec<_>>();
    assert_eq!(projected.len(), 2);

    for (_, position, percent_along, _) in &projected {
        assert_relative_eq!(*percent_along, 0.5, epsilon = 1e-3);
        assert_relative_eq!(
            crate::geo::great_circle(*position, midpoint),
            0.0,
            epsilon = 1.0
        );
    }

    // Looking along the travel direction, the point sits on opposite
    // sides of the two directed edges.
    let sides = projected.iter().map(|(_, _, _, side)| *side).collect::<Vec<_>>();
    assert!(sides.contains(&Side::Left));
    assert!(sides.contains(&Side::Right));
}

#[test]
fn projection_respects_the_search_radius() {
    let mut graph = RoadGraph::new();
    let a = graph.add_node(anchor());
    let b = graph.add_node(east(anchor(), 100.0));
    graph.add_edge_pair(a, b, 10.0);

    let off_road = north(east(anchor(), 50.0), 10.0);

    assert_eq!(graph.nearest_projected(off_road, 5.0).count(), 0);
    assert!(graph.path_location(off_road, 5.0).is_none());
}

#[test]
fn path_location_snaps_to_the_nearest_edge() {
    let mut graph = RoadGraph::new();

    // Two parallel east-west roads, forty meters apart.
    let a = graph.add_node(anchor());
    let b = graph.add_node(east(anchor(), 200.0));
    graph.add_edge_pair(a, b, 10.0);

    let c = graph.add_node(north(anchor(), 40.0));
    let d = graph.add_node(east(north(anchor(), 40.0), 200.0));
    graph.add_edge_pair(c, d, 10.0);

    // Ten meters north of the southern road.
    let position = north(east(anchor(), 100.0), 10.0);
    let location = graph.path_location(position, 50.0).expect("in range");

    // Both roads are in range, both directions each.
    assert_eq!(location.edges.len(), 4);

    // The snapped position is the southern road's projection.
    let expected = east(anchor(), 100.0);
    assert_relative_eq!(
        crate::geo::great_circle(location.position, expected),
        0.0,
        epsilon = 1.0
    );
}
