//! Graph fixtures and invariant checks shared by the integration tests.
use glam::Vec2;
use pathchase::{ActorState, MovementSystem, PathGraph};

/// Builds a graph from axis-aligned segments.
///
/// # Panics
/// Panics if the segments do not form a valid graph.
#[must_use]
pub fn graph_from_segments(segments: &[(Vec2, Vec2)]) -> PathGraph {
    let mut builder = PathGraph::builder();
    for &(start, end) in segments {
        builder.segment(start, end);
    }
    builder.build().expect("fixture segments form a valid graph")
}

/// A `+` junction centred on the origin with arms of length `arm`.
///
/// Edge ids: 0 east, 1 west, 2 north, 3 south, all leaving the centre.
///
/// # Examples
/// ```
/// use test_utils::plus_junction;
/// let graph = plus_junction(10.0);
/// assert_eq!(graph.edges().len(), 4);
/// ```
#[must_use]
pub fn plus_junction(arm: f32) -> PathGraph {
    graph_from_segments(&[
        (Vec2::ZERO, Vec2::new(arm, 0.0)),
        (Vec2::ZERO, Vec2::new(-arm, 0.0)),
        (Vec2::ZERO, Vec2::new(0.0, -arm)),
        (Vec2::ZERO, Vec2::new(0.0, arm)),
    ])
}

/// A `T` junction: a south stem from `(0, 10)` up to the origin, with arms
/// running east and west from there. There is no way north.
///
/// Edge ids: 0 stem (heading north), 1 east arm, 2 west arm.
#[must_use]
pub fn t_junction() -> PathGraph {
    graph_from_segments(&[
        (Vec2::new(0.0, 10.0), Vec2::ZERO),
        (Vec2::ZERO, Vec2::new(10.0, 0.0)),
        (Vec2::ZERO, Vec2::new(-10.0, 0.0)),
    ])
}

/// Two collinear edges: `(0,0)-(10,0)` then `(10,0)-(15,0)`.
#[must_use]
pub fn corridor() -> PathGraph {
    graph_from_segments(&[
        (Vec2::ZERO, Vec2::new(10.0, 0.0)),
        (Vec2::new(10.0, 0.0), Vec2::new(15.0, 0.0)),
    ])
}

/// A single east-running edge of length `length` from the origin.
#[must_use]
pub fn single_edge(length: f32) -> PathGraph {
    graph_from_segments(&[(Vec2::ZERO, Vec2::new(length, 0.0))])
}

/// Checks the per-actor guarantees that hold after every frame.
///
/// # Panics
/// Panics with a description of the first violated guarantee.
pub fn assert_actor_invariants(graph: &PathGraph, state: &ActorState) {
    let Some(id) = state.current_edge else {
        return;
    };
    let edge = graph
        .edge(id)
        .unwrap_or_else(|| panic!("{id:?} is not an edge of the graph"));
    assert!(
        (0.0..=1.0).contains(&state.edge_t),
        "edge_t {} left [0, 1]",
        state.edge_t
    );
    assert_eq!(
        state.heading,
        edge.heading(state.edge_dir),
        "heading disagrees with {:?} travelled {:?}",
        edge.id,
        state.edge_dir
    );
    let expected = edge.point_at(state.edge_t);
    approx::assert_abs_diff_eq!(state.ground().x, expected.x, epsilon = 1e-3);
    approx::assert_abs_diff_eq!(state.ground().y, expected.y, epsilon = 1e-3);
}

/// Runs [`assert_actor_invariants`] over every actor in `system`.
///
/// # Panics
/// Panics if any actor violates an invariant.
pub fn assert_system_invariants(system: &MovementSystem) {
    let graph = system.graph();
    let states = system
        .pursuers()
        .iter()
        .map(|p| &p.state)
        .chain(system.evaders().iter().map(|e| &e.state));
    for state in states {
        assert_actor_invariants(graph, state);
    }
}
