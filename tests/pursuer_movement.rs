//! Pursuer node resolution driven through `MovementSystem`.
//!
//! Covers the queued > straight > live input > forced corner > stop
//! priority, overshoot carry-over between edges of different lengths, and
//! recovery from a dead end once a usable direction is queued.

use std::sync::Arc;

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use mockall::mock;
use mockall::predicate::eq;
use pathchase::{
    Cardinal, ChaseConfig, EdgeDir, EdgeId, InputQuery, LiveInput, MovementSystem, PathGraph,
    Pursuer,
};
use rstest::rstest;
use test_utils::{
    assert_system_invariants, corridor, graph_from_segments, plus_junction, single_edge,
    t_junction,
};

mock! {
    pub Pad {}
    impl InputQuery for Pad {
        fn live_input(&self, slot: usize) -> LiveInput;
    }
}

fn system_on(graph: PathGraph) -> MovementSystem {
    MovementSystem::new(Arc::new(graph), ChaseConfig::default())
}

fn pursuer(system: &MovementSystem, index: usize) -> &Pursuer {
    system.pursuer(index).expect("pursuer exists")
}

/// A pursuer on the west arm of a `+` junction, 0.5 units from the centre
/// and heading east towards it at the default speed of 6.
fn approaching_centre(system: &mut MovementSystem) -> usize {
    let index = system.spawn_pursuer(Vec3::new(-0.5, 0.0, 0.0));
    if let Some(p) = system.pursuer_mut(index) {
        p.state.reverse();
    }
    index
}

#[rstest]
#[case::queued_turn(Some(Cardinal::North), EdgeId(2), Cardinal::North)]
#[case::queued_reversal(Some(Cardinal::West), EdgeId(1), Cardinal::West)]
#[case::straight_on(None, EdgeId(0), Cardinal::East)]
fn node_priority_at_plus_junction(
    #[case] queued: Option<Cardinal>,
    #[case] edge: EdgeId,
    #[case] heading: Cardinal,
) {
    let mut system = system_on(plus_junction(10.0));
    let p = approaching_centre(&mut system);
    if let Some(dir) = queued {
        system.queue_direction(p, dir);
    }

    system.step(1.0);

    let state = &pursuer(&system, p).state;
    assert_eq!(state.current_edge, Some(edge));
    assert_eq!(state.heading, heading);
    assert_eq!(state.edge_dir, EdgeDir::Forward);
    // 6 units travelled, 0.5 of them before the centre.
    assert_relative_eq!(state.edge_t, 0.55, epsilon = 1e-5);
    assert!(pursuer(&system, p).queued.is_none());
    assert_system_invariants(&system);
}

#[test]
fn unmatched_queue_survives_straight_continuation() {
    let mut system = system_on(corridor());
    let p = system.spawn_pursuer(Vec3::new(8.0, 0.0, 0.0));
    system.queue_direction(p, Cardinal::North);

    system.step(1.0);

    let after = pursuer(&system, p);
    assert_eq!(after.state.current_edge, Some(EdgeId(1)));
    assert_eq!(after.state.heading, Cardinal::East);
    assert_relative_eq!(after.state.edge_t, 0.8, epsilon = 1e-5);
    assert_eq!(after.queued, Some(Cardinal::North));
}

#[test]
fn live_input_turns_at_a_t_junction() {
    let mut pad = MockPad::new();
    pad.expect_live_input()
        .with(eq(0))
        .times(1)
        .return_const(LiveInput::toward(Cardinal::West));
    let mut system = system_on(t_junction()).with_input(pad);
    // Stem runs north from (0, 10) to the junction.
    let p = system.spawn_pursuer(Vec3::new(0.0, 0.0, 9.0));
    assert_eq!(pursuer(&system, p).state.heading, Cardinal::North);

    system.step(2.0);

    let state = &pursuer(&system, p).state;
    assert_eq!(state.current_edge, Some(EdgeId(2)));
    assert_eq!(state.heading, Cardinal::West);
    assert_relative_eq!(state.edge_t, 0.3, epsilon = 1e-5);
    assert_relative_eq!(state.position.x, -3.0, epsilon = 1e-4);
    assert_relative_eq!(state.position.z, 0.0);
}

#[test]
fn live_input_is_ignored_while_straight_is_open() {
    let mut pad = MockPad::new();
    pad.expect_live_input().never();
    let mut system = system_on(plus_junction(10.0)).with_input(pad);
    let p = approaching_centre(&mut system);
    system.step(1.0);
    assert_eq!(pursuer(&system, p).state.heading, Cardinal::East);
}

#[test]
fn overshoot_carries_onto_a_shorter_edge() {
    let mut system = system_on(corridor());
    let p = system.spawn_pursuer(Vec3::new(8.0, 0.0, 0.0));
    if let Some(p) = system.pursuer_mut(p) {
        p.speed = Some(5.0);
    }

    system.step(1.0);

    let state = &pursuer(&system, p).state;
    assert_eq!(state.current_edge, Some(EdgeId(1)));
    assert_relative_eq!(state.edge_t, 0.6, epsilon = 1e-5);
    assert_relative_eq!(state.position.x, 13.0, epsilon = 1e-4);
}

#[test]
fn dead_end_stops_until_a_usable_turn_is_queued() {
    let mut system = system_on(single_edge(10.0));
    let p = system.spawn_pursuer(Vec3::new(5.0, 0.0, 0.0));

    system.step(1.0);
    let stopped = &pursuer(&system, p).state;
    assert!(!stopped.is_moving);
    assert_relative_eq!(stopped.edge_t, 1.0);
    assert_relative_eq!(stopped.position.x, 10.0);

    system.step(1.0);
    assert!(!pursuer(&system, p).state.is_moving);
    assert_relative_eq!(pursuer(&system, p).state.edge_t, 1.0);

    system.queue_direction(p, Cardinal::West);
    system.step(1.0);
    let resumed = pursuer(&system, p);
    assert!(resumed.state.is_moving);
    assert!(resumed.queued.is_none());
    assert_eq!(resumed.state.heading, Cardinal::West);
    assert_eq!(resumed.state.edge_dir, EdgeDir::Backward);
    assert_relative_eq!(resumed.state.edge_t, 0.4, epsilon = 1e-5);
    assert_system_invariants(&system);
}

#[test]
fn pursuers_read_their_own_input_slot() {
    let mut pad = MockPad::new();
    pad.expect_live_input()
        .with(eq(1))
        .times(1)
        .return_const(LiveInput::toward(Cardinal::East));
    let mut system = system_on(t_junction()).with_input(pad);
    // Slot 0 sits idle far down the stem; slot 1 reaches the junction.
    system.spawn_pursuer(Vec3::new(0.0, 0.0, 9.9));
    let near = system.spawn_pursuer(Vec3::new(0.0, 0.0, 1.0));
    if let Some(p) = system.pursuer_mut(0) {
        p.speed = Some(0.0);
    }

    system.step(1.0);

    assert_eq!(pursuer(&system, near).state.heading, Cardinal::East);
    assert_eq!(pursuer(&system, near).input_slot, 1);
}

#[test]
fn corner_is_taken_without_any_input() {
    let graph = graph_from_segments(&[
        (Vec2::ZERO, Vec2::new(10.0, 0.0)),
        (Vec2::new(10.0, 0.0), Vec2::new(10.0, -10.0)),
    ]);
    let mut system = system_on(graph);
    let p = system.spawn_pursuer(Vec3::new(8.0, 0.0, 0.0));

    system.step(1.0);

    let after = pursuer(&system, p);
    assert!(after.state.is_moving);
    assert_eq!(after.state.current_edge, Some(EdgeId(1)));
    assert_eq!(after.state.heading, Cardinal::North);
    // 6 units travelled, 2 of them before the corner.
    assert_relative_eq!(after.state.edge_t, 0.4, epsilon = 1e-5);
    assert_system_invariants(&system);
}
