//! Continuous movement along the current edge.
//!
//! [`advance_along_edge`] moves an actor's `edge_t` and reports when a node
//! boundary is crossed; the caller then consults a decision engine and, for
//! pursuers, hands the leftover distance to [`carry_overshoot`]. Finally
//! [`place_on_edge`] turns `edge_t` back into a world position.

use glam::Vec3;
use log::trace;

use crate::actor::ActorState;
use crate::direction::EdgeDir;
use crate::graph::{Edge, Exit, NodeId, PathGraph};
use crate::terrain::HeightProjector;

/// A node boundary crossed during one advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    /// Node reached.
    pub node: NodeId,
    /// How far past the boundary the raw `edge_t` went, in the old edge's
    /// `t` units. Always non-negative.
    pub overshoot: f32,
    /// Length of the edge that was left.
    pub edge_length: f32,
}

/// Advances `state` along `edge` by `speed × dt`.
///
/// `speed` is resolved by the caller each frame, so tunable changes apply
/// immediately.
///
/// Returns `None` while the actor stays within `[0, 1]`. When the raw
/// `edge_t` leaves that range, `edge_t` is clamped to the boundary and the
/// crossing is returned. Non-positive or non-finite `dt` and non-positive
/// speed leave the state unchanged.
pub fn advance_along_edge(
    state: &mut ActorState,
    edge: &Edge,
    speed: f32,
    dt: f32,
) -> Option<Arrival> {
    if !(dt.is_finite() && dt > 0.0 && speed > 0.0) {
        return None;
    }
    let move_distance = speed * dt;
    let t_delta = move_distance / edge.length * state.edge_dir.sign();
    let raw = state.edge_t + t_delta;
    trace!("{:?}: edge_t {:.4} -> {raw:.4}", edge.id, state.edge_t);

    if raw > 1.0 {
        state.edge_t = 1.0;
        Some(Arrival {
            node: edge.node_towards(EdgeDir::Forward),
            overshoot: raw - 1.0,
            edge_length: edge.length,
        })
    } else if raw < 0.0 {
        state.edge_t = 0.0;
        Some(Arrival {
            node: edge.node_towards(EdgeDir::Backward),
            overshoot: -raw,
            edge_length: edge.length,
        })
    } else {
        state.edge_t = raw;
        None
    }
}

/// Re-applies an arrival's overshoot on the edge just entered through `exit`.
///
/// The overshoot is rescaled by `old_length / new_length` so the distance
/// covered this frame is continuous across the node. The result is clamped,
/// so at most one node is crossed per frame.
pub fn carry_overshoot(state: &mut ActorState, arrival: Arrival, exit: Exit, new_edge: &Edge) {
    let carried = arrival.overshoot * (arrival.edge_length / new_edge.length);
    state.edge_t = (exit.entry_t() + carried * exit.edge_dir.sign()).clamp(0.0, 1.0);
}

/// Writes the world position for the actor's current `edge_t`.
///
/// Height comes from `terrain`. Unsnapped actors are left where they are.
pub fn place_on_edge(state: &mut ActorState, graph: &PathGraph, terrain: &dyn HeightProjector) {
    let Some(edge) = state.current_edge.and_then(|id| graph.edge(id)) else {
        return;
    };
    let ground = edge.point_at(state.edge_t);
    state.position = Vec3::new(ground.x, terrain.height_at(ground.x, ground.y), ground.y);
}
