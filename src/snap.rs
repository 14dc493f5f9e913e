//! Placing newly activated actors onto the graph.

use glam::{Vec2, Vec3};
use log::{debug, warn};

use crate::actor::ActorState;
use crate::direction::EdgeDir;
use crate::graph::{EdgeId, PathGraph};
use crate::terrain::HeightProjector;

/// The closest point of the graph to some query position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePoint {
    /// Edge the point lies on.
    pub edge: EdgeId,
    /// Fraction along that edge.
    pub t: f32,
    /// The point itself on the ground plane.
    pub point: Vec2,
    /// Distance from the query position.
    pub distance: f32,
}

/// Finds the nearest point on a graph.
pub trait NearestPointQuery {
    /// Nearest point to `position`, or `None` if nothing qualifies.
    fn nearest_point(&self, graph: &PathGraph, position: Vec2) -> Option<EdgePoint>;
}

/// Projects onto every edge and keeps the closest, ties going to the lowest
/// edge id.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeProjection {
    /// Points farther than this are ignored.
    pub max_distance: Option<f32>,
}

impl NearestPointQuery for EdgeProjection {
    fn nearest_point(&self, graph: &PathGraph, position: Vec2) -> Option<EdgePoint> {
        let mut best: Option<EdgePoint> = None;
        for edge in graph.edges() {
            let (t, point) = edge.project(position);
            let distance = point.distance(position);
            if self.max_distance.is_some_and(|max| distance > max) {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(EdgePoint {
                    edge: edge.id,
                    t,
                    point,
                    distance,
                });
            }
        }
        best
    }
}

/// Snaps `state` onto the nearest edge.
///
/// On success the actor travels forward along the edge, faces the edge's
/// cardinal direction and is moved to the projected point. Returns `false`
/// and leaves `state` untouched when the graph is empty or the query finds
/// nothing.
pub fn snap_to_graph(
    state: &mut ActorState,
    graph: &PathGraph,
    query: &dyn NearestPointQuery,
    terrain: &dyn HeightProjector,
) -> bool {
    if graph.is_empty() {
        return false;
    }
    let Some(found) = query.nearest_point(graph, state.ground()) else {
        warn!("no edge near {:?}; actor left unsnapped", state.position);
        return false;
    };
    let Some(edge) = graph.edge(found.edge) else {
        warn!("nearest-point query returned unknown edge {:?}", found.edge);
        return false;
    };

    state.current_edge = Some(edge.id);
    state.edge_t = found.t.clamp(0.0, 1.0);
    state.edge_dir = EdgeDir::Forward;
    state.heading = edge.cardinal;
    state.is_moving = true;
    let point = edge.point_at(state.edge_t);
    state.position = Vec3::new(point.x, terrain.height_at(point.x, point.y), point.y);
    debug!(
        "snapped actor to {:?} at t={:.3} heading {:?}",
        edge.id, state.edge_t, state.heading
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Cardinal;
    use crate::terrain::FlatTerrain;
    use approx::assert_relative_eq;

    fn l_shape() -> PathGraph {
        let mut builder = PathGraph::builder();
        builder
            .segment(Vec2::ZERO, Vec2::new(10.0, 0.0))
            .segment(Vec2::new(10.0, 0.0), Vec2::new(10.0, -10.0));
        builder.build().expect("valid graph")
    }

    #[test]
    fn snaps_to_nearest_edge() {
        let graph = l_shape();
        let mut state = ActorState::new(Vec3::new(9.0, 4.0, -6.0));
        state.edge_dir = EdgeDir::Backward;
        assert!(snap_to_graph(
            &mut state,
            &graph,
            &EdgeProjection::default(),
            &FlatTerrain(2.0)
        ));
        assert_eq!(state.current_edge, Some(EdgeId(1)));
        assert_relative_eq!(state.edge_t, 0.6);
        assert_eq!(state.edge_dir, EdgeDir::Forward);
        assert_eq!(state.heading, Cardinal::North);
        assert_relative_eq!(state.position.x, 10.0);
        assert_relative_eq!(state.position.y, 2.0);
        assert_relative_eq!(state.position.z, -6.0);
    }

    #[test]
    fn empty_graph_leaves_actor_untouched() {
        let mut state = ActorState::new(Vec3::new(1.0, 0.0, 1.0));
        let before = state.clone();
        assert!(!snap_to_graph(
            &mut state,
            &PathGraph::empty(),
            &EdgeProjection::default(),
            &FlatTerrain::default()
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn max_distance_filters_far_edges() {
        let graph = l_shape();
        let mut state = ActorState::new(Vec3::new(-50.0, 0.0, 50.0));
        let query = EdgeProjection {
            max_distance: Some(5.0),
        };
        assert!(!snap_to_graph(&mut state, &graph, &query, &FlatTerrain::default()));
        assert!(!state.is_snapped());
    }

    #[test]
    fn ties_go_to_lowest_edge() {
        let graph = l_shape();
        let corner = EdgeProjection::default()
            .nearest_point(&graph, Vec2::new(10.0, 0.0))
            .expect("corner is on the graph");
        assert_eq!(corner.edge, EdgeId(0));
        assert_relative_eq!(corner.t, 1.0);
    }
}
