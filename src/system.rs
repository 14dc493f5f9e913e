//! The movement system: one simulation's graph, actors and collaborators.
//!
//! [`MovementSystem`] replaces module-level wiring with an explicit context.
//! Hosts build one per simulation, spawn or hand over actors, and call
//! [`MovementSystem::step`] (or the per-actor advance methods) once per
//! frame. Nothing in here returns errors: missing graphs, unsnapped actors
//! and dead ends are steady states that simply leave actors where they are.

use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};

use crate::actor::{Evader, Pursuer};
use crate::config::ChaseConfig;
use crate::direction::Cardinal;
use crate::evader::{self, Surroundings};
use crate::graph::PathGraph;
use crate::input::{InputQuery, NoInput};
use crate::pursuer::{self, Resolution};
use crate::rng::{DecisionRng, SeededRng};
use crate::snap::{snap_to_graph, EdgeProjection, NearestPointQuery};
use crate::terrain::{FlatTerrain, HeightProjector};
use crate::traversal::{advance_along_edge, carry_overshoot, place_on_edge};

/// Identifies an actor within a [`MovementSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorId {
    /// Index into the pursuer list.
    Pursuer(usize),
    /// Index into the evader list.
    Evader(usize),
}

/// Ground positions captured before a frame's writes.
#[derive(Clone, Debug, Default, PartialEq)]
struct PositionSnapshot {
    pursuers: Vec<Vec2>,
    evaders: Vec<Option<Vec2>>,
}

impl PositionSnapshot {
    fn capture(pursuers: &[Pursuer], evaders: &[Evader]) -> Self {
        Self {
            pursuers: threatening(pursuers),
            evaders: evaders
                .iter()
                .map(|e| (!e.captured && e.state.is_snapped()).then(|| e.state.ground()))
                .collect(),
        }
    }

    fn peers_of(&self, index: usize) -> Vec<Vec2> {
        self.evaders
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .filter_map(|(_, p)| *p)
            .collect()
    }
}

fn threatening(pursuers: &[Pursuer]) -> Vec<Vec2> {
    pursuers
        .iter()
        .filter(|p| p.active && p.state.is_snapped())
        .map(|p| p.state.ground())
        .collect()
}

/// Graph, actors, tunables and collaborators for one chase simulation.
pub struct MovementSystem {
    graph: Arc<PathGraph>,
    config: ChaseConfig,
    pursuers: Vec<Pursuer>,
    evaders: Vec<Evader>,
    rng: Box<dyn DecisionRng + Send>,
    input: Box<dyn InputQuery + Send>,
    terrain: Box<dyn HeightProjector + Send>,
    nearest: Box<dyn NearestPointQuery + Send>,
}

impl fmt::Debug for MovementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovementSystem")
            .field("nodes", &self.graph.nodes().len())
            .field("edges", &self.graph.edges().len())
            .field("config", &self.config)
            .field("pursuers", &self.pursuers)
            .field("evaders", &self.evaders)
            .finish_non_exhaustive()
    }
}

impl MovementSystem {
    /// A system with no actors, a seed-0 random source, no live input, flat
    /// terrain at height zero and unbounded edge projection for snapping.
    #[must_use]
    pub fn new(graph: Arc<PathGraph>, config: ChaseConfig) -> Self {
        info!(
            "movement system wired to graph with {} nodes and {} edges",
            graph.nodes().len(),
            graph.edges().len()
        );
        Self {
            graph,
            config,
            pursuers: Vec::new(),
            evaders: Vec::new(),
            rng: Box::new(SeededRng::new(0)),
            input: Box::new(NoInput),
            terrain: Box::new(FlatTerrain::default()),
            nearest: Box::new(EdgeProjection::default()),
        }
    }

    /// One-shot wiring of graph, tunables, actor lists and live input.
    ///
    /// Actors are taken as given; call [`Self::snap_actor`] for any that
    /// still need placing.
    #[must_use]
    pub fn init(
        graph: Arc<PathGraph>,
        config: ChaseConfig,
        pursuers: Vec<Pursuer>,
        evaders: Vec<Evader>,
        input: impl InputQuery + Send + 'static,
    ) -> Self {
        let mut system = Self::new(graph, config).with_input(input);
        system.pursuers = pursuers;
        system.evaders = evaders;
        system
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_rng(mut self, rng: impl DecisionRng + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replaces the live input query.
    #[must_use]
    pub fn with_input(mut self, input: impl InputQuery + Send + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Replaces the terrain height projector.
    #[must_use]
    pub fn with_terrain(mut self, terrain: impl HeightProjector + Send + 'static) -> Self {
        self.terrain = Box::new(terrain);
        self
    }

    /// Replaces the nearest-point query used when snapping.
    #[must_use]
    pub fn with_nearest_query(mut self, query: impl NearestPointQuery + Send + 'static) -> Self {
        self.nearest = Box::new(query);
        self
    }

    /// The graph actors move on.
    #[must_use]
    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    /// Swaps in a new graph, unsnapping every actor.
    ///
    /// Edge identities do not carry across graphs, so actors must be snapped
    /// again before they move.
    pub fn set_graph(&mut self, graph: Arc<PathGraph>) {
        info!(
            "graph replaced ({} edges); unsnapping {} actors",
            graph.edges().len(),
            self.pursuers.len() + self.evaders.len()
        );
        self.graph = graph;
        let states = self
            .pursuers
            .iter_mut()
            .map(|p| &mut p.state)
            .chain(self.evaders.iter_mut().map(|e| &mut e.state));
        for state in states {
            state.current_edge = None;
            state.edge_t = 0.0;
        }
    }

    /// Current tunables.
    #[must_use]
    pub const fn config(&self) -> &ChaseConfig {
        &self.config
    }

    /// Replaces the tunables; the next frame reads the new values.
    pub fn set_config(&mut self, config: ChaseConfig) {
        debug!("config reloaded: {config:?}");
        self.config = config;
    }

    /// Mutable access to the tunables.
    pub fn config_mut(&mut self) -> &mut ChaseConfig {
        &mut self.config
    }

    /// All pursuers in update order.
    #[must_use]
    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    /// All evaders in update order.
    #[must_use]
    pub fn evaders(&self) -> &[Evader] {
        &self.evaders
    }

    /// Looks up a pursuer.
    #[must_use]
    pub fn pursuer(&self, index: usize) -> Option<&Pursuer> {
        self.pursuers.get(index)
    }

    /// Looks up an evader.
    #[must_use]
    pub fn evader(&self, index: usize) -> Option<&Evader> {
        self.evaders.get(index)
    }

    /// Mutable pursuer access for host-side tuning such as a speed override.
    pub fn pursuer_mut(&mut self, index: usize) -> Option<&mut Pursuer> {
        self.pursuers.get_mut(index)
    }

    /// Mutable evader access for host-side tuning such as a speed override.
    pub fn evader_mut(&mut self, index: usize) -> Option<&mut Evader> {
        self.evaders.get_mut(index)
    }

    /// Adds a pursuer without snapping it. Returns its index.
    pub fn add_pursuer(&mut self, pursuer: Pursuer) -> usize {
        self.pursuers.push(pursuer);
        self.pursuers.len() - 1
    }

    /// Adds an evader without snapping it. Returns its index.
    pub fn add_evader(&mut self, evader: Evader) -> usize {
        self.evaders.push(evader);
        self.evaders.len() - 1
    }

    /// Creates a pursuer at `position` reading the input slot equal to its
    /// index, and snaps it to the graph.
    pub fn spawn_pursuer(&mut self, position: Vec3) -> usize {
        let slot = self.pursuers.len();
        let index = self.add_pursuer(Pursuer::new(position, slot));
        self.snap_actor(ActorId::Pursuer(index));
        index
    }

    /// Creates an evader at `position` and snaps it to the graph.
    pub fn spawn_evader(&mut self, position: Vec3) -> usize {
        let index = self.add_evader(Evader::new(position));
        self.snap_actor(ActorId::Evader(index));
        index
    }

    /// Places an actor on the nearest point of the graph.
    ///
    /// Returns `false`, leaving the actor untouched, when the graph is empty,
    /// no edge qualifies, or `id` names no actor. A successful snap clears an
    /// evader's stall.
    pub fn snap_actor(&mut self, id: ActorId) -> bool {
        let graph = &self.graph;
        let query = self.nearest.as_ref();
        let terrain = self.terrain.as_ref();
        match id {
            ActorId::Pursuer(i) => self
                .pursuers
                .get_mut(i)
                .is_some_and(|p| snap_to_graph(&mut p.state, graph, query, terrain)),
            ActorId::Evader(i) => self.evaders.get_mut(i).is_some_and(|e| {
                let snapped = snap_to_graph(&mut e.state, graph, query, terrain);
                if snapped {
                    e.stalled = false;
                }
                snapped
            }),
        }
    }

    /// Activates or deactivates a pursuer. Inactive pursuers neither move nor
    /// threaten evaders.
    pub fn set_active(&mut self, index: usize, active: bool) {
        if let Some(p) = self.pursuers.get_mut(index) {
            p.active = active;
        }
    }

    /// Marks an evader captured or released. Captured evaders neither move
    /// nor count as peers.
    pub fn set_captured(&mut self, index: usize, captured: bool) {
        if let Some(e) = self.evaders.get_mut(index) {
            e.captured = captured;
        }
    }

    /// Queues a turn for a pursuer's next node.
    pub fn queue_direction(&mut self, index: usize, dir: Cardinal) {
        if let Some(p) = self.pursuers.get_mut(index) {
            p.queue(dir);
        }
    }

    /// Advances one pursuer by `dt` seconds.
    ///
    /// Overshoot past a node is carried onto the chosen edge. With no
    /// acceptable exit the pursuer halts on the boundary and re-resolves the
    /// node on every later call until a direction matches.
    ///
    /// Live input is read from [`Pursuer::input_slot`]: the pursuer's index
    /// when created by [`Self::spawn_pursuer`], caller-chosen with
    /// [`Self::add_pursuer`]. Speed is the pursuer's override, or
    /// [`ChaseConfig::pursuer_speed`] as it stands this frame.
    pub fn advance_pursuer(&mut self, index: usize, dt: f32) {
        let graph = &self.graph;
        let Some(pursuer) = self.pursuers.get_mut(index) else {
            return;
        };
        if graph.is_empty() || !pursuer.active {
            return;
        }
        let Some(edge) = pursuer.state.current_edge.and_then(|id| graph.edge(id)) else {
            return;
        };

        let speed = pursuer.effective_speed(self.config.pursuer_speed);
        if let Some(arrival) = advance_along_edge(&mut pursuer.state, edge, speed, dt) {
            let exits = graph.exits(arrival.node);
            let choice = pursuer::choose_exit(
                &exits,
                pursuer.state.heading,
                pursuer.queued,
                self.input.as_ref(),
                pursuer.input_slot,
            );
            match choice.and_then(|(exit, via)| graph.edge(exit.edge).map(|e| (exit, via, e))) {
                Some((exit, via, next)) => {
                    if via == Resolution::Queued {
                        pursuer.queued = None;
                    }
                    pursuer.state.enter(exit);
                    carry_overshoot(&mut pursuer.state, arrival, exit, next);
                }
                None => {
                    if pursuer.state.is_moving {
                        debug!("pursuer {index} stopped at {:?}", arrival.node);
                    }
                    pursuer.state.is_moving = false;
                }
            }
        }
        place_on_edge(&mut pursuer.state, graph, self.terrain.as_ref());
    }

    /// Advances one evader by `dt` seconds, reading every other actor's
    /// current position.
    pub fn advance_evader(&mut self, index: usize, dt: f32) {
        let snapshot = PositionSnapshot::capture(&self.pursuers, &self.evaders);
        self.advance_evader_from(index, dt, &snapshot);
    }

    fn advance_evader_from(&mut self, index: usize, dt: f32, seen: &PositionSnapshot) {
        let graph = &self.graph;
        let config = &self.config;
        let rng = self.rng.as_mut();
        let Some(evader) = self.evaders.get_mut(index) else {
            return;
        };
        if graph.is_empty() || evader.captured || evader.stalled {
            return;
        }
        if !evader.state.is_snapped() {
            return;
        }

        evader::mid_edge_juke(&mut evader.state, &seen.pursuers, config, dt, &mut *rng);

        let Some(edge) = evader.state.current_edge.and_then(|id| graph.edge(id)) else {
            return;
        };
        // Any distance past the node is dropped; evaders re-decide anyway.
        let speed = evader.effective_speed(config.evader_speed);
        if let Some(arrival) = advance_along_edge(&mut evader.state, edge, speed, dt) {
            let exits = graph.exits(arrival.node);
            let position = graph
                .node(arrival.node)
                .map_or_else(|| evader.state.ground(), |n| n.position);
            let peers = seen.peers_of(index);
            let surroundings = Surroundings {
                position,
                pursuers: &seen.pursuers,
                peers: &peers,
            };
            let intelligence = evader.effective_intelligence(config.intelligence);
            match evader::choose_exit(
                &exits,
                evader.state.heading,
                surroundings,
                config,
                intelligence,
                &mut *rng,
            ) {
                Some((exit, _)) => evader.state.enter(exit),
                None => {
                    warn!("evader {index} has no exit at {:?}; stalling", arrival.node);
                    evader.stalled = true;
                }
            }
        }
        place_on_edge(&mut evader.state, graph, self.terrain.as_ref());
    }

    /// Advances every actor by `dt`: pursuers first, then evaders, each in
    /// index order.
    ///
    /// Evaders see actors updated earlier in the same frame at their new
    /// positions.
    pub fn step(&mut self, dt: f32) {
        for i in 0..self.pursuers.len() {
            self.advance_pursuer(i, dt);
        }
        for i in 0..self.evaders.len() {
            self.advance_evader(i, dt);
        }
    }

    /// Advances every actor by `dt` against positions captured before any
    /// actor moves, so the outcome does not depend on update order.
    pub fn step_snapshot(&mut self, dt: f32) {
        let snapshot = PositionSnapshot::capture(&self.pursuers, &self.evaders);
        for i in 0..self.pursuers.len() {
            self.advance_pursuer(i, dt);
        }
        for i in 0..self.evaders.len() {
            self.advance_evader_from(i, dt, &snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeId;
    use crate::rng::ScriptedRng;
    use approx::assert_relative_eq;

    fn edge_of(length: f32) -> Arc<PathGraph> {
        let mut builder = PathGraph::builder();
        builder.segment(Vec2::ZERO, Vec2::new(length, 0.0));
        Arc::new(builder.build().expect("valid graph"))
    }

    fn single_edge() -> Arc<PathGraph> {
        edge_of(10.0)
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut system = MovementSystem::new(Arc::new(PathGraph::empty()), ChaseConfig::default());
        let p = system.spawn_pursuer(Vec3::new(1.0, 0.0, 1.0));
        let e = system.spawn_evader(Vec3::new(2.0, 0.0, 2.0));
        let before = (system.pursuers().to_vec(), system.evaders().to_vec());
        system.step(1.0);
        assert_eq!(before, (system.pursuers().to_vec(), system.evaders().to_vec()));
        assert!(system.pursuer(p).is_some_and(|p| !p.state.is_snapped()));
        assert!(system.evader(e).is_some_and(|e| !e.state.is_snapped()));
    }

    #[test]
    fn unknown_indices_are_ignored() {
        let mut system = MovementSystem::new(single_edge(), ChaseConfig::default());
        system.advance_pursuer(4, 1.0);
        system.advance_evader(4, 1.0);
        assert!(!system.snap_actor(ActorId::Evader(9)));
    }

    #[test]
    fn inactive_pursuer_does_not_move() {
        let mut system = MovementSystem::new(single_edge(), ChaseConfig::default());
        let p = system.spawn_pursuer(Vec3::new(2.0, 0.0, 0.0));
        system.set_active(p, false);
        system.step(1.0);
        let state = &system.pursuer(p).expect("pursuer").state;
        assert_relative_eq!(state.edge_t, 0.2);
    }

    #[test]
    fn stalled_evader_is_skipped_until_resnapped() {
        let mut system = MovementSystem::new(single_edge(), ChaseConfig::default())
            .with_rng(ScriptedRng::constant(0.0));
        let e = system.spawn_evader(Vec3::new(5.0, 0.0, 0.0));
        if let Some(evader) = system.evader_mut(e) {
            evader.stalled = true;
        }
        system.step(1.0);
        assert_relative_eq!(system.evader(e).expect("evader").state.edge_t, 0.5);
        assert!(system.snap_actor(ActorId::Evader(e)));
        assert!(system.evader(e).is_some_and(|e| !e.stalled));
    }

    #[test]
    fn replacing_graph_unsnaps_actors() {
        let mut system = MovementSystem::new(single_edge(), ChaseConfig::default());
        let p = system.spawn_pursuer(Vec3::ZERO);
        assert_eq!(
            system.pursuer(p).and_then(|p| p.state.current_edge),
            Some(EdgeId(0))
        );
        system.set_graph(Arc::new(PathGraph::empty()));
        assert!(system.pursuer(p).is_some_and(|p| !p.state.is_snapped()));
    }

    #[test]
    fn config_changes_apply_next_frame() {
        let mut system = MovementSystem::new(single_edge(), ChaseConfig::default());
        system.set_config(ChaseConfig {
            intelligence: 0.1,
            ..ChaseConfig::default()
        });
        assert_relative_eq!(system.config().intelligence, 0.1);
        system.config_mut().danger_radius = 2.0;
        assert_relative_eq!(system.config().danger_radius, 2.0);
    }

    #[test]
    fn pursuer_speed_is_read_every_frame() {
        let mut system = MovementSystem::new(edge_of(100.0), ChaseConfig::default());
        let p = system.spawn_pursuer(Vec3::new(10.0, 0.0, 0.0));
        system.config_mut().pursuer_speed = 12.0;
        system.step(1.0);
        assert_relative_eq!(system.pursuer(p).expect("pursuer").state.edge_t, 0.22, epsilon = 1e-5);
    }

    #[test]
    fn evader_speed_override_beats_live_config() {
        let mut system = MovementSystem::new(edge_of(100.0), ChaseConfig::default())
            .with_rng(ScriptedRng::constant(0.0));
        let e = system.spawn_evader(Vec3::new(10.0, 0.0, 0.0));
        system.config_mut().evader_speed = 12.0;
        system.step(1.0);
        assert_relative_eq!(system.evader(e).expect("evader").state.edge_t, 0.22, epsilon = 1e-5);

        if let Some(evader) = system.evader_mut(e) {
            evader.speed = Some(2.0);
        }
        system.config_mut().evader_speed = 50.0;
        system.step(1.0);
        assert_relative_eq!(system.evader(e).expect("evader").state.edge_t, 0.24, epsilon = 1e-5);
    }
}
