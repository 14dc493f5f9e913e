//! Per-actor movement state.
//!
//! Every pursuer and evader carries an [`ActorState`] describing where it is
//! on the graph. The role-specific wrappers [`Pursuer`] and [`Evader`] add
//! the flags the host toggles (activation, capture) and the fields only one
//! decision engine reads.

use glam::{Vec2, Vec3};
use log::debug;

use crate::direction::{Cardinal, EdgeDir};
use crate::graph::{EdgeId, Exit};

/// Position of an actor on the graph plus its world placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorState {
    /// Edge currently occupied; `None` until snapped.
    pub current_edge: Option<EdgeId>,
    /// Fraction along the edge from its first endpoint, within `[0, 1]`.
    pub edge_t: f32,
    /// Travel sense along the edge.
    pub edge_dir: EdgeDir,
    /// Cardinal travel direction, consistent with `edge_dir`.
    pub heading: Cardinal,
    /// `false` once the actor halts at a dead end.
    pub is_moving: bool,
    /// World position (`x`, height, `z`).
    pub position: Vec3,
}

impl ActorState {
    /// Unsnapped state at `position`.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self {
            current_edge: None,
            edge_t: 0.0,
            edge_dir: EdgeDir::Forward,
            heading: Cardinal::East,
            is_moving: true,
            position,
        }
    }

    /// `true` once the actor sits on an edge.
    #[must_use]
    pub const fn is_snapped(&self) -> bool {
        self.current_edge.is_some()
    }

    /// `x` component of the heading: `-1`, `0` or `1`.
    #[must_use]
    pub const fn dir_x(&self) -> i32 {
        self.heading.dir_x()
    }

    /// `z` component of the heading: `-1`, `0` or `1`.
    #[must_use]
    pub const fn dir_z(&self) -> i32 {
        self.heading.dir_z()
    }

    /// Ground-plane projection of [`Self::position`].
    #[must_use]
    pub const fn ground(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Moves onto `exit`'s edge at its entry boundary.
    pub fn enter(&mut self, exit: Exit) {
        self.current_edge = Some(exit.edge);
        self.edge_t = exit.entry_t();
        self.edge_dir = exit.edge_dir;
        self.heading = exit.heading;
        self.is_moving = true;
    }

    /// Turns around in place on the current edge.
    pub fn reverse(&mut self) {
        self.edge_dir = self.edge_dir.reversed();
        self.heading = self.heading.opposite();
    }
}

/// A player-controlled chaser.
#[derive(Clone, Debug, PartialEq)]
pub struct Pursuer {
    /// Shared movement state.
    pub state: ActorState,
    /// Overrides the configured pursuer speed, in world units per second.
    pub speed: Option<f32>,
    /// Inactive pursuers are skipped entirely.
    pub active: bool,
    /// Turn requested for the next node, cleared once taken.
    pub queued: Option<Cardinal>,
    /// Live-input source consulted at node arrival.
    pub input_slot: usize,
}

impl Pursuer {
    /// An active, unsnapped pursuer reading input slot `input_slot` and
    /// moving at the configured pursuer speed.
    #[must_use]
    pub const fn new(position: Vec3, input_slot: usize) -> Self {
        Self {
            state: ActorState::new(position),
            speed: None,
            active: true,
            queued: None,
            input_slot,
        }
    }

    /// Same pursuer with a fixed speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Speed to use this frame.
    #[must_use]
    pub fn effective_speed(&self, configured: f32) -> f32 {
        self.speed.unwrap_or(configured)
    }

    /// Requests a turn at the next node.
    pub fn queue(&mut self, dir: Cardinal) {
        debug!("pursuer slot {} queued {dir:?}", self.input_slot);
        self.queued = Some(dir);
    }
}

/// An AI-controlled runner.
#[derive(Clone, Debug, PartialEq)]
pub struct Evader {
    /// Shared movement state.
    pub state: ActorState,
    /// Overrides the configured evader speed, in world units per second.
    pub speed: Option<f32>,
    /// Captured evaders are skipped entirely.
    pub captured: bool,
    /// Set when a node offered no exit; cleared by the next snap.
    pub stalled: bool,
    /// Overrides the configured intelligence for this evader.
    pub intelligence: Option<f32>,
}

impl Evader {
    /// An uncaptured, unsnapped evader moving at the configured evader speed.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self {
            state: ActorState::new(position),
            speed: None,
            captured: false,
            stalled: false,
            intelligence: None,
        }
    }

    /// Same evader with a fixed intelligence.
    #[must_use]
    pub const fn with_intelligence(mut self, intelligence: f32) -> Self {
        self.intelligence = Some(intelligence);
        self
    }

    /// Same evader with a fixed speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Speed to use this frame.
    #[must_use]
    pub fn effective_speed(&self, configured: f32) -> f32 {
        self.speed.unwrap_or(configured)
    }

    /// Intelligence to use this frame.
    #[must_use]
    pub fn effective_intelligence(&self, configured: f32) -> f32 {
        self.intelligence.unwrap_or(configured).clamp(0.0, 1.0)
    }
}
