//! Graph-constrained movement for chase simulations.
//!
//! Actors ride the edges of an axis-aligned [`PathGraph`]. Player-controlled
//! [`Pursuer`]s resolve each node from queued, straight-on and live input;
//! AI [`Evader`]s flee, juke, spread out or wander. [`MovementSystem`] ties
//! the graph, actors and the host-supplied collaborators together and
//! advances everything one frame at a time.
pub mod actor;
pub mod config;
pub mod constants;
pub mod direction;
pub mod evader;
pub mod graph;
pub mod input;
pub mod logging;
pub mod pursuer;
pub mod rng;
pub mod snap;
pub mod system;
pub mod terrain;
pub mod traversal;
pub use constants::*;

// Re-export commonly used items
pub use actor::{ActorState, Evader, Pursuer};
pub use config::{ChaseConfig, ConfigError};
pub use direction::{Cardinal, EdgeDir};
pub use evader::Tactic;
pub use graph::{Edge, EdgeId, Exit, GraphError, Node, NodeId, PathGraph, PathGraphBuilder};
pub use input::{InputQuery, LiveInput, NoInput};
pub use logging::init as init_logging;
pub use pursuer::Resolution;
pub use rng::{DecisionRng, ScriptedRng, SeededRng};
pub use snap::{EdgePoint, EdgeProjection, NearestPointQuery};
pub use system::{ActorId, MovementSystem};
pub use terrain::{FlatTerrain, HeightProjector};

pub mod prelude {
    //! Everything a host needs to wire up a simulation.
    //!
    //! ```rust
    //! use pathchase::prelude::*;
    //! use std::sync::Arc;
    //!
    //! let graph = Arc::new(PathGraph::lattice(3, 3, 10.0).expect("lattice"));
    //! let mut system = MovementSystem::new(graph, ChaseConfig::default());
    //! system.spawn_evader(Vec3::new(4.0, 0.0, 0.0));
    //! system.step(0.1);
    //! ```

    pub use crate::ChaseConfig;
    pub use crate::DecisionRng;
    pub use crate::MovementSystem;
    pub use crate::PathGraph;
    pub use crate::{Cardinal, LiveInput};
    pub use crate::{Evader, Pursuer};
    pub use glam::{Vec2, Vec3};
}
