//! Movement and decision constants shared across the engines.
//!
//! Tunables that hosts adjust at runtime live in [`crate::config::ChaseConfig`];
//! the values here are fixed properties of the heuristics themselves.

/// Added to squared distances in the inverse-square fields so coincident
/// actors do not divide by zero.
pub const FIELD_DISTANCE_EPSILON: f32 = 0.001;
/// Minimum magnitude for a threat or separation vector to count as present.
pub const FIELD_MAGNITUDE_EPSILON: f32 = 1e-6;
/// Weight of the threat field when blended with separation.
pub const THREAT_BLEND_WEIGHT: f32 = 0.7;
/// Weight of the separation field when blended with threat.
pub const SEPARATION_BLEND_WEIGHT: f32 = 0.3;
/// Mid-edge jukes are only considered strictly inside this `edge_t` window.
pub const MID_EDGE_WINDOW: (f32, f32) = (0.1, 0.9);
/// Edges shorter than this are rejected by the graph builder.
pub const MIN_EDGE_LENGTH: f32 = 1e-4;
/// Tolerance on the off-axis component when classifying an edge as
/// axis-aligned.
pub const AXIS_ALIGNMENT_TOLERANCE: f32 = 1e-5;

/// Default probability that a sensed threat triggers the escape branch.
pub const DEFAULT_INTELLIGENCE: f32 = 0.8;
/// Default probability of a node juke after an escape choice.
pub const DEFAULT_NODE_JUKE_CHANCE: f32 = 0.15;
/// Default mid-edge reversal rate, per simulated second.
pub const DEFAULT_MID_EDGE_JUKE_CHANCE: f32 = 0.3;
/// Default distance within which a pursuer can provoke a mid-edge juke.
pub const DEFAULT_DANGER_RADIUS: f32 = 8.0;
/// Default distance within which pursuers contribute to the threat field.
pub const DEFAULT_SENSING_RADIUS: f32 = 30.0;
/// Default distance within which peer evaders contribute to separation.
pub const DEFAULT_SEPARATION_RANGE: f32 = 5.0;
/// Default probability of following the separation field when unthreatened.
pub const DEFAULT_SEPARATION_FOLLOW_CHANCE: f32 = 0.6;
/// Default spawn speed for pursuers, in world units per second.
pub const DEFAULT_PURSUER_SPEED: f32 = 6.0;
/// Default spawn speed for evaders, in world units per second.
pub const DEFAULT_EVADER_SPEED: f32 = 5.0;
