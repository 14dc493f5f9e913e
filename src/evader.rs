//! Evader decision engine.
//!
//! At every node an evader reads two inverse-square fields: a threat field
//! pushing away from nearby pursuers and a separation field pushing away from
//! crowding peers. It then escapes along the threat (sometimes juking to a
//! non-worst alternative), drifts away from peers, or wanders without
//! doubling back. Between nodes it may reverse on the spot when a pursuer is
//! close.

use std::cmp::Reverse;

use glam::Vec2;
use log::debug;
use ordered_float::OrderedFloat;

use crate::actor::ActorState;
use crate::config::ChaseConfig;
use crate::constants::{
    FIELD_DISTANCE_EPSILON, FIELD_MAGNITUDE_EPSILON, MID_EDGE_WINDOW, SEPARATION_BLEND_WEIGHT,
    THREAT_BLEND_WEIGHT,
};
use crate::direction::Cardinal;
use crate::graph::Exit;
use crate::rng::DecisionRng;

/// Summed repulsion from a set of sources.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    /// Sum of `away × 1/(d² + ε)` over sources in range.
    pub vector: Vec2,
    /// Distance to the closest source considered, if any.
    pub nearest: Option<f32>,
}

impl Field {
    /// A field with no sources.
    pub const ZERO: Self = Self {
        vector: Vec2::ZERO,
        nearest: None,
    };

    /// `true` when the vector is large enough to normalise.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.vector.length() > FIELD_MAGNITUDE_EPSILON
    }

    /// Unit vector of the field, if significant.
    #[must_use]
    pub fn direction(&self) -> Option<Vec2> {
        if self.is_significant() {
            self.vector.try_normalize()
        } else {
            None
        }
    }
}

/// Inverse-square repulsion from every source within `range` of `position`.
///
/// Sources exactly at `position` have no direction to push along and add
/// nothing to the vector, although they still count as nearest.
#[must_use]
pub fn repulsion_field(position: Vec2, sources: &[Vec2], range: f32) -> Field {
    let mut field = Field::ZERO;
    for &source in sources {
        let away = position - source;
        let distance = away.length();
        if distance >= range {
            continue;
        }
        let weight = 1.0 / (distance * distance + FIELD_DISTANCE_EPSILON);
        field.vector += away.normalize_or_zero() * weight;
        field.nearest = Some(field.nearest.map_or(distance, |n| n.min(distance)));
    }
    field
}

/// Threat assessment for one decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threat {
    /// Repulsion from pursuers within the sensing radius.
    pub field: Field,
    /// Whether the threat is strong and close enough to act on.
    pub present: bool,
}

/// Builds the threat field from pursuer positions.
///
/// A threat is present when the field is significant and the nearest pursuer
/// lies within `sensing_radius`.
#[must_use]
pub fn assess_threat(position: Vec2, pursuers: &[Vec2], sensing_radius: f32) -> Threat {
    let field = repulsion_field(position, pursuers, sensing_radius);
    let present = field.is_significant() && field.nearest.is_some_and(|d| d < sensing_radius);
    Threat { field, present }
}

/// What an evader saw when deciding.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings<'a> {
    /// Where the evader is deciding from.
    pub position: Vec2,
    /// Ground positions of active pursuers.
    pub pursuers: &'a [Vec2],
    /// Ground positions of other uncaptured evaders.
    pub peers: &'a [Vec2],
}

/// Which branch produced an evader's choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tactic {
    /// Greedy best escape from the (blended) threat.
    Escape,
    /// Random pick among all but the worst escape options.
    Juke,
    /// Move away from crowding peers.
    Separate,
    /// Random non-reversing pick.
    Wander,
}

/// Picks an exit for an evader arriving at a node.
///
/// `heading` is the direction the evader was travelling when it arrived and
/// `intelligence` the probability of acting on a present threat. Returns
/// `None` only when `exits` is empty.
pub fn choose_exit(
    exits: &[Exit],
    heading: Cardinal,
    surroundings: Surroundings<'_>,
    config: &ChaseConfig,
    intelligence: f32,
    rng: &mut dyn DecisionRng,
) -> Option<(Exit, Tactic)> {
    if exits.is_empty() {
        return None;
    }

    let threat = assess_threat(surroundings.position, surroundings.pursuers, config.sensing_radius);
    let separation = repulsion_field(
        surroundings.position,
        surroundings.peers,
        config.separation_range,
    );

    if threat.present && rng.chance(intelligence) {
        if let Some(away) = threat.field.direction() {
            let goal = separation.direction().map_or(away, |apart| {
                (away * THREAT_BLEND_WEIGHT + apart * SEPARATION_BLEND_WEIGHT)
                    .try_normalize()
                    .unwrap_or(away)
            });
            let best = best_aligned(exits, goal)?;
            if exits.len() > 1 && rng.chance(config.node_juke_chance) {
                if let Some(juke) = juke_pick(exits, goal, rng) {
                    debug!("evader juked to {:?} (goal {goal:?})", juke.heading);
                    return Some((juke, Tactic::Juke));
                }
            }
            debug!("evader escaping {:?} (goal {goal:?})", best.heading);
            return Some((best, Tactic::Escape));
        }
    }

    if let Some(apart) = separation.direction() {
        if rng.chance(config.separation_follow_chance) {
            let best = best_aligned(exits, apart)?;
            debug!("evader separating {:?}", best.heading);
            return Some((best, Tactic::Separate));
        }
    }

    let back = heading.opposite();
    let onward: Vec<Exit> = exits.iter().copied().filter(|e| e.heading != back).collect();
    let pool: &[Exit] = if onward.is_empty() { exits } else { &onward };
    let pick = rng.pick(pool.len()).and_then(|i| pool.get(i).copied())?;
    debug!("evader wandering {:?}", pick.heading);
    Some((pick, Tactic::Wander))
}

fn score(exit: &Exit, goal: Vec2) -> f32 {
    exit.heading.to_vec2().dot(goal)
}

/// Exit best aligned with `goal`; the first one wins ties.
fn best_aligned(exits: &[Exit], goal: Vec2) -> Option<Exit> {
    exits
        .iter()
        .copied()
        .min_by_key(|e| Reverse(OrderedFloat(score(e, goal))))
}

/// Uniform pick among every exit except the single worst-aligned one.
fn juke_pick(exits: &[Exit], goal: Vec2, rng: &mut dyn DecisionRng) -> Option<Exit> {
    let mut ranked = exits.to_vec();
    ranked.sort_by_key(|e| Reverse(OrderedFloat(score(e, goal))));
    ranked.pop();
    rng.pick(ranked.len()).and_then(|i| ranked.get(i).copied())
}

/// Possibly reverses an evader in the middle of an edge.
///
/// Only considered strictly inside the mid-edge window and while the nearest
/// pursuer is within the danger radius; the reversal then happens with
/// probability `mid_edge_juke_chance × dt`. Returns whether it reversed.
pub fn mid_edge_juke(
    state: &mut ActorState,
    pursuers: &[Vec2],
    config: &ChaseConfig,
    dt: f32,
    rng: &mut dyn DecisionRng,
) -> bool {
    let (low, high) = MID_EDGE_WINDOW;
    if !(state.edge_t > low && state.edge_t < high) {
        return false;
    }
    let here = state.ground();
    let in_danger = pursuers
        .iter()
        .any(|&p| p.distance(here) < config.danger_radius);
    if !in_danger {
        return false;
    }
    if rng.chance(config.mid_edge_juke_chance * dt) {
        state.reverse();
        debug!("evader reversed mid-edge, now heading {:?}", state.heading);
        return true;
    }
    false
}
