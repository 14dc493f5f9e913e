//! Pursuer decision engine.
//!
//! Player-controlled actors resolve each node with a fixed priority: an
//! explicitly queued turn, then carrying straight on, then whatever the live
//! input is asking for right now. A node whose only way on is a single
//! non-reversing exit (a corner) is then taken regardless of input. Only
//! when none of these applies does the pursuer stop.

use log::debug;

use crate::direction::Cardinal;
use crate::graph::Exit;
use crate::input::InputQuery;

/// Which rule produced a pursuer's choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The queued direction matched an exit.
    Queued,
    /// An exit continued the current heading.
    Straight,
    /// The live input matched an exit.
    Live,
    /// The node had exactly one exit other than the reversal.
    Forced,
}

fn matching(exits: &[Exit], dir: Cardinal) -> Option<Exit> {
    exits.iter().copied().find(|e| e.heading == dir)
}

/// Picks an exit for a pursuer arriving at a node.
///
/// The live input for `input_slot` is only queried when neither the queued
/// direction nor straight continuation matches. Returns `None` when the
/// pursuer should stop, which only happens at a dead end or a junction with
/// several onward exits.
pub fn choose_exit(
    exits: &[Exit],
    heading: Cardinal,
    queued: Option<Cardinal>,
    input: &dyn InputQuery,
    input_slot: usize,
) -> Option<(Exit, Resolution)> {
    if let Some(exit) = queued.and_then(|dir| matching(exits, dir)) {
        debug!("pursuer slot {input_slot} took queued {:?}", exit.heading);
        return Some((exit, Resolution::Queued));
    }
    if let Some(exit) = matching(exits, heading) {
        return Some((exit, Resolution::Straight));
    }
    let live = input.live_input(input_slot).cardinal();
    if let Some(exit) = live.and_then(|dir| matching(exits, dir)) {
        debug!("pursuer slot {input_slot} followed live input {:?}", exit.heading);
        return Some((exit, Resolution::Live));
    }
    let mut onward = exits.iter().copied().filter(|e| e.heading != heading.opposite());
    match (onward.next(), onward.next()) {
        (Some(exit), None) => {
            debug!("pursuer slot {input_slot} forced onto {:?}", exit.heading);
            Some((exit, Resolution::Forced))
        }
        _ => None,
    }
}
