//! Behaviour tests for a single chase frame using rust-rspec.
//!
//! An evader heading into a junction with a pursuer waiting on the far arm
//! turns back, while the pursuer's queued turn is honoured.

use std::fmt;
use std::sync::{Arc, Mutex};

use glam::Vec3;
use pathchase::{Cardinal, ChaseConfig, MovementSystem, ScriptedRng};
use test_utils::plus_junction;

#[derive(Clone)]
struct Junction {
    system: Arc<Mutex<MovementSystem>>,
    ready: Arc<Mutex<bool>>,
}

impl fmt::Debug for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Junction").finish_non_exhaustive()
    }
}

impl Default for Junction {
    fn default() -> Self {
        let system = MovementSystem::new(Arc::new(plus_junction(10.0)), ChaseConfig::default())
            .with_rng(ScriptedRng::new([0.0, 0.99]));
        Self {
            system: Arc::new(Mutex::new(system)),
            ready: Arc::new(Mutex::new(false)),
        }
    }
}

impl Junction {
    fn setup(&self) {
        let mut ready = self.ready.lock().expect("ready lock");
        if *ready {
            return;
        }
        let mut system = self.system.lock().expect("system lock");
        // Pursuer on the north arm heading away from the centre.
        let p = system.spawn_pursuer(Vec3::new(0.0, 0.0, -5.0));
        system.queue_direction(p, Cardinal::East);
        // Evader on the west arm, heading east into the centre.
        let e = system.spawn_evader(Vec3::new(-0.5, 0.0, 0.0));
        if let Some(evader) = system.evader_mut(e) {
            evader.state.reverse();
        }
        *ready = true;
    }

    fn tick(&self) {
        let mut system = self.system.lock().expect("system lock");
        system.step(1.0);
    }

    fn evader_heading(&self) -> Cardinal {
        let system = self.system.lock().expect("system lock");
        system.evader(0).expect("evader spawned").state.heading
    }

    fn pursuer_queue(&self) -> Option<Cardinal> {
        let system = self.system.lock().expect("system lock");
        system.pursuer(0).expect("pursuer spawned").queued
    }
}

#[test]
fn evader_turns_away_from_the_pursuer() {
    rspec::run(&rspec::given(
        "a plus junction with a pursuer on the north arm",
        Junction::default(),
        |ctx| {
            ctx.before_all(|world| world.setup());
            ctx.when("the evader reaches the centre", |ctx| {
                ctx.before_all(|world| world.tick());
                ctx.then("it escapes south, away from the pursuer", |world| {
                    assert_eq!(world.evader_heading(), Cardinal::South);
                });
                ctx.then("the pursuer keeps its unused queued turn", |world| {
                    assert_eq!(world.pursuer_queue(), Some(Cardinal::East));
                });
            });
        },
    ));
}
