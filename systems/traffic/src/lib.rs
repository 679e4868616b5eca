#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Traffic controller that drives the autonomous cars.
//!
//! Every tick each car cruises forward; occasionally it swerves by a fixed
//! angle. Edge reflection and clamping happen in the world when the steer
//! command is applied. Traffic ignores buildings, pedestrians and other cars.

use joyride_core::{Command, Event, TrafficView, Turn, TRAFFIC_TURN_PROBABILITY};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the traffic controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeded with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits one steer command per traffic car per tick.
#[derive(Debug)]
pub struct TrafficControl {
    rng: ChaCha8Rng,
}

impl TrafficControl {
    /// Creates a new traffic controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and the traffic view to emit steer commands.
    pub fn handle(&mut self, events: &[Event], traffic: &TrafficView, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for snapshot in traffic.iter() {
            out.push(Command::SteerTrafficCar {
                car: snapshot.id,
                turn: self.maybe_swerve(),
            });
        }
    }

    fn maybe_swerve(&mut self) -> Option<Turn> {
        if !self.rng.gen_bool(TRAFFIC_TURN_PROBABILITY) {
            return None;
        }
        if self.rng.gen_bool(0.5) {
            Some(Turn::Left)
        } else {
            Some(Turn::Right)
        }
    }
}
