#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stochastic cooling of the wanted level.

use joyride_core::{Command, Event, WantedLevel, WANTED_DECAY_PROBABILITY};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the wanted-level decay system.
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

/// Pure system that occasionally lowers a raised wanted level.
#[derive(Debug)]
pub struct WantedDecay {
    rng: ChaCha8Rng,
}

impl WantedDecay {
    /// Creates a new decay system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Rolls once per tick and requests a cool-down when the roll hits.
    ///
    /// The roll happens whether or not the player is wanted so the random
    /// stream advances identically across replays.
    pub fn handle(&mut self, events: &[Event], wanted_level: WantedLevel, out: &mut Vec<Command>) {
        for event in events {
            if let Event::TimeAdvanced { .. } = event {
                let cooled = self.rng.gen_bool(WANTED_DECAY_PROBABILITY);
                if cooled && !wanted_level.is_clear() {
                    out.push(Command::CoolWantedLevel);
                }
            }
        }
    }
}
