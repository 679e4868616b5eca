#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random-walk system that keeps pedestrians milling about the streets.

use joyride_core::{
    Command, Event, Heading, PedestrianView, WanderLeg, WANDER_MAX_TICKS, WANDER_MIN_TICKS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the wander system.
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

/// Pure system that advances every pedestrian once per tick.
#[derive(Debug)]
pub struct Wandering {
    rng: ChaCha8Rng,
}

impl Wandering {
    /// Creates a new wander system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits one advance command per pedestrian when time advanced.
    ///
    /// Pedestrians whose wander leg runs out on this tick receive a fresh
    /// heading in `[0, 360)` and a countdown in
    /// `[WANDER_MIN_TICKS, WANDER_MAX_TICKS]`.
    pub fn handle(
        &mut self,
        events: &[Event],
        pedestrians: &PedestrianView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for pedestrian in pedestrians.iter() {
            let retarget = pedestrian.needs_retarget().then(|| self.next_leg());
            out.push(Command::AdvancePedestrian {
                pedestrian: pedestrian.id,
                retarget,
            });
        }
    }

    fn next_leg(&mut self) -> WanderLeg {
        let heading = Heading::from_degrees(self.rng.gen_range(0.0..360.0));
        let countdown = self.rng.gen_range(WANDER_MIN_TICKS..=WANDER_MAX_TICKS);
        WanderLeg { heading, countdown }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legs_stay_within_configured_ranges() {
        let mut wandering = Wandering::new(Config::new(11));

        for _ in 0..1_000 {
            let leg = wandering.next_leg();
            assert!((0.0..360.0).contains(&leg.heading.degrees()));
            assert!((WANDER_MIN_TICKS..=WANDER_MAX_TICKS).contains(&leg.countdown));
        }
    }

    #[test]
    fn ignores_frames_without_time_advancing() {
        let mut wandering = Wandering::new(Config::new(11));
        let mut commands = Vec::new();

        wandering.handle(&[], &PedestrianView::default(), &mut commands);

        assert!(commands.is_empty());
    }
}
