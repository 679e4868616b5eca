#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that populates the city once at startup.
//!
//! Placement uses rejection sampling: integer candidate points are drawn
//! inside an edge margin until one lands outside every building footprint.
//! The number of draws per entity is capped so a layout without open ground
//! fails loudly instead of hanging initialization.

use std::{fmt, ops::RangeInclusive};

use glam::Vec2;
use joyride_core::{
    BuildingSnapshot, Bounds, Command, Heading, Paint, BUILDING_PALETTE, PEDESTRIAN_COUNT,
    PEDESTRIAN_MAX_SPEED, PEDESTRIAN_MIN_SPEED, PEDESTRIAN_PALETTE, PEDESTRIAN_SPAWN_MARGIN,
    TRAFFIC_CAR_COUNT, TRAFFIC_PALETTE, TRAFFIC_SPAWN_MARGIN,
};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Draws allowed per entity before placement is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    max_attempts: u32,
}

impl Config {
    /// Creates a new configuration using the provided seed and the default retry cap.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of draws allowed per entity.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Kind of entity being placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    /// A wandering pedestrian.
    Pedestrian,
    /// An autonomous traffic car.
    TrafficCar,
}

impl fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pedestrian => write!(f, "pedestrian"),
            Self::TrafficCar => write!(f, "traffic car"),
        }
    }
}

/// Errors raised while populating the city.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// Every candidate point drawn for an entity landed inside a building.
    #[error("no open ground found for a {kind} after {attempts} attempts")]
    Exhausted {
        /// Entity that could not be placed.
        kind: SpawnKind,
        /// Number of candidates drawn before giving up.
        attempts: u32,
    },
    /// The edge margin leaves no room to draw candidates from.
    #[error("spawn margin {margin} leaves no room for a {kind}")]
    MarginTooWide {
        /// Entity that could not be placed.
        kind: SpawnKind,
        /// Margin requested from each screen edge.
        margin: u32,
    },
}

/// Pure system that emits the commands populating a fresh world.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    max_attempts: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            max_attempts: config.max_attempts,
        }
    }

    /// Emits paint commands for every building followed by the pedestrian and
    /// traffic spawn commands.
    ///
    /// `is_open_ground` decides whether a candidate point may host an entity.
    pub fn populate<F>(
        &mut self,
        buildings: &[BuildingSnapshot],
        bounds: Bounds,
        is_open_ground: F,
        out: &mut Vec<Command>,
    ) -> Result<(), SpawnError>
    where
        F: Fn(Vec2) -> bool,
    {
        for building in buildings {
            out.push(Command::PaintBuilding {
                building: building.id,
                paint: self.pick(&BUILDING_PALETTE),
            });
        }

        for _ in 0..PEDESTRIAN_COUNT {
            let position = self.sample_open_point(
                SpawnKind::Pedestrian,
                bounds,
                PEDESTRIAN_SPAWN_MARGIN,
                &is_open_ground,
            )?;
            let speed = self.rng.gen_range(PEDESTRIAN_MIN_SPEED..PEDESTRIAN_MAX_SPEED);
            let heading = Heading::from_degrees(self.rng.gen_range(0.0..360.0));
            let paint = self.pick(&PEDESTRIAN_PALETTE);
            out.push(Command::SpawnPedestrian {
                position,
                speed,
                heading,
                paint,
            });
        }

        for _ in 0..TRAFFIC_CAR_COUNT {
            let position = self.sample_open_point(
                SpawnKind::TrafficCar,
                bounds,
                TRAFFIC_SPAWN_MARGIN,
                &is_open_ground,
            )?;
            let paint = self.pick(&TRAFFIC_PALETTE);
            let heading = Heading::from_degrees(self.rng.gen_range(0..=360_u32) as f32);
            out.push(Command::SpawnTrafficCar {
                position,
                heading,
                paint,
            });
        }

        Ok(())
    }

    fn sample_open_point<F>(
        &mut self,
        kind: SpawnKind,
        bounds: Bounds,
        margin: u32,
        is_open_ground: &F,
    ) -> Result<Vec2, SpawnError>
    where
        F: Fn(Vec2) -> bool,
    {
        let columns = margin_range(margin, bounds.width())
            .ok_or(SpawnError::MarginTooWide { kind, margin })?;
        let rows = margin_range(margin, bounds.height())
            .ok_or(SpawnError::MarginTooWide { kind, margin })?;

        for attempt in 1..=self.max_attempts {
            let candidate = Vec2::new(
                self.rng.gen_range(columns.clone()) as f32,
                self.rng.gen_range(rows.clone()) as f32,
            );
            if is_open_ground(candidate) {
                trace!("placed {kind} at {candidate} after {attempt} draws");
                return Ok(candidate);
            }
        }

        Err(SpawnError::Exhausted {
            kind,
            attempts: self.max_attempts,
        })
    }

    fn pick(&mut self, palette: &[Paint]) -> Paint {
        debug_assert!(!palette.is_empty(), "pick requires a non-empty palette");
        palette[self.rng.gen_range(0..palette.len())]
    }
}

fn margin_range(margin: u32, extent: f32) -> Option<RangeInclusive<u32>> {
    let extent = extent.max(0.0) as u32;
    let upper = extent.checked_sub(margin)?;
    (margin <= upper).then_some(margin..=upper)
}
