#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player-centric collision detection.
//!
//! The player's bounding box is captured once per tick. Every pedestrian it
//! overlaps while the player moves faster than [`STRIKE_SPEED_THRESHOLD`] is
//! struck, then every building it overlaps bounces the player. Strikes are
//! emitted before bounces so the world resolves them against the same box.

use joyride_core::{
    BuildingSnapshot, CarSnapshot, Command, Event, PedestrianView, STRIKE_SPEED_THRESHOLD,
};

/// Pure system that converts overlaps into strike and bounce commands.
#[derive(Debug, Default)]
pub struct Collisions;

impl Collisions {
    /// Creates a new collision system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and entity snapshots to emit collision commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &CarSnapshot,
        pedestrians: &PedestrianView,
        buildings: &[BuildingSnapshot],
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let player_box = player.bounding_box();

        if player.speed.abs() > STRIKE_SPEED_THRESHOLD {
            out.extend(
                pedestrians
                    .iter()
                    .filter(|pedestrian| player_box.overlaps(&pedestrian.bounding_box()))
                    .map(|pedestrian| Command::StrikePedestrian {
                        pedestrian: pedestrian.id,
                    }),
            );
        }

        out.extend(
            buildings
                .iter()
                .filter(|building| player_box.overlaps(&building.footprint))
                .map(|building| Command::BouncePlayer {
                    building: building.id,
                }),
        );
    }
}
