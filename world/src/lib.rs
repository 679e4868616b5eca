#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Joyride.

mod car;
mod layout;

use glam::Vec2;
use joyride_core::{
    kinematics, BuildingId, BuildingSnapshot, Bounds, Command, Event, Heading, Paint,
    PedestrianId, PedestrianSnapshot, Rect, TrafficCarId, WanderLeg, WantedLevel,
    PEDESTRIAN_RADIUS, STRIKE_SCORE, STRIKE_SPEED_THRESHOLD,
};
use log::debug;

use self::car::Car;

/// Static obstacle occupying a city block.
#[derive(Clone, Debug)]
pub(crate) struct Building {
    pub(crate) id: BuildingId,
    pub(crate) footprint: Rect,
    pub(crate) paint: Paint,
}

impl Building {
    fn snapshot(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            id: self.id,
            footprint: self.footprint,
            paint: self.paint,
        }
    }
}

/// Wandering actor on the streets.
#[derive(Clone, Debug)]
struct Pedestrian {
    id: PedestrianId,
    position: Vec2,
    speed: f32,
    heading: Heading,
    radius: f32,
    paint: Paint,
    wander_countdown: u32,
}

impl Pedestrian {
    fn advance(&mut self, retarget: Option<WanderLeg>, bounds: Bounds) {
        self.wander_countdown = self.wander_countdown.saturating_sub(1);
        if let Some(leg) = retarget {
            self.heading = leg.heading;
            self.wander_countdown = leg.countdown;
        }

        let inset = Vec2::splat(self.radius);
        self.position = kinematics::advance_wander(self.position, self.heading, self.speed);
        self.heading = kinematics::reflect_at_edges(self.position, self.heading, inset, bounds);
        self.position = kinematics::clamp_within(self.position, inset, bounds);
    }

    fn bounding_box(&self) -> Rect {
        Rect::centered(self.position, Vec2::splat(self.radius * 2.0))
    }

    fn snapshot(&self) -> PedestrianSnapshot {
        PedestrianSnapshot {
            id: self.id,
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            radius: self.radius,
            wander_countdown: self.wander_countdown,
            paint: self.paint,
        }
    }
}

/// Autonomous car paired with its identifier.
#[derive(Clone, Debug)]
struct TrafficCar {
    id: TrafficCarId,
    car: Car,
}

/// Represents the authoritative Joyride world state.
#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    buildings: Vec<Building>,
    pedestrians: Vec<Pedestrian>,
    traffic: Vec<TrafficCar>,
    player: Car,
    score: u32,
    wanted_level: WantedLevel,
    tick_index: u64,
    next_pedestrian_id: PedestrianId,
    next_traffic_car_id: TrafficCarId,
}

impl World {
    /// Creates a new world with the fixed city layout, the player parked at
    /// the center of the screen, and empty streets.
    #[must_use]
    pub fn new() -> Self {
        let bounds = Bounds::SCREEN;
        Self {
            bounds,
            buildings: layout::city_blocks(),
            pedestrians: Vec::new(),
            traffic: Vec::new(),
            player: Car::new(bounds.center(), Paint::RED),
            score: 0,
            wanted_level: WantedLevel::default(),
            tick_index: 0,
            next_pedestrian_id: PedestrianId::new(0),
            next_traffic_car_id: TrafficCarId::new(0),
        }
    }

    fn pedestrian_mut(&mut self, pedestrian: PedestrianId) -> Option<&mut Pedestrian> {
        self.pedestrians
            .iter_mut()
            .find(|candidate| candidate.id == pedestrian)
    }

    fn pedestrian_index(&self, pedestrian: PedestrianId) -> Option<usize> {
        self.pedestrians
            .iter()
            .position(|candidate| candidate.id == pedestrian)
    }

    fn traffic_car_mut(&mut self, car: TrafficCarId) -> Option<&mut Car> {
        self.traffic
            .iter_mut()
            .find(|candidate| candidate.id == car)
            .map(|traffic| &mut traffic.car)
    }

    fn allocate_pedestrian_id(&mut self) -> PedestrianId {
        let id = self.next_pedestrian_id;
        self.next_pedestrian_id = PedestrianId::new(id.get().saturating_add(1));
        id
    }

    fn allocate_traffic_car_id(&mut self) -> TrafficCarId {
        let id = self.next_traffic_car_id;
        self.next_traffic_car_id = TrafficCarId::new(id.get().saturating_add(1));
        id
    }

    fn strike_pedestrian(&mut self, pedestrian: PedestrianId, out_events: &mut Vec<Event>) {
        let Some(index) = self.pedestrian_index(pedestrian) else {
            return;
        };

        let fast_enough = self.player.speed.abs() > STRIKE_SPEED_THRESHOLD;
        let touching = self
            .player
            .bounding_box()
            .overlaps(&self.pedestrians[index].bounding_box());
        if !fast_enough || !touching {
            return;
        }

        let _ = self.pedestrians.remove(index);
        self.score = self.score.saturating_add(STRIKE_SCORE);
        self.wanted_level = self.wanted_level.raised();
        debug!(
            "pedestrian {} struck; score {} wanted {}",
            pedestrian.get(),
            self.score,
            self.wanted_level.get()
        );
        out_events.push(Event::PedestrianStruck {
            pedestrian,
            score: self.score,
            wanted_level: self.wanted_level,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::DrivePlayer { input } => {
            world.player.drive(input, world.bounds);
            out_events.push(Event::PlayerMoved {
                position: world.player.position,
                speed: world.player.speed,
            });
        }
        Command::PaintBuilding { building, paint } => {
            if let Some(target) = world
                .buildings
                .iter_mut()
                .find(|candidate| candidate.id == building)
            {
                target.paint = paint;
            }
        }
        Command::SpawnPedestrian {
            position,
            speed,
            heading,
            paint,
        } => {
            let id = world.allocate_pedestrian_id();
            world.pedestrians.push(Pedestrian {
                id,
                position,
                speed,
                heading,
                radius: PEDESTRIAN_RADIUS,
                paint,
                wander_countdown: 0,
            });
            out_events.push(Event::PedestrianSpawned {
                pedestrian: id,
                position,
            });
        }
        Command::SpawnTrafficCar {
            position,
            heading,
            paint,
        } => {
            let id = world.allocate_traffic_car_id();
            world.traffic.push(TrafficCar {
                id,
                car: Car::facing(position, heading, paint),
            });
            out_events.push(Event::TrafficCarSpawned { car: id, position });
        }
        Command::AdvancePedestrian {
            pedestrian,
            retarget,
        } => {
            let bounds = world.bounds;
            if let Some(target) = world.pedestrian_mut(pedestrian) {
                target.advance(retarget, bounds);
            }
        }
        Command::SteerTrafficCar { car, turn } => {
            let bounds = world.bounds;
            if let Some(target) = world.traffic_car_mut(car) {
                target.cruise(turn, bounds);
            }
        }
        Command::StrikePedestrian { pedestrian } => {
            world.strike_pedestrian(pedestrian, out_events);
        }
        Command::BouncePlayer { building } => {
            if world
                .buildings
                .iter()
                .any(|candidate| candidate.id == building)
            {
                world.player.bounce();
                debug!(
                    "player bounced off building {}; speed {:.2}",
                    building.get(),
                    world.player.speed
                );
                out_events.push(Event::PlayerBounced {
                    building,
                    speed: world.player.speed,
                });
            }
        }
        Command::CoolWantedLevel => {
            if !world.wanted_level.is_clear() {
                world.wanted_level = world.wanted_level.lowered();
                out_events.push(Event::WantedLevelChanged {
                    wanted_level: world.wanted_level,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use joyride_core::{
        BuildingSnapshot, Bounds, CarSnapshot, PedestrianView, TrafficCarSnapshot, TrafficView,
        WantedLevel,
    };

    use super::{layout, World};

    /// Extent of the playable area.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Captures the player car's current state.
    #[must_use]
    pub fn player(world: &World) -> CarSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of the pedestrians still on the streets.
    #[must_use]
    pub fn pedestrian_view(world: &World) -> PedestrianView {
        PedestrianView::from_snapshots(
            world
                .pedestrians
                .iter()
                .map(|pedestrian| pedestrian.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the traffic cars.
    #[must_use]
    pub fn traffic_view(world: &World) -> TrafficView {
        TrafficView::from_snapshots(
            world
                .traffic
                .iter()
                .map(|traffic| TrafficCarSnapshot {
                    id: traffic.id,
                    car: traffic.car.snapshot(),
                })
                .collect(),
        )
    }

    /// Captures the buildings in layout order.
    #[must_use]
    pub fn buildings(world: &World) -> Vec<BuildingSnapshot> {
        world
            .buildings
            .iter()
            .map(|building| building.snapshot())
            .collect()
    }

    /// Reports whether the point lies outside every building footprint.
    #[must_use]
    pub fn is_open_ground(world: &World, point: Vec2) -> bool {
        layout::is_open_ground(&world.buildings, point)
    }

    /// Points accumulated so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current notoriety.
    #[must_use]
    pub fn wanted_level(world: &World) -> WantedLevel {
        world.wanted_level
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
