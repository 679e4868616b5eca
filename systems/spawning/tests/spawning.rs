use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use joyride_core::{
    Command, Event, Paint, PEDESTRIAN_COUNT, PEDESTRIAN_PALETTE, TRAFFIC_CAR_COUNT,
    TRAFFIC_PALETTE,
};
use joyride_system_spawning::{Config, Spawning};
use joyride_world::{self as world, query, World};

const SEED: u64 = 0x4d59_5df4_d0f3_3173;

fn populate(seed: u64) -> (World, Vec<Command>) {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(seed));
    let mut commands = Vec::new();
    let buildings = query::buildings(&world);
    spawning
        .populate(
            &buildings,
            query::bounds(&world),
            |point| query::is_open_ground(&world, point),
            &mut commands,
        )
        .expect("fixed layout leaves plenty of open ground");

    let mut events = Vec::new();
    for command in commands.iter().cloned() {
        world::apply(&mut world, command, &mut events);
    }
    (world, commands)
}

#[test]
fn populating_the_fixed_city_always_succeeds() {
    for seed in 0..32 {
        let (world, _) = populate(seed);

        assert_eq!(query::pedestrian_view(&world).len(), PEDESTRIAN_COUNT);
        assert_eq!(query::traffic_view(&world).len(), TRAFFIC_CAR_COUNT);
    }
}

#[test]
fn spawned_entities_avoid_buildings_and_margins() {
    let (world, _) = populate(SEED);

    for pedestrian in query::pedestrian_view(&world).iter() {
        let position = pedestrian.position;
        assert!(query::is_open_ground(&world, position), "{position} inside a building");
        assert!((50.0..=950.0).contains(&position.x));
        assert!((50.0..=650.0).contains(&position.y));
        assert_eq!(position.x.fract(), 0.0);
        assert!((0.5..1.5).contains(&pedestrian.speed));
        assert!(PEDESTRIAN_PALETTE.contains(&pedestrian.paint));
        assert!(pedestrian.needs_retarget());
    }

    for traffic in query::traffic_view(&world).iter() {
        let car = traffic.car;
        assert!(query::is_open_ground(&world, car.position));
        assert!((100.0..=900.0).contains(&car.position.x));
        assert!((100.0..=600.0).contains(&car.position.y));
        assert!((0.0..=360.0).contains(&car.heading.degrees()));
        assert_eq!(car.heading.degrees().fract(), 0.0);
        assert!(TRAFFIC_PALETTE.contains(&car.paint));
        assert_ne!(car.paint, Paint::RED);
        assert_eq!(car.speed, 0.0);
    }
}

#[test]
fn every_building_is_painted_first() {
    let (world, commands) = populate(SEED);
    let buildings = query::buildings(&world);

    let painted = commands
        .iter()
        .take_while(|command| matches!(command, Command::PaintBuilding { .. }))
        .count();
    assert_eq!(painted, buildings.len());
}

#[test]
fn spawn_events_report_allocated_ids_in_order() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(SEED));
    let mut commands = Vec::new();
    let buildings = query::buildings(&world);
    spawning
        .populate(
            &buildings,
            query::bounds(&world),
            |point| query::is_open_ground(&world, point),
            &mut commands,
        )
        .expect("populate");

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let pedestrian_ids: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::PedestrianSpawned { pedestrian, .. } => Some(pedestrian.get()),
            _ => None,
        })
        .collect();
    let car_ids: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::TrafficCarSpawned { car, .. } => Some(car.get()),
            _ => None,
        })
        .collect();

    assert_eq!(pedestrian_ids, (0..PEDESTRIAN_COUNT as u32).collect::<Vec<_>>());
    assert_eq!(car_ids, (0..TRAFFIC_CAR_COUNT as u32).collect::<Vec<_>>());
}

#[test]
fn deterministic_replay_produces_identical_city() {
    let (_, first) = populate(SEED);
    let (_, second) = populate(SEED);
    let (_, other) = populate(SEED ^ 0xffff);

    assert_eq!(fingerprint(&first), fingerprint(&second));
    assert_ne!(
        fingerprint(&first),
        fingerprint(&other),
        "different seeds should place the city differently"
    );
}

fn fingerprint(commands: &[Command]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for command in commands {
        match command {
            Command::PaintBuilding { building, paint } => {
                building.hash(&mut hasher);
                paint.hash(&mut hasher);
            }
            Command::SpawnPedestrian {
                position,
                speed,
                heading,
                paint,
            } => {
                position.x.to_bits().hash(&mut hasher);
                position.y.to_bits().hash(&mut hasher);
                speed.to_bits().hash(&mut hasher);
                heading.degrees().to_bits().hash(&mut hasher);
                paint.hash(&mut hasher);
            }
            Command::SpawnTrafficCar {
                position,
                heading,
                paint,
            } => {
                position.x.to_bits().hash(&mut hasher);
                position.y.to_bits().hash(&mut hasher);
                heading.degrees().to_bits().hash(&mut hasher);
                paint.hash(&mut hasher);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
    hasher.finish()
}
