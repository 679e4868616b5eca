use glam::Vec2;
use joyride_core::{Command, DriveInput, Event, Heading, Paint, WantedLevel, STRIKE_SCORE};
use joyride_system_collision::Collisions;
use joyride_world::{self as world, query, World};

fn spawn_pedestrian(world: &mut World, position: Vec2) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnPedestrian {
            position,
            speed: 1.0,
            heading: Heading::EAST,
            paint: Paint::BLACK,
        },
        &mut events,
    );
}

/// Runs one tick of driving followed by collision resolution.
fn tick(world: &mut World, collisions: &mut Collisions, input: DriveInput) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    world::apply(world, Command::DrivePlayer { input }, &mut events);

    let player = query::player(world);
    let pedestrians = query::pedestrian_view(world);
    let buildings = query::buildings(world);
    let mut commands = Vec::new();
    collisions.handle(&events, &player, &pedestrians, &buildings, &mut commands);

    let mut resolved = Vec::new();
    for command in commands {
        world::apply(world, command, &mut resolved);
    }
    resolved
}

fn forward() -> DriveInput {
    DriveInput {
        forward: true,
        ..DriveInput::default()
    }
}

#[test]
fn parked_player_inside_a_block_never_moves() {
    // The starting spot overlaps the central block; at rest the bounce is a no-op.
    let mut world = World::new();
    let mut collisions = Collisions::new();
    let start = query::player(&world).position;

    for _ in 0..10 {
        let events = tick(&mut world, &mut collisions, DriveInput::default());
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::PlayerBounced { speed, .. } if *speed == 0.0)));
    }

    assert_eq!(query::player(&world).position, start);
}

#[test]
fn resting_player_spares_pedestrians() {
    let mut world = World::new();
    let mut collisions = Collisions::new();
    let player = query::player(&world).position;
    spawn_pedestrian(&mut world, player);

    let _ = tick(&mut world, &mut collisions, DriveInput::default());

    assert_eq!(query::pedestrian_view(&world).len(), 1);
    assert_eq!(query::score(&world), 0);
}

#[test]
fn player_bounces_once_per_tick_of_overlap() {
    let mut world = World::new();
    let mut collisions = Collisions::new();

    // Accelerate east out of the central block, then keep going until the
    // next block is hit.
    let mut bounce = None;
    for _ in 0..120 {
        let before = query::player(&world).speed;
        let events = tick(&mut world, &mut collisions, forward());
        let bounces: Vec<f32> = events
            .iter()
            .filter_map(|event| match event {
                Event::PlayerBounced { speed, .. } => Some(*speed),
                _ => None,
            })
            .collect();
        if before > 1.0 && !bounces.is_empty() {
            bounce = Some((before, bounces));
            break;
        }
    }

    let (before, bounces) = bounce.expect("player should eventually hit a block");
    assert_eq!(bounces.len(), 1);
    let driven = (before + 0.2).min(5.0);
    assert_eq!(bounces[0], -driven * 0.5);
    assert!(query::player(&world).speed < 0.0);
}

#[test]
fn fast_player_clears_pedestrians_and_draws_attention() {
    let mut world = World::new();
    let mut collisions = Collisions::new();

    // Crawl out of the starting block and build up speed on open road.
    for _ in 0..200 {
        if query::player(&world).speed > 2.0 {
            break;
        }
        let _ = tick(&mut world, &mut collisions, forward());
    }
    let speed = query::player(&world).speed;
    assert!(speed > 2.0, "speed {speed}");

    // Line up more victims than the wanted meter can count.
    let ahead = query::player(&world).position;
    for _ in 0..7 {
        spawn_pedestrian(&mut world, ahead);
    }

    let events = tick(&mut world, &mut collisions, forward());
    let struck = events
        .iter()
        .filter(|event| matches!(event, Event::PedestrianStruck { .. }))
        .count();

    assert_eq!(struck, 7);
    assert!(query::pedestrian_view(&world).is_empty());
    assert_eq!(query::score(&world), 7 * STRIKE_SCORE);
    assert_eq!(query::wanted_level(&world), WantedLevel::new(WantedLevel::MAX));
}
