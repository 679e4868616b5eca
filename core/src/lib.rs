#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Joyride engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Every gameplay constant lives here as well. The world and the systems read
//! them directly; nothing tunes them at runtime.

pub mod kinematics;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Title presented by windowed adapters.
pub const WINDOW_TITLE: &str = "Joyride";

/// Width of the playable area, which is also the screen width.
pub const SCREEN_WIDTH: f32 = 1000.0;
/// Height of the playable area, which is also the screen height.
pub const SCREEN_HEIGHT: f32 = 700.0;
/// Target simulation and presentation rate.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Top speed reached while accelerating forward.
pub const CAR_MAX_SPEED: f32 = 5.0;
/// Speed gained or lost per tick while the throttle or brake is held.
pub const CAR_ACCELERATION: f32 = 0.2;
/// Heading change in degrees per tick of held steering.
pub const CAR_ROTATION_SPEED: f32 = 3.0;
/// Multiplicative speed decay applied when no pedal is held.
pub const CAR_FRICTION: f32 = 0.95;
/// Steering only bites above this absolute speed.
pub const CAR_STEERING_THRESHOLD: f32 = 0.1;
/// Length of every car along its heading.
pub const CAR_WIDTH: f32 = 30.0;
/// Breadth of every car across its heading.
pub const CAR_HEIGHT: f32 = 20.0;
/// Health assigned to new cars. Nothing depletes it yet.
pub const CAR_HEALTH: u32 = 100;

/// Radius of a pedestrian's body disc.
pub const PEDESTRIAN_RADIUS: f32 = 8.0;
/// Lower bound (inclusive) of a pedestrian's walking speed.
pub const PEDESTRIAN_MIN_SPEED: f32 = 0.5;
/// Upper bound (exclusive) of a pedestrian's walking speed.
pub const PEDESTRIAN_MAX_SPEED: f32 = 1.5;
/// Shortest wander leg in ticks.
pub const WANDER_MIN_TICKS: u32 = 60;
/// Longest wander leg in ticks.
pub const WANDER_MAX_TICKS: u32 = 180;

/// Cruising speed enforced on every traffic car.
pub const TRAFFIC_SPEED: f32 = 2.0;
/// Per-tick chance that a traffic car swerves.
pub const TRAFFIC_TURN_PROBABILITY: f64 = 0.02;
/// Magnitude of a traffic swerve in degrees.
pub const TRAFFIC_TURN_DEGREES: f32 = 45.0;

/// Absolute player speed that must be exceeded to strike a pedestrian.
pub const STRIKE_SPEED_THRESHOLD: f32 = 2.0;
/// Points awarded per struck pedestrian.
pub const STRIKE_SCORE: u32 = 100;
/// Fraction of speed retained (and reversed) when bouncing off a building.
pub const BOUNCE_DAMPING: f32 = 0.5;
/// Scale applied to the post-bounce velocity when pushing the car clear.
pub const BOUNCE_PUSHBACK: f32 = 5.0;

/// Per-tick chance that a non-zero wanted level cools down by one.
pub const WANTED_DECAY_PROBABILITY: f64 = 0.005;

/// Pedestrians placed when the city is populated.
pub const PEDESTRIAN_COUNT: usize = 15;
/// Traffic cars placed when the city is populated.
pub const TRAFFIC_CAR_COUNT: usize = 5;
/// Distance from the screen edges kept clear when placing pedestrians.
pub const PEDESTRIAN_SPAWN_MARGIN: u32 = 50;
/// Distance from the screen edges kept clear when placing traffic.
pub const TRAFFIC_SPAWN_MARGIN: u32 = 100;

/// Spacing between window squares on a building facade.
pub const WINDOW_SPACING: f32 = 20.0;
/// Inset between a building edge and its first window.
pub const WINDOW_PADDING: f32 = 15.0;
/// Side length of a window square.
pub const WINDOW_SIZE: f32 = 10.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by one frame.
    Tick,
    /// Applies one frame of driver input to the player car.
    DrivePlayer {
        /// Direction keys held during the frame.
        input: DriveInput,
    },
    /// Assigns the facade paint of a building during city population.
    PaintBuilding {
        /// Building receiving the paint.
        building: BuildingId,
        /// Paint applied to the facade.
        paint: Paint,
    },
    /// Places a new pedestrian on the streets.
    SpawnPedestrian {
        /// Initial position of the pedestrian.
        position: Vec2,
        /// Walking speed kept for the pedestrian's lifetime.
        speed: f32,
        /// Initial heading.
        heading: Heading,
        /// Clothing paint.
        paint: Paint,
    },
    /// Places a new autonomous traffic car.
    SpawnTrafficCar {
        /// Initial position of the car.
        position: Vec2,
        /// Initial heading.
        heading: Heading,
        /// Body paint.
        paint: Paint,
    },
    /// Advances a single pedestrian by one tick.
    AdvancePedestrian {
        /// Pedestrian to advance.
        pedestrian: PedestrianId,
        /// Fresh wander leg to adopt once the current leg expires.
        retarget: Option<WanderLeg>,
    },
    /// Advances a single traffic car by one tick.
    SteerTrafficCar {
        /// Traffic car to advance.
        car: TrafficCarId,
        /// Optional swerve applied before moving.
        turn: Option<Turn>,
    },
    /// Requests that the player car runs over a pedestrian.
    StrikePedestrian {
        /// Pedestrian struck by the player.
        pedestrian: PedestrianId,
    },
    /// Bounces the player car off a building it overlaps.
    BouncePlayer {
        /// Building the player collided with.
        building: BuildingId,
    },
    /// Lowers the wanted level by one if it is above zero.
    CoolWantedLevel,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started, counting from one.
        tick: u64,
    },
    /// Reports the player car's state after a frame of driving.
    PlayerMoved {
        /// Position after integration and clamping.
        position: Vec2,
        /// Signed speed after the control response.
        speed: f32,
    },
    /// Confirms that a pedestrian joined the world.
    PedestrianSpawned {
        /// Identifier allocated to the pedestrian.
        pedestrian: PedestrianId,
        /// Position the pedestrian occupies.
        position: Vec2,
    },
    /// Confirms that a traffic car joined the world.
    TrafficCarSpawned {
        /// Identifier allocated to the car.
        car: TrafficCarId,
        /// Position the car occupies.
        position: Vec2,
    },
    /// Reports that the player ran over a pedestrian.
    PedestrianStruck {
        /// Pedestrian removed from the world.
        pedestrian: PedestrianId,
        /// Score after awarding the strike.
        score: u32,
        /// Wanted level after the strike.
        wanted_level: WantedLevel,
    },
    /// Reports that the player bounced off a building.
    PlayerBounced {
        /// Building responsible for the bounce.
        building: BuildingId,
        /// Player speed after the bounce.
        speed: f32,
    },
    /// Reports that the wanted level cooled down.
    WantedLevelChanged {
        /// Wanted level after the change.
        wanted_level: WantedLevel,
    },
}

/// Direction keys held by the driver during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriveInput {
    /// Throttle.
    pub forward: bool,
    /// Brake and reverse.
    pub reverse: bool,
    /// Steer counter-clockwise.
    pub left: bool,
    /// Steer clockwise.
    pub right: bool,
}

/// Direction of travel in degrees, counter-clockwise from the positive x-axis.
///
/// Headings are intentionally left unnormalised: repeated steering and edge
/// reflections accumulate freely, and only the trigonometric projection is
/// ever observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Heading(f32);

impl Heading {
    /// Heading facing along the positive x-axis.
    pub const EAST: Self = Self(0.0);

    /// Creates a heading from a value in degrees.
    #[must_use]
    pub const fn from_degrees(degrees: f32) -> Self {
        Self(degrees)
    }

    /// Heading expressed in degrees.
    #[must_use]
    pub const fn degrees(&self) -> f32 {
        self.0
    }

    /// Heading expressed in radians.
    #[must_use]
    pub fn radians(&self) -> f32 {
        self.0.to_radians()
    }

    /// Returns the heading rotated counter-clockwise by `degrees`.
    #[must_use]
    pub fn rotated(self, degrees: f32) -> Self {
        Self(self.0 + degrees)
    }

    /// Mirrors the heading across the vertical axis, as when hitting a left or right edge.
    #[must_use]
    pub fn reflected_horizontally(self) -> Self {
        Self(180.0 - self.0)
    }

    /// Mirrors the heading across the horizontal axis, as when hitting a top or bottom edge.
    #[must_use]
    pub fn reflected_vertically(self) -> Self {
        Self(-self.0)
    }
}

/// Swerve direction chosen by the traffic controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Counter-clockwise swerve.
    Left,
    /// Clockwise swerve.
    Right,
}

impl Turn {
    /// Signed heading change applied by the swerve.
    #[must_use]
    pub const fn degrees(self) -> f32 {
        match self {
            Self::Left => TRAFFIC_TURN_DEGREES,
            Self::Right => -TRAFFIC_TURN_DEGREES,
        }
    }
}

/// A pedestrian's next stretch of aimless walking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WanderLeg {
    /// Heading adopted for the leg.
    pub heading: Heading,
    /// Number of ticks before the next retarget.
    pub countdown: u32,
}

/// Notoriety meter bounded to `0..=WantedLevel::MAX`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WantedLevel(u8);

impl WantedLevel {
    /// Highest attainable wanted level.
    pub const MAX: u8 = 5;

    /// Creates a wanted level, saturating at [`WantedLevel::MAX`].
    #[must_use]
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(level)
        }
    }

    /// Numeric wanted level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `true` when nobody is looking for the player.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.0 == 0
    }

    /// Wanted level one step hotter, saturating at the maximum.
    #[must_use]
    pub const fn raised(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Wanted level one step cooler, saturating at zero.
    #[must_use]
    pub const fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

/// Byte RGB paint applied to entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Paint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Paint {
    /// Pure red, reserved for the player car.
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    /// Pure blue.
    pub const BLUE: Self = Self::from_rgb(0, 0, 255);
    /// Pure green.
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);
    /// Pure yellow, also used for lit windows and wanted stars.
    pub const YELLOW: Self = Self::from_rgb(255, 255, 0);
    /// Pure white.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    /// Mid gray.
    pub const GRAY: Self = Self::from_rgb(128, 128, 128);
    /// Dark gray, also used for roads.
    pub const DARK_GRAY: Self = Self::from_rgb(64, 64, 64);
    /// Earthy brown.
    pub const BROWN: Self = Self::from_rgb(139, 69, 19);

    /// Creates a new paint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the paint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the paint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the paint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Paints available to traffic cars. The player's red is excluded.
pub const TRAFFIC_PALETTE: [Paint; 4] = [Paint::BLUE, Paint::GREEN, Paint::YELLOW, Paint::WHITE];

/// Clothing paints available to pedestrians.
pub const PEDESTRIAN_PALETTE: [Paint; 3] = [Paint::BROWN, Paint::BLACK, Paint::WHITE];

/// Facade paints available to buildings.
pub const BUILDING_PALETTE: [Paint; 3] = [
    Paint::GRAY,
    Paint::DARK_GRAY,
    Paint::from_rgb(100, 100, 100),
];

/// Unique identifier assigned to a pedestrian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PedestrianId(u32);

impl PedestrianId {
    /// Creates a new pedestrian identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a traffic car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrafficCarId(u32);

impl TrafficCarId {
    /// Creates a new traffic car identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a building, matching its layout index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new building identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Extent of the playable area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    /// Bounds matching the fixed screen.
    pub const SCREEN: Self = Self::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    /// Creates bounds spanning `[0, width] x [0, height]`.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Center of the playable area.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the provided size centered on `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x * 0.5,
            center.y - size.y * 0.5,
            size.x,
            size.y,
        )
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal size.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical size.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `true` when the rectangles share interior area.
    ///
    /// Rectangles that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns `true` when the point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Immutable representation of a car used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarSnapshot {
    /// Center of the car.
    pub position: Vec2,
    /// Facing direction.
    pub heading: Heading,
    /// Signed speed; negative while reversing.
    pub speed: f32,
    /// Length and breadth of the car.
    pub size: Vec2,
    /// Body paint.
    pub paint: Paint,
    /// Remaining health; nothing damages cars yet.
    pub health: u32,
}

impl CarSnapshot {
    /// Axis-aligned collision box, ignoring rotation.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.position, self.size)
    }
}

/// Immutable representation of a traffic car used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficCarSnapshot {
    /// Identifier allocated to the car.
    pub id: TrafficCarId,
    /// Car state.
    pub car: CarSnapshot,
}

/// Read-only snapshot describing all traffic cars.
#[derive(Clone, Debug, Default)]
pub struct TrafficView {
    snapshots: Vec<TrafficCarSnapshot>,
}

impl TrafficView {
    /// Creates a new traffic view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TrafficCarSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterates over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TrafficCarSnapshot> {
        self.snapshots.iter()
    }

    /// Number of traffic cars captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` when no traffic was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TrafficCarSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single pedestrian used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PedestrianSnapshot {
    /// Identifier allocated to the pedestrian.
    pub id: PedestrianId,
    /// Center of the body disc.
    pub position: Vec2,
    /// Walking direction.
    pub heading: Heading,
    /// Walking speed.
    pub speed: f32,
    /// Body disc radius.
    pub radius: f32,
    /// Ticks remaining in the current wander leg.
    pub wander_countdown: u32,
    /// Clothing paint.
    pub paint: Paint,
}

impl PedestrianSnapshot {
    /// Square bounding the body disc.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.position, Vec2::splat(self.radius * 2.0))
    }

    /// Returns `true` when the next advance exhausts the current wander leg.
    #[must_use]
    pub const fn needs_retarget(&self) -> bool {
        self.wander_countdown <= 1
    }
}

/// Read-only snapshot describing all live pedestrians.
#[derive(Clone, Debug, Default)]
pub struct PedestrianView {
    snapshots: Vec<PedestrianSnapshot>,
}

impl PedestrianView {
    /// Creates a new pedestrian view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PedestrianSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterates over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &PedestrianSnapshot> {
        self.snapshots.iter()
    }

    /// Number of pedestrians captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` when no pedestrians were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PedestrianSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a building used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingSnapshot {
    /// Identifier of the building.
    pub id: BuildingId,
    /// Footprint occupied by the building.
    pub footprint: Rect,
    /// Facade paint.
    pub paint: Paint,
}

impl BuildingSnapshot {
    /// Window squares laid out across the facade, row by row from the top-left.
    ///
    /// Windows start [`WINDOW_PADDING`] inside the top-left corner and repeat
    /// every [`WINDOW_SPACING`] while their origin stays more than the padding
    /// away from the right and bottom edges.
    pub fn windows(&self) -> impl Iterator<Item = Rect> {
        let footprint = self.footprint;
        window_origins(footprint.x(), footprint.width()).flat_map(move |x| {
            window_origins(footprint.y(), footprint.height())
                .map(move |y| Rect::new(x, y, WINDOW_SIZE, WINDOW_SIZE))
        })
    }
}

/// Origins of window squares along one facade axis.
#[derive(Clone, Copy, Debug)]
struct WindowOrigins {
    next: f32,
    end: f32,
}

fn window_origins(start: f32, extent: f32) -> WindowOrigins {
    WindowOrigins {
        next: start + WINDOW_PADDING,
        end: start + extent - WINDOW_PADDING,
    }
}

impl Iterator for WindowOrigins {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.next >= self.end {
            return None;
        }
        let origin = self.next;
        self.next += WINDOW_SPACING;
        Some(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BuildingId, BuildingSnapshot, DriveInput, Heading, Paint, PedestrianId,
        PedestrianSnapshot, Rect, Turn, WantedLevel, PEDESTRIAN_RADIUS,
    };
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn drive_input_round_trips_through_bincode() {
        assert_round_trip(&DriveInput {
            forward: true,
            left: true,
            ..DriveInput::default()
        });
    }

    #[test]
    fn wanted_level_round_trips_through_bincode() {
        assert_round_trip(&WantedLevel::new(3));
    }

    #[test]
    fn wanted_level_saturates_in_both_directions() {
        assert_eq!(WantedLevel::new(9).get(), WantedLevel::MAX);
        assert_eq!(WantedLevel::new(5).raised().get(), 5);
        assert_eq!(WantedLevel::default().lowered().get(), 0);
        assert_eq!(WantedLevel::new(2).raised().lowered().get(), 2);
    }

    #[test]
    fn heading_reflections_match_edge_rules() {
        let heading = Heading::from_degrees(30.0);
        assert_eq!(heading.reflected_horizontally().degrees(), 150.0);
        assert_eq!(heading.reflected_vertically().degrees(), -30.0);
        assert_eq!(heading.rotated(Turn::Right.degrees()).degrees(), -15.0);
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(9.5, 9.5, 10.0, 10.0);

        assert!(!left.overlaps(&right));
        assert!(left.overlaps(&overlapping));
        assert!(overlapping.overlaps(&left));
    }

    #[test]
    fn contains_point_excludes_far_edges() {
        let rect = Rect::new(50.0, 50.0, 150.0, 100.0);

        assert!(rect.contains_point(Vec2::new(50.0, 50.0)));
        assert!(rect.contains_point(Vec2::new(199.0, 149.0)));
        assert!(!rect.contains_point(Vec2::new(200.0, 100.0)));
        assert!(!rect.contains_point(Vec2::new(100.0, 150.0)));
    }

    #[test]
    fn pedestrian_bounding_box_encloses_body_disc() {
        let snapshot = PedestrianSnapshot {
            id: PedestrianId::new(0),
            position: Vec2::new(100.0, 100.0),
            heading: Heading::EAST,
            speed: 1.0,
            radius: PEDESTRIAN_RADIUS,
            wander_countdown: 0,
            paint: Paint::BROWN,
        };

        assert_eq!(snapshot.bounding_box(), Rect::new(92.0, 92.0, 16.0, 16.0));
        assert!(snapshot.needs_retarget());
    }

    #[test]
    fn building_windows_follow_padding_and_spacing() {
        let building = BuildingSnapshot {
            id: BuildingId::new(0),
            footprint: Rect::new(50.0, 50.0, 150.0, 100.0),
            paint: Paint::GRAY,
        };

        let windows: Vec<Rect> = building.windows().collect();

        // x origins 65..185 step 20 (6 columns), y origins 65..135 step 20 (4 rows).
        assert_eq!(windows.len(), 6 * 4);
        assert_eq!(windows[0], Rect::new(65.0, 65.0, 10.0, 10.0));
        assert_eq!(windows[3], Rect::new(65.0, 125.0, 10.0, 10.0));
        assert_eq!(
            windows.last().copied(),
            Some(Rect::new(165.0, 125.0, 10.0, 10.0))
        );
    }
}
