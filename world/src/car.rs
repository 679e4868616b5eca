//! Vehicle state shared by the player car and traffic.

use glam::Vec2;
use joyride_core::{
    kinematics, Bounds, CarSnapshot, DriveInput, Heading, Paint, Rect, Turn, BOUNCE_DAMPING,
    BOUNCE_PUSHBACK, CAR_ACCELERATION, CAR_FRICTION, CAR_HEALTH, CAR_HEIGHT, CAR_MAX_SPEED,
    CAR_ROTATION_SPEED, CAR_STEERING_THRESHOLD, CAR_WIDTH, TRAFFIC_SPEED,
};

/// Authoritative state of a single car.
#[derive(Clone, Debug)]
pub(crate) struct Car {
    pub(crate) position: Vec2,
    pub(crate) heading: Heading,
    pub(crate) speed: f32,
    max_speed: f32,
    acceleration: f32,
    rotation_speed: f32,
    size: Vec2,
    pub(crate) paint: Paint,
    health: u32,
}

impl Car {
    /// Creates a stationary car facing east.
    pub(crate) fn new(position: Vec2, paint: Paint) -> Self {
        Self {
            position,
            heading: Heading::EAST,
            speed: 0.0,
            max_speed: CAR_MAX_SPEED,
            acceleration: CAR_ACCELERATION,
            rotation_speed: CAR_ROTATION_SPEED,
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            paint,
            health: CAR_HEALTH,
        }
    }

    /// Creates a car facing the provided heading.
    pub(crate) fn facing(position: Vec2, heading: Heading, paint: Paint) -> Self {
        Self {
            heading,
            ..Self::new(position, paint)
        }
    }

    fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Applies one frame of driver input, then integrates and clamps.
    ///
    /// Left and right are evaluated independently; holding both rotates the
    /// car one way and straight back again.
    pub(crate) fn drive(&mut self, input: DriveInput, bounds: Bounds) {
        if input.forward {
            self.speed = (self.speed + self.acceleration).min(self.max_speed);
        } else if input.reverse {
            self.speed = (self.speed - self.acceleration).max(-self.max_speed / 2.0);
        } else {
            self.speed *= CAR_FRICTION;
        }

        if self.speed.abs() > CAR_STEERING_THRESHOLD {
            if input.left {
                self.heading = self.heading.rotated(self.rotation_speed);
            }
            if input.right {
                self.heading = self.heading.rotated(-self.rotation_speed);
            }
        }

        self.position = kinematics::advance_screen(self.position, self.heading, self.speed);
        self.position = kinematics::clamp_within(self.position, self.half_extents(), bounds);
    }

    /// Advances an autonomous car at cruising speed, reflecting off the screen edges.
    pub(crate) fn cruise(&mut self, turn: Option<Turn>, bounds: Bounds) {
        self.speed = TRAFFIC_SPEED;
        if let Some(turn) = turn {
            self.heading = self.heading.rotated(turn.degrees());
        }

        self.position = kinematics::advance_screen(self.position, self.heading, self.speed);
        self.heading =
            kinematics::reflect_at_edges(self.position, self.heading, Vec2::ZERO, bounds);
        self.position = kinematics::clamp_within(self.position, self.half_extents(), bounds);
    }

    /// Reverses and halves the speed, then pushes the car back along its heading.
    ///
    /// The push uses the post-bounce speed and leaves the position unclamped.
    pub(crate) fn bounce(&mut self) {
        self.speed = -self.speed * BOUNCE_DAMPING;
        let radians = self.heading.radians();
        self.position.x -= self.speed * radians.cos() * BOUNCE_PUSHBACK;
        self.position.y += self.speed * radians.sin() * BOUNCE_PUSHBACK;
    }

    /// Axis-aligned collision box, ignoring rotation.
    pub(crate) fn bounding_box(&self) -> Rect {
        Rect::centered(self.position, self.size)
    }

    pub(crate) fn snapshot(&self) -> CarSnapshot {
        CarSnapshot {
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            size: self.size,
            paint: self.paint,
            health: self.health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn parked() -> Car {
        Car::new(Bounds::SCREEN.center(), Paint::RED)
    }

    #[test]
    fn throttle_accelerates_up_to_max_speed() {
        let mut car = parked();
        let throttle = DriveInput {
            forward: true,
            ..DriveInput::default()
        };

        car.drive(throttle, Bounds::SCREEN);
        assert!((car.speed - CAR_ACCELERATION).abs() < EPSILON);

        for _ in 0..100 {
            car.drive(throttle, Bounds::SCREEN);
        }
        assert_eq!(car.speed, CAR_MAX_SPEED);
    }

    #[test]
    fn reverse_is_capped_at_half_max_speed() {
        let mut car = parked();
        let brake = DriveInput {
            reverse: true,
            ..DriveInput::default()
        };

        for _ in 0..100 {
            car.drive(brake, Bounds::SCREEN);
        }
        assert_eq!(car.speed, -CAR_MAX_SPEED / 2.0);
    }

    #[test]
    fn coasting_decays_speed_by_friction() {
        let mut car = parked();
        car.speed = 4.0;

        car.drive(DriveInput::default(), Bounds::SCREEN);

        assert!((car.speed - 3.8).abs() < EPSILON);
    }

    #[test]
    fn steering_requires_motion() {
        let mut car = parked();
        let left = DriveInput {
            left: true,
            ..DriveInput::default()
        };

        car.drive(left, Bounds::SCREEN);
        assert_eq!(car.heading, Heading::EAST);

        car.speed = 1.0;
        car.drive(left, Bounds::SCREEN);
        assert_eq!(car.heading.degrees(), CAR_ROTATION_SPEED);
    }

    #[test]
    fn opposite_steering_applies_both_rotations() {
        let mut car = parked();
        car.speed = 3.0;
        car.heading = Heading::from_degrees(10.0);

        car.drive(
            DriveInput {
                left: true,
                right: true,
                ..DriveInput::default()
            },
            Bounds::SCREEN,
        );

        assert_eq!(car.heading.degrees(), 10.0);
    }

    #[test]
    fn driving_into_the_corner_clamps_to_half_extents() {
        let mut car = Car::facing(Vec2::new(16.0, 11.0), Heading::from_degrees(135.0), Paint::RED);
        car.speed = CAR_MAX_SPEED;

        car.drive(
            DriveInput {
                forward: true,
                ..DriveInput::default()
            },
            Bounds::SCREEN,
        );

        assert_eq!(car.position, Vec2::new(CAR_WIDTH / 2.0, CAR_HEIGHT / 2.0));
    }

    #[test]
    fn traffic_reflects_off_left_edge_before_clamping() {
        let mut car = Car::facing(Vec2::new(1.0, 300.0), Heading::from_degrees(180.0), Paint::BLUE);

        car.cruise(None, Bounds::SCREEN);

        assert_eq!(car.speed, TRAFFIC_SPEED);
        assert_eq!(car.heading.degrees(), 0.0);
        assert_eq!(car.position.x, CAR_WIDTH / 2.0);
    }

    #[test]
    fn traffic_turn_rotates_before_moving() {
        let mut car = Car::facing(Vec2::new(500.0, 350.0), Heading::EAST, Paint::GREEN);

        car.cruise(Some(Turn::Left), Bounds::SCREEN);

        assert_eq!(car.heading.degrees(), 45.0);
        let expected = 2.0 * 45f32.to_radians().cos();
        assert!((car.position.x - (500.0 + expected)).abs() < EPSILON);
        assert!((car.position.y - (350.0 - expected)).abs() < EPSILON);
    }

    #[test]
    fn bounce_reverses_halves_and_pushes_back() {
        let mut car = parked();
        car.speed = 4.0;
        let start = car.position;

        car.bounce();

        assert_eq!(car.speed, -2.0);
        assert!((car.position.x - (start.x + 10.0)).abs() < EPSILON);
        assert!((car.position.y - start.y).abs() < EPSILON);
    }
}
