//! Position integration and screen-bound clamping shared by every moving entity.
//!
//! Cars integrate with the screen's inverted y-axis so that a heading of 90
//! degrees points up the screen. Pedestrians integrate without the inversion,
//! which makes them walk "mirrored" relative to cars for the same heading.

use glam::Vec2;

use crate::{Bounds, Heading};

/// Advances a car-like entity along its heading with the screen y-axis inverted.
#[must_use]
pub fn advance_screen(position: Vec2, heading: Heading, speed: f32) -> Vec2 {
    let radians = heading.radians();
    Vec2::new(
        position.x + speed * radians.cos(),
        position.y - speed * radians.sin(),
    )
}

/// Advances a pedestrian along its heading without inverting the y-axis.
#[must_use]
pub fn advance_wander(position: Vec2, heading: Heading, speed: f32) -> Vec2 {
    let radians = heading.radians();
    Vec2::new(
        position.x + speed * radians.cos(),
        position.y + speed * radians.sin(),
    )
}

/// Clamps a position so a shape with the given half extents stays on-screen.
#[must_use]
pub fn clamp_within(position: Vec2, half_extents: Vec2, bounds: Bounds) -> Vec2 {
    Vec2::new(
        clamp_axis(position.x, half_extents.x, bounds.width()),
        clamp_axis(position.y, half_extents.y, bounds.height()),
    )
}

fn clamp_axis(value: f32, half_extent: f32, bound: f32) -> f32 {
    half_extent.max((bound - half_extent).min(value))
}

/// Reflects a heading when the position touches or passes an inset screen edge.
///
/// A left or right contact mirrors the heading to `180 - angle`, a top or
/// bottom contact negates it. Both apply when a corner is reached.
#[must_use]
pub fn reflect_at_edges(position: Vec2, heading: Heading, inset: Vec2, bounds: Bounds) -> Heading {
    let mut heading = heading;
    if position.x <= inset.x || position.x >= bounds.width() - inset.x {
        heading = heading.reflected_horizontally();
    }
    if position.y <= inset.y || position.y >= bounds.height() - inset.y {
        heading = heading.reflected_vertically();
    }
    heading
}
