//! Fixed city layout and spawn-point validity checks.

use glam::Vec2;
use joyride_core::{BuildingId, Paint, Rect};

use crate::Building;

/// Footprints of the city blocks as `(x, y, width, height)`, three rows of five.
pub(crate) const CITY_BLOCKS: [(f32, f32, f32, f32); 15] = [
    (50.0, 50.0, 150.0, 100.0),
    (250.0, 50.0, 100.0, 150.0),
    (400.0, 50.0, 150.0, 100.0),
    (600.0, 50.0, 100.0, 100.0),
    (750.0, 50.0, 150.0, 150.0),
    (50.0, 250.0, 100.0, 100.0),
    (200.0, 200.0, 150.0, 150.0),
    (400.0, 250.0, 100.0, 100.0),
    (600.0, 200.0, 150.0, 150.0),
    (800.0, 250.0, 100.0, 100.0),
    (50.0, 450.0, 150.0, 150.0),
    (250.0, 500.0, 100.0, 100.0),
    (400.0, 450.0, 150.0, 150.0),
    (600.0, 500.0, 100.0, 100.0),
    (750.0, 450.0, 150.0, 150.0),
];

/// Builds the city from the fixed block table, in table order.
///
/// Facades start out gray; city population repaints them.
pub(crate) fn city_blocks() -> Vec<Building> {
    CITY_BLOCKS
        .iter()
        .enumerate()
        .map(|(index, &(x, y, width, height))| Building {
            id: BuildingId::new(index as u32),
            footprint: Rect::new(x, y, width, height),
            paint: Paint::GRAY,
        })
        .collect()
}

/// Returns `true` when the point lies outside every building footprint.
pub(crate) fn is_open_ground(buildings: &[Building], point: Vec2) -> bool {
    !buildings
        .iter()
        .any(|building| building.footprint.contains_point(point))
}
