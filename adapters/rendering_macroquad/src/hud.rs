//! Heads-up display drawn on top of the city.
//!
//! This module hosts every use of `macroquad::text` so font handling stays in
//! one place.

use glam::Vec2;
use joyride_rendering::{Color, HudPresentation};
use macroquad::text::{draw_text, measure_text};

use crate::{draw_triangle, fan_triangles, to_macroquad_color};

/// Draws the score, wanted stars and controls for a screen of the given width.
pub(crate) fn draw_hud(hud: &HudPresentation, screen_width: f32) {
    let label_color = HudPresentation::TEXT_COLOR;

    draw_label(
        &hud.score_label(),
        HudPresentation::SCORE_ORIGIN,
        HudPresentation::LABEL_FONT_SIZE,
        label_color,
    );
    draw_label(
        HudPresentation::WANTED_LABEL,
        HudPresentation::WANTED_ORIGIN,
        HudPresentation::LABEL_FONT_SIZE,
        label_color,
    );

    let star_color = to_macroquad_color(HudPresentation::STAR_COLOR);
    for star in hud.stars() {
        for triangle in fan_triangles(&star) {
            draw_triangle(triangle, star_color);
        }
    }

    for (line, origin) in hud.controls(screen_width) {
        draw_label(line, origin, HudPresentation::CONTROLS_FONT_SIZE, label_color);
    }
}

/// Draws `text` with its bounding box's top-left corner at `origin`.
fn draw_label(text: &str, origin: Vec2, font_size: f32, color: Color) {
    let dimensions = measure_text(text, None, font_size as u16, 1.0);
    draw_text(
        text,
        origin.x,
        origin.y + dimensions.offset_y,
        font_size,
        to_macroquad_color(color),
    );
}
