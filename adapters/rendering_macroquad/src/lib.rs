#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Joyride.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! All text drawing lives inside the local `hud` module; the rest of the
//! adapter only fills shapes.

mod hud;

use anyhow::Result;
use glam::Vec2;
use joyride_core::{DriveInput, FRAMES_PER_SECOND};
use joyride_rendering::{
    BuildingPresentation, CarPresentation, Color, FrameInput, LoopState, PedestrianPresentation,
    Presentation, RenderingBackend, RoadGridPresentation, RotatedRect, Scene, HEAD_COLOR,
};
use log::{info, trace};
use macroquad::input::{is_key_down, is_key_pressed, is_quit_requested, prevent_quit, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::time::{Duration, Instant};

/// Direction and quit keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyObservations {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    escape_pressed: bool,
    close_requested: bool,
}

impl KeyObservations {
    fn poll() -> Self {
        Self {
            up: is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            escape_pressed: is_key_pressed(KeyCode::Escape),
            close_requested: is_quit_requested(),
        }
    }

    fn into_frame_input(self) -> FrameInput {
        FrameInput {
            drive: DriveInput {
                forward: self.up,
                reverse: self.down,
                left: self.left,
                right: self.right,
            },
            quit_requested: self.escape_pressed || self.close_requested,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    frame_limit: Option<u32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or rely on its own frame pacing alone.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Closes the window on its own after `frames` frames.
    #[must_use]
    pub fn with_frame_limit(mut self, frames: Option<u32>) -> Self {
        self.frame_limit = frames;
        self
    }
}

/// Tracks the frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a presented frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

/// Sleeps away whatever remains of each fixed-length frame.
#[derive(Clone, Copy, Debug)]
struct FramePacer {
    target: Duration,
}

impl FramePacer {
    fn new(frames_per_second: u32) -> Self {
        Self {
            target: Duration::from_secs(1) / frames_per_second.max(1),
        }
    }

    /// Time left in the frame after `busy` has already been spent.
    fn remaining(&self, busy: Duration) -> Option<Duration> {
        self.target.checked_sub(busy).filter(|left| !left.is_zero())
    }

    fn wait(&self, frame_start: Instant) {
        if let Some(left) = self.remaining(frame_start.elapsed()) {
            std::thread::sleep(left);
        }
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> LoopState + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            frame_limit,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.bounds.width() as i32,
            window_height: scene.bounds.height() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let pacer = FramePacer::new(FRAMES_PER_SECOND);
            let mut presented = 0_u32;

            prevent_quit();

            loop {
                let frame_start = Instant::now();
                let frame_input = KeyObservations::poll().into_frame_input();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let state = update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(background);
                draw_scene(&scene);
                trace!("frame rendered in {:?}", frame_start.elapsed());

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!("FPS: {per_second:.2}");
                    }
                }

                presented = presented.saturating_add(1);
                if should_close(state, presented, frame_limit) {
                    break;
                }

                pacer.wait(frame_start);
                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// The loop ends once the update closure stops or the frame limit is used up.
fn should_close(state: LoopState, presented: u32, frame_limit: Option<u32>) -> bool {
    state == LoopState::Stopped || frame_limit.is_some_and(|limit| presented >= limit)
}

fn draw_scene(scene: &Scene) {
    draw_roads(&scene.roads, scene);
    for building in &scene.buildings {
        draw_building(building);
    }
    for pedestrian in &scene.pedestrians {
        draw_pedestrian(pedestrian);
    }
    for car in &scene.traffic {
        draw_car(car);
    }
    draw_car(&scene.player);
    hud::draw_hud(&scene.hud, scene.bounds.width());
}

fn draw_roads(roads: &RoadGridPresentation, scene: &Scene) {
    let color = to_macroquad_color(roads.color);
    for line in roads.lines(scene.bounds) {
        macroquad::shapes::draw_line(
            line.from.x,
            line.from.y,
            line.to.x,
            line.to.y,
            roads.thickness,
            color,
        );
    }
}

fn draw_building(building: &BuildingPresentation) {
    let footprint = building.footprint;
    macroquad::shapes::draw_rectangle(
        footprint.x(),
        footprint.y(),
        footprint.width(),
        footprint.height(),
        to_macroquad_color(building.color),
    );
    for window in &building.windows {
        macroquad::shapes::draw_rectangle(
            window.rect.x(),
            window.rect.y(),
            window.rect.width(),
            window.rect.height(),
            to_macroquad_color(window.color()),
        );
    }
}

fn draw_pedestrian(pedestrian: &PedestrianPresentation) {
    macroquad::shapes::draw_circle(
        pedestrian.center.x,
        pedestrian.center.y,
        pedestrian.radius,
        to_macroquad_color(pedestrian.color),
    );
    macroquad::shapes::draw_circle(
        pedestrian.head_center.x,
        pedestrian.head_center.y,
        pedestrian.head_radius,
        to_macroquad_color(HEAD_COLOR),
    );
}

fn draw_car(car: &CarPresentation) {
    draw_rotated_rect(&car.body);
    draw_rotated_rect(&car.windshield);
}

fn draw_rotated_rect(rect: &RotatedRect) {
    let color = to_macroquad_color(rect.color);
    for triangle in rect_triangles(rect.corners()) {
        draw_triangle(triangle, color);
    }
}

/// Splits a quad into the two triangles that cover it.
fn rect_triangles(corners: [Vec2; 4]) -> [[Vec2; 3]; 2] {
    [
        [corners[0], corners[1], corners[2]],
        [corners[0], corners[2], corners[3]],
    ]
}

/// Triangulates a convex polygon as a fan around its first vertex.
fn fan_triangles(vertices: &[Vec2]) -> Vec<[Vec2; 3]> {
    match vertices.split_first() {
        Some((&hub, rest)) => rest
            .windows(2)
            .map(|edge| [hub, edge[0], edge[1]])
            .collect(),
        None => Vec::new(),
    }
}

fn draw_triangle(triangle: [Vec2; 3], color: macroquad::color::Color) {
    let [a, b, c] = triangle.map(to_macroquad_vec2);
    macroquad::shapes::draw_triangle(a, b, c, color);
}

fn to_macroquad_vec2(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
