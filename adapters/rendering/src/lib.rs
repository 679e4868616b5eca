#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Joyride adapters.

mod headless;

pub use headless::HeadlessBackend;

use anyhow::Result as AnyResult;
use glam::Vec2;
use joyride_core::{
    BuildingSnapshot, Bounds, CarSnapshot, DriveInput, Heading, Paint, PedestrianSnapshot, Rect,
    WantedLevel,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<Paint> for Color {
    fn from(paint: Paint) -> Self {
        Self::from_rgb_u8(paint.red(), paint.green(), paint.blue())
    }
}

/// Asphalt shown between the roads and buildings.
pub const BACKGROUND_COLOR: Color = Color::from_rgb_u8(50, 50, 50);

/// Tint of the glass drawn on every car.
pub const WINDSHIELD_COLOR: Color = Color::from_rgb_u8(100, 100, 255);

/// Skin tone used for pedestrian heads.
pub const HEAD_COLOR: Color = Color::from_rgb_u8(255, 220, 177);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Direction keys held during the frame.
    pub drive: DriveInput,
    /// Whether the window was closed or escape was pressed on this frame.
    pub quit_requested: bool,
}

/// Whether the frame loop should keep going after the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Keep simulating and presenting frames.
    Running,
    /// Release rendering resources and return.
    Stopped,
}

/// Rectangle rotated about its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotatedRect {
    /// Center of the rectangle in screen space.
    pub center: Vec2,
    /// Unrotated width and height.
    pub size: Vec2,
    /// Clockwise rotation on screen, in radians.
    pub rotation: f32,
    /// Fill color.
    pub color: Color,
}

impl RotatedRect {
    /// Creates a new rotated rectangle descriptor.
    #[must_use]
    pub const fn new(center: Vec2, size: Vec2, rotation: f32, color: Color) -> Self {
        Self {
            center,
            size,
            rotation,
            color,
        }
    }

    /// Screen-space corners in top-left, top-right, bottom-right, bottom-left order
    /// of the unrotated rectangle.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.size * 0.5;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|offset| self.center + rotate(offset, self.rotation))
    }
}

fn rotate(offset: Vec2, rotation: f32) -> Vec2 {
    let (sin, cos) = rotation.sin_cos();
    Vec2::new(
        offset.x * cos - offset.y * sin,
        offset.x * sin + offset.y * cos,
    )
}

/// Car body with its windshield, rotated to the car's heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarPresentation {
    /// Painted body.
    pub body: RotatedRect,
    /// Glass strip along the body's top edge.
    pub windshield: RotatedRect,
}

impl CarPresentation {
    /// Creates a car presentation centered at `position` and facing `heading`.
    ///
    /// The windshield spans the middle third of the body's width and the top
    /// third of its height, inset two pixels from the top edge.
    #[must_use]
    pub fn new(position: Vec2, heading: Heading, size: Vec2, paint: Paint) -> Self {
        // Headings turn counter-clockwise on screen while y grows downwards.
        let rotation = -heading.radians();
        let third = Vec2::new((size.x / 3.0).floor(), (size.y / 3.0).floor());
        let windshield_offset = Vec2::new(third.x * 1.5, 2.0 + third.y * 0.5) - size * 0.5;

        Self {
            body: RotatedRect::new(position, size, rotation, paint.into()),
            windshield: RotatedRect::new(
                position + rotate(windshield_offset, rotation),
                third,
                rotation,
                WINDSHIELD_COLOR,
            ),
        }
    }

    /// Creates a car presentation from a world snapshot.
    #[must_use]
    pub fn from_snapshot(car: &CarSnapshot) -> Self {
        Self::new(car.position, car.heading, car.size, car.paint)
    }
}

/// Pedestrian drawn as a clothed body disc with a smaller head disc on top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PedestrianPresentation {
    /// Center of the body disc.
    pub center: Vec2,
    /// Radius of the body disc.
    pub radius: f32,
    /// Clothing color.
    pub color: Color,
    /// Center of the head disc.
    pub head_center: Vec2,
    /// Radius of the head disc.
    pub head_radius: f32,
}

impl PedestrianPresentation {
    /// Creates a pedestrian presentation from a world snapshot.
    #[must_use]
    pub fn from_snapshot(pedestrian: &PedestrianSnapshot) -> Self {
        let head_radius = (pedestrian.radius / 2.0).floor();
        Self {
            center: pedestrian.position,
            radius: pedestrian.radius,
            color: pedestrian.paint.into(),
            head_center: pedestrian.position - Vec2::new(0.0, head_radius),
            head_radius,
        }
    }
}

/// Single square window on a building facade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowPresentation {
    /// Square pane of glass.
    pub rect: Rect,
    /// Whether the light is on this frame.
    pub lit: bool,
}

impl WindowPresentation {
    /// Fill color for the current lighting.
    #[must_use]
    pub fn color(&self) -> Color {
        if self.lit {
            Paint::YELLOW.into()
        } else {
            Paint::BLACK.into()
        }
    }
}

/// Building block with the windows lit for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingPresentation {
    /// Footprint of the block.
    pub footprint: Rect,
    /// Facade color.
    pub color: Color,
    /// Windows in column-major order.
    pub windows: Vec<WindowPresentation>,
}

impl BuildingPresentation {
    /// Creates a building presentation, asking `flicker` whether each window is lit.
    ///
    /// Nothing is remembered between frames; the same flicker sequence yields
    /// the same lighting.
    pub fn new<F>(building: &BuildingSnapshot, mut flicker: F) -> Self
    where
        F: FnMut() -> bool,
    {
        Self {
            footprint: building.footprint,
            color: building.paint.into(),
            windows: building
                .windows()
                .map(|rect| WindowPresentation {
                    rect,
                    lit: flicker(),
                })
                .collect(),
        }
    }
}

/// Straight road segment drawn as a thick line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadLine {
    /// Start of the center line.
    pub from: Vec2,
    /// End of the center line.
    pub to: Vec2,
}

/// Regular grid of roads spanning the whole screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadGridPresentation {
    /// Distance between neighbouring road center lines.
    pub spacing: f32,
    /// Road width.
    pub thickness: f32,
    /// Asphalt color.
    pub color: Color,
}

impl RoadGridPresentation {
    /// Default distance between road center lines.
    pub const DEFAULT_SPACING: f32 = 200.0;

    /// Default road width.
    pub const DEFAULT_THICKNESS: f32 = 50.0;

    /// Creates a new road grid descriptor.
    ///
    /// Returns an error when `spacing` is not a positive, finite length.
    pub fn new(
        spacing: f32,
        thickness: f32,
        color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(RenderingError::InvalidRoadSpacing { spacing });
        }

        Ok(Self {
            spacing,
            thickness,
            color,
        })
    }

    /// Road center lines covering `bounds`, vertical roads first.
    #[must_use]
    pub fn lines(&self, bounds: Bounds) -> Vec<RoadLine> {
        let vertical = offsets(self.spacing, bounds.width()).map(|x| RoadLine {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, bounds.height()),
        });
        let horizontal = offsets(self.spacing, bounds.height()).map(|y| RoadLine {
            from: Vec2::new(0.0, y),
            to: Vec2::new(bounds.width(), y),
        });
        vertical.chain(horizontal).collect()
    }
}

fn offsets(spacing: f32, extent: f32) -> impl Iterator<Item = f32> {
    (0..)
        .map(move |index| index as f32 * spacing)
        .take_while(move |offset| *offset < extent)
}

/// Heads-up display showing score, wanted stars and the controls.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Points scored so far.
    pub score: u32,
    /// Current notoriety.
    pub wanted_level: WantedLevel,
}

impl HudPresentation {
    /// Top-left corner of the score label.
    pub const SCORE_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
    /// Top-left corner of the wanted label.
    pub const WANTED_ORIGIN: Vec2 = Vec2::new(10.0, 50.0);
    /// Font size of the score and wanted labels.
    pub const LABEL_FONT_SIZE: f32 = 36.0;
    /// Font size of the controls list.
    pub const CONTROLS_FONT_SIZE: f32 = 24.0;
    /// Wanted-level label.
    pub const WANTED_LABEL: &'static str = "Wanted: ";
    /// Key bindings listed in the top-right corner.
    pub const CONTROLS: [&'static str; 2] = ["Arrow Keys - Drive", "ESC - Quit"];
    /// Star icon color.
    pub const STAR_COLOR: Color = Color::from_rgb_u8(255, 255, 0);
    /// Text color.
    pub const TEXT_COLOR: Color = Color::from_rgb_u8(255, 255, 255);

    const STAR_OUTLINE: [Vec2; 5] = [
        Vec2::new(120.0, 55.0),
        Vec2::new(130.0, 50.0),
        Vec2::new(135.0, 60.0),
        Vec2::new(125.0, 65.0),
        Vec2::new(115.0, 60.0),
    ];
    const STAR_SPACING: f32 = 30.0;
    const CONTROLS_INSET: f32 = 150.0;
    const CONTROLS_LINE_HEIGHT: f32 = 25.0;

    /// Creates a new HUD descriptor.
    #[must_use]
    pub const fn new(score: u32, wanted_level: WantedLevel) -> Self {
        Self {
            score,
            wanted_level,
        }
    }

    /// Text of the score label.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// One pentagon outline per wanted star, left to right.
    #[must_use]
    pub fn stars(&self) -> Vec<[Vec2; 5]> {
        (0..self.wanted_level.get())
            .map(|index| {
                let shift = Vec2::new(f32::from(index) * Self::STAR_SPACING, 0.0);
                Self::STAR_OUTLINE.map(|vertex| vertex + shift)
            })
            .collect()
    }

    /// Controls lines paired with their top-left corners for a screen of the given width.
    #[must_use]
    pub fn controls(&self, screen_width: f32) -> Vec<(&'static str, Vec2)> {
        Self::CONTROLS
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let origin = Vec2::new(
                    screen_width - Self::CONTROLS_INSET,
                    10.0 + index as f32 * Self::CONTROLS_LINE_HEIGHT,
                );
                (*line, origin)
            })
            .collect()
    }
}

/// Scene description combining the city, its inhabitants and the HUD.
///
/// Layers are drawn in field order: roads, buildings, pedestrians, traffic,
/// player and finally the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Extent of the playfield.
    pub bounds: Bounds,
    /// Road grid painted over the background.
    pub roads: RoadGridPresentation,
    /// City blocks with their windows.
    pub buildings: Vec<BuildingPresentation>,
    /// Live pedestrians.
    pub pedestrians: Vec<PedestrianPresentation>,
    /// Autonomous cars.
    pub traffic: Vec<CarPresentation>,
    /// Player car.
    pub player: CarPresentation,
    /// Score and wanted level overlay.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        bounds: Bounds,
        roads: RoadGridPresentation,
        buildings: Vec<BuildingPresentation>,
        pedestrians: Vec<PedestrianPresentation>,
        traffic: Vec<CarPresentation>,
        player: CarPresentation,
        hud: HudPresentation,
    ) -> Self {
        Self {
            bounds,
            roads,
            buildings,
            pedestrians,
            traffic,
            player,
            hud,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Joyride scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure stops the loop.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered. Returning [`LoopState::Stopped`] ends the loop after the
    /// current frame and releases the backend's resources.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> LoopState + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Road spacing must be positive to terminate the grid.
    InvalidRoadSpacing {
        /// Provided spacing that failed validation.
        spacing: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoadSpacing { spacing } => {
                write!(f, "road spacing must be positive (received {spacing})")
            }
        }
    }
}

impl Error for RenderingError {}
