#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Joyride experience.

mod simulation;

use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Result;
use clap::Parser;
use joyride_core::WINDOW_TITLE;
use joyride_rendering::{
    FrameInput, HeadlessBackend, LoopState, Presentation, RenderingBackend, Scene,
    BACKGROUND_COLOR,
};
use joyride_rendering_macroquad::MacroquadBackend;
use log::info;

use crate::simulation::Simulation;

/// Seed used when none is given on the command line.
const DEFAULT_SEED: u64 = 0x4a6f_7972_6964_6500;

/// Top-down arcade driving through a small city.
#[derive(Debug, Parser)]
#[command(name = "joyride")]
struct CliArgs {
    /// Seed for every random generator in the game
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Run without a window for the given number of frames
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Close the window after the given number of frames
    #[arg(long, value_name = "FRAMES", conflicts_with = "headless")]
    frames: Option<u32>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    vsync: bool,

    /// Log the frame rate once per second
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Joyride command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let mut simulation = Simulation::new(args.seed)?;
    let presentation = Presentation::new(WINDOW_TITLE, BACKGROUND_COLOR, simulation.scene());
    let simulation = Rc::new(RefCell::new(simulation));
    let frame_simulation = Rc::clone(&simulation);
    let update = move |_frame_dt: Duration, input: FrameInput, scene: &mut Scene| -> LoopState {
        let mut simulation = frame_simulation.borrow_mut();
        let state = simulation.step(input);
        simulation.populate_scene(scene);
        state
    };

    match args.headless {
        Some(frames) => {
            info!("running {frames} headless frames");
            HeadlessBackend::new(frames).run(presentation, update)?;
        }
        None => {
            MacroquadBackend::new()
                .with_vsync(args.vsync)
                .with_show_fps(args.show_fps)
                .with_frame_limit(args.frames)
                .run(presentation, update)?;
        }
    }

    info!("{}", simulation.borrow().summary());
    Ok(())
}
