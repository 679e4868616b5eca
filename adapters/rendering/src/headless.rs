//! Window-less backend that drives the update loop for a fixed number of frames.

use std::time::Duration;

use anyhow::Result as AnyResult;
use log::debug;

use crate::{FrameInput, LoopState, Presentation, RenderingBackend, Scene};

/// Backend that simulates frames without opening a window.
///
/// Input is replayed from a script, one entry per frame; frames past the end
/// of the script receive no input.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBackend {
    frames: u32,
    script: Vec<FrameInput>,
    frame_delta: Duration,
}

impl HeadlessBackend {
    /// Creates a backend that runs at most `frames` frames at 60 Hz.
    #[must_use]
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            script: Vec::new(),
            frame_delta: Duration::from_secs(1) / joyride_core::FRAMES_PER_SECOND,
        }
    }

    /// Replays the provided per-frame input.
    #[must_use]
    pub fn with_script(mut self, script: Vec<FrameInput>) -> Self {
        self.script = script;
        self
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> LoopState + 'static,
    {
        let mut scene = presentation.scene;
        let mut presented = 0;

        for frame in 0..self.frames {
            let input = self
                .script
                .get(frame as usize)
                .copied()
                .unwrap_or_default();
            presented += 1;
            if update_scene(self.frame_delta, input, &mut scene) == LoopState::Stopped {
                break;
            }
        }

        debug!(
            "headless backend presented {presented} of {} frames",
            self.frames
        );
        Ok(())
    }
}
