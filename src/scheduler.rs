use std::collections::VecDeque;

use crate::{compositor::DrawList, engine::Engine, error::NebulaResult};

/// Tick source abstraction over the host's "run this callback before the
/// next repaint, with elapsed time" primitive. Pull-based: each call
/// yields the next frame's elapsed seconds; `None` means the animation
/// was cancelled (or the host stopped scheduling). A tick that never
/// arrives simply leaves the last computed frame on screen.
pub trait FrameScheduler {
    fn next_frame(&mut self) -> Option<f64>;
}

/// Scheduler fed with explicit frame deltas; used by tests and offline
/// rendering.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    frames: VecDeque<f64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_deltas(deltas: impl IntoIterator<Item = f64>) -> Self {
        Self {
            frames: deltas.into_iter().collect(),
        }
    }

    /// `frames` equal ticks at a fixed rate.
    pub fn at_fps(fps: f64, frames: usize) -> Self {
        Self::from_deltas(std::iter::repeat_n(1.0 / fps, frames))
    }

    pub fn push_frame(&mut self, dt_secs: f64) {
        self.frames.push_back(dt_secs);
    }

    pub fn pending(&self) -> usize {
        self.frames.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        self.frames.pop_front()
    }
}

/// Drives an [`Engine`] from a [`FrameScheduler`], keeping the most
/// recent draw list around for hosts that repaint on demand.
#[derive(Debug)]
pub struct AnimationLoop<S> {
    engine: Engine,
    scheduler: S,
    last: Option<DrawList>,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub fn new(engine: Engine, scheduler: S) -> Self {
        Self {
            engine,
            scheduler,
            last: None,
        }
    }

    /// Tick until the scheduler stops yielding frames; `on_frame`
    /// observes every computed draw list in order. Returns the number of
    /// frames run.
    pub fn run(&mut self, mut on_frame: impl FnMut(&DrawList)) -> NebulaResult<usize> {
        let mut frames = 0usize;
        while let Some(dt) = self.scheduler.next_frame() {
            let list = self.engine.tick(dt)?;
            on_frame(&list);
            self.last = Some(list);
            frames += 1;
        }
        Ok(frames)
    }

    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last.as_ref()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }
}
