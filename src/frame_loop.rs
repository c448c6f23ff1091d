//! Per-frame state advance
//!
//! The winit handler drives one iteration per `RedrawRequested`; this module
//! holds the parts of that iteration that do not need a window or a GPU.

use std::time::{Duration, Instant};

use cgmath::Vector3;

use crate::gfx::scene::{NodeId, Scene};

/// Elapsed-time source, started at construction
#[derive(Debug)]
pub struct Clock {
    last: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous call (or since construction)
    pub fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last;
        self.last = now;
        delta
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Spins one scene object by a fixed step per frame
#[derive(Debug, Clone, Copy)]
pub struct FrameLoop {
    target: NodeId,
    step: Vector3<f32>,
}

impl FrameLoop {
    pub fn new(target: NodeId, step: Vector3<f32>) -> Self {
        Self { target, step }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Adds the rotation step to the target object
    ///
    /// Does nothing if the target is not a mesh in `scene`.
    pub fn advance(&self, scene: &mut Scene) {
        match scene.object_mut(self.target) {
            Some(object) => object.rotate(self.step),
            None => log::trace!("Frame loop target {} is not a mesh", self.target.0),
        }
    }
}
