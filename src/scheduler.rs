//! Frame scheduling
//!
//! The loop keeps running in every game mode so input keeps being serviced;
//! only an explicit teardown stops it.

use std::cell::Cell;

#[derive(Debug, Default)]
pub struct FrameScheduler {
    stopped: Cell<bool>,
    frames: Cell<u64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after a frame has been handled. Returns whether to request another.
    pub fn frame_done(&self) -> bool {
        self.frames.set(self.frames.get() + 1);
        !self.stopped.get()
    }

    /// Tear down: no further frames will be requested
    pub fn stop(&self) {
        if !self.stopped.replace(true) {
            log::info!("Frame loop stopped after {} frames", self.frames.get());
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    pub fn frames(&self) -> u64 {
        self.frames.get()
    }
}
