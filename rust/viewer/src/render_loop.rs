// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Continuous redraw driven by a host frame scheduler

use crate::backend::RenderBackend;
use crate::error::Result;
use crate::viewer::Viewer;

/// Source of display-frame callbacks (`requestAnimationFrame` in browsers)
pub trait FrameScheduler {
    /// Ask for one callback on the next display frame
    fn request_frame(&mut self);

    /// Drop the pending callback, if any
    fn cancel(&mut self);
}

/// Advances controls and draws once per frame until stopped
#[derive(Debug)]
pub struct RenderLoop<S: FrameScheduler> {
    scheduler: S,
    running: bool,
    frames: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            running: false,
            frames: 0,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.scheduler.request_frame();
    }

    /// Run one frame and schedule the next. Called from the scheduler's
    /// callback; does nothing once stopped.
    pub fn tick<B: RenderBackend>(&mut self, viewer: &mut Viewer<B>) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }
        if let Err(error) = viewer.frame() {
            self.stop();
            return Err(error);
        }
        self.frames += 1;
        self.scheduler.request_frame();
        Ok(true)
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.scheduler.cancel();
            tracing::debug!(frames = self.frames, "Render loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::config::ViewerConfig;

    #[derive(Debug, Default)]
    struct ManualScheduler {
        pending: bool,
        requests: usize,
        cancels: usize,
    }

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) {
            self.pending = true;
            self.requests += 1;
        }

        fn cancel(&mut self) {
            self.pending = false;
            self.cancels += 1;
        }
    }

    #[test]
    fn test_ticks_until_stopped() {
        let mut viewer = Viewer::new(HeadlessBackend::new(), ViewerConfig::default()).unwrap();
        let mut render_loop = RenderLoop::new(ManualScheduler::default());
        render_loop.start();
        render_loop.start();
        assert_eq!(render_loop.scheduler().requests, 1);

        for _ in 0..3 {
            assert!(render_loop.tick(&mut viewer).unwrap());
        }
        assert_eq!(render_loop.frames(), 3);
        assert_eq!(viewer.backend().draws, 3);

        render_loop.stop();
        assert!(!render_loop.scheduler().pending);
        assert!(!render_loop.tick(&mut viewer).unwrap());
        render_loop.stop();
        assert_eq!(render_loop.scheduler().cancels, 1);
    }

    #[test]
    fn test_torn_down_viewer_stops_the_loop() {
        let mut viewer = Viewer::new(HeadlessBackend::new(), ViewerConfig::default()).unwrap();
        let mut render_loop = RenderLoop::new(ManualScheduler::default());
        render_loop.start();
        viewer.teardown();

        assert!(render_loop.tick(&mut viewer).is_err());
        assert!(!render_loop.is_running());
    }
}
