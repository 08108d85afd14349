// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `requestAnimationFrame` frame scheduling

use structview_viewer::FrameScheduler;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// Schedules the frame callback with the browser. The callback closure is
/// owned here and must outlive every pending request.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Option<FrameCallback>,
    pending: Option<i32>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
            pending: None,
        }
    }

    pub fn set_callback(&mut self, callback: FrameCallback) {
        self.callback = Some(callback);
    }

    /// Drop the callback closure. Must not be called from inside it.
    pub fn release_callback(&mut self) {
        self.cancel();
        self.callback = None;
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) {
        let Some(callback) = &self.callback else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending = Some(id),
            Err(error) => {
                self.pending = None;
                tracing::warn!(error = ?error, "requestAnimationFrame failed");
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
