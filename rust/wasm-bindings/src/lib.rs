// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! StructView WebAssembly Bindings
//!
//! JavaScript/TypeScript API for the structural model viewer built with
//! wasm-bindgen. The page supplies a container element and a renderer
//! object; the viewer drives it with geometry, materials and frames.

use wasm_bindgen::prelude::*;

mod api;
mod backend;
mod logging;
mod scheduler;
mod utils;

pub use api::StructureViewer;
pub use backend::{JsBackend, JsRenderer};
pub use logging::init_logging;
pub use scheduler::AnimationFrameScheduler;
pub use utils::set_panic_hook as init_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of StructView
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
