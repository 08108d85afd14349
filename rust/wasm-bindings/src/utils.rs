// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub fn window() -> Result<Window, JsError> {
    web_sys::window().ok_or_else(|| JsError::new("No global window"))
}

/// Client size of an element in whole CSS pixels
pub fn element_size(element: &Element) -> (u32, u32) {
    let rect = element.get_bounding_client_rect();
    (rect.width().max(0.0) as u32, rect.height().max(0.0) as u32)
}

/// Convert viewport coordinates to coordinates local to `element`
pub fn local_point(element: &Element, client_x: i32, client_y: i32) -> (f64, f64) {
    let rect = element.get_bounding_client_rect();
    (client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// Set a property on a JS object, ignoring failures on frozen objects
pub fn set_prop(target: &JsValue, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}
