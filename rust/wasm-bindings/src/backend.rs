// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render backend delegating to a JavaScript renderer object
//!
//! Handles are allocated on the Rust side and passed to the renderer, which
//! keeps its own handle-to-resource table. Vertex data crosses as typed
//! arrays; materials and frames go through `serde-wasm-bindgen`.

use js_sys::{Float32Array, Object, Uint32Array};
use serde::Serialize;
use structview_viewer::{
    Frame, GeometryData, GeometryHandle, MaterialDesc, MaterialHandle, RenderBackend,
};
use wasm_bindgen::prelude::*;

use crate::utils::set_prop;

#[wasm_bindgen(typescript_custom_section)]
const RENDERER_INTERFACE: &'static str = r#"
export interface StructureRenderer {
  createGeometry(handle: number, data: object): void;
  releaseGeometry(handle: number): void;
  createMaterial(handle: number, desc: object): void;
  updateMaterial(handle: number, desc: object): void;
  releaseMaterial(handle: number): void;
  resize(width: number, height: number): void;
  draw(frame: object): void;
  registerFont?(font: ArrayBuffer): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(typescript_type = "StructureRenderer")]
    pub type JsRenderer;

    #[wasm_bindgen(method, catch, js_name = createGeometry)]
    fn create_geometry(this: &JsRenderer, handle: u32, data: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = releaseGeometry)]
    fn release_geometry(this: &JsRenderer, handle: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = createMaterial)]
    fn create_material(this: &JsRenderer, handle: u32, desc: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = updateMaterial)]
    fn update_material(this: &JsRenderer, handle: u32, desc: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = releaseMaterial)]
    fn release_material(this: &JsRenderer, handle: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn resize(this: &JsRenderer, width: u32, height: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn draw(this: &JsRenderer, frame: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = registerFont)]
    fn register_font(this: &JsRenderer, font: &JsValue) -> Result<(), JsValue>;
}

pub struct JsBackend {
    renderer: JsRenderer,
    next_handle: u32,
}

impl JsBackend {
    pub fn new(renderer: JsRenderer) -> Self {
        Self {
            renderer,
            next_handle: 0,
        }
    }

    fn allocate(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Hand fetched font data to the renderer. Renderers without
    /// `registerFont` are expected to load label fonts themselves.
    pub fn register_font(&self, font: &JsValue) -> bool {
        let has_hook = js_sys::Reflect::get(&self.renderer, &JsValue::from_str("registerFont"))
            .map(|f| f.is_function())
            .unwrap_or(false);
        if !has_hook {
            return true;
        }
        report("registerFont", self.renderer.register_font(font))
    }
}

fn report(call: &str, result: Result<(), JsValue>) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(call, error = ?error, "Renderer call failed");
            false
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match value.serialize(&serializer) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, "Failed to convert value for the renderer");
            JsValue::NULL
        }
    }
}

/// Vertex buffers as typed arrays, labels as plain objects
fn geometry_to_js(data: &GeometryData<'_>) -> JsValue {
    match data {
        GeometryData::Triangles {
            positions,
            normals,
            indices,
        } => {
            let obj: JsValue = Object::new().into();
            set_prop(&obj, "kind", &JsValue::from_str("triangles"));
            set_prop(&obj, "positions", &Float32Array::from(*positions).into());
            set_prop(&obj, "normals", &Float32Array::from(*normals).into());
            set_prop(&obj, "indices", &Uint32Array::from(*indices).into());
            obj
        }
        GeometryData::Lines { positions } => {
            let obj: JsValue = Object::new().into();
            set_prop(&obj, "kind", &JsValue::from_str("lines"));
            set_prop(&obj, "positions", &Float32Array::from(*positions).into());
            obj
        }
        GeometryData::Label { .. } => to_js(data),
    }
}

impl RenderBackend for JsBackend {
    fn create_geometry(&mut self, data: &GeometryData<'_>) -> GeometryHandle {
        let handle = self.allocate();
        report(
            "createGeometry",
            self.renderer.create_geometry(handle, &geometry_to_js(data)),
        );
        GeometryHandle(handle)
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        report("releaseGeometry", self.renderer.release_geometry(handle.0));
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle {
        let handle = self.allocate();
        report(
            "createMaterial",
            self.renderer.create_material(handle, &to_js(desc)),
        );
        MaterialHandle(handle)
    }

    fn update_material(&mut self, handle: MaterialHandle, desc: &MaterialDesc) {
        report(
            "updateMaterial",
            self.renderer.update_material(handle.0, &to_js(desc)),
        );
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        report("releaseMaterial", self.renderer.release_material(handle.0));
    }

    fn resize(&mut self, width: u32, height: u32) {
        report("resize", self.renderer.resize(width, height));
    }

    fn draw(&mut self, frame: &Frame) {
        report("draw", self.renderer.draw(&to_js(frame)));
    }
}
