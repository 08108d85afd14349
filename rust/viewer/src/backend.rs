// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render backend seam
//!
//! The viewer never talks to a GPU API directly. It creates and releases
//! geometry and material resources through [`RenderBackend`] and hands it one
//! [`Frame`] per draw. [`HeadlessBackend`] records every call and is what the
//! tests run against.

use nalgebra::{Matrix4, Point3, Vector3};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::material::{Color, MaterialDesc};

/// Backend geometry resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GeometryHandle(pub u32);

/// Backend material resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MaterialHandle(pub u32);

/// Geometry uploaded to the backend, in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GeometryData<'a> {
    /// Indexed triangles with per-vertex normals
    Triangles {
        positions: &'a [f32],
        normals: &'a [f32],
        indices: &'a [u32],
    },
    /// Independent line segments, two points each
    Lines { positions: &'a [f32] },
    /// Camera-facing text at a fixed pixel size
    Label {
        text: &'a str,
        anchor: [f32; 3],
        size: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LightDesc {
    Ambient { color: Color, intensity: f32 },
    Directional {
        color: Color,
        intensity: f32,
        /// Direction the light travels from
        direction: [f32; 3],
    },
}

/// One drawable in a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawItem {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    /// Higher draws later
    pub render_order: i32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Column-major view matrix
    pub view: [f32; 16],
    /// Column-major projection matrix
    pub projection: [f32; 16],
    pub camera_position: [f32; 3],
    pub lights: Vec<LightDesc>,
    pub items: Vec<DrawItem>,
}

impl Frame {
    pub fn new(view: &Matrix4<f64>, projection: &Matrix4<f64>, eye: &Point3<f64>) -> Self {
        Self {
            view: to_array(view),
            projection: to_array(projection),
            camera_position: [eye.x as f32, eye.y as f32, eye.z as f32],
            lights: Vec::new(),
            items: Vec::new(),
        }
    }
}

fn to_array(m: &Matrix4<f64>) -> [f32; 16] {
    let mut out = [0.0f32; 16];
    for (dst, src) in out.iter_mut().zip(m.as_slice()) {
        *dst = *src as f32;
    }
    out
}

/// Default scene lighting
pub fn default_lights() -> Vec<LightDesc> {
    let white = Color::new(1.0, 1.0, 1.0);
    let direction = Vector3::new(1.0f32, 2.0, 1.5).normalize();
    vec![
        LightDesc::Ambient {
            color: white,
            intensity: 0.6,
        },
        LightDesc::Directional {
            color: white,
            intensity: 0.8,
            direction: [direction.x, direction.y, direction.z],
        },
    ]
}

/// GPU-side resource management and drawing
pub trait RenderBackend {
    fn create_geometry(&mut self, data: &GeometryData<'_>) -> GeometryHandle;

    fn release_geometry(&mut self, handle: GeometryHandle);

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle;

    /// Replace a material's parameters and flag it for re-upload
    fn update_material(&mut self, handle: MaterialHandle, desc: &MaterialDesc);

    fn release_material(&mut self, handle: MaterialHandle);

    /// Drawing buffer size in device pixels
    fn resize(&mut self, width: u32, height: u32);

    fn draw(&mut self, frame: &Frame);
}

/// What a headless geometry resource was created from
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryRecord {
    Triangles { vertices: usize, triangles: usize },
    Lines { segments: usize },
    Label { text: String },
}

/// Backend that keeps resource bookkeeping in memory and draws nothing
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u32,
    geometries: FxHashMap<GeometryHandle, GeometryRecord>,
    materials: FxHashMap<MaterialHandle, MaterialDesc>,
    /// Geometries released, in order
    pub released_geometries: Vec<GeometryHandle>,
    /// Materials released, in order
    pub released_materials: Vec<MaterialHandle>,
    /// Releases of handles that were not live
    pub invalid_releases: usize,
    pub size: (u32, u32),
    pub draws: usize,
    pub last_frame: Option<Frame>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryRecord> {
        self.geometries.get(&handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDesc> {
        self.materials.get(&handle)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_geometry(&mut self, data: &GeometryData<'_>) -> GeometryHandle {
        let record = match data {
            GeometryData::Triangles {
                positions, indices, ..
            } => GeometryRecord::Triangles {
                vertices: positions.len() / 3,
                triangles: indices.len() / 3,
            },
            GeometryData::Lines { positions } => GeometryRecord::Lines {
                segments: positions.len() / 6,
            },
            GeometryData::Label { text, .. } => GeometryRecord::Label {
                text: text.to_string(),
            },
        };
        let handle = GeometryHandle(self.next());
        self.geometries.insert(handle, record);
        handle
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if self.geometries.remove(&handle).is_some() {
            self.released_geometries.push(handle);
        } else {
            self.invalid_releases += 1;
        }
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle {
        let handle = MaterialHandle(self.next());
        self.materials.insert(handle, desc.clone());
        handle
    }

    fn update_material(&mut self, handle: MaterialHandle, desc: &MaterialDesc) {
        match self.materials.get_mut(&handle) {
            Some(slot) => *slot = desc.clone(),
            None => tracing::warn!(material = handle.0, "Update of unknown material"),
        }
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        if self.materials.remove(&handle).is_some() {
            self.released_materials.push(handle);
        } else {
            self.invalid_releases += 1;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn draw(&mut self, frame: &Frame) {
        self.draws += 1;
        self.last_frame = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_bookkeeping() {
        let mut backend = HeadlessBackend::new();
        let g = backend.create_geometry(&GeometryData::Lines {
            positions: &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        });
        let m = backend.create_material(&MaterialDesc::line(Color::new(0.0, 0.0, 0.0)));
        assert_eq!(backend.geometry(g), Some(&GeometryRecord::Lines { segments: 1 }));

        backend.release_geometry(g);
        backend.release_material(m);
        backend.release_material(m);

        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.live_materials(), 0);
        assert_eq!(backend.invalid_releases, 1);
    }
}
