// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rectangular prisms for beams, columns and wall panels
//!
//! A prism is built centered at the origin with its faces subdivided into a
//! grid, then moved into place by a [`Placement`]. World space is Y-up: plan
//! `(x, y)` maps to world `(x, z)` and elevation is world `y`.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use crate::mesh::Mesh;

/// Size and face subdivision of a prism
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrismSpec {
    /// Full extents along local x, y, z
    pub size: Vector3<f64>,
    /// Segment counts along local x, y, z (each at least 1)
    pub segments: [usize; 3],
}

impl PrismSpec {
    pub fn new(size: Vector3<f64>, segments: [usize; 3]) -> Self {
        Self {
            size,
            segments: segments.map(|s| s.max(1)),
        }
    }
}

/// Position and heading of a prism in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point3<f64>,
    /// Heading in the plan, `atan2(dz, dx)` of the member's direction
    pub yaw: f64,
}

impl Placement {
    pub fn new(center: Point3<f64>, yaw: f64) -> Self {
        Self { center, yaw }
    }

    /// Axis-aligned placement
    pub fn at(center: Point3<f64>) -> Self {
        Self { center, yaw: 0.0 }
    }

    /// Matrix taking local +x onto the heading direction
    pub fn matrix(&self) -> Matrix4<f64> {
        // A rotation by -yaw about +y maps (1, 0, 0) to (cos yaw, 0, sin yaw)
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), -self.yaw);
        Matrix4::new_translation(&self.center.coords) * rotation.to_homogeneous()
    }
}

/// Heading of the plan vector from `(x0, z0)` to `(x1, z1)`
#[inline]
pub fn heading(x0: f64, z0: f64, x1: f64, z1: f64) -> f64 {
    (z1 - z0).atan2(x1 - x0)
}

/// Build a prism mesh centered at the origin.
///
/// Each face is an independent grid with a flat outward normal, wound
/// counter-clockwise when seen from outside.
pub fn prism_mesh(spec: &PrismSpec) -> Mesh {
    let half = spec.size / 2.0;
    let vertex_estimate: usize = (0..3)
        .map(|axis| {
            let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
            2 * (spec.segments[u] + 1) * (spec.segments[v] + 1)
        })
        .sum();
    let mut mesh = Mesh::with_capacity(vertex_estimate, vertex_estimate * 3);

    for axis in 0..3 {
        for sign in [1.0, -1.0] {
            // (axis, u, v) cyclic gives e_u x e_v = +e_axis; swap for the far side
            let (u, v) = if sign > 0.0 {
                ((axis + 1) % 3, (axis + 2) % 3)
            } else {
                ((axis + 2) % 3, (axis + 1) % 3)
            };
            add_face_grid(&mut mesh, spec, &half, axis, sign, u, v);
        }
    }

    mesh
}

fn add_face_grid(
    mesh: &mut Mesh,
    spec: &PrismSpec,
    half: &Vector3<f64>,
    axis: usize,
    sign: f64,
    u: usize,
    v: usize,
) {
    let grid_u = spec.segments[u];
    let grid_v = spec.segments[v];
    let base = mesh.vertex_count() as u32;

    let mut normal = Vector3::zeros();
    normal[axis] = sign;

    for iv in 0..=grid_v {
        for iu in 0..=grid_u {
            let mut p = Vector3::zeros();
            p[axis] = sign * half[axis];
            p[u] = -half[u] + 2.0 * half[u] * iu as f64 / grid_u as f64;
            p[v] = -half[v] + 2.0 * half[v] * iv as f64 / grid_v as f64;
            mesh.add_vertex(Point3::from(p), normal);
        }
    }

    let row = (grid_u + 1) as u32;
    for iv in 0..grid_v as u32 {
        for iu in 0..grid_u as u32 {
            let a = base + iv * row + iu;
            let b = a + 1;
            let c = a + row + 1;
            let d = a + row;
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }
}

/// Build a prism and move it into place
pub fn placed_prism(spec: &PrismSpec, placement: &Placement) -> Mesh {
    let mut mesh = prism_mesh(spec);
    mesh.transform(&placement.matrix());
    mesh
}
