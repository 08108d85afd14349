// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray picking against element meshes
//!
//! Candidates are the element meshes of visible stories. Each is tested
//! against its bounding box first, then triangle by triangle.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use structview_core::PickClass;
use structview_geometry::{Aabb, Mesh};

use crate::config::PickingPolicy;
use crate::scene::{NodeKey, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Entry distance into `aabb`, if the ray meets it in front of the origin
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f64> {
        if !aabb.is_valid() {
            return None;
        }
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
            if direction.abs() < 1e-12 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction;
            let (mut t0, mut t1) = ((lo - origin) * inv, (hi - origin) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }
        if t_max < 0.0 {
            return None;
        }
        Some(t_min.max(0.0))
    }

    /// Distance to a triangle, either side facing (Möller-Trumbore)
    pub fn intersect_triangle(&self, [a, b, c]: &[Point3<f64>; 3]) -> Option<f64> {
        const EPSILON: f64 = 1e-9;
        let edge1 = b - a;
        let edge2 = c - a;
        let h = self.direction.cross(&edge2);
        let det = edge1.dot(&h);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = inv_det * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(&edge1);
        let v = inv_det * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = inv_det * edge2.dot(&q);
        (t > EPSILON).then_some(t)
    }

    /// Nearest hit on any triangle of `mesh`
    pub fn intersect_mesh(&self, mesh: &Mesh, bounds: &Aabb) -> Option<f64> {
        self.intersect_aabb(bounds)?;
        mesh.triangles()
            .filter_map(|triangle| self.intersect_triangle(&triangle))
            .min_by(f64::total_cmp)
    }
}

/// A mesh hit by a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub key: NodeKey,
    pub distance: f64,
    pub class: PickClass,
}

/// Cast `ray` into the visible part of the scene and choose a hit by `policy`
pub fn pick(scene: &SceneGraph, ray: &Ray, policy: PickingPolicy) -> Option<Hit> {
    let hits: SmallVec<[Hit; 8]> = scene
        .visible_elements()
        .filter_map(|(key, element)| {
            let distance = ray.intersect_mesh(&element.mesh, &element.bounds)?;
            Some(Hit {
                key,
                distance,
                class: element.id.category.pick_class(),
            })
        })
        .collect();

    choose(&hits, policy)
}

/// Pick among collected hits. The priority policy takes the nearest hit of
/// the first class, in [`PickClass::PRIORITY`] order, that has any.
pub fn choose(hits: &[Hit], policy: PickingPolicy) -> Option<Hit> {
    let nearest = |class: Option<PickClass>| {
        hits.iter()
            .filter(|hit| class.map_or(true, |class| hit.class == class))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .copied()
    };
    match policy {
        PickingPolicy::Nearest => nearest(None),
        PickingPolicy::Priority => PickClass::PRIORITY
            .into_iter()
            .find_map(|class| nearest(Some(class))),
    }
}
