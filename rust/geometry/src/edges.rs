// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feature edge extraction for plan outlines
//!
//! Vertices are welded by quantized position, so faces built from separate
//! vertex runs (as prism faces are) still share edges. An edge is kept when
//! it borders a single triangle or when the two triangles meeting at it bend
//! by more than the threshold angle.

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::mesh::Mesh;

/// Position grid used to weld coincident vertices
const WELD_TOLERANCE: f64 = 1e-4;

type VertexKey = [i64; 3];

#[inline]
fn quantize(p: &Point3<f64>) -> VertexKey {
    [
        (p.x / WELD_TOLERANCE).round() as i64,
        (p.y / WELD_TOLERANCE).round() as i64,
        (p.z / WELD_TOLERANCE).round() as i64,
    ]
}

struct EdgeRecord {
    a: Point3<f64>,
    b: Point3<f64>,
    normals: SmallVec<[Vector3<f64>; 2]>,
}

/// Line-segment pairs (`[x0, y0, z0, x1, y1, z1]` per edge) for the feature
/// edges of `mesh`, sorted for stable output.
pub fn feature_edges(mesh: &Mesh, threshold_degrees: f64) -> Vec<f32> {
    let cos_threshold = threshold_degrees.to_radians().cos();
    let mut welded: FxHashMap<VertexKey, u32> = FxHashMap::default();
    let mut edges: FxHashMap<(u32, u32), EdgeRecord> = FxHashMap::default();

    let mut weld = |p: &Point3<f64>| -> u32 {
        let next = welded.len() as u32;
        *welded.entry(quantize(p)).or_insert(next)
    };

    for [p0, p1, p2] in mesh.triangles() {
        let Some(normal) = (p1 - p0).cross(&(p2 - p0)).try_normalize(1e-12) else {
            continue;
        };
        let ids = [weld(&p0), weld(&p1), weld(&p2)];
        let corners = [p0, p1, p2];
        for k in 0..3 {
            let (i, j) = (k, (k + 1) % 3);
            if ids[i] == ids[j] {
                continue;
            }
            let key = if ids[i] < ids[j] {
                (ids[i], ids[j])
            } else {
                (ids[j], ids[i])
            };
            edges
                .entry(key)
                .or_insert_with(|| EdgeRecord {
                    a: corners[i],
                    b: corners[j],
                    normals: SmallVec::new(),
                })
                .normals
                .push(normal);
        }
    }

    let mut kept: Vec<(&(u32, u32), &EdgeRecord)> = edges
        .iter()
        .filter(|(_, edge)| match edge.normals.as_slice() {
            [_] => true,
            [n0, n1] => n0.dot(n1) < cos_threshold,
            // Non-manifold junctions are always drawn
            _ => true,
        })
        .collect();
    kept.sort_by_key(|(key, _)| **key);

    let mut positions = Vec::with_capacity(kept.len() * 6);
    for (_, edge) in kept {
        for p in [&edge.a, &edge.b] {
            positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prism::{prism_mesh, PrismSpec};

    #[test]
    fn test_box_outline_has_twelve_edges() {
        let mesh = prism_mesh(&PrismSpec::new(Vector3::new(100.0, 30.0, 20.0), [1, 1, 1]));
        assert_eq!(feature_edges(&mesh, 15.0).len(), 12 * 6);
    }

    #[test]
    fn test_segmented_box_hides_grid_lines() {
        let mesh = prism_mesh(&PrismSpec::new(Vector3::new(100.0, 30.0, 20.0), [4, 1, 1]));
        // Four long edges split into four pieces each, eight short edges
        assert_eq!(feature_edges(&mesh, 15.0).len(), (4 * 4 + 8) * 6);
    }

    #[test]
    fn test_flat_grid_has_only_its_border() {
        let mut mesh = Mesh::new();
        let up = Vector3::y();
        mesh.add_quad(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            up,
        );
        mesh.add_quad(
            [
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            up,
        );
        // Six border edges; the shared edge and both diagonals are flat
        assert_eq!(feature_edges(&mesh, 15.0).len(), 6 * 6);
    }
}
