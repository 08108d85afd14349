// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slab solids
//!
//! A slab is a planar outline extruded downward from just below the story
//! top. The outline is pulled slightly toward its centroid so its edges do
//! not coincide with the beams and walls it rests on.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::{signed_area, triangulate_ring};

/// Vertical placement of a slab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabLevels {
    /// Story top elevation
    pub elevation: f64,
    pub thickness: f64,
    /// Gap kept from the story top and from the bottom plane
    pub epsilon: f64,
}

impl SlabLevels {
    #[inline]
    pub fn top(&self) -> f64 {
        self.elevation - self.epsilon
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.elevation - self.thickness + self.epsilon
    }
}

/// Vertex average of a plan outline
pub fn centroid(outline: &[Point2<f64>]) -> Point2<f64> {
    let sum = outline
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + Vector3::new(p.x, p.y, 0.0));
    let n = outline.len().max(1) as f64;
    Point2::new(sum.x / n, sum.y / n)
}

/// Scale an outline toward its centroid
pub fn inset(outline: &[Point2<f64>], factor: f64) -> Vec<Point2<f64>> {
    let c = centroid(outline);
    outline.iter().map(|p| c + (p - c) * factor).collect()
}

/// Build a closed slab solid from a plan outline (plan `y` is world `z`).
///
/// Produces `n - 2` top triangles facing up, `n - 2` bottom triangles facing
/// down and two side triangles per outline edge, wrapping from the last
/// point back to the first.
pub fn slab_mesh(outline: &[Point2<f64>], levels: &SlabLevels, inset_factor: f64) -> Result<Mesh> {
    if outline.len() < 3 {
        return Err(Error::DegenerateSlab(outline.len()));
    }

    if levels.bottom() >= levels.top() {
        return Err(Error::DegenerateElement(format!(
            "slab thickness {} is within the surface gaps",
            levels.thickness
        )));
    }

    let ring = inset(outline, inset_factor);
    let triangles = triangulate_ring(&ring)?;
    let n = ring.len();

    let top = levels.top();
    let bottom = levels.bottom();
    let mut mesh = Mesh::with_capacity(2 * n + 4 * n, 6 * triangles.len() + 6 * n);

    // Caps. A counter-clockwise plan triangle (x, z) has a downward geometric
    // normal in Y-up space, so the top cap reverses it.
    let top_base = mesh.vertex_count() as u32;
    for p in &ring {
        mesh.add_vertex(Point3::new(p.x, top, p.y), Vector3::y());
    }
    for &[a, b, c] in &triangles {
        mesh.add_triangle(top_base + a as u32, top_base + c as u32, top_base + b as u32);
    }

    let bottom_base = mesh.vertex_count() as u32;
    for p in &ring {
        mesh.add_vertex(Point3::new(p.x, bottom, p.y), -Vector3::y());
    }
    for &[a, b, c] in &triangles {
        mesh.add_triangle(
            bottom_base + a as u32,
            bottom_base + b as u32,
            bottom_base + c as u32,
        );
    }

    // Skirt
    let orientation = if signed_area(&ring) >= 0.0 { 1.0 } else { -1.0 };
    for i in 0..n {
        let j = (i + 1) % n;
        let (p0, p1) = (&ring[i], &ring[j]);
        let edge = p1 - p0;
        let normal = match Vector3::new(edge.y, 0.0, -edge.x).try_normalize(1e-10) {
            Some(normal) => normal * orientation,
            None => continue,
        };
        mesh.add_quad(
            [
                Point3::new(p0.x, top, p0.y),
                Point3::new(p1.x, top, p1.y),
                Point3::new(p1.x, bottom, p1.y),
                Point3::new(p0.x, bottom, p0.y),
            ],
            normal,
        );
    }

    Ok(mesh)
}

/// Plan area of an outline
pub fn outline_area(outline: &[Point2<f64>]) -> f64 {
    if outline.len() < 3 {
        return 0.0;
    }
    signed_area(outline).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn levels() -> SlabLevels {
        SlabLevels {
            elevation: 300.0,
            thickness: 20.0,
            epsilon: 0.1,
        }
    }

    fn hexagon() -> Vec<Point2<f64>> {
        (0..6)
            .map(|i| {
                let a = i as f64 * std::f64::consts::PI / 3.0;
                Point2::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect()
    }

    fn check_closed_solid(outline: &[Point2<f64>]) {
        let n = outline.len();
        let mesh = slab_mesh(outline, &levels(), 0.998).unwrap();
        assert_eq!(mesh.triangle_count(), 2 * (n - 2) + 2 * n);

        let center = mesh.bounds().center();
        let mut up = 0;
        let mut down = 0;
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            assert!(normal.dot(&(centroid - center)) > 0.0);
            if normal.y > 1e-9 {
                up += 1;
            } else if normal.y < -1e-9 {
                down += 1;
            }
        }
        assert_eq!(up, n - 2);
        assert_eq!(down, n - 2);
    }

    #[test]
    fn test_convex_outline_in_both_windings() {
        let ccw = hexagon();
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        check_closed_solid(&ccw);
        check_closed_solid(&cw);
    }

    #[test]
    fn test_levels_and_inset() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ];
        let mesh = slab_mesh(&square, &levels(), 0.998).unwrap();
        let bounds = mesh.bounds();

        assert_relative_eq!(bounds.max.y, 299.9, epsilon = 1e-3);
        assert_relative_eq!(bounds.min.y, 280.1, epsilon = 1e-3);
        assert_relative_eq!(bounds.min.x, 0.1, epsilon = 1e-3);
        assert_relative_eq!(bounds.max.z, 99.9, epsilon = 1e-3);
    }

    #[test]
    fn test_too_few_points() {
        let line = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(matches!(
            slab_mesh(&line, &levels(), 0.998),
            Err(Error::DegenerateSlab(2))
        ));
    }

    #[test]
    fn test_slab_thinner_than_surface_gaps_is_rejected() {
        for thickness in [0.15, 0.05] {
            let thin = SlabLevels {
                thickness,
                ..levels()
            };
            assert!(matches!(
                slab_mesh(&hexagon(), &thin, 0.998),
                Err(Error::DegenerateElement(_))
            ));
        }
        let thick_enough = SlabLevels {
            thickness: 0.5,
            ..levels()
        };
        let mesh = slab_mesh(&hexagon(), &thick_enough, 0.998).unwrap();
        let bounds = mesh.bounds();
        assert!(bounds.min.y < bounds.max.y);
    }

    #[test]
    fn test_outline_area() {
        assert_relative_eq!(outline_area(&hexagon()), 25980.762, epsilon = 1e-2);
    }
}
