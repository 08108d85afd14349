// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for 2D polygon triangulation.

use crate::{Error, Point2, Result};

/// Twice the signed area of a polygon (shoelace sum).
/// Positive for counter-clockwise rings.
#[inline]
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        sum += p0.x * p1.y - p1.x * p0.y;
    }
    sum / 2.0
}

/// Check if a ring is wound clockwise
#[inline]
pub fn is_clockwise(points: &[Point2<f64>]) -> bool {
    signed_area(points) < 0.0
}

/// Check if a polygon is convex (all cross products have same sign)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false;
            }
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Triangulate a simple counter-clockwise polygon (no holes).
/// Returns triangle indices into the input points.
#[inline]
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let indices = earcutr::earcut(&vertices, &[], 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    if indices.len() < 3 {
        return Err(Error::TriangulationError(format!(
            "No triangles produced for {} point polygon",
            n
        )));
    }

    Ok(indices)
}

/// Triangulate a ring given in either winding order.
///
/// Clockwise rings are reversed before triangulation and the resulting
/// indices are mapped back, so indices always refer to `points` as given.
/// Every returned triangle is counter-clockwise.
pub fn triangulate_ring(points: &[Point2<f64>]) -> Result<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }
    if signed_area(points).abs() < 1e-12 {
        return Err(Error::TriangulationError(
            "Polygon has zero area".to_string(),
        ));
    }

    let clockwise = is_clockwise(points);
    let indices = if clockwise {
        let reversed: Vec<Point2<f64>> = points.iter().rev().copied().collect();
        triangulate_polygon(&reversed)?
            .into_iter()
            .map(|i| n - 1 - i)
            .collect()
    } else {
        triangulate_polygon(points)?
    };

    Ok(indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let (pa, pb, pc) = (&points[a], &points[b], &points[c]);
            let cross = (pb.x - pa.x) * (pc.y - pa.y) - (pb.y - pa.y) * (pc.x - pa.x);
            if cross < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect())
}
