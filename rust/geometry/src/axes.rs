// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid axis annotation
//!
//! Each `AxesIntersections` key names two axes (`"A-1"`); every intersection
//! contributes its point to both. An axis is drawn as a line through the
//! mean of its points, overshooting the outermost ones, with a label at each
//! end. An axis with a single intersection gets a label but no line.

use std::collections::BTreeMap;

use nalgebra::Point3;
use serde::Serialize;
use structview_core::{Error as CoreError, PlanPoint};

use crate::error::Result;

/// Direction of an axis line in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrientation {
    /// Runs along plan Y (world Z)
    Vertical,
    /// Runs along plan X
    Horizontal,
}

/// A reference line and its label anchors, in world space at elevation 0
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAnnotation {
    pub label: String,
    pub orientation: AxisOrientation,
    pub line: Option<(Point3<f64>, Point3<f64>)>,
    pub label_anchors: Vec<Point3<f64>>,
}

/// Split `"<AxisA>-<AxisB>"` at the first dash
pub fn split_axis_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once('-') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => Ok((a.trim(), b.trim())),
        _ => Err(CoreError::InvalidAxisKey(key.to_string()).into()),
    }
}

/// Build annotations for every axis named in the intersection map, sorted by label
pub fn axis_annotations(
    intersections: &BTreeMap<String, PlanPoint>,
    extension: f64,
) -> Vec<AxisAnnotation> {
    let mut points: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for (key, point) in intersections {
        let (a, b) = match split_axis_key(key) {
            Ok(pair) => pair,
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Skipping axis intersection");
                continue;
            }
        };
        let Some(xy) = point.xy() else {
            tracing::warn!(key = %key, "Axis intersection has no coordinates");
            continue;
        };
        points.entry(a).or_default().push(xy);
        points.entry(b).or_default().push(xy);
    }

    points
        .into_iter()
        .map(|(label, pts)| annotate(label, &pts, extension))
        .collect()
}

fn annotate(label: &str, points: &[(f64, f64)], extension: f64) -> AxisAnnotation {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut sum_x, mut sum_y) = (0.0, 0.0);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
        sum_x += x;
        sum_y += y;
    }
    let n = points.len() as f64;

    let orientation = if max_x - min_x < max_y - min_y {
        AxisOrientation::Vertical
    } else {
        AxisOrientation::Horizontal
    };

    if points.len() == 1 {
        let (x, y) = points[0];
        return AxisAnnotation {
            label: label.to_string(),
            orientation,
            line: None,
            label_anchors: vec![Point3::new(x, 0.0, y)],
        };
    }

    let (start, end) = match orientation {
        AxisOrientation::Vertical => {
            let x = sum_x / n;
            (
                Point3::new(x, 0.0, min_y - extension),
                Point3::new(x, 0.0, max_y + extension),
            )
        }
        AxisOrientation::Horizontal => {
            let z = sum_y / n;
            (
                Point3::new(min_x - extension, 0.0, z),
                Point3::new(max_x + extension, 0.0, z),
            )
        }
    };

    AxisAnnotation {
        label: label.to_string(),
        orientation,
        line: Some((start, end)),
        label_anchors: vec![start, end],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> BTreeMap<String, PlanPoint> {
        let mut map = BTreeMap::new();
        map.insert("A-1".to_string(), PlanPoint::new(0.0, 0.0));
        map.insert("A-2".to_string(), PlanPoint::new(0.0, 600.0));
        map.insert("B-1".to_string(), PlanPoint::new(500.0, 0.0));
        map.insert("B-2".to_string(), PlanPoint::new(500.0, 600.0));
        map
    }

    #[test]
    fn test_split_axis_key() {
        assert_eq!(split_axis_key("A-1").unwrap(), ("A", "1"));
        assert_eq!(split_axis_key("A-1-a").unwrap(), ("A", "1-a"));
        assert!(split_axis_key("A1").is_err());
        assert!(split_axis_key("-1").is_err());
    }

    #[test]
    fn test_grid_orientation_and_extension() {
        let axes = axis_annotations(&grid(), 100.0);
        let labels: Vec<_> = axes.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["1", "2", "A", "B"]);

        let a = &axes[2];
        assert_eq!(a.orientation, AxisOrientation::Vertical);
        let (start, end) = a.line.unwrap();
        assert_relative_eq!(start.z, -100.0);
        assert_relative_eq!(end.z, 700.0);
        assert_relative_eq!(start.x, 0.0);

        let one = &axes[0];
        assert_eq!(one.orientation, AxisOrientation::Horizontal);
        let (start, end) = one.line.unwrap();
        assert_relative_eq!(start.x, -100.0);
        assert_relative_eq!(end.x, 600.0);
        assert_eq!(one.label_anchors.len(), 2);
    }

    #[test]
    fn test_single_intersection_gets_label_only() {
        let mut map = BTreeMap::new();
        map.insert("C-7".to_string(), PlanPoint::new(120.0, 80.0));
        map.insert("bad".to_string(), PlanPoint::new(1.0, 1.0));

        let axes = axis_annotations(&map, 100.0);
        assert_eq!(axes.len(), 2);
        for axis in &axes {
            assert!(axis.line.is_none());
            assert_eq!(axis.label_anchors, vec![Point3::new(120.0, 0.0, 80.0)]);
        }
    }
}
