// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan footprint bounds
//!
//! Scans node and axis coordinates to determine the model's footprint in the
//! plan. The viewer falls back to these bounds for camera framing when no
//! element geometry is visible.

use crate::model::Model;

/// Plan bounds in model units
#[derive(Debug, Clone, PartialEq)]
pub struct PlanBounds {
    /// Minimum X coordinate found
    pub min_x: f64,
    /// Minimum Y coordinate found
    pub min_y: f64,
    /// Maximum X coordinate found
    pub max_x: f64,
    /// Maximum Y coordinate found
    pub max_y: f64,
    /// Number of points sampled
    pub sample_count: usize,
}

impl PlanBounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            sample_count: 0,
        }
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.sample_count += 1;
    }

    /// Get centroid (center of bounding box)
    #[inline]
    pub fn centroid(&self) -> (f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0);
        }
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Width and depth of the footprint
    #[inline]
    pub fn extent(&self) -> (f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0);
        }
        (self.max_x - self.min_x, self.max_y - self.min_y)
    }

    /// Scan every node of every story plus every axis intersection
    pub fn from_model(model: &Model) -> Self {
        let mut bounds = Self::new();

        for point in model.axes_intersections.values() {
            if let Some((x, y)) = point.xy() {
                bounds.expand(x, y);
            }
        }

        for story in &model.stories {
            for node in &story.nodes {
                if let (Some(x), Some(y)) = (node.x, node.y) {
                    bounds.expand(x, y);
                }
            }
        }

        bounds
    }
}

impl Default for PlanBounds {
    fn default() -> Self {
        Self::new()
    }
}
