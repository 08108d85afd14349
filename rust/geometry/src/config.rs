// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry settings

use serde::{Deserialize, Serialize};

/// Dimensions and tolerances used when turning elements into meshes.
///
/// All lengths are in model units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryConfig {
    /// Column section along X when `B1` is missing
    pub default_column_b1: f64,
    /// Column section along Z when `B2` is missing
    pub default_column_b2: f64,
    /// Beam width when `Width` is missing
    pub default_beam_width: f64,
    /// Beam depth when `Depth` is missing
    pub default_beam_depth: f64,
    /// Wall thickness when `Width` is missing
    pub default_wall_width: f64,
    /// Slab thickness when `Thickness` is missing
    pub default_slab_thickness: f64,
    /// Embedded wall beam depth when missing
    pub default_wall_beam_depth: f64,
    /// Embedded wall column length along the wall when missing
    pub default_wall_column_length: f64,
    /// Offset keeping coplanar faces of adjoining elements apart
    pub surface_epsilon: f64,
    /// Scale applied to slab outlines toward their centroid
    pub slab_inset_factor: f64,
    /// Target length of one segment along a member's long axis
    pub segment_length: f64,
    /// Minimum number of segments along a member's long axis
    pub min_segments: usize,
    /// Maximum number of segments along a member's long axis
    pub max_segments: usize,
    /// Width of the jamb posts framing each wall opening
    pub jamb_width: f64,
    /// Length by which grid axis lines overshoot their outermost intersections
    pub axis_extension: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            default_column_b1: 30.0,
            default_column_b2: 30.0,
            default_beam_width: 25.0,
            default_beam_depth: 50.0,
            default_wall_width: 20.0,
            default_slab_thickness: 20.0,
            default_wall_beam_depth: 50.0,
            default_wall_column_length: 30.0,
            surface_epsilon: 0.1,
            slab_inset_factor: 0.998,
            segment_length: 50.0,
            min_segments: 2,
            max_segments: 256,
            jamb_width: 20.0,
            axis_extension: 100.0,
        }
    }
}

impl GeometryConfig {
    /// Number of segments along a long axis of the given length, within
    /// `[min_segments, max_segments]`
    #[inline]
    pub fn segment_count(&self, length: f64) -> usize {
        let by_length = if self.segment_length > 0.0 {
            (length / self.segment_length).floor().max(0.0) as usize
        } else {
            0
        };
        let max = self.max_segments.max(self.min_segments);
        by_length.clamp(self.min_segments, max)
    }

    /// Use `value` when it is a positive number, otherwise `default`
    #[inline]
    pub fn dimension(value: Option<f64>, default: f64) -> f64 {
        match value {
            Some(v) if v > 0.0 => v,
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count() {
        let config = GeometryConfig::default();
        assert_eq!(config.segment_count(10.0), 2);
        assert_eq!(config.segment_count(149.0), 2);
        assert_eq!(config.segment_count(500.0), 10);
        assert_eq!(config.segment_count(1e20), 256);
        assert_eq!(config.segment_count(f64::INFINITY), 256);
        assert_eq!(config.segment_count(f64::NAN), 2);

        let inverted = GeometryConfig {
            min_segments: 4,
            max_segments: 1,
            ..GeometryConfig::default()
        };
        assert_eq!(inverted.segment_count(1e9), 4);
    }

    #[test]
    fn test_dimension_fallback() {
        assert_eq!(GeometryConfig::dimension(Some(40.0), 25.0), 40.0);
        assert_eq!(GeometryConfig::dimension(Some(0.0), 25.0), 25.0);
        assert_eq!(GeometryConfig::dimension(Some(-3.0), 25.0), 25.0);
        assert_eq!(GeometryConfig::dimension(None, 25.0), 25.0);
    }

    #[test]
    fn test_partial_config_json() {
        let config: GeometryConfig = serde_json::from_str(r#"{ "jambWidth": 10 }"#).unwrap();
        assert_eq!(config.jamb_width, 10.0);
        assert_eq!(config.default_beam_depth, 50.0);
    }
}
