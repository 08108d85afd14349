// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration
//!
//! Every field has a default, so hosts may pass a partial JSON object.

use serde::{Deserialize, Serialize};
use structview_geometry::GeometryConfig;

use crate::error::Result;
use crate::material::Color;

/// How pointer picks choose between overlapping hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickingPolicy {
    /// Columns, then walls, then beams, then slabs; nearest hit within the
    /// first category that has any
    #[default]
    Priority,
    /// Nearest hit over every eligible mesh
    Nearest,
}

/// Base color per element kind, as CSS hex strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementColors {
    pub column: String,
    pub beam: String,
    pub wall: String,
    pub slab: String,
    pub wall_beam: String,
    pub wall_column: String,
    pub outline: String,
    pub axis: String,
    pub axis_label: String,
}

impl Default for ElementColors {
    fn default() -> Self {
        Self {
            column: "#8c8c8c".to_string(),
            beam: "#4f81bd".to_string(),
            wall: "#c8b08a".to_string(),
            slab: "#d9d9d9".to_string(),
            wall_beam: "#3a6ea5".to_string(),
            wall_column: "#6d6d6d".to_string(),
            outline: "#000000".to_string(),
            axis: "#d04040".to_string(),
            axis_label: "#202020".to_string(),
        }
    }
}

/// Settings for cameras, controls, picking and materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Vertical field of view of the perspective camera (degrees)
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    /// Fraction of pending orbit motion applied per frame
    pub damping_factor: f64,
    /// Radians of orbit per pixel of drag
    pub rotate_speed: f64,
    pub pan_speed: f64,
    /// Exponential zoom per wheel delta unit
    pub zoom_speed: f64,
    /// Multiplier on the fitted camera distance
    pub fit_margin: f64,
    /// Floor for the fitted camera distance
    pub min_fit_distance: f64,
    /// Padding added around the plan footprint in 2D, as a fraction
    pub ortho_padding: f64,
    /// Preset camera distance as a multiple of the model's largest dimension
    pub preset_distance_factor: f64,
    pub picking_policy: PickingPolicy,
    /// Pointer travel (pixels) beyond which a press is a drag, not a pick
    pub drag_threshold: f64,
    /// Minimum bend between faces for an outline edge (degrees)
    pub outline_threshold_degrees: f64,
    pub outline_render_order: i32,
    pub highlight_color: String,
    pub highlight_opacity: f32,
    pub slab_opacity: f32,
    /// Axis label height in pixels
    pub label_size: f32,
    /// Delay before resizing after a fullscreen change (milliseconds)
    pub resize_settle_ms: u32,
    pub colors: ElementColors,
    pub geometry: GeometryConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0,
            far: 100_000.0,
            damping_factor: 0.1,
            rotate_speed: 0.005,
            pan_speed: 1.0,
            zoom_speed: 0.001,
            fit_margin: 1.1,
            min_fit_distance: 100.0,
            ortho_padding: 0.2,
            preset_distance_factor: 2.0,
            picking_policy: PickingPolicy::Priority,
            drag_threshold: 4.0,
            outline_threshold_degrees: 15.0,
            outline_render_order: 999,
            highlight_color: "#ffff00".to_string(),
            highlight_opacity: 0.6,
            slab_opacity: 0.85,
            label_size: 16.0,
            resize_settle_ms: 150,
            colors: ElementColors::default(),
            geometry: GeometryConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a (possibly partial) JSON configuration and check its colors
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every color string parses
    pub fn validate(&self) -> Result<()> {
        let c = &self.colors;
        for hex in [
            &self.highlight_color,
            &c.column,
            &c.beam,
            &c.wall,
            &c.slab,
            &c.wall_beam,
            &c.wall_column,
            &c.outline,
            &c.axis,
            &c.axis_label,
        ] {
            Color::from_hex(hex)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ViewerConfig::from_json(r#"{ "pickingPolicy": "nearest", "geometry": { "jambWidth": 15 } }"#)
                .unwrap();
        assert_eq!(config.picking_policy, PickingPolicy::Nearest);
        assert_eq!(config.geometry.jamb_width, 15.0);
        assert_eq!(config.fit_margin, 1.1);
        assert_eq!(config.ortho_padding, 0.2);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "highlightColor": "yellowish" }"#).is_err());
        assert!(ViewerConfig::from_json(r##"{ "colors": { "beam": "#12" } }"##).is_err());
    }
}
