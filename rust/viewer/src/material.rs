// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Materials and recoloring
//!
//! [`MaterialLibrary`] holds the base material descriptions. They are
//! templates: the scene always creates backend materials from copies, so the
//! library stays the reset baseline for recoloring.

use serde::Serialize;
use structview_core::ElementCategory;

use crate::config::ViewerConfig;
use crate::error::{Error, Result};

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb` or the same without `#`
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches('#');
        let invalid = || Error::InvalidColor(text.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let (r, g, b) = match digits.len() {
            6 => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                (short(0)?, short(1)?, short(2)?)
            }
            _ => return Err(invalid()),
        };
        Ok(Self::from_bytes(r, g, b))
    }

    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// How a material is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Lit triangle surfaces
    Surface,
    Line,
    /// Camera-facing text labels
    Sprite,
}

/// Backend-neutral material description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDesc {
    pub kind: MaterialKind,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    /// Self-illumination so the material reads the same under any light
    pub emissive: Option<Color>,
    pub depth_test: bool,
    pub depth_write: bool,
    /// Polygon offset `(factor, units)` against coplanar neighbors
    pub polygon_offset: Option<(f32, f32)>,
}

impl MaterialDesc {
    pub fn surface(color: Color, opacity: f32) -> Self {
        let transparent = opacity < 1.0;
        Self {
            kind: MaterialKind::Surface,
            color,
            opacity,
            transparent,
            emissive: None,
            depth_test: true,
            depth_write: !transparent,
            polygon_offset: None,
        }
    }

    pub fn line(color: Color) -> Self {
        Self {
            kind: MaterialKind::Line,
            ..Self::surface(color, 1.0)
        }
    }

    /// Copy with a new color; opacity and transparency are kept
    pub fn recolored(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// Base materials and the shared overlay materials
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    column: MaterialDesc,
    beam: MaterialDesc,
    wall: MaterialDesc,
    slab: MaterialDesc,
    wall_beam: MaterialDesc,
    wall_column: MaterialDesc,
    pub highlight: MaterialDesc,
    pub outline: MaterialDesc,
    pub axis_line: MaterialDesc,
    pub axis_label: MaterialDesc,
}

impl MaterialLibrary {
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        let c = &config.colors;
        let surface = |hex: &str| Color::from_hex(hex).map(|color| MaterialDesc::surface(color, 1.0));

        let highlight_color = Color::from_hex(&config.highlight_color)?;
        let highlight = MaterialDesc {
            emissive: Some(highlight_color),
            depth_write: false,
            polygon_offset: Some((-1.0, -1.0)),
            ..MaterialDesc::surface(highlight_color, config.highlight_opacity)
        };

        let axis_label = MaterialDesc {
            kind: MaterialKind::Sprite,
            transparent: true,
            depth_test: false,
            depth_write: false,
            ..MaterialDesc::surface(Color::from_hex(&c.axis_label)?, 1.0)
        };

        Ok(Self {
            column: surface(&c.column)?,
            beam: surface(&c.beam)?,
            wall: surface(&c.wall)?,
            slab: MaterialDesc::surface(Color::from_hex(&c.slab)?, config.slab_opacity),
            wall_beam: surface(&c.wall_beam)?,
            wall_column: surface(&c.wall_column)?,
            highlight,
            outline: MaterialDesc::line(Color::from_hex(&c.outline)?),
            axis_line: MaterialDesc::line(Color::from_hex(&c.axis)?),
            axis_label,
        })
    }

    /// Base material of a category
    pub fn base(&self, category: ElementCategory) -> &MaterialDesc {
        match category {
            ElementCategory::Column => &self.column,
            ElementCategory::Beam => &self.beam,
            ElementCategory::Wall => &self.wall,
            ElementCategory::Slab => &self.slab,
            ElementCategory::WallBeam => &self.wall_beam,
            ElementCategory::WallColumnStart | ElementCategory::WallColumnEnd => &self.wall_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::new(1.0, 0.0, 0.0));
        assert_eq!(Color::from_hex("0f0").unwrap(), Color::new(0.0, 1.0, 0.0));
        assert_eq!(Color::from_hex("#3366CC").unwrap().to_hex(), "#3366cc");
        assert!(Color::from_hex("#ff00").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_recolor_keeps_transparency() {
        let library = MaterialLibrary::from_config(&ViewerConfig::default()).unwrap();
        let slab = library.base(ElementCategory::Slab);
        let red = slab.recolored(Color::new(1.0, 0.0, 0.0));

        assert!(red.transparent);
        assert_eq!(red.opacity, slab.opacity);
        assert_ne!(red.color, slab.color);
    }

    #[test]
    fn test_highlight_is_translucent_with_offset() {
        let library = MaterialLibrary::from_config(&ViewerConfig::default()).unwrap();
        assert!(library.highlight.transparent);
        assert!(library.highlight.polygon_offset.is_some());
        assert_eq!(library.highlight.color, Color::new(1.0, 1.0, 0.0));
    }
}
