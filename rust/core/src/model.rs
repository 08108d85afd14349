// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural model types
//!
//! Serde mappings of the parsed model JSON produced by the upload pipeline.
//! Field names follow the exporter (`PascalCase`, `ID`, `B1`, `NodeI`, ...).
//! Dimensions are kept as `Option<f64>`: a missing or unparsable value is
//! not an error at this level, the geometry layer substitutes defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::number::{format_number, lenient, lenient_flag, lenient_label, seq_or_default};

/// Required top-level keys of the model object
const AXES_KEY: &str = "AxesIntersections";
const STORIES_KEY: &str = "Stories";

/// A parsed structural model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Model {
    /// `"<AxisA>-<AxisB>"` → planar intersection point
    #[serde(default)]
    pub axes_intersections: BTreeMap<String, PlanPoint>,
    /// Stories in stacking order, bottom to top
    #[serde(default, deserialize_with = "seq_or_default")]
    pub stories: Vec<Story>,
}

impl Model {
    /// Parse a model from JSON text.
    ///
    /// Both `AxesIntersections` and `Stories` must be present; a model missing
    /// either is rejected as a whole rather than partially trusted.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a model from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or(Error::NotAnObject)?;
        for key in [AXES_KEY, STORIES_KEY] {
            if !object.contains_key(key) {
                return Err(Error::MissingKey(key));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Total number of structural elements across all stories
    pub fn element_count(&self) -> usize {
        self.stories.iter().map(Story::element_count).sum()
    }

    /// Check whether the model has anything to draw
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.axes_intersections.is_empty()
    }
}

/// A planar point, used both for axis intersections and node coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPoint {
    #[serde(rename = "X", default, deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(rename = "Y", default, deserialize_with = "lenient")]
    pub y: Option<f64>,
}

impl PlanPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// Both coordinates, if both parsed
    #[inline]
    pub fn xy(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

/// Node identifier, written by exporters as either an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(id) => NodeId(id.to_string()),
            Raw::Float(id) => NodeId(format_number(id)),
            Raw::Text(id) => NodeId(id.trim().to_string()),
        })
    }
}

/// One horizontal level of the building
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Story {
    /// Elevation delta from the story below
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub columns: Vec<Column>,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub beams: Vec<Beam>,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub slabs: Vec<Slab>,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub walls: Vec<Wall>,
}

impl Story {
    pub fn element_count(&self) -> usize {
        self.columns.len() + self.beams.len() + self.slabs.len() + self.walls.len()
    }
}

/// A 2D reference point in the story's local frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "ID")]
    pub id: NodeId,
    #[serde(rename = "X", default, deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(rename = "Y", default, deserialize_with = "lenient")]
    pub y: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Vertical member anchored at one node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Column {
    #[serde(rename = "NodeID", default)]
    pub node_id: Option<NodeId>,
    #[serde(rename = "B1", default, deserialize_with = "lenient")]
    pub b1: Option<f64>,
    #[serde(rename = "B2", default, deserialize_with = "lenient")]
    pub b2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_supported: Option<bool>,
}

/// Horizontal member spanning two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Beam {
    #[serde(default)]
    pub node_i: Option<NodeId>,
    #[serde(default)]
    pub node_j: Option<NodeId>,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub depth: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
}

/// Planar floor plate bounded by a closed node polygon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Slab {
    #[serde(default, deserialize_with = "seq_or_default")]
    pub nodes: Vec<NodeId>,
    #[serde(default, deserialize_with = "lenient")]
    pub thickness: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coating_load: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub live_load: Option<f64>,
}

/// Vertical panel between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Wall {
    #[serde(default)]
    pub node_i: Option<NodeId>,
    #[serde(default)]
    pub node_j: Option<NodeId>,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_supported: Option<bool>,
    /// Rectangular openings in wall-local coordinates
    #[serde(default, deserialize_with = "seq_or_default")]
    pub spacings: Vec<Spacing>,
    #[serde(default)]
    pub wall_beam: Option<WallBeam>,
    #[serde(default)]
    pub wall_column_start: Option<WallColumn>,
    #[serde(default)]
    pub wall_column_end: Option<WallColumn>,
}

/// Opening bounds: distance along the wall (X) and height above its base (Y)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(rename = "StartX", alias = "startX", default, deserialize_with = "lenient")]
    pub start_x: Option<f64>,
    #[serde(rename = "EndX", alias = "endX", default, deserialize_with = "lenient")]
    pub end_x: Option<f64>,
    #[serde(rename = "StartY", alias = "startY", default, deserialize_with = "lenient")]
    pub start_y: Option<f64>,
    #[serde(rename = "EndY", alias = "endY", default, deserialize_with = "lenient")]
    pub end_y: Option<f64>,
}

impl Spacing {
    pub fn new(start_x: f64, end_x: f64, start_y: f64, end_y: f64) -> Self {
        Self {
            start_x: Some(start_x),
            end_x: Some(end_x),
            start_y: Some(start_y),
            end_y: Some(end_y),
        }
    }
}

/// Beam embedded along the top of a wall
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WallBeam {
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub depth: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
}

/// Column embedded at one end of a wall; `B1` runs along the wall, `B2` across it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WallColumn {
    #[serde(rename = "B1", default, deserialize_with = "lenient")]
    pub b1: Option<f64>,
    #[serde(rename = "B2", default, deserialize_with = "lenient")]
    pub b2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<String>,
}
