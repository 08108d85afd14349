// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element identity and property bags
//!
//! Every rendered element is addressed by a typed [`ElementId`]. Its
//! `"<Category>_<Label>"` display form is only produced for hosts and
//! debugging; lookups never parse it back except at the host boundary
//! ([`ElementId::from_str`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Category of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementCategory {
    Beam,
    Column,
    Wall,
    Slab,
    WallBeam,
    WallColumnStart,
    WallColumnEnd,
}

/// Picking precedence class: wall sub-elements pick as the member kind they
/// embed (a wall beam competes with beams, wall columns with columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PickClass {
    Column = 0,
    Wall = 1,
    Beam = 2,
    Slab = 3,
}

impl PickClass {
    /// Classes in picking precedence order
    pub const PRIORITY: [PickClass; 4] = [
        PickClass::Column,
        PickClass::Wall,
        PickClass::Beam,
        PickClass::Slab,
    ];
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 7] = [
        ElementCategory::Beam,
        ElementCategory::Column,
        ElementCategory::Wall,
        ElementCategory::Slab,
        ElementCategory::WallBeam,
        ElementCategory::WallColumnStart,
        ElementCategory::WallColumnEnd,
    ];

    /// Name prefix used in display names
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Beam => "Beam",
            ElementCategory::Column => "Column",
            ElementCategory::Wall => "Wall",
            ElementCategory::Slab => "Slab",
            ElementCategory::WallBeam => "WallBeam",
            ElementCategory::WallColumnStart => "WallColumnStart",
            ElementCategory::WallColumnEnd => "WallColumnEnd",
        }
    }

    pub fn pick_class(&self) -> PickClass {
        match self {
            ElementCategory::Column
            | ElementCategory::WallColumnStart
            | ElementCategory::WallColumnEnd => PickClass::Column,
            ElementCategory::Wall => PickClass::Wall,
            ElementCategory::Beam | ElementCategory::WallBeam => PickClass::Beam,
            ElementCategory::Slab => PickClass::Slab,
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Typed element identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId {
    pub category: ElementCategory,
    pub label: String,
}

impl ElementId {
    pub fn new(category: ElementCategory, label: impl Into<String>) -> Self {
        Self {
            category,
            label: label.into(),
        }
    }

    /// `"<Category>_<Label>"`
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category, self.label)
    }
}

impl FromStr for ElementId {
    type Err = Error;

    /// Parse a display name. Category prefixes never contain `_`, so the
    /// first underscore separates category from label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, label) = s
            .split_once('_')
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))?;
        Ok(Self::new(prefix.parse()?, label))
    }
}

/// Properties shown in the properties panel for a selected beam
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeamProps {
    pub label: String,
    pub story: String,
    pub node_i: String,
    pub node_j: String,
    pub width: f64,
    pub depth: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProps {
    pub label: String,
    pub story: String,
    pub node: String,
    pub b1: f64,
    pub b2: f64,
    pub height: f64,
    pub is_supported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallProps {
    pub label: String,
    pub story: String,
    pub node_i: String,
    pub node_j: String,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub is_supported: bool,
    pub opening_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabProps {
    pub label: String,
    pub story: String,
    pub nodes: Vec<String>,
    pub thickness: f64,
    pub area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coating_load: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_load: Option<f64>,
}

/// Embedded wall beam or wall column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallPartProps {
    pub label: String,
    pub story: String,
    pub wall: String,
    /// Extent along the wall
    pub length: f64,
    /// Extent across the wall
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

/// Per-category property bag, resolved once when the element is built
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ElementProperties {
    Beam(BeamProps),
    Column(ColumnProps),
    Wall(WallProps),
    Slab(SlabProps),
    WallPart(WallPartProps),
}

impl ElementProperties {
    pub fn label(&self) -> &str {
        match self {
            ElementProperties::Beam(p) => &p.label,
            ElementProperties::Column(p) => &p.label,
            ElementProperties::Wall(p) => &p.label,
            ElementProperties::Slab(p) => &p.label,
            ElementProperties::WallPart(p) => &p.label,
        }
    }

    pub fn story(&self) -> &str {
        match self {
            ElementProperties::Beam(p) => &p.story,
            ElementProperties::Column(p) => &p.story,
            ElementProperties::Wall(p) => &p.story,
            ElementProperties::Slab(p) => &p.story,
            ElementProperties::WallPart(p) => &p.story,
        }
    }
}
