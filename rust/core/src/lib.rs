// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # StructView Core
//!
//! Data contract for parsed structural building models.
//!
//! A model is a grid of named axes plus an ordered list of stories. Each story
//! carries its own node set and the structural elements (columns, beams, walls
//! and slabs) that reference those nodes.
//!
//! ## Overview
//!
//! - **Model types**: serde mappings of the `AxesIntersections` / `Stories` JSON
//! - **Lenient numbers**: every dimension accepts a number or a numeric string
//! - **Story layout**: cumulative elevations and human-readable story names
//! - **Element identity**: typed `{category, label}` identifiers and per-category
//!   property bags shared with the viewer
//!
//! ## Quick Start
//!
//! ```rust
//! use structview_core::{Model, StoryLayout};
//!
//! let json = r#"{
//!     "AxesIntersections": { "A-1": { "X": 0, "Y": 0 } },
//!     "Stories": [ { "Height": "300", "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ] } ]
//! }"#;
//!
//! let model = Model::from_json(json).unwrap();
//! let layout = StoryLayout::from_model(&model);
//! assert_eq!(layout.get(0).unwrap().top_elevation, 300.0);
//! ```

pub mod element;
pub mod error;
pub mod layout;
pub mod model;
pub mod model_bounds;
pub mod number;

pub use element::{
    BeamProps, ColumnProps, ElementCategory, ElementId, ElementProperties, PickClass, SlabProps,
    WallPartProps, WallProps,
};
pub use error::{Error, Result};
pub use layout::{group_name, story_display_name, NodeIndex, StoryEntry, StoryLayout};
pub use model::{
    Beam, Column, Model, Node, NodeId, PlanPoint, Slab, Spacing, Story, Wall, WallBeam, WallColumn,
};
pub use model_bounds::PlanBounds;
