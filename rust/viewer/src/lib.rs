// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! StructView Viewer
//!
//! Interactive engine for structural models, independent of any GPU API.
//!
//! ## Overview
//!
//! - **Scene graph**: story groups of element meshes, axis annotation and
//!   lights, with exact-once release of backend resources
//! - **Cameras**: perspective orbit view and top-down orthographic plan view
//!   with damped controls, framing and preset angles
//! - **Picking**: ray casts against visible stories with a configurable
//!   category precedence
//! - **View modes**: 3D, and a 2D plan showing one story with outlines
//! - **Recoloring**: per-story material copies over a shared base library
//!
//! Drawing goes through a [`RenderBackend`]; [`HeadlessBackend`] keeps only
//! bookkeeping and is what the tests use.
//!
//! ## Quick Start
//!
//! ```rust
//! use structview_viewer::{HeadlessBackend, Viewer, ViewerConfig, ViewMode};
//!
//! let json = r#"{
//!     "AxesIntersections": {},
//!     "Stories": [ { "Height": 300, "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ],
//!                    "Columns": [ { "NodeID": 1, "Label": "C1" } ] } ]
//! }"#;
//!
//! let mut viewer = Viewer::new(HeadlessBackend::new(), ViewerConfig::default()).unwrap();
//! viewer.handle_resize(800, 600).unwrap();
//! viewer.render_json(json).unwrap();
//! viewer.select_element_by_name("Column_C1").unwrap();
//! viewer.set_view_mode(ViewMode::TwoD).unwrap();
//! assert!(viewer.teardown());
//! ```

pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod material;
pub mod picking;
pub mod render_loop;
pub mod scene;
pub mod selection;
pub mod view_mode;
pub mod viewer;

pub use backend::{
    default_lights, DrawItem, Frame, GeometryData, GeometryHandle, HeadlessBackend, LightDesc,
    MaterialHandle, RenderBackend,
};
pub use camera::{Camera, CameraRig, OrbitControls, Projection, ViewPreset};
pub use config::{ElementColors, PickingPolicy, ViewerConfig};
pub use error::{Error, Result};
pub use material::{Color, MaterialDesc, MaterialKind, MaterialLibrary};
pub use picking::{pick, Hit, Ray};
pub use render_loop::{FrameScheduler, RenderLoop};
pub use scene::{NodeKey, SceneGraph, StoryTree};
pub use selection::{Selection, ViewerEvent};
pub use view_mode::ViewMode;
pub use viewer::{PointerButton, RenderReport, Viewer, ViewerState};
