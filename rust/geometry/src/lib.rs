// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! StructView Geometry
//!
//! Procedural meshes for structural models: segmented prisms for beams,
//! columns and wall panels, triangulated slabs (earcutr), perforated walls
//! with embedded reinforcement, grid axis annotation and outline edges.
//!
//! World space is Y-up; plan `(X, Y)` maps to world `(x, z)`.

pub mod axes;
pub mod builder;
pub mod config;
pub mod edges;
pub mod error;
pub mod mesh;
pub mod prism;
pub mod slab;
pub mod triangulation;
pub mod wall;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use axes::{axis_annotations, AxisAnnotation, AxisOrientation};
pub use builder::{
    BuildStats, ElementMesh, GeometryBuilder, MeshPart, ModelGeometry, Skipped, StoryGeometry,
};
pub use config::GeometryConfig;
pub use edges::feature_edges;
pub use error::{Error, Result};
pub use mesh::{Aabb, Mesh};
pub use prism::{placed_prism, Placement, PrismSpec};
pub use triangulation::{triangulate_polygon, triangulate_ring};
pub use wall::{WallSegment, WallSegmentKind};
