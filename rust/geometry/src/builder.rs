// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Builder - story and element records to placed meshes
//!
//! Elements are built one at a time; a failure skips that element only and
//! is recorded as a [`Skipped`] diagnostic.

use std::collections::BTreeMap;
use std::sync::Arc;

use nalgebra::{Point2, Point3, Vector3};
use rustc_hash::FxHashSet;
use serde::Serialize;
use structview_core::{
    Beam, BeamProps, Column, ColumnProps, ElementCategory, ElementId, ElementProperties, Model,
    NodeId, NodeIndex, Slab, SlabProps, Story, StoryEntry, StoryLayout, Wall, WallPartProps, WallProps,
};

use crate::axes::{axis_annotations, AxisAnnotation};
use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::mesh::{Aabb, Mesh};
use crate::prism::{heading, placed_prism, Placement, PrismSpec};
use crate::slab::{outline_area, slab_mesh, SlabLevels};
use crate::wall::{
    normalize_openings, wall_beam_mesh, wall_column_mesh, wall_segments, PartSize, WallEnd,
    WallFrame, WallSegmentKind,
};

/// Which piece of an element a mesh is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPart {
    Whole,
    /// One solid piece of a perforated wall
    Segment { index: usize, kind: WallSegmentKind },
}

/// A built mesh and the element it belongs to
#[derive(Debug, Clone)]
pub struct ElementMesh {
    pub id: ElementId,
    pub part: MeshPart,
    pub mesh: Mesh,
    /// Shared by every piece of the same element
    pub properties: Arc<ElementProperties>,
}

impl ElementMesh {
    /// Display name, with a suffix for wall segments
    pub fn debug_name(&self) -> String {
        match self.part {
            MeshPart::Whole => self.id.display_name(),
            MeshPart::Segment { index, kind } => {
                format!("{}_{}{}", self.id, kind.as_str(), index)
            }
        }
    }
}

/// An element that produced no geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skipped {
    pub story: String,
    pub element: String,
    pub reason: String,
}

/// Element meshes of one story
#[derive(Debug, Clone)]
pub struct StoryGeometry {
    pub index: usize,
    /// Positional group name
    pub group: String,
    /// Human-readable name
    pub name: String,
    pub base_elevation: f64,
    pub top_elevation: f64,
    pub elements: Vec<ElementMesh>,
}

impl StoryGeometry {
    pub fn bounds(&self) -> Aabb {
        self.elements
            .iter()
            .fold(Aabb::empty(), |acc, e| acc.union(&e.mesh.bounds()))
    }
}

/// Per-category build counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    /// Elements (not meshes) built per category
    pub built: BTreeMap<ElementCategory, usize>,
    pub meshes: usize,
    pub triangles: usize,
    pub skipped: usize,
}

/// Everything built from one model
#[derive(Debug, Clone, Default)]
pub struct ModelGeometry {
    pub layout: StoryLayout,
    pub stories: Vec<StoryGeometry>,
    pub axes: Vec<AxisAnnotation>,
    pub skipped: Vec<Skipped>,
    pub stats: BuildStats,
}

impl ModelGeometry {
    pub fn bounds(&self) -> Aabb {
        self.stories
            .iter()
            .fold(Aabb::empty(), |acc, s| acc.union(&s.bounds()))
    }
}

/// Turns model records into placed meshes
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    config: GeometryConfig,
}

impl GeometryBuilder {
    pub fn new(config: GeometryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Build every story in stacking order, then the axis annotation
    pub fn build_model(&self, model: &Model) -> ModelGeometry {
        let layout = StoryLayout::from_model(model);
        let mut stories = Vec::with_capacity(layout.len());
        let mut skipped = Vec::new();

        for (story, entry) in model.stories.iter().zip(layout.iter()) {
            let (geometry, mut story_skipped) = self.build_story(story, entry);
            skipped.append(&mut story_skipped);
            stories.push(geometry);
        }

        let axes = axis_annotations(&model.axes_intersections, self.config.axis_extension);

        let mut stats = BuildStats {
            skipped: skipped.len(),
            ..Default::default()
        };
        for story in &stories {
            let mut seen: FxHashSet<&ElementId> = FxHashSet::default();
            for element in &story.elements {
                stats.meshes += 1;
                stats.triangles += element.mesh.triangle_count();
                if seen.insert(&element.id) {
                    *stats.built.entry(element.id.category).or_default() += 1;
                }
            }
        }

        tracing::info!(
            stories = stories.len(),
            meshes = stats.meshes,
            triangles = stats.triangles,
            skipped = stats.skipped,
            axes = axes.len(),
            "Built model geometry"
        );

        ModelGeometry {
            layout,
            stories,
            axes,
            skipped,
            stats,
        }
    }

    /// Build one story's elements. Never fails as a whole.
    pub fn build_story(&self, story: &Story, entry: &StoryEntry) -> (StoryGeometry, Vec<Skipped>) {
        let mut ctx = StoryContext {
            config: &self.config,
            entry,
            nodes: NodeIndex::new(story),
            elements: Vec::with_capacity(story.element_count()),
            skipped: Vec::new(),
            taken: FxHashSet::default(),
        };

        for (i, column) in story.columns.iter().enumerate() {
            ctx.column(i, column);
        }
        for (i, beam) in story.beams.iter().enumerate() {
            ctx.beam(i, beam);
        }
        for (i, wall) in story.walls.iter().enumerate() {
            ctx.wall(i, wall);
        }
        for (i, slab) in story.slabs.iter().enumerate() {
            ctx.slab(i, slab);
        }

        tracing::debug!(
            story = %entry.name,
            elements = ctx.elements.len(),
            skipped = ctx.skipped.len(),
            "Built story"
        );

        let geometry = StoryGeometry {
            index: entry.index,
            group: entry.group.clone(),
            name: entry.name.clone(),
            base_elevation: entry.base_elevation,
            top_elevation: entry.top_elevation,
            elements: ctx.elements,
        };
        (geometry, ctx.skipped)
    }
}

struct StoryContext<'a> {
    config: &'a GeometryConfig,
    entry: &'a StoryEntry,
    nodes: NodeIndex<'a>,
    elements: Vec<ElementMesh>,
    skipped: Vec<Skipped>,
    taken: FxHashSet<ElementId>,
}

impl StoryContext<'_> {
    /// Claim a unique id within the story; a missing label falls back to the
    /// element's 1-based position in its list
    fn claim(&mut self, category: ElementCategory, label: Option<&str>, index: usize) -> ElementId {
        let base = match label.map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => (index + 1).to_string(),
        };

        let mut id = ElementId::new(category, base.clone());
        let mut n = 2;
        while self.taken.contains(&id) {
            id = ElementId::new(category, format!("{}#{}", base, n));
            n += 1;
        }
        if id.label != base {
            tracing::warn!(
                story = %self.entry.name,
                element = %ElementId::new(category, base),
                renamed = %id,
                "Duplicate element label"
            );
        }
        self.taken.insert(id.clone());
        id
    }

    fn skip(&mut self, element: String, error: &Error) {
        tracing::warn!(
            story = %self.entry.name,
            element = %element,
            error = %error,
            "Skipping element"
        );
        self.skipped.push(Skipped {
            story: self.entry.name.clone(),
            element,
            reason: error.to_string(),
        });
    }

    fn push(&mut self, id: ElementId, mesh: Mesh, properties: ElementProperties) {
        self.elements.push(ElementMesh {
            id,
            part: MeshPart::Whole,
            mesh,
            properties: Arc::new(properties),
        });
    }

    fn column(&mut self, index: usize, column: &Column) {
        let id = self.claim(ElementCategory::Column, column.label.as_deref(), index);
        match self.column_mesh(column) {
            Ok((mesh, b1, b2)) => {
                let properties = ElementProperties::Column(ColumnProps {
                    label: id.label.clone(),
                    story: self.entry.name.clone(),
                    node: node_name(&column.node_id),
                    b1,
                    b2,
                    height: self.entry.height,
                    is_supported: column.is_supported.unwrap_or(false),
                });
                self.push(id, mesh, properties);
            }
            Err(error) => self.skip(id.display_name(), &error),
        }
    }

    fn column_mesh(&self, column: &Column) -> Result<(Mesh, f64, f64)> {
        let (x, z) = self.nodes.resolve(column.node_id.as_ref(), "column")?;
        let height = self.entry.height;
        if height <= 0.0 {
            return Err(Error::DegenerateElement(format!(
                "story height {} is not positive",
                height
            )));
        }
        let b1 = GeometryConfig::dimension(column.b1, self.config.default_column_b1);
        let b2 = GeometryConfig::dimension(column.b2, self.config.default_column_b2);

        let spec = PrismSpec::new(
            Vector3::new(b1, height, b2),
            [1, self.config.segment_count(height), 1],
        );
        let center = Point3::new(x, self.entry.base_elevation + height / 2.0, z);
        Ok((placed_prism(&spec, &Placement::at(center)), b1, b2))
    }

    fn beam(&mut self, index: usize, beam: &Beam) {
        let id = self.claim(ElementCategory::Beam, beam.label.as_deref(), index);
        match self.beam_mesh(beam) {
            Ok((mesh, width, depth, length)) => {
                let properties = ElementProperties::Beam(BeamProps {
                    label: id.label.clone(),
                    story: self.entry.name.clone(),
                    node_i: node_name(&beam.node_i),
                    node_j: node_name(&beam.node_j),
                    width,
                    depth,
                    length,
                });
                self.push(id, mesh, properties);
            }
            Err(error) => self.skip(id.display_name(), &error),
        }
    }

    fn beam_mesh(&self, beam: &Beam) -> Result<(Mesh, f64, f64, f64)> {
        let (x0, z0) = self.nodes.resolve(beam.node_i.as_ref(), "beam")?;
        let (x1, z1) = self.nodes.resolve(beam.node_j.as_ref(), "beam")?;
        let length = (x1 - x0).hypot(z1 - z0);
        if length < 1e-6 {
            return Err(Error::DegenerateElement(
                "beam end nodes coincide".to_string(),
            ));
        }
        let width = GeometryConfig::dimension(beam.width, self.config.default_beam_width);
        let depth = GeometryConfig::dimension(beam.depth, self.config.default_beam_depth);

        let spec = PrismSpec::new(
            Vector3::new(length, depth, width),
            [self.config.segment_count(length), 1, 1],
        );
        let center = Point3::new(
            (x0 + x1) / 2.0,
            self.entry.top_elevation - depth / 2.0 - self.config.surface_epsilon,
            (z0 + z1) / 2.0,
        );
        let placement = Placement::new(center, heading(x0, z0, x1, z1));
        Ok((placed_prism(&spec, &placement), width, depth, length))
    }

    fn slab(&mut self, index: usize, slab: &Slab) {
        let id = self.claim(ElementCategory::Slab, slab.label.as_deref(), index);

        let mut outline = Vec::with_capacity(slab.nodes.len());
        for node in &slab.nodes {
            match self.nodes.get(node) {
                Some((x, y)) => outline.push(Point2::new(x, y)),
                None => tracing::warn!(
                    story = %self.entry.name,
                    element = %id,
                    node = %node,
                    "Slab node not found, dropped from outline"
                ),
            }
        }

        let thickness =
            GeometryConfig::dimension(slab.thickness, self.config.default_slab_thickness);
        let levels = SlabLevels {
            elevation: self.entry.top_elevation,
            thickness,
            epsilon: self.config.surface_epsilon,
        };

        match slab_mesh(&outline, &levels, self.config.slab_inset_factor) {
            Ok(mesh) => {
                let properties = ElementProperties::Slab(SlabProps {
                    label: id.label.clone(),
                    story: self.entry.name.clone(),
                    nodes: slab.nodes.iter().map(ToString::to_string).collect(),
                    thickness,
                    area: outline_area(&outline),
                    coating_load: slab.coating_load,
                    live_load: slab.live_load,
                });
                self.push(id, mesh, properties);
            }
            Err(error) => self.skip(id.display_name(), &error),
        }
    }

    fn wall(&mut self, index: usize, wall: &Wall) {
        let id = self.claim(ElementCategory::Wall, wall.label.as_deref(), index);
        let frame = match self.wall_frame(wall) {
            Ok(frame) => frame,
            Err(error) => return self.skip(id.display_name(), &error),
        };

        let openings = normalize_openings(&wall.spacings, frame.length, frame.height);
        let segments = wall_segments(frame.length, frame.height, &openings, self.config.jamb_width);
        if segments.is_empty() {
            let error = Error::DegenerateElement("openings leave no solid wall".to_string());
            return self.skip(id.display_name(), &error);
        }

        let properties = Arc::new(ElementProperties::Wall(WallProps {
            label: id.label.clone(),
            story: self.entry.name.clone(),
            node_i: node_name(&wall.node_i),
            node_j: node_name(&wall.node_j),
            width: frame.thickness,
            height: frame.height,
            length: frame.length,
            is_supported: wall.is_supported.unwrap_or(false),
            opening_count: openings.len(),
        }));

        for (i, segment) in segments.iter().enumerate() {
            let part = match segment.kind {
                WallSegmentKind::Solid => MeshPart::Whole,
                kind => MeshPart::Segment { index: i, kind },
            };
            self.elements.push(ElementMesh {
                id: id.clone(),
                part,
                mesh: frame.block(&segment.rect, frame.thickness, self.config),
                properties: Arc::clone(&properties),
            });
        }

        if let Some(beam) = &wall.wall_beam {
            let label = beam.label.as_deref().or(Some(id.label.as_str()));
            let part_id = self.claim(ElementCategory::WallBeam, label, index);
            let (mesh, size) = wall_beam_mesh(&frame, beam, self.config);
            self.push_part(part_id, &id, mesh, size);
        }

        let columns = [
            (ElementCategory::WallColumnStart, WallEnd::Start, &wall.wall_column_start),
            (ElementCategory::WallColumnEnd, WallEnd::End, &wall.wall_column_end),
        ];
        for (category, end, column) in columns {
            let Some(column) = column else { continue };
            let label = column.label.as_deref().or(Some(id.label.as_str()));
            let part_id = self.claim(category, label, index);
            let (mesh, size) = wall_column_mesh(&frame, column, end, self.config);
            self.push_part(part_id, &id, mesh, size);
        }
    }

    fn wall_frame(&self, wall: &Wall) -> Result<WallFrame> {
        let start = self.nodes.resolve(wall.node_i.as_ref(), "wall")?;
        let end = self.nodes.resolve(wall.node_j.as_ref(), "wall")?;
        let thickness = GeometryConfig::dimension(wall.width, self.config.default_wall_width);
        WallFrame::new(
            start,
            end,
            self.entry.base_elevation,
            self.entry.height,
            thickness,
        )
    }

    fn push_part(&mut self, id: ElementId, wall: &ElementId, mesh: Mesh, size: PartSize) {
        let properties = ElementProperties::WallPart(WallPartProps {
            label: id.label.clone(),
            story: self.entry.name.clone(),
            wall: wall.label.clone(),
            length: size.along,
            width: size.across,
            height: size.vertical,
        });
        self.push(id, mesh, properties);
    }
}

fn node_name(id: &Option<NodeId>) -> String {
    id.as_ref().map(NodeId::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use structview_core::{Node, NodeId, Spacing, WallBeam};

    fn story() -> Story {
        Story {
            height: Some(300.0),
            label: Some("Ground".to_string()),
            nodes: vec![
                Node::new("1", 0.0, 0.0),
                Node::new("2", 400.0, 0.0),
                Node::new("3", 400.0, 300.0),
            ],
            ..Default::default()
        }
    }

    fn beam(label: Option<&str>, j: &str) -> Beam {
        Beam {
            node_i: Some(NodeId::new("1")),
            node_j: Some(NodeId::new(j)),
            width: None,
            depth: None,
            label: label.map(str::to_string),
        }
    }

    fn build(story: Story) -> (StoryGeometry, Vec<Skipped>) {
        let layout = StoryLayout::from_stories(std::slice::from_ref(&story));
        let entry = layout.get(0).unwrap().clone();
        GeometryBuilder::default().build_story(&story, &entry)
    }

    #[test]
    fn test_beam_top_sits_below_story_ceiling() {
        let mut story = story();
        story.beams.push(beam(Some("B1"), "2"));
        let (geometry, skipped) = build(story);

        assert!(skipped.is_empty());
        let bounds = geometry.elements[0].mesh.bounds();
        assert_relative_eq!(bounds.max.y, 299.9, epsilon = 1e-4);
        assert_relative_eq!(bounds.min.y, 249.9, epsilon = 1e-4);
        assert_relative_eq!(bounds.max.x - bounds.min.x, 400.0, epsilon = 1e-4);
    }

    #[test]
    fn test_unknown_node_skips_only_that_element() {
        let mut story = story();
        story.beams.push(beam(Some("B1"), "99"));
        story.beams.push(beam(Some("B2"), "3"));
        let (geometry, skipped) = build(story);

        assert_eq!(geometry.elements.len(), 1);
        assert_eq!(geometry.elements[0].id.display_name(), "Beam_B2");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].element, "Beam_B1");
        assert_eq!(skipped[0].story, "Ground");
    }

    #[test]
    fn test_missing_node_key_skips_only_that_element() {
        let mut story: Story = serde_json::from_str(
            r#"{
                "Height": 300,
                "Label": "Ground",
                "Nodes": [ { "ID": 1, "X": 0, "Y": 0 }, { "ID": 2, "X": 400, "Y": 0 } ],
                "Columns": [ { "NodeID": 1, "Label": "C1" }, { "Label": "C2" } ],
                "Beams": [ { "NodeJ": 2, "Label": "B1" } ]
            }"#,
        )
        .unwrap();
        story.beams.push(beam(Some("B2"), "2"));
        let (geometry, skipped) = build(story);

        let names: Vec<_> = geometry.elements.iter().map(|e| e.debug_name()).collect();
        assert_eq!(names, ["Column_C1", "Beam_B2"]);
        let skipped: Vec<_> = skipped.iter().map(|s| s.element.as_str()).collect();
        assert_eq!(skipped, ["Column_C2", "Beam_B1"]);
    }

    #[test]
    fn test_far_away_node_keeps_segment_count_bounded() {
        let mut story = story();
        story.nodes.push(Node::new("4", 1e20, 0.0));
        story.beams.push(beam(Some("B1"), "4"));
        let (geometry, skipped) = build(story);

        assert!(skipped.is_empty());
        let config = GeometryConfig::default();
        let max_vertices = 2 * 2 * (config.max_segments + 1) * 2 + 2 * 2 * 2;
        assert!(geometry.elements[0].mesh.vertex_count() <= max_vertices);
    }

    #[test]
    fn test_labels_are_unique_per_category() {
        let mut story = story();
        story.beams.push(beam(Some("B1"), "2"));
        story.beams.push(beam(Some("B1"), "3"));
        story.beams.push(beam(None, "3"));
        let (geometry, _) = build(story);

        let names: Vec<_> = geometry.elements.iter().map(|e| e.debug_name()).collect();
        assert_eq!(names, ["Beam_B1", "Beam_B1#2", "Beam_3"]);
    }

    #[test]
    fn test_perforated_wall_segments_share_identity() {
        let mut story = story();
        story.walls.push(Wall {
            node_i: Some(NodeId::new("1")),
            node_j: Some(NodeId::new("2")),
            width: Some(20.0),
            label: Some("W1".to_string()),
            is_supported: None,
            spacings: vec![Spacing::new(150.0, 250.0, 50.0, 200.0)],
            wall_beam: Some(WallBeam::default()),
            wall_column_start: None,
            wall_column_end: None,
        });
        let (geometry, _) = build(story);

        let walls: Vec<_> = geometry
            .elements
            .iter()
            .filter(|e| e.id.category == ElementCategory::Wall)
            .collect();
        assert_eq!(walls.len(), 6);
        assert!(walls.iter().all(|e| e.id.display_name() == "Wall_W1"));
        assert!(walls
            .iter()
            .all(|e| Arc::ptr_eq(&e.properties, &walls[0].properties)));

        let wall_beam = geometry
            .elements
            .iter()
            .find(|e| e.id.category == ElementCategory::WallBeam)
            .unwrap();
        assert_eq!(wall_beam.id.display_name(), "WallBeam_W1");
    }
}
