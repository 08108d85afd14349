// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene graph
//!
//! Nodes live in a [`SlotMap`] and are linked by [`NodeKey`]s:
//! root -> story groups -> element meshes (and their outline overlays), plus
//! axis annotation and lights directly under the root. Element meshes are
//! found by typed id through a per-story index, never by parsing names.
//!
//! The graph owns every backend resource it creates and releases each one
//! exactly once, on [`SceneGraph::clear`].

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use structview_core::{ElementCategory, ElementId, ElementProperties, StoryLayout};
use structview_geometry::{
    feature_edges, Aabb, AxisAnnotation, ElementMesh, Mesh, MeshPart, ModelGeometry,
};

use crate::backend::{DrawItem, GeometryData, GeometryHandle, LightDesc, MaterialHandle, RenderBackend};
use crate::material::{Color, MaterialDesc, MaterialLibrary};

new_key_type! {
    /// Key of a node in the scene graph
    pub struct NodeKey;
}

/// An element mesh
#[derive(Debug)]
pub struct ElementNode {
    pub id: ElementId,
    pub part: MeshPart,
    pub story: usize,
    /// CPU copy used for picking and outlines
    pub mesh: Mesh,
    pub bounds: Aabb,
    pub geometry: GeometryHandle,
    /// Material currently drawn; the highlight while selected
    pub material: MaterialHandle,
    /// Material drawn when not selected
    pub assigned: MaterialHandle,
    /// `assigned` is a recolored copy owned by this node
    pub owns_material: bool,
    pub properties: Arc<ElementProperties>,
    pub outline: Option<NodeKey>,
}

#[derive(Debug)]
pub enum NodeKind {
    Root,
    Story { index: usize, name: String },
    Element(Box<ElementNode>),
    Outline { geometry: GeometryHandle },
    AxisLine { geometry: GeometryHandle },
    AxisLabel { geometry: GeometryHandle },
    Light(LightDesc),
}

#[derive(Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    pub visible: bool,
    pub render_order: i32,
    pub kind: NodeKind,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<NodeKey>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            visible: true,
            render_order: 0,
            kind,
        }
    }
}

/// Materials shared by many nodes, created from library copies on first use
#[derive(Debug, Default)]
struct SharedMaterials {
    surfaces: SmallVec<[(ElementCategory, MaterialHandle); 7]>,
    outline: Option<MaterialHandle>,
    axis_line: Option<MaterialHandle>,
    axis_label: Option<MaterialHandle>,
}

impl SharedMaterials {
    fn surface<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        library: &MaterialLibrary,
        category: ElementCategory,
    ) -> MaterialHandle {
        if let Some(&(_, handle)) = self.surfaces.iter().find(|(c, _)| *c == category) {
            return handle;
        }
        let handle = backend.create_material(library.base(category));
        self.surfaces.push((category, handle));
        handle
    }

    fn overlay<B: RenderBackend>(
        slot: &mut Option<MaterialHandle>,
        backend: &mut B,
        desc: &MaterialDesc,
    ) -> MaterialHandle {
        *slot.get_or_insert_with(|| backend.create_material(desc))
    }

    fn release_surfaces<B: RenderBackend>(&mut self, backend: &mut B) {
        for (_, handle) in self.surfaces.drain(..) {
            backend.release_material(handle);
        }
    }

    fn release<B: RenderBackend>(&mut self, backend: &mut B) {
        self.release_surfaces(backend);
        for slot in [&mut self.outline, &mut self.axis_line, &mut self.axis_label] {
            if let Some(handle) = slot.take() {
                backend.release_material(handle);
            }
        }
    }
}

/// Element names of one story, grouped by category, for tree views
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryTree {
    pub name: String,
    pub group: String,
    pub visible: bool,
    pub elements: BTreeMap<ElementCategory, Vec<String>>,
}

/// Counts of resources released by [`SceneGraph::clear`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Released {
    pub geometries: usize,
    pub materials: usize,
}

#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    stories: Vec<NodeKey>,
    axes: Vec<NodeKey>,
    index: FxHashMap<(usize, ElementId), SmallVec<[NodeKey; 1]>>,
    layout: StoryLayout,
    annotations: Vec<AxisAnnotation>,
    label_size: f32,
    shared: SharedMaterials,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("Model", None, NodeKind::Root));
        Self {
            nodes,
            root,
            stories: Vec::new(),
            axes: Vec::new(),
            index: FxHashMap::default(),
            layout: StoryLayout::default(),
            annotations: Vec::new(),
            label_size: 16.0,
            shared: SharedMaterials::default(),
        }
    }

    fn attach(&mut self, parent: NodeKey, node: SceneNode) -> NodeKey {
        let key = self.nodes.insert(node);
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(key);
        }
        key
    }

    /// Pixel height of axis labels created from now on
    pub fn set_label_size(&mut self, size: f32) {
        self.label_size = size;
    }

    pub fn add_light(&mut self, light: LightDesc) -> NodeKey {
        let node = SceneNode::new("Light", Some(self.root), NodeKind::Light(light));
        self.attach(self.root, node)
    }

    pub fn lights(&self) -> Vec<LightDesc> {
        self.children(self.root)
            .filter_map(|key| match &self.nodes[key].kind {
                NodeKind::Light(light) => Some(*light),
                _ => None,
            })
            .collect()
    }

    fn children(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes
            .get(key)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn element(&self, key: NodeKey) -> Option<&ElementNode> {
        match &self.nodes.get(key)?.kind {
            NodeKind::Element(element) => Some(element.as_ref()),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, key: NodeKey) -> Option<&mut ElementNode> {
        match &mut self.nodes.get_mut(key)?.kind {
            NodeKind::Element(element) => Some(element.as_mut()),
            _ => None,
        }
    }

    /// All element meshes with their keys
    pub fn elements(&self) -> impl Iterator<Item = (NodeKey, &ElementNode)> {
        self.nodes.iter().filter_map(|(key, node)| match &node.kind {
            NodeKind::Element(element) => Some((key, element.as_ref())),
            _ => None,
        })
    }

    pub fn layout(&self) -> &StoryLayout {
        &self.layout
    }

    pub fn story_count(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.axes.is_empty()
    }

    /// Number of nodes, root and lights included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn story_key(&self, index: usize) -> Option<NodeKey> {
        self.stories.get(index).copied()
    }

    pub fn story_visible(&self, index: usize) -> bool {
        self.story_key(index)
            .and_then(|key| self.nodes.get(key))
            .is_some_and(|node| node.visible)
    }

    pub fn set_story_visible(&mut self, index: usize, visible: bool) {
        if let Some(node) = self.story_key(index).and_then(|key| self.nodes.get_mut(key)) {
            node.visible = visible;
        }
    }

    /// Visibility of every story group, in story order
    pub fn visibility(&self) -> Vec<bool> {
        (0..self.stories.len()).map(|i| self.story_visible(i)).collect()
    }

    pub fn set_visibility(&mut self, visibility: &[bool]) {
        for (i, &visible) in visibility.iter().enumerate() {
            self.set_story_visible(i, visible);
        }
    }

    /// Meshes of an element in one story
    pub fn meshes_of(&self, story: usize, id: &ElementId) -> &[NodeKey] {
        self.index
            .get(&(story, id.clone()))
            .map(|keys| keys.as_slice())
            .unwrap_or(&[])
    }

    /// Stories containing an element, in story order
    pub fn stories_with(&self, id: &ElementId) -> Vec<usize> {
        (0..self.stories.len())
            .filter(|&story| !self.meshes_of(story, id).is_empty())
            .collect()
    }

    /// Replace the scene content with freshly built geometry. Expects a
    /// cleared graph; lights are kept.
    pub fn populate<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        library: &MaterialLibrary,
        geometry: ModelGeometry,
        with_labels: bool,
    ) {
        let ModelGeometry {
            layout,
            stories,
            axes,
            ..
        } = geometry;

        for story in stories {
            let node = SceneNode::new(
                story.group.clone(),
                Some(self.root),
                NodeKind::Story {
                    index: story.index,
                    name: story.name.clone(),
                },
            );
            let story_key = self.attach(self.root, node);
            self.stories.push(story_key);

            for element in story.elements {
                self.add_element(backend, library, story_key, story.index, element);
            }
        }

        self.layout = layout;
        self.annotations = axes;
        self.build_axes(backend, library, with_labels);

        tracing::debug!(
            stories = self.stories.len(),
            nodes = self.nodes.len(),
            "Scene populated"
        );
    }

    fn add_element<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        library: &MaterialLibrary,
        story_key: NodeKey,
        story: usize,
        element: ElementMesh,
    ) {
        let name = element.debug_name();
        let ElementMesh {
            id,
            part,
            mesh,
            properties,
        } = element;

        let geometry = backend.create_geometry(&GeometryData::Triangles {
            positions: &mesh.positions,
            normals: &mesh.normals,
            indices: &mesh.indices,
        });
        let material = self.shared.surface(backend, library, id.category);

        let node = ElementNode {
            id: id.clone(),
            part,
            story,
            bounds: mesh.bounds(),
            mesh,
            geometry,
            material,
            assigned: material,
            owns_material: false,
            properties,
            outline: None,
        };
        let key = self.attach(
            story_key,
            SceneNode::new(name, Some(story_key), NodeKind::Element(Box::new(node))),
        );
        self.index.entry((story, id)).or_default().push(key);
    }

    fn build_axes<B: RenderBackend>(&mut self, backend: &mut B, library: &MaterialLibrary, with_labels: bool) {
        let annotations = std::mem::take(&mut self.annotations);
        for axis in &annotations {
            if let Some((start, end)) = axis.line {
                let positions = [
                    start.x as f32,
                    start.y as f32,
                    start.z as f32,
                    end.x as f32,
                    end.y as f32,
                    end.z as f32,
                ];
                let geometry = backend.create_geometry(&GeometryData::Lines {
                    positions: &positions,
                });
                SharedMaterials::overlay(&mut self.shared.axis_line, backend, &library.axis_line);
                let node = SceneNode::new(
                    format!("Axis_{}", axis.label),
                    Some(self.root),
                    NodeKind::AxisLine { geometry },
                );
                let key = self.attach(self.root, node);
                self.axes.push(key);
            }

            if !with_labels {
                continue;
            }
            for anchor in &axis.label_anchors {
                let geometry = backend.create_geometry(&GeometryData::Label {
                    text: &axis.label,
                    anchor: [anchor.x as f32, anchor.y as f32, anchor.z as f32],
                    size: self.label_size,
                });
                SharedMaterials::overlay(&mut self.shared.axis_label, backend, &library.axis_label);
                let mut node = SceneNode::new(
                    format!("AxisLabel_{}", axis.label),
                    Some(self.root),
                    NodeKind::AxisLabel { geometry },
                );
                node.render_order = i32::MAX;
                let key = self.attach(self.root, node);
                self.axes.push(key);
            }
        }
        self.annotations = annotations;
    }

    /// Discard axis annotation nodes and draw them again
    pub fn rebuild_axes<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        library: &MaterialLibrary,
        with_labels: bool,
    ) {
        for key in std::mem::take(&mut self.axes) {
            self.remove_subtree(backend, key);
        }
        self.build_axes(backend, library, with_labels);
    }

    /// Number of axis label sprites in the scene
    pub fn axis_label_count(&self) -> usize {
        self.axes
            .iter()
            .filter(|&&key| matches!(self.nodes[key].kind, NodeKind::AxisLabel { .. }))
            .count()
    }

    /// Release and remove a node and everything below it. Returns the number
    /// of resources released.
    fn remove_subtree<B: RenderBackend>(&mut self, backend: &mut B, key: NodeKey) -> Released {
        let mut released = Released::default();
        let mut stack = vec![key];
        if let Some(parent) = self.nodes.get(key).and_then(|node| node.parent) {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.children.retain(|&child| child != key);
            }
        }

        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.remove(key) else {
                continue;
            };
            stack.extend(node.children);
            match node.kind {
                NodeKind::Element(element) => {
                    backend.release_geometry(element.geometry);
                    released.geometries += 1;
                    if element.owns_material {
                        backend.release_material(element.assigned);
                        released.materials += 1;
                    }
                }
                NodeKind::Outline { geometry }
                | NodeKind::AxisLine { geometry }
                | NodeKind::AxisLabel { geometry } => {
                    backend.release_geometry(geometry);
                    released.geometries += 1;
                }
                NodeKind::Root | NodeKind::Story { .. } | NodeKind::Light(_) => {}
            }
        }
        released
    }

    /// Remove everything but the root and lights, releasing every geometry
    /// and material the graph created
    pub fn clear<B: RenderBackend>(&mut self, backend: &mut B) -> Released {
        let doomed: Vec<NodeKey> = self
            .children(self.root)
            .filter(|&key| !matches!(self.nodes[key].kind, NodeKind::Light(_)))
            .collect();

        let mut released = Released::default();
        for key in doomed {
            let r = self.remove_subtree(backend, key);
            released.geometries += r.geometries;
            released.materials += r.materials;
        }

        let shared = [
            self.shared.surfaces.len(),
            self.shared.outline.is_some() as usize,
            self.shared.axis_line.is_some() as usize,
            self.shared.axis_label.is_some() as usize,
        ];
        released.materials += shared.iter().sum::<usize>();
        self.shared.release(backend);

        self.stories.clear();
        self.axes.clear();
        self.index.clear();
        self.annotations.clear();
        self.layout = StoryLayout::default();

        tracing::debug!(
            geometries = released.geometries,
            materials = released.materials,
            "Scene cleared"
        );
        released
    }

    /// Give every element its default material, or a recolored copy when its
    /// story has an entry in `colors`. Shared base copies are replaced too,
    /// so no earlier recoloring survives. Highlighted meshes keep drawing the
    /// highlight and restore to the new material.
    pub fn apply_colors<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        library: &MaterialLibrary,
        colors: &FxHashMap<usize, Color>,
    ) {
        let previous: SmallVec<[MaterialHandle; 7]> =
            self.shared.surfaces.drain(..).map(|(_, handle)| handle).collect();

        for node in self.nodes.values_mut() {
            let NodeKind::Element(element) = &mut node.kind else {
                continue;
            };
            if element.owns_material {
                backend.release_material(element.assigned);
            }

            let base = library.base(element.id.category);
            let (assigned, owned) = match colors.get(&element.story) {
                Some(color) => (backend.create_material(&base.recolored(*color)), true),
                None => (self.shared.surface(backend, library, element.id.category), false),
            };

            let highlighted = element.material != element.assigned;
            element.assigned = assigned;
            element.owns_material = owned;
            if !highlighted {
                element.material = assigned;
            }
        }

        for handle in previous {
            backend.release_material(handle);
        }
    }

    /// Add an outline overlay next to an element mesh
    pub fn add_outline<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        library: &MaterialLibrary,
        key: NodeKey,
        threshold_degrees: f64,
        render_order: i32,
    ) {
        let Some(element) = self.element(key) else {
            return;
        };
        if element.outline.is_some() {
            return;
        }
        let positions = feature_edges(&element.mesh, threshold_degrees);
        let name = format!("Outline_{}", element.id);
        let Some(parent) = self.nodes.get(key).and_then(|node| node.parent) else {
            return;
        };

        let geometry = backend.create_geometry(&GeometryData::Lines {
            positions: &positions,
        });
        SharedMaterials::overlay(&mut self.shared.outline, backend, &library.outline);

        let mut node = SceneNode::new(name, Some(parent), NodeKind::Outline { geometry });
        node.render_order = render_order;
        let outline = self.attach(parent, node);
        if let Some(element) = self.element_mut(key) {
            element.outline = Some(outline);
        }
    }

    /// Remove every outline overlay
    pub fn remove_outlines<B: RenderBackend>(&mut self, backend: &mut B) -> usize {
        let outlines: Vec<(NodeKey, NodeKey)> = self
            .elements()
            .filter_map(|(key, element)| element.outline.map(|outline| (key, outline)))
            .collect();
        for &(element, outline) in &outlines {
            self.remove_subtree(backend, outline);
            if let Some(element) = self.element_mut(element) {
                element.outline = None;
            }
        }
        outlines.len()
    }

    pub fn outline_count(&self) -> usize {
        self.elements().filter(|(_, e)| e.outline.is_some()).count()
    }

    /// Element meshes whose story group is visible
    pub fn visible_elements(&self) -> impl Iterator<Item = (NodeKey, &ElementNode)> {
        self.elements()
            .filter(move |(_, element)| self.story_visible(element.story))
    }

    /// Bounds of the meshes in visible stories
    pub fn visible_bounds(&self) -> Aabb {
        self.visible_elements()
            .fold(Aabb::empty(), |acc, (_, e)| acc.union(&e.bounds))
    }

    /// Bounds of every element mesh
    pub fn bounds(&self) -> Aabb {
        self.elements()
            .fold(Aabb::empty(), |acc, (_, e)| acc.union(&e.bounds))
    }

    /// Draw list for the current visibility state
    pub fn draw_items(&self) -> Vec<DrawItem> {
        let mut items = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = vec![self.root];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let item = match &node.kind {
                NodeKind::Element(element) => Some((element.geometry, Some(element.material))),
                NodeKind::Outline { geometry } => Some((*geometry, self.shared.outline)),
                NodeKind::AxisLine { geometry } => Some((*geometry, self.shared.axis_line)),
                NodeKind::AxisLabel { geometry } => Some((*geometry, self.shared.axis_label)),
                NodeKind::Root | NodeKind::Story { .. } | NodeKind::Light(_) => None,
            };
            if let Some((geometry, Some(material))) = item {
                items.push(DrawItem {
                    geometry,
                    material,
                    render_order: node.render_order,
                });
            }
            stack.extend(node.children.iter().rev().copied());
        }
        items.sort_by_key(|item| item.render_order);
        items
    }

    /// Element names per story for tree views
    pub fn element_tree(&self) -> Vec<StoryTree> {
        self.stories
            .iter()
            .filter_map(|&story_key| {
                let node = self.nodes.get(story_key)?;
                let NodeKind::Story { index, name } = &node.kind else {
                    return None;
                };
                let mut elements: BTreeMap<ElementCategory, Vec<String>> = BTreeMap::new();
                for child in &node.children {
                    let Some(element) = self.element(*child) else {
                        continue;
                    };
                    let names = elements.entry(element.id.category).or_default();
                    let display = element.id.display_name();
                    if !names.contains(&display) {
                        names.push(display);
                    }
                }
                Some(StoryTree {
                    name: name.clone(),
                    group: node.name.clone(),
                    visible: self.story_visible(*index),
                    elements,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::config::ViewerConfig;
    use structview_core::Model;
    use structview_geometry::GeometryBuilder;

    const MODEL: &str = r#"{
        "AxesIntersections": { "A-1": { "X": 0, "Y": 0 }, "A-2": { "X": 0, "Y": 400 } },
        "Stories": [
            {
                "Height": 300,
                "Nodes": [ { "ID": 1, "X": 0, "Y": 0 }, { "ID": 2, "X": 0, "Y": 400 } ],
                "Beams": [ { "NodeI": 1, "NodeJ": 2, "Label": "B1" } ],
                "Walls": [ {
                    "NodeI": 1, "NodeJ": 2, "Label": "W1",
                    "Spacings": [ { "StartX": 100, "EndX": 200, "StartY": 0, "EndY": 200 } ]
                } ]
            },
            {
                "Height": 300,
                "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ],
                "Columns": [ { "NodeID": 1, "Label": "C1" } ]
            }
        ]
    }"#;

    fn populated(backend: &mut HeadlessBackend) -> (SceneGraph, MaterialLibrary) {
        let library = MaterialLibrary::from_config(&ViewerConfig::default()).unwrap();
        let model = Model::from_json(MODEL).unwrap();
        let geometry = GeometryBuilder::default().build_model(&model);
        let mut scene = SceneGraph::new();
        scene.add_light(crate::backend::default_lights()[0]);
        scene.populate(backend, &library, geometry, true);
        (scene, library)
    }

    #[test]
    fn test_lookup_by_typed_id() {
        let mut backend = HeadlessBackend::new();
        let (scene, _) = populated(&mut backend);

        let wall = "Wall_W1".parse::<ElementId>().unwrap();
        assert!(scene.meshes_of(0, &wall).len() > 1);
        assert!(scene.meshes_of(1, &wall).is_empty());

        let column = "Column_C1".parse::<ElementId>().unwrap();
        assert_eq!(scene.stories_with(&column), vec![1]);
        assert_eq!(scene.axis_label_count(), 4);
    }

    #[test]
    fn test_clear_releases_everything_once_and_keeps_lights() {
        let mut backend = HeadlessBackend::new();
        let (mut scene, library) = populated(&mut backend);

        let first = scene.elements().next().map(|(k, _)| k).unwrap();
        scene.add_outline(&mut backend, &library, first, 15.0, 999);
        let mut colors = FxHashMap::default();
        colors.insert(0, Color::new(1.0, 0.0, 0.0));
        scene.apply_colors(&mut backend, &library, &colors);

        scene.clear(&mut backend);
        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.live_materials(), 0);
        assert_eq!(backend.invalid_releases, 0);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn test_hidden_story_is_not_drawn() {
        let mut backend = HeadlessBackend::new();
        let (mut scene, _) = populated(&mut backend);
        let all = scene.draw_items().len();

        scene.set_story_visible(1, false);
        assert_eq!(scene.draw_items().len(), all - 1);
        assert_eq!(scene.visibility(), vec![true, false]);
    }

    #[test]
    fn test_element_tree_lists_walls_once() {
        let mut backend = HeadlessBackend::new();
        let (scene, _) = populated(&mut backend);
        let tree = scene.element_tree();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "GroundFloor");
        assert_eq!(tree[0].elements[&ElementCategory::Wall], vec!["Wall_W1".to_string()]);
        assert_eq!(tree[1].elements[&ElementCategory::Column], vec!["Column_C1".to_string()]);
    }
}
