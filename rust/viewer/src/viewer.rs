// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer controller
//!
//! [`Viewer`] owns all mutable viewer state in one [`ViewerState`], created
//! with the viewer and dropped on [`Viewer::teardown`]. Every host call is an
//! explicit, synchronous operation; calls after teardown return
//! [`Error::TornDown`].

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::Serialize;
use structview_core::{ElementId, Model, PlanBounds};
use structview_geometry::{Aabb, BuildStats, GeometryBuilder, Point3, Skipped};

use crate::backend::{default_lights, Frame, MaterialHandle, RenderBackend};
use crate::camera::{ActiveCamera, CameraRig, ViewPreset};
use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::material::{Color, MaterialLibrary};
use crate::picking::pick;
use crate::scene::{SceneGraph, StoryTree};
use crate::selection::{SelectionState, ViewerEvent};
use crate::view_mode::{ViewMode, ViewModeState};

/// Outcome of a model render
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub stories: Vec<String>,
    pub stats: BuildStats,
    pub skipped: Vec<Skipped>,
}

/// Mouse button that started a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Picks on click, orbits on drag
    Primary,
    /// Pans on drag
    Secondary,
}

#[derive(Debug, Clone, Copy)]
struct PointerPress {
    button: PointerButton,
    down: (f64, f64),
    last: (f64, f64),
    dragged: bool,
}

/// Mutable state of a live viewer
#[derive(Debug)]
pub struct ViewerState {
    scene: SceneGraph,
    library: MaterialLibrary,
    highlight: MaterialHandle,
    cameras: CameraRig,
    selection: SelectionState,
    view_mode: ViewModeState,
    model: Option<Model>,
    pointer: Option<PointerPress>,
    font_ready: bool,
}

impl ViewerState {
    fn new<B: RenderBackend>(backend: &mut B, config: &ViewerConfig) -> Result<Self> {
        let library = MaterialLibrary::from_config(config)?;
        let highlight = backend.create_material(&library.highlight);
        let mut scene = SceneGraph::new();
        scene.set_label_size(config.label_size);
        for light in default_lights() {
            scene.add_light(light);
        }
        Ok(Self {
            scene,
            library,
            highlight,
            cameras: CameraRig::new(config),
            selection: SelectionState::new(),
            view_mode: ViewModeState::new(),
            model: None,
            pointer: None,
            font_ready: false,
        })
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn cameras(&self) -> &CameraRig {
        &self.cameras
    }

    pub fn highlight(&self) -> MaterialHandle {
        self.highlight
    }

    /// Frame the visible stories, or the whole model when none is visible
    fn fit(&mut self, config: &ViewerConfig) {
        let mut bounds = self.scene.visible_bounds();
        if !bounds.is_valid() {
            bounds = self.scene.bounds();
        }
        if !bounds.is_valid() {
            // Nothing built: frame the plan footprint of nodes and axes
            if let Some(footprint) = self.model.as_ref().map(PlanBounds::from_model) {
                if footprint.is_valid() {
                    bounds = Aabb::new(
                        Point3::new(footprint.min_x, 0.0, footprint.min_y),
                        Point3::new(footprint.max_x, 0.0, footprint.max_y),
                    );
                }
            }
        }
        self.cameras.fit(&bounds, config);
    }

    /// Outline overlays on every visible mesh in 2D, none in 3D
    fn refresh_outlines<B: RenderBackend>(&mut self, backend: &mut B, config: &ViewerConfig) {
        self.scene.remove_outlines(backend);
        if !self.view_mode.is_plan() {
            return;
        }
        let keys: Vec<_> = self.scene.visible_elements().map(|(key, _)| key).collect();
        for key in keys {
            self.scene.add_outline(
                backend,
                &self.library,
                key,
                config.outline_threshold_degrees,
                config.outline_render_order,
            );
        }
    }

    /// Deselect when the selected element's story is no longer visible
    /// Story and element under a viewport point
    fn hit(&self, x: f64, y: f64, config: &ViewerConfig) -> Option<(usize, ElementId)> {
        let ray = self.cameras.ray_at(x, y)?;
        let hit = pick(&self.scene, &ray, config.picking_policy)?;
        let element = self.scene.element(hit.key)?;
        Some((element.story, element.id.clone()))
    }

    fn drop_hidden_selection(&mut self) {
        let hidden = self
            .selection
            .current()
            .is_some_and(|s| !self.scene.story_visible(s.story));
        if hidden {
            self.selection.clear(&mut self.scene);
        }
    }

    fn enter_plan<B: RenderBackend>(&mut self, backend: &mut B, config: &ViewerConfig) {
        let story = self.view_mode.enter_plan(&mut self.scene);
        self.drop_hidden_selection();
        self.cameras.use_orthographic();
        self.refresh_outlines(backend, config);
        self.fit(config);
        tracing::debug!(story = ?story, "Entered 2D view");
    }

    fn exit_plan<B: RenderBackend>(&mut self, backend: &mut B, config: &ViewerConfig) {
        self.view_mode.exit_plan(&mut self.scene);
        self.drop_hidden_selection();
        self.scene.remove_outlines(backend);
        self.cameras.use_perspective();
        self.cameras
            .apply_preset(ViewPreset::Iso, &self.scene.visible_bounds(), config);
        self.fit(config);
        tracing::debug!("Entered 3D view");
    }

    /// Show a single story in 2D
    fn switch_plan_story<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        config: &ViewerConfig,
        story: usize,
    ) {
        if self.view_mode.plan_story() == Some(story) && self.scene.story_visible(story) {
            return;
        }
        self.view_mode.show_only(&mut self.scene, story);
        self.drop_hidden_selection();
        self.refresh_outlines(backend, config);
        self.fit(config);
    }

    fn draw<B: RenderBackend>(&self, backend: &mut B) {
        let camera = self.cameras.camera();
        let mut frame = Frame::new(
            &camera.view_matrix(),
            &camera.projection_matrix(),
            &camera.position,
        );
        frame.lights = self.scene.lights();
        frame.items = self.scene.draw_items();
        backend.draw(&frame);
    }
}

/// Interactive viewer over a render backend
#[derive(Debug)]
pub struct Viewer<B: RenderBackend> {
    backend: B,
    config: ViewerConfig,
    builder: GeometryBuilder,
    state: Option<ViewerState>,
}

impl<B: RenderBackend> Viewer<B> {
    pub fn new(mut backend: B, config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let state = ViewerState::new(&mut backend, &config)?;
        Ok(Self {
            builder: GeometryBuilder::new(config.geometry.clone()),
            backend,
            config,
            state: Some(state),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> Result<&ViewerState> {
        self.state.as_ref().ok_or(Error::TornDown)
    }

    fn parts(&mut self) -> Result<(&mut B, &ViewerConfig, &mut ViewerState)> {
        let state = self.state.as_mut().ok_or(Error::TornDown)?;
        Ok((&mut self.backend, &self.config, state))
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.is_none()
    }

    /// Replace the configuration. Materials are refreshed in place and a
    /// loaded model is rebuilt with the new geometry settings.
    pub fn set_config(&mut self, config: ViewerConfig) -> Result<()> {
        config.validate()?;
        let library = MaterialLibrary::from_config(&config)?;
        self.builder = GeometryBuilder::new(config.geometry.clone());
        self.config = config;

        let (backend, config, state) = self.parts()?;
        backend.update_material(state.highlight, &library.highlight);
        state.library = library;
        state.scene.set_label_size(config.label_size);

        let (width, height) = state.cameras.viewport();
        let active = state.cameras.active;
        state.cameras = CameraRig::new(config);
        state.cameras.set_viewport(width, height, config);
        if active == ActiveCamera::Orthographic {
            state.cameras.use_orthographic();
        }

        match state.model.take() {
            Some(model) => self.render(&model).map(|_| ()),
            None => {
                let (backend, _, state) = self.parts()?;
                state.draw(backend);
                Ok(())
            }
        }
    }

    /// Rebuild the scene from `model`: clear, build story by story, frame.
    pub fn render(&mut self, model: &Model) -> Result<RenderReport> {
        let builder = &self.builder;
        let state = self.state.as_mut().ok_or(Error::TornDown)?;
        let backend = &mut self.backend;
        let config = &self.config;

        state.selection.forget();
        state.pointer = None;
        state.scene.clear(backend);
        state.view_mode.reset();

        let geometry = builder.build_model(model);
        let report = RenderReport {
            stories: geometry.layout.names(),
            stats: geometry.stats.clone(),
            skipped: geometry.skipped.clone(),
        };
        state
            .scene
            .populate(backend, &state.library, geometry, state.font_ready);
        state.model = Some(model.clone());

        if state.view_mode.is_plan() && state.scene.story_count() > 0 {
            state.view_mode.show_only(&mut state.scene, 0);
            state.refresh_outlines(backend, config);
        }
        state.fit(config);
        state.draw(backend);

        tracing::info!(
            stories = report.stories.len(),
            meshes = report.stats.meshes,
            skipped = report.stats.skipped,
            "Model rendered"
        );
        Ok(report)
    }

    /// Parse and render a model. A model that fails validation leaves the
    /// scene empty.
    pub fn render_json(&mut self, json: &str) -> Result<RenderReport> {
        match Model::from_json(json) {
            Ok(model) => self.render(&model),
            Err(error) => {
                tracing::warn!(error = %error, "Model rejected");
                self.clear_model()?;
                Err(error.into())
            }
        }
    }

    /// Remove the model, keeping lights and the camera
    pub fn clear_model(&mut self) -> Result<()> {
        let (backend, _, state) = self.parts()?;
        state.selection.forget();
        state.scene.clear(backend);
        state.view_mode.reset();
        state.model = None;
        state.draw(backend);
        Ok(())
    }

    pub fn has_model(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.model.is_some())
    }

    /// New drawing buffer size; redraws at once
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (backend, config, state) = self.parts()?;
        backend.resize(width, height);
        state.cameras.set_viewport(width, height, config);
        state.draw(backend);
        Ok(())
    }

    /// Reframe the model: isometric in 3D, top-down in 2D
    pub fn reset_view(&mut self) -> Result<()> {
        let (backend, config, state) = self.parts()?;
        if !state.view_mode.is_plan() {
            let bounds = state.scene.visible_bounds();
            state.cameras.apply_preset(ViewPreset::Iso, &bounds, config);
        }
        state.fit(config);
        state.draw(backend);
        Ok(())
    }

    /// Jump to a named preset; in 2D this refits the plan instead
    pub fn set_view(&mut self, preset: &str) -> Result<()> {
        let preset: ViewPreset = preset.parse()?;
        let (backend, config, state) = self.parts()?;
        if state.view_mode.is_plan() {
            state.fit(config);
        } else {
            let mut bounds = state.scene.visible_bounds();
            if !bounds.is_valid() {
                bounds = state.scene.bounds();
            }
            state.cameras.apply_preset(preset, &bounds, config);
        }
        state.draw(backend);
        Ok(())
    }

    /// Show exactly the named stories. Unknown names are ignored. In 2D the
    /// first known name becomes the single visible story.
    pub fn filter_stories<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let (backend, config, state) = self.parts()?;
        let mut wanted = vec![false; state.scene.story_count()];
        let mut first = None;
        for name in names {
            let name = name.as_ref();
            match state.scene.layout().index_of(name) {
                Some(index) if index < wanted.len() => {
                    wanted[index] = true;
                    if first.is_none() {
                        first = Some(index);
                    }
                }
                _ => tracing::warn!(story = %name, "Unknown story in filter"),
            }
        }

        if state.view_mode.is_plan() {
            if let Some(story) = first {
                state.switch_plan_story(backend, config, story);
            }
        } else {
            state.scene.set_visibility(&wanted);
            state.drop_hidden_selection();
        }
        state.draw(backend);
        Ok(())
    }

    /// Flip one story's visibility; in 2D the story becomes the one shown.
    /// Returns the story's new visibility.
    pub fn toggle_story(&mut self, name: &str) -> Result<bool> {
        let (backend, config, state) = self.parts()?;
        let index = state
            .scene
            .layout()
            .index_of(name)
            .ok_or_else(|| Error::UnknownStory(name.to_string()))?;

        if state.view_mode.is_plan() {
            state.switch_plan_story(backend, config, index);
        } else {
            let visible = !state.scene.story_visible(index);
            state.scene.set_story_visible(index, visible);
            state.drop_hidden_selection();
        }
        state.draw(backend);
        Ok(state.scene.story_visible(index))
    }

    /// Human-readable story names, in story order
    pub fn story_names(&self) -> Result<Vec<String>> {
        Ok(self.state()?.scene.layout().names())
    }

    /// Names of the visible stories, in story order
    pub fn visible_stories(&self) -> Result<Vec<String>> {
        let state = self.state()?;
        Ok(state
            .scene
            .layout()
            .iter()
            .filter(|entry| state.scene.story_visible(entry.index))
            .map(|entry| entry.name.clone())
            .collect())
    }

    pub fn element_tree(&self) -> Result<Vec<StoryTree>> {
        Ok(self.state()?.scene.element_tree())
    }

    pub fn view_mode(&self) -> Result<ViewMode> {
        Ok(self.state()?.view_mode.mode())
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<()> {
        let (backend, config, state) = self.parts()?;
        if state.view_mode.mode() == mode {
            return Ok(());
        }
        match mode {
            ViewMode::TwoD => state.enter_plan(backend, config),
            ViewMode::ThreeD => state.exit_plan(backend, config),
        }
        state.draw(backend);
        Ok(())
    }

    pub fn toggle_view_mode(&mut self) -> Result<ViewMode> {
        let mode = self.view_mode()?.toggled();
        self.set_view_mode(mode)?;
        Ok(mode)
    }

    /// Recolor stories by human-readable name. `None` or an empty map puts
    /// every story back on the default materials.
    pub fn update_material_colors(&mut self, colors: Option<&BTreeMap<String, String>>) -> Result<()> {
        let (backend, _, state) = self.parts()?;
        let mut by_story: FxHashMap<usize, Color> = FxHashMap::default();
        for (name, hex) in colors.into_iter().flatten() {
            let Some(index) = state.scene.layout().index_of(name) else {
                tracing::warn!(story = %name, "Color for unknown story ignored");
                continue;
            };
            match Color::from_hex(hex) {
                Ok(color) => {
                    by_story.insert(index, color);
                }
                Err(error) => tracing::warn!(story = %name, error = %error, "Story color ignored"),
            }
        }

        state
            .scene
            .apply_colors(backend, &state.library, &by_story);
        state.draw(backend);
        Ok(())
    }

    /// Select an element by display name (`"<Category>_<Label>"`), preferring
    /// a visible story. The element's story is brought into view if needed.
    pub fn select_element_by_name(&mut self, name: &str) -> Result<()> {
        let id: ElementId = name
            .parse()
            .map_err(|_| Error::UnknownElement(name.to_string()))?;
        let state = self.state()?;
        let stories = state.scene.stories_with(&id);
        let story = stories
            .iter()
            .copied()
            .find(|&s| state.scene.story_visible(s))
            .or_else(|| stories.first().copied())
            .ok_or_else(|| Error::UnknownElement(name.to_string()))?;
        self.select_in(story, &id)
    }

    /// Select an element of a named story
    pub fn select_element_in_story(&mut self, story: &str, name: &str) -> Result<()> {
        let id: ElementId = name
            .parse()
            .map_err(|_| Error::UnknownElement(name.to_string()))?;
        let index = self
            .state()?
            .scene
            .layout()
            .index_of(story)
            .ok_or_else(|| Error::UnknownStory(story.to_string()))?;
        self.select_in(index, &id)
    }

    fn select_in(&mut self, story: usize, id: &ElementId) -> Result<()> {
        let (backend, config, state) = self.parts()?;
        if state.scene.meshes_of(story, id).is_empty() {
            return Err(Error::UnknownElement(id.display_name()));
        }

        if state.view_mode.is_plan() {
            state.switch_plan_story(backend, config, story);
        } else if !state.scene.story_visible(story) {
            state.scene.set_story_visible(story, true);
        }

        let highlight = state.highlight;
        state.selection.select(&mut state.scene, highlight, story, id);
        state.draw(backend);
        Ok(())
    }

    /// Returns whether anything was selected
    pub fn clear_selection(&mut self) -> Result<bool> {
        let (backend, _, state) = self.parts()?;
        let cleared = state.selection.clear(&mut state.scene);
        if cleared {
            state.draw(backend);
        }
        Ok(cleared)
    }

    /// Story name and display name of the selected element
    pub fn selected(&self) -> Option<(String, String)> {
        let state = self.state.as_ref()?;
        let selection = state.selection.current()?;
        let story = state.scene.layout().name_of(selection.story)?;
        Some((story.to_string(), selection.id.display_name()))
    }

    /// Pick at a viewport pixel. A miss clears the selection.
    pub fn pick_at(&mut self, x: f64, y: f64) -> Result<Option<ElementId>> {
        let (backend, config, state) = self.parts()?;
        let picked = state.hit(x, y, config);

        match &picked {
            Some((story, id)) => {
                let highlight = state.highlight;
                state.selection.select(&mut state.scene, highlight, *story, id);
            }
            None => {
                state.selection.clear(&mut state.scene);
            }
        }
        state.draw(backend);
        Ok(picked.map(|(_, id)| id))
    }

    /// Element under a viewport point, leaving the selection untouched
    pub fn hit_test(&self, x: f64, y: f64) -> Result<Option<ElementId>> {
        let state = self.state()?;
        Ok(state.hit(x, y, &self.config).map(|(_, id)| id))
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, button: PointerButton) -> Result<()> {
        let (_, _, state) = self.parts()?;
        state.pointer = Some(PointerPress {
            button,
            down: (x, y),
            last: (x, y),
            dragged: false,
        });
        Ok(())
    }

    /// Drag with the pressed button: orbit, or pan when orbiting is off
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<()> {
        let (_, config, state) = self.parts()?;
        let Some(press) = state.pointer.as_mut() else {
            return Ok(());
        };
        let (dx, dy) = (x - press.last.0, y - press.last.1);
        press.last = (x, y);
        let travel = (x - press.down.0).hypot(y - press.down.1);
        if travel > config.drag_threshold {
            press.dragged = true;
        }

        let pan = press.button == PointerButton::Secondary || !state.cameras.controls.enable_rotate;
        if pan {
            state.cameras.pan(dx, dy);
        } else {
            state.cameras.rotate(dx, dy);
        }
        Ok(())
    }

    /// End a press. A primary press that did not drag picks at the point
    /// where it went down.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<Option<ElementId>> {
        let (_, config, state) = self.parts()?;
        let Some(press) = state.pointer.take() else {
            return Ok(None);
        };
        let travel = (x - press.down.0).hypot(y - press.down.1);
        if press.button != PointerButton::Primary || press.dragged || travel > config.drag_threshold {
            return Ok(None);
        }
        self.pick_at(press.down.0, press.down.1)
    }

    pub fn rotate(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.parts()?.2.cameras.rotate(dx, dy);
        Ok(())
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.parts()?.2.cameras.pan(dx, dy);
        Ok(())
    }

    /// Positive deltas zoom out
    pub fn zoom(&mut self, delta: f64) -> Result<()> {
        self.parts()?.2.cameras.zoom(delta);
        Ok(())
    }

    /// Label font finished loading. The first success rebuilds the axis
    /// annotation with labels; a failure keeps drawing without them.
    pub fn font_loaded(&mut self, loaded: bool) -> Result<()> {
        let (backend, _, state) = self.parts()?;
        if !loaded {
            tracing::warn!("Label font unavailable, axis labels disabled");
            return Ok(());
        }
        if state.font_ready {
            return Ok(());
        }
        state.font_ready = true;
        state.scene.rebuild_axes(backend, &state.library, true);
        state.draw(backend);
        Ok(())
    }

    /// One render-loop step: advance the controls, then draw. Returns
    /// whether the camera moved.
    pub fn frame(&mut self) -> Result<bool> {
        let (backend, _, state) = self.parts()?;
        let moved = state.cameras.update();
        state.draw(backend);
        Ok(moved)
    }

    /// Queued host events, oldest first
    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        self.state
            .as_mut()
            .map(|state| state.selection.take_events())
            .unwrap_or_default()
    }

    /// Release every backend resource and drop the viewer state. Returns
    /// false when already torn down.
    pub fn teardown(&mut self) -> bool {
        let Some(mut state) = self.state.take() else {
            return false;
        };
        let released = state.scene.clear(&mut self.backend);
        self.backend.release_material(state.highlight);
        tracing::info!(
            geometries = released.geometries,
            materials = released.materials + 1,
            "Viewer torn down"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    const TWO_COLUMNS: &str = r#"{
        "AxesIntersections": {},
        "Stories": [
            { "Height": 300, "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ], "Columns": [ { "NodeID": 1, "Label": "C1" } ] },
            { "Height": 300, "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ], "Columns": [ { "NodeID": 1, "Label": "C1" } ] }
        ]
    }"#;

    fn viewer() -> Viewer<HeadlessBackend> {
        let mut viewer = Viewer::new(HeadlessBackend::new(), ViewerConfig::default()).unwrap();
        viewer.handle_resize(800, 600).unwrap();
        viewer.render_json(TWO_COLUMNS).unwrap();
        viewer
    }

    #[test]
    fn test_invalid_model_leaves_empty_scene() {
        let mut viewer = viewer();
        let err = viewer.render_json(r#"{ "Stories": [] }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));
        assert!(!viewer.has_model());
        assert!(viewer.state().unwrap().scene().is_empty());
        assert!(viewer.story_names().unwrap().is_empty());
    }

    #[test]
    fn test_select_prefers_visible_story() {
        let mut viewer = viewer();
        viewer.toggle_story("GroundFloor").unwrap();
        viewer.select_element_by_name("Column_C1").unwrap();
        assert_eq!(
            viewer.selected(),
            Some(("Floor 1".to_string(), "Column_C1".to_string()))
        );
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let mut viewer = viewer();
        assert!(matches!(
            viewer.select_element_by_name("Column_C9"),
            Err(Error::UnknownElement(_))
        ));
        assert!(matches!(
            viewer.select_element_by_name("garbage"),
            Err(Error::UnknownElement(_))
        ));
        assert!(matches!(viewer.toggle_story("Attic"), Err(Error::UnknownStory(_))));
        assert!(matches!(viewer.set_view("diagonal"), Err(Error::UnknownPreset(_))));
    }

    #[test]
    fn test_drag_does_not_pick() {
        let mut viewer = viewer();
        viewer.pointer_down(400.0, 300.0, PointerButton::Primary).unwrap();
        viewer.pointer_move(450.0, 300.0).unwrap();
        assert_eq!(viewer.pointer_up(450.0, 300.0).unwrap(), None);
        assert!(viewer.take_events().is_empty());
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let mut viewer = viewer();
        viewer.select_element_by_name("Column_C1").unwrap();
        viewer.take_events();

        // Top-left corner of an isometric view of a lone column is empty
        viewer.pointer_down(1.0, 1.0, PointerButton::Primary).unwrap();
        assert_eq!(viewer.pointer_up(1.0, 1.0).unwrap(), None);
        assert_eq!(viewer.take_events(), vec![ViewerEvent::ObjectDeselected {}]);
        assert_eq!(viewer.selected(), None);
    }

    #[test]
    fn test_calls_after_teardown_fail() {
        let mut viewer = viewer();
        assert!(viewer.teardown());
        assert!(matches!(viewer.reset_view(), Err(Error::TornDown)));
        assert!(matches!(viewer.render_json(TWO_COLUMNS), Err(Error::TornDown)));
        assert!(viewer.take_events().is_empty());
    }

    #[test]
    fn test_model_without_elements_frames_its_nodes() {
        let mut viewer = Viewer::new(HeadlessBackend::new(), ViewerConfig::default()).unwrap();
        viewer.handle_resize(800, 600).unwrap();
        viewer
            .render_json(
                r#"{ "AxesIntersections": {},
                     "Stories": [ { "Height": 300, "Nodes": [ { "ID": 1, "X": 0, "Y": 0 },
                                                              { "ID": 2, "X": 1000, "Y": 400 } ] } ] }"#,
            )
            .unwrap();
        let target = viewer.state().unwrap().cameras().camera().target;
        assert_eq!(target, Point3::new(500.0, 0.0, 200.0));
    }
}
