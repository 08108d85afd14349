// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer behavior against the headless backend.

use std::collections::BTreeMap;

use structview_core::{ElementCategory, ElementId};
use structview_viewer::{
    Color, HeadlessBackend, MaterialLibrary, PointerButton, Viewer, ViewerConfig, ViewerEvent,
    ViewMode,
};

const BUILDING: &str = r#"{
    "AxesIntersections": {
        "A-1": { "X": 0, "Y": 0 }, "B-1": { "X": 400, "Y": 0 },
        "A-2": { "X": 0, "Y": 400 }, "B-2": { "X": 400, "Y": 400 }
    },
    "Stories": [
        {
            "Height": 300,
            "Nodes": [
                { "ID": 1, "X": 0, "Y": 0 }, { "ID": 2, "X": 400, "Y": 0 },
                { "ID": 3, "X": 400, "Y": 400 }, { "ID": 4, "X": 0, "Y": 400 }
            ],
            "Columns": [ { "NodeID": 1, "Label": "C1" } ],
            "Beams": [ { "NodeI": 1, "NodeJ": 2, "Label": "B1" } ],
            "Walls": [ {
                "NodeI": 4, "NodeJ": 3, "Label": "W1",
                "Spacings": [ { "StartX": 150, "EndX": 250, "StartY": 0, "EndY": 200 } ]
            } ],
            "Slabs": [ { "Nodes": [1, 2, 3, 4], "Label": "S1" } ]
        },
        {
            "Height": 300,
            "Nodes": [ { "ID": 1, "X": 0, "Y": 0 }, { "ID": 2, "X": 400, "Y": 0 } ],
            "Columns": [ { "NodeID": 1, "Label": "C1" } ],
            "Beams": [ { "NodeI": 1, "NodeJ": 2, "Label": "B2" } ]
        },
        {
            "Height": 300,
            "Label": "Roof",
            "Nodes": [
                { "ID": 1, "X": 0, "Y": 0 }, { "ID": 2, "X": 400, "Y": 0 },
                { "ID": 3, "X": 400, "Y": 400 }
            ],
            "Slabs": [ { "Nodes": [1, 2, 3], "Label": "R1" } ]
        }
    ]
}"#;

fn viewer() -> Viewer<HeadlessBackend> {
    let mut viewer = Viewer::new(HeadlessBackend::new(), ViewerConfig::default()).unwrap();
    viewer.handle_resize(800, 600).unwrap();
    let report = viewer.render_json(BUILDING).unwrap();
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    viewer
}

fn id(name: &str) -> ElementId {
    name.parse().unwrap()
}

/// Materials currently drawn by the meshes of an element
fn drawn(viewer: &Viewer<HeadlessBackend>, story: usize, name: &str) -> Vec<Color> {
    let state = viewer.state().unwrap();
    state
        .scene()
        .meshes_of(story, &id(name))
        .iter()
        .map(|key| {
            let handle = state.scene().element(*key).unwrap().material;
            viewer.backend().material(handle).unwrap().color
        })
        .collect()
}

#[test]
fn story_names_follow_labels_and_positions() {
    let viewer = viewer();
    assert_eq!(
        viewer.story_names().unwrap(),
        vec!["GroundFloor", "Floor 1", "Roof"]
    );
    let tree = viewer.element_tree().unwrap();
    assert_eq!(tree[2].elements[&ElementCategory::Slab], vec!["Slab_R1".to_string()]);
}

#[test]
fn selecting_another_element_restores_the_first() {
    let mut viewer = viewer();
    let column = id("Column_C1");
    let beam = id("Beam_B1");
    let (column_key, original) = {
        let scene = viewer.state().unwrap().scene();
        let key = scene.meshes_of(0, &column)[0];
        (key, scene.element(key).unwrap().material)
    };

    viewer.select_element_by_name("Column_C1").unwrap();
    let highlight = viewer.state().unwrap().highlight();
    assert_eq!(
        viewer.state().unwrap().scene().element(column_key).unwrap().material,
        highlight
    );

    viewer.select_element_by_name("Beam_B1").unwrap();
    let state = viewer.state().unwrap();
    assert_eq!(state.scene().element(column_key).unwrap().material, original);
    for key in state.scene().meshes_of(0, &beam) {
        assert_eq!(state.scene().element(*key).unwrap().material, highlight);
    }

    let highlighted = state
        .scene()
        .elements()
        .filter(|(_, e)| e.material == highlight)
        .count();
    assert_eq!(highlighted, 1);

    let names: Vec<_> = viewer.take_events().iter().map(ViewerEvent::name).collect();
    assert_eq!(names, vec!["objectSelected", "objectDeselected", "objectSelected"]);
}

#[test]
fn perforated_wall_highlights_as_one_element() {
    let mut viewer = viewer();
    viewer.select_element_by_name("Wall_W1").unwrap();

    let state = viewer.state().unwrap();
    let segments = state.scene().meshes_of(0, &id("Wall_W1"));
    assert!(segments.len() > 1);
    for key in segments {
        assert_eq!(state.scene().element(*key).unwrap().material, state.highlight());
    }

    let events = viewer.take_events();
    assert_eq!(events.len(), 1);
    let ViewerEvent::ObjectSelected { category, properties } = &events[0] else {
        panic!("expected a selection event");
    };
    assert_eq!(*category, ElementCategory::Wall);
    assert_eq!(properties.label(), "W1");
}

#[test]
fn plan_view_shows_exactly_one_story() {
    let mut viewer = viewer();
    let one_visible = |viewer: &Viewer<HeadlessBackend>| viewer.visible_stories().unwrap().len() == 1;

    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    assert!(one_visible(&viewer));
    assert_eq!(viewer.visible_stories().unwrap(), vec!["GroundFloor"]);

    viewer.toggle_story("Floor 1").unwrap();
    assert!(one_visible(&viewer));
    assert_eq!(viewer.visible_stories().unwrap(), vec!["Floor 1"]);

    viewer.filter_stories(&["Roof", "GroundFloor"]).unwrap();
    assert!(one_visible(&viewer));
    assert_eq!(viewer.visible_stories().unwrap(), vec!["Roof"]);

    viewer.filter_stories::<&str>(&[]).unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), vec!["Roof"]);

    viewer.select_element_by_name("Beam_B2").unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), vec!["Floor 1"]);
    assert_eq!(
        viewer.selected(),
        Some(("Floor 1".to_string(), "Beam_B2".to_string()))
    );

    assert_eq!(viewer.toggle_view_mode().unwrap(), ViewMode::ThreeD);
    assert_eq!(viewer.visible_stories().unwrap().len(), 3);

    // Returning to 2D shows the story last shown there
    assert_eq!(viewer.toggle_view_mode().unwrap(), ViewMode::TwoD);
    assert_eq!(viewer.visible_stories().unwrap(), vec!["Floor 1"]);

    viewer.render_json(BUILDING).unwrap();
    assert!(one_visible(&viewer));
}

#[test]
fn leaving_plan_view_restores_visibility() {
    let mut viewer = viewer();
    viewer.filter_stories(&["GroundFloor", "Roof"]).unwrap();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    viewer.set_view_mode(ViewMode::ThreeD).unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), vec!["GroundFloor", "Roof"]);
}

#[test]
fn plan_view_outlines_every_visible_mesh() {
    let mut viewer = viewer();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    let scene = viewer.state().unwrap().scene();
    let visible = scene.visible_elements().count();
    assert!(visible > 0);
    assert_eq!(scene.outline_count(), visible);

    let frame = viewer.backend().last_frame.clone().unwrap();
    assert_eq!(frame.items.last().unwrap().render_order, 999);

    viewer.set_view_mode(ViewMode::ThreeD).unwrap();
    assert_eq!(viewer.state().unwrap().scene().outline_count(), 0);
}

#[test]
fn plan_click_picks_the_slab_under_the_pointer() {
    let mut viewer = viewer();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();

    viewer.pointer_down(400.0, 300.0, PointerButton::Primary).unwrap();
    let picked = viewer.pointer_up(401.0, 300.0).unwrap();
    assert_eq!(picked, Some(id("Slab_S1")));
    assert_eq!(
        viewer.selected(),
        Some(("GroundFloor".to_string(), "Slab_S1".to_string()))
    );
}

#[test]
fn hidden_stories_cannot_be_picked() {
    let mut viewer = viewer();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    viewer.toggle_story("Floor 1").unwrap();

    // Below the Floor 1 beam on screen lies only the hidden ground slab
    let picked = viewer.pick_at(400.0, 550.0).unwrap();
    assert_eq!(picked, None);

    let picked = viewer.pick_at(400.0, 300.0).unwrap();
    assert_eq!(picked, Some(id("Beam_B2")));
}

#[test]
fn hiding_the_selected_story_deselects() {
    let mut viewer = viewer();
    viewer.select_element_by_name("Slab_R1").unwrap();
    viewer.filter_stories(&["GroundFloor"]).unwrap();
    assert_eq!(viewer.selected(), None);
    let names: Vec<_> = viewer.take_events().iter().map(ViewerEvent::name).collect();
    assert_eq!(names, vec!["objectSelected", "objectDeselected"]);
}

#[test]
fn leaving_plan_view_drops_a_selection_on_a_hidden_story() {
    let mut viewer = viewer();
    viewer.filter_stories(&["GroundFloor"]).unwrap();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    viewer.select_element_by_name("Beam_B2").unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), vec!["Floor 1"]);

    viewer.set_view_mode(ViewMode::ThreeD).unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), vec!["GroundFloor"]);
    assert_eq!(viewer.selected(), None);
    let names: Vec<_> = viewer.take_events().iter().map(ViewerEvent::name).collect();
    assert_eq!(names, vec!["objectSelected", "objectDeselected"]);

    let beam = viewer.state().unwrap().scene().meshes_of(1, &id("Beam_B2"))[0];
    let element = viewer.state().unwrap().scene().element(beam).unwrap();
    assert_eq!(element.material, element.assigned);
}

#[test]
fn hit_test_leaves_the_selection_alone() {
    let mut viewer = viewer();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    viewer.toggle_story("Floor 1").unwrap();
    viewer.take_events();

    assert_eq!(viewer.hit_test(400.0, 300.0).unwrap(), Some(id("Beam_B2")));
    assert_eq!(viewer.hit_test(400.0, 550.0).unwrap(), None);
    assert_eq!(viewer.selected(), None);
    assert!(viewer.take_events().is_empty());
}

#[test]
fn story_filter_round_trip() {
    let mut viewer = viewer();
    let initial = viewer.visible_stories().unwrap();
    let all = viewer.story_names().unwrap();
    assert_eq!(initial, all);

    viewer.filter_stories(&["GroundFloor"]).unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), vec!["GroundFloor"]);

    viewer.filter_stories(&all).unwrap();
    assert_eq!(viewer.visible_stories().unwrap(), initial);
}

#[test]
fn clearing_colors_restores_defaults() {
    let mut viewer = viewer();
    let library = MaterialLibrary::from_config(&ViewerConfig::default()).unwrap();
    let red = Color::new(1.0, 0.0, 0.0);

    let mut colors = BTreeMap::new();
    colors.insert("GroundFloor".to_string(), "#ff0000".to_string());
    colors.insert("Basement".to_string(), "#00ff00".to_string());
    colors.insert("Roof".to_string(), "not a color".to_string());
    viewer.update_material_colors(Some(&colors)).unwrap();

    assert!(drawn(&viewer, 0, "Beam_B1").iter().all(|c| *c == red));
    assert!(drawn(&viewer, 0, "Wall_W1").iter().all(|c| *c == red));
    let beam_default = library.base(ElementCategory::Beam).color;
    assert!(drawn(&viewer, 1, "Beam_B2").iter().all(|c| *c == beam_default));

    viewer.update_material_colors(Some(&BTreeMap::new())).unwrap();
    let state = viewer.state().unwrap();
    for (_, element) in state.scene().elements() {
        let desc = viewer.backend().material(element.material).unwrap();
        let base = library.base(element.id.category);
        assert_eq!(desc.color, base.color);
        assert_eq!(desc.opacity, base.opacity);
    }

    viewer.update_material_colors(None).unwrap();
    assert!(drawn(&viewer, 0, "Beam_B1").iter().all(|c| *c == beam_default));
}

#[test]
fn recoloring_keeps_the_highlight_until_deselection() {
    let mut viewer = viewer();
    viewer.select_element_by_name("Beam_B1").unwrap();

    let mut colors = BTreeMap::new();
    colors.insert("GroundFloor".to_string(), "#0000ff".to_string());
    viewer.update_material_colors(Some(&colors)).unwrap();
    let highlight = viewer.backend().material(viewer.state().unwrap().highlight()).unwrap().color;
    assert!(drawn(&viewer, 0, "Beam_B1").iter().all(|c| *c == highlight));

    assert!(viewer.clear_selection().unwrap());
    assert!(drawn(&viewer, 0, "Beam_B1")
        .iter()
        .all(|c| *c == Color::new(0.0, 0.0, 1.0)));
    assert!(!viewer.clear_selection().unwrap());
}

#[test]
fn font_load_adds_axis_labels_once() {
    let mut viewer = viewer();
    assert_eq!(viewer.state().unwrap().scene().axis_label_count(), 0);

    viewer.font_loaded(false).unwrap();
    assert_eq!(viewer.state().unwrap().scene().axis_label_count(), 0);

    viewer.font_loaded(true).unwrap();
    let labels = viewer.state().unwrap().scene().axis_label_count();
    // Four axes, each a line with a label at both ends
    assert_eq!(labels, 8);

    viewer.font_loaded(true).unwrap();
    assert_eq!(viewer.state().unwrap().scene().axis_label_count(), labels);

    // Later renders keep labels
    viewer.render_json(BUILDING).unwrap();
    assert_eq!(viewer.state().unwrap().scene().axis_label_count(), labels);
}

#[test]
fn rebuilds_do_not_leak_backend_resources() {
    let mut viewer = viewer();
    viewer.font_loaded(true).unwrap();
    let geometries = viewer.backend().live_geometries();
    let materials = viewer.backend().live_materials();

    for _ in 0..3 {
        viewer.render_json(BUILDING).unwrap();
    }
    assert_eq!(viewer.backend().live_geometries(), geometries);
    assert_eq!(viewer.backend().live_materials(), materials);
    assert_eq!(viewer.backend().invalid_releases, 0);
}

#[test]
fn teardown_releases_everything_once() {
    let mut viewer = viewer();
    viewer.font_loaded(true).unwrap();
    let mut colors = BTreeMap::new();
    colors.insert("Floor 1".to_string(), "#123456".to_string());
    viewer.update_material_colors(Some(&colors)).unwrap();
    viewer.set_view_mode(ViewMode::TwoD).unwrap();
    viewer.select_element_by_name("Column_C1").unwrap();

    assert!(viewer.teardown());
    let backend = viewer.backend();
    assert_eq!(backend.live_geometries(), 0);
    assert_eq!(backend.live_materials(), 0);
    assert_eq!(backend.invalid_releases, 0);

    let released = backend.released_geometries.len() + backend.released_materials.len();
    assert!(!viewer.teardown());
    assert_eq!(
        viewer.backend().released_geometries.len() + viewer.backend().released_materials.len(),
        released
    );
}

#[test]
fn resize_draws_immediately() {
    let mut viewer = viewer();
    let draws = viewer.backend().draws;
    viewer.handle_resize(1024, 768).unwrap();
    assert_eq!(viewer.backend().size, (1024, 768));
    assert_eq!(viewer.backend().draws, draws + 1);
}
