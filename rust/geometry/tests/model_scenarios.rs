// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end geometry scenarios built from model JSON.

use approx::assert_relative_eq;
use structview_core::{ElementCategory, Model};
use structview_geometry::{
    wall::{normalize_openings, wall_segments},
    GeometryBuilder, MeshPart, Point3, WallSegmentKind,
};

const SINGLE_SLAB: &str = r#"{
    "AxesIntersections": {},
    "Stories": [{
        "Height": 300,
        "Nodes": [
            { "ID": 1, "X": 0, "Y": 0 },
            { "ID": 2, "X": 100, "Y": 0 },
            { "ID": 3, "X": 100, "Y": 100 },
            { "ID": 4, "X": 0, "Y": 100 }
        ],
        "Slabs": [{ "Nodes": [1, 2, 3, 4], "Thickness": 20, "Label": "S1" }]
    }]
}"#;

const PERFORATED_WALL: &str = r#"{
    "AxesIntersections": { "A-1": { "X": 0, "Y": 0 }, "B-1": { "X": 400, "Y": 0 } },
    "Stories": [{
        "Height": 300,
        "Label": "Ground",
        "Nodes": [ { "ID": "a", "X": 0, "Y": 0 }, { "ID": "b", "X": 400, "Y": 0 } ],
        "Walls": [{
            "NodeI": "a", "NodeJ": "b", "Width": 20, "Label": "W1",
            "Spacings": [{ "StartX": 150, "EndX": 250, "StartY": 50, "EndY": 200 }]
        }]
    }]
}"#;

const TWO_STORIES: &str = r#"{
    "AxesIntersections": {},
    "Stories": [
        { "Height": 300, "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ], "Columns": [ { "NodeID": 1, "Label": "C1" } ] },
        { "Height": "350", "Label": "Roof", "Nodes": [ { "ID": 1, "X": 0, "Y": 0 } ], "Columns": [ { "NodeID": 1, "Label": "C1" } ] }
    ]
}"#;

#[test]
fn single_story_slab_spans_the_square() {
    let model = Model::from_json(SINGLE_SLAB).unwrap();
    let geometry = GeometryBuilder::default().build_model(&model);

    assert!(geometry.skipped.is_empty());
    assert_eq!(geometry.stories.len(), 1);
    assert_eq!(geometry.stories[0].name, "GroundFloor");

    let elements = &geometry.stories[0].elements;
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].id.display_name(), "Slab_S1");

    let bounds = elements[0].mesh.bounds();
    assert_relative_eq!(bounds.min.x, 0.0, epsilon = 0.2);
    assert_relative_eq!(bounds.max.x, 100.0, epsilon = 0.2);
    assert_relative_eq!(bounds.min.z, 0.0, epsilon = 0.2);
    assert_relative_eq!(bounds.max.z, 100.0, epsilon = 0.2);
    assert_relative_eq!(bounds.max.y, 299.9, epsilon = 1e-3);
    assert_relative_eq!(bounds.min.y, 280.1, epsilon = 1e-3);

    // Four-sided slab: 2 top, 2 bottom, 8 side triangles
    assert_eq!(elements[0].mesh.triangle_count(), 12);
}

#[test]
fn wall_with_centered_opening() {
    let openings = normalize_openings(
        &[structview_core::Spacing::new(150.0, 250.0, 50.0, 200.0)],
        400.0,
        300.0,
    );
    let segments = wall_segments(400.0, 300.0, &openings, 20.0);
    let kinds: Vec<_> = segments.iter().map(|s| s.kind).collect();

    // Sill exists because 50 > 0, lintel because 200 < 300
    assert_eq!(
        kinds,
        [
            WallSegmentKind::Before,
            WallSegmentKind::LeftJamb,
            WallSegmentKind::Below,
            WallSegmentKind::Above,
            WallSegmentKind::RightJamb,
            WallSegmentKind::Trailing,
        ]
    );

    for (i, a) in segments.iter().enumerate() {
        for b in &segments[i + 1..] {
            assert!(!a.rect.overlaps(&b.rect));
        }
        assert!(!a.rect.overlaps(&openings[0]));
    }

    let solid: f64 = segments.iter().map(|s| s.rect.width() * s.rect.height()).sum();
    assert_relative_eq!(solid, 400.0 * 300.0 - 100.0 * 150.0, epsilon = 1e-6);
}

#[test]
fn perforated_wall_meshes_leave_the_opening_empty() {
    let model = Model::from_json(PERFORATED_WALL).unwrap();
    let geometry = GeometryBuilder::default().build_model(&model);
    let elements = &geometry.stories[0].elements;

    assert_eq!(elements.len(), 6);
    assert!(elements
        .iter()
        .all(|e| e.id.category == ElementCategory::Wall && matches!(e.part, MeshPart::Segment { .. })));

    // No vertex of any piece lies strictly inside the opening
    for element in elements {
        for i in 0..element.mesh.vertex_count() {
            let p: Point3<f64> = element.mesh.vertex(i);
            let inside = p.x > 150.01 && p.x < 249.99 && p.y > 50.01 && p.y < 199.99;
            assert!(!inside, "{} has a vertex inside the opening", element.debug_name());
        }
    }

    assert_eq!(geometry.axes.len(), 3);
    assert_eq!(geometry.stats.built.get(&ElementCategory::Wall), Some(&1));
    assert_eq!(geometry.stats.meshes, 6);
}

#[test]
fn story_elevations_accumulate() {
    let model = Model::from_json(TWO_STORIES).unwrap();
    let geometry = GeometryBuilder::default().build_model(&model);

    let upper = &geometry.stories[1];
    assert_eq!(upper.name, "Roof");
    assert_relative_eq!(upper.base_elevation, 300.0);
    assert_relative_eq!(upper.top_elevation, 650.0);

    let bounds = upper.elements[0].mesh.bounds();
    assert_relative_eq!(bounds.min.y, 300.0, epsilon = 1e-4);
    assert_relative_eq!(bounds.max.y, 650.0, epsilon = 1e-4);
    assert_relative_eq!(bounds.max.x - bounds.min.x, 30.0, epsilon = 1e-4);
}
