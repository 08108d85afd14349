// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Story stacking and naming
//!
//! Stories are addressed two ways: positionally (`Story_0`, `Story_1`, ...),
//! which is how scene groups are named, and by their human-readable name,
//! which is what filter panels and color maps use. [`StoryLayout`] is the one
//! place that translates between the two, and it also owns the cumulative
//! elevation of every story.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::model::{Model, NodeId, Story};

/// Height used when a story's `Height` is missing or unparsable
pub const DEFAULT_STORY_HEIGHT: f64 = 300.0;

/// Positional scene group name for a story
#[inline]
pub fn group_name(index: usize) -> String {
    format!("Story_{}", index)
}

/// Human-readable story name: the label when present, otherwise a name
/// derived from the story's position
pub fn story_display_name(index: usize, label: Option<&str>) -> String {
    match label {
        Some(label) if !label.trim().is_empty() => label.trim().to_string(),
        _ if index == 0 => "GroundFloor".to_string(),
        _ => format!("Floor {}", index),
    }
}

/// Placement and naming of one story
#[derive(Debug, Clone, PartialEq)]
pub struct StoryEntry {
    pub index: usize,
    /// Positional group name (`Story_<index>`)
    pub group: String,
    /// Human-readable name, unique within the layout
    pub name: String,
    /// Sum of the heights of all stories below
    pub base_elevation: f64,
    pub height: f64,
    pub top_elevation: f64,
}

/// Elevations and names of every story of a model
#[derive(Debug, Clone, Default)]
pub struct StoryLayout {
    entries: Vec<StoryEntry>,
    by_name: FxHashMap<String, usize>,
}

impl StoryLayout {
    pub fn from_model(model: &Model) -> Self {
        Self::from_stories(&model.stories)
    }

    pub fn from_stories(stories: &[Story]) -> Self {
        let mut entries = Vec::with_capacity(stories.len());
        let mut by_name = FxHashMap::default();
        let mut elevation = 0.0;

        for (index, story) in stories.iter().enumerate() {
            let height = match story.height {
                Some(height) => height,
                None => {
                    tracing::warn!(story = index, "story height missing, using default");
                    DEFAULT_STORY_HEIGHT
                }
            };

            let mut name = story_display_name(index, story.label.as_deref());
            if by_name.contains_key(&name) {
                let unique = format!("{} ({})", name, index);
                tracing::warn!(story = index, name = %name, renamed = %unique, "duplicate story name");
                name = unique;
            }
            by_name.insert(name.clone(), index);

            entries.push(StoryEntry {
                index,
                group: group_name(index),
                name,
                base_elevation: elevation,
                height,
                top_elevation: elevation + height,
            });
            elevation += height;
        }

        Self { entries, by_name }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&StoryEntry> {
        self.entries.get(index)
    }

    /// Index of the story with the given human-readable name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Human-readable name of the story at `index`
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.name.as_str())
    }

    /// Human-readable names in story order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elevation of the top of the highest story
    pub fn total_height(&self) -> f64 {
        self.entries.last().map(|e| e.top_elevation).unwrap_or(0.0)
    }
}

/// Node lookup for a single story
#[derive(Debug, Default)]
pub struct NodeIndex<'a> {
    points: FxHashMap<&'a NodeId, (f64, f64)>,
}

impl<'a> NodeIndex<'a> {
    /// Index the nodes of a story. Nodes without both coordinates are left
    /// out, so elements that use them fail to resolve.
    pub fn new(story: &'a Story) -> Self {
        let mut points = FxHashMap::default();
        for node in &story.nodes {
            match (node.x, node.y) {
                (Some(x), Some(y)) => {
                    points.insert(&node.id, (x, y));
                }
                _ => tracing::warn!(node = %node.id, "node without coordinates ignored"),
            }
        }
        Self { points }
    }

    #[inline]
    pub fn get(&self, id: &NodeId) -> Option<(f64, f64)> {
        self.points.get(id).copied()
    }

    /// Resolve a node referenced by `element`. A missing reference is
    /// reported like an unknown one.
    pub fn resolve(&self, id: Option<&NodeId>, element: &str) -> Result<(f64, f64)> {
        id.and_then(|id| self.get(id)).ok_or_else(|| Error::UnknownNode {
            node: id.map_or_else(|| "(none)".to_string(), NodeId::to_string),
            element: element.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use approx::assert_relative_eq;

    fn story(height: Option<f64>, label: Option<&str>) -> Story {
        Story {
            height,
            label: label.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_elevations_are_cumulative() {
        let stories = vec![
            story(Some(300.0), None),
            story(Some(280.0), None),
            story(Some(320.0), None),
        ];
        let layout = StoryLayout::from_stories(&stories);

        assert_relative_eq!(layout.get(0).unwrap().base_elevation, 0.0);
        assert_relative_eq!(layout.get(1).unwrap().base_elevation, 300.0);
        assert_relative_eq!(layout.get(2).unwrap().base_elevation, 580.0);
        assert_relative_eq!(layout.total_height(), 900.0);
    }

    #[test]
    fn test_changing_lower_height_shifts_everything_above() {
        let mut stories = vec![
            story(Some(300.0), None),
            story(Some(300.0), None),
            story(Some(300.0), None),
        ];
        let before = StoryLayout::from_stories(&stories);
        stories[0].height = Some(350.0);
        let after = StoryLayout::from_stories(&stories);

        assert_relative_eq!(after.get(0).unwrap().base_elevation, 0.0);
        for i in 1..3 {
            let delta =
                after.get(i).unwrap().base_elevation - before.get(i).unwrap().base_elevation;
            assert_relative_eq!(delta, 50.0);
        }
    }

    #[test]
    fn test_missing_height_uses_default() {
        let layout = StoryLayout::from_stories(&[story(None, None), story(Some(100.0), None)]);
        assert_relative_eq!(layout.get(1).unwrap().base_elevation, DEFAULT_STORY_HEIGHT);
    }

    #[test]
    fn test_fallback_and_duplicate_names() {
        let layout = StoryLayout::from_stories(&[
            story(Some(1.0), None),
            story(Some(1.0), Some("Roof")),
            story(Some(1.0), None),
            story(Some(1.0), Some("Roof")),
        ]);
        assert_eq!(
            layout.names(),
            vec!["GroundFloor", "Roof", "Floor 2", "Roof (3)"]
        );
        assert_eq!(layout.index_of("Floor 2"), Some(2));
        assert_eq!(layout.index_of("Roof (3)"), Some(3));
        assert_eq!(layout.get(3).unwrap().group, "Story_3");
    }

    #[test]
    fn test_node_index_resolution() {
        let mut s = story(Some(300.0), None);
        s.nodes = vec![Node::new("1", 0.0, 0.0), Node::new("2", 10.0, 5.0)];
        s.nodes.push(Node {
            id: NodeId::new("3"),
            x: None,
            y: Some(1.0),
        });
        let index = NodeIndex::new(&s);

        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve(Some(&NodeId::new("2")), "Beam_B1").unwrap(), (10.0, 5.0));
        let err = index.resolve(Some(&NodeId::new("3")), "Beam_B1").unwrap_err();
        assert!(matches!(err, Error::UnknownNode { .. }));
        let err = index.resolve(None, "Beam_B1").unwrap_err();
        assert!(matches!(err, Error::UnknownNode { ref node, .. } if node == "(none)"));
    }
}
