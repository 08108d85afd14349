// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection state and outbound events
//!
//! At most one logical element is selected. Every mesh of that element (all
//! pieces of a perforated wall) draws the shared highlight material while
//! selected and gets back exactly the material it had before.

use std::sync::Arc;

use serde::Serialize;
use smallvec::SmallVec;
use structview_core::{ElementCategory, ElementId, ElementProperties};

use crate::backend::MaterialHandle;
use crate::scene::{NodeKey, SceneGraph};

/// Notification for the host application
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewerEvent {
    ObjectSelected {
        #[serde(rename = "type")]
        category: ElementCategory,
        properties: Arc<ElementProperties>,
    },
    ObjectDeselected {},
}

impl ViewerEvent {
    /// Event name as delivered to hosts
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::ObjectSelected { .. } => "objectSelected",
            ViewerEvent::ObjectDeselected {} => "objectDeselected",
        }
    }
}

/// The selected element and the meshes carrying the highlight
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub story: usize,
    pub id: ElementId,
    pub meshes: SmallVec<[NodeKey; 4]>,
}

#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<Selection>,
    events: Vec<ViewerEvent>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, story: usize, id: &ElementId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| s.story == story && &s.id == id)
    }

    /// Select every mesh of `id` in `story`, deselecting any previous
    /// selection first. Returns false when the element has no meshes.
    pub fn select(
        &mut self,
        scene: &mut SceneGraph,
        highlight: MaterialHandle,
        story: usize,
        id: &ElementId,
    ) -> bool {
        let meshes: SmallVec<[NodeKey; 4]> = scene.meshes_of(story, id).iter().copied().collect();
        let Some(properties) = meshes
            .first()
            .and_then(|key| scene.element(*key))
            .map(|element| element.properties.clone())
        else {
            return false;
        };

        if self.is_selected(story, id) {
            return true;
        }
        self.clear(scene);

        for key in &meshes {
            if let Some(element) = scene.element_mut(*key) {
                element.material = highlight;
            }
        }
        tracing::debug!(element = %id, story, meshes = meshes.len(), "Element selected");

        self.current = Some(Selection {
            story,
            id: id.clone(),
            meshes,
        });
        self.events.push(ViewerEvent::ObjectSelected {
            category: id.category,
            properties,
        });
        true
    }

    /// Restore the selected meshes' materials. Returns whether anything was
    /// selected.
    pub fn clear(&mut self, scene: &mut SceneGraph) -> bool {
        let Some(selection) = self.current.take() else {
            return false;
        };
        for key in &selection.meshes {
            if let Some(element) = scene.element_mut(*key) {
                element.material = element.assigned;
            }
        }
        self.events.push(ViewerEvent::ObjectDeselected {});
        true
    }

    /// Forget the selection without touching the scene, for when the scene
    /// is being rebuilt
    pub fn forget(&mut self) -> bool {
        if self.current.take().is_some() {
            self.events.push(ViewerEvent::ObjectDeselected {});
            true
        } else {
            false
        }
    }

    /// Queued events, oldest first
    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }
}
