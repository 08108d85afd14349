// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D / 2D view mode and the story visibility it implies
//!
//! While in 2D exactly one story group is visible. The 3D visibility map is
//! snapshotted on entry and restored on exit.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::scene::SceneGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
    /// Top-down plan of a single story
    #[serde(rename = "2d")]
    TwoD,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::ThreeD => "3d",
            ViewMode::TwoD => "2d",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ViewMode::ThreeD => ViewMode::TwoD,
            ViewMode::TwoD => ViewMode::ThreeD,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3d" => Ok(ViewMode::ThreeD),
            "2d" => Ok(ViewMode::TwoD),
            _ => Err(Error::UnknownViewMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewModeState {
    mode: ViewMode,
    /// 3D visibility captured on entering 2D
    snapshot: Option<Vec<bool>>,
    /// Story shown in 2D, kept across mode switches
    plan_story: Option<usize>,
}

impl ViewModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_plan(&self) -> bool {
        self.mode == ViewMode::TwoD
    }

    pub fn plan_story(&self) -> Option<usize> {
        self.plan_story
    }

    /// Snapshot visibility and show a single story: the one shown last time
    /// in 2D, otherwise the first. Returns the story shown.
    pub fn enter_plan(&mut self, scene: &mut SceneGraph) -> Option<usize> {
        if self.is_plan() {
            return self.plan_story;
        }
        self.mode = ViewMode::TwoD;
        self.snapshot = Some(scene.visibility());

        let count = scene.story_count();
        if count == 0 {
            return None;
        }
        let story = self.plan_story.filter(|&s| s < count).unwrap_or(0);
        self.show_only(scene, story);
        Some(story)
    }

    /// Restore the snapshotted visibility, or show everything
    pub fn exit_plan(&mut self, scene: &mut SceneGraph) {
        if !self.is_plan() {
            return;
        }
        self.mode = ViewMode::ThreeD;
        match self.snapshot.take() {
            Some(visibility) if visibility.len() == scene.story_count() => {
                scene.set_visibility(&visibility)
            }
            _ => scene.set_visibility(&vec![true; scene.story_count()]),
        }
    }

    /// Make `story` the only visible story
    pub fn show_only(&mut self, scene: &mut SceneGraph, story: usize) {
        for index in 0..scene.story_count() {
            scene.set_story_visible(index, index == story);
        }
        self.plan_story = Some(story);
    }

    /// Forget state tied to the previous model. The mode is kept.
    pub fn reset(&mut self) {
        self.snapshot = None;
        self.plan_story = None;
    }
}
