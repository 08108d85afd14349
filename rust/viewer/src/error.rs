// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the viewer's control surface
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid model: {0}")]
    InvalidModel(#[from] structview_core::Error),

    #[error("Unknown view preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown view mode: {0}")]
    UnknownViewMode(String),

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Unknown story: {0}")]
    UnknownStory(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("No model loaded")]
    NoModel,

    #[error("Viewer has been torn down")]
    TornDown,
}
