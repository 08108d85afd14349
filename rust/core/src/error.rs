// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or resolving a structural model
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model is missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("Model root must be a JSON object")]
    NotAnObject,

    #[error("Element {element} references unknown node {node}")]
    UnknownNode { node: String, element: String },

    #[error("Invalid axis intersection key: {0}")]
    InvalidAxisKey(String),

    #[error("Unknown element category: {0}")]
    UnknownCategory(String),
}
