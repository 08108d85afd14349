// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building element geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Slab needs at least 3 resolvable nodes, found {0}")]
    DegenerateSlab(usize),

    #[error("Degenerate element: {0}")]
    DegenerateElement(String),

    #[error("Model error: {0}")]
    CoreError(#[from] structview_core::Error),
}
