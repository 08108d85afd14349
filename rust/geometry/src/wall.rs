// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall panels, openings and embedded reinforcement
//!
//! Walls are described in a local frame: `along` runs from `NodeI` to
//! `NodeJ`, `up` is height above the story base. A perforated wall is split
//! into solid rectangular pieces around each opening, so no piece overlaps
//! another and no piece covers an opening.

use nalgebra::{Point3, Vector2, Vector3};
use structview_core::{Spacing, WallBeam, WallColumn};

use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::prism::{placed_prism, Placement, PrismSpec};

const LENGTH_TOLERANCE: f64 = 1e-6;

/// Local frame of a wall between two plan points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallFrame {
    /// World `(x, z)` of `NodeI`
    pub origin: Vector2<f64>,
    /// Unit plan direction toward `NodeJ`
    pub direction: Vector2<f64>,
    pub length: f64,
    pub yaw: f64,
    /// Story base elevation
    pub base: f64,
    pub height: f64,
    pub thickness: f64,
}

impl WallFrame {
    pub fn new(
        start: (f64, f64),
        end: (f64, f64),
        base: f64,
        height: f64,
        thickness: f64,
    ) -> Result<Self> {
        let origin = Vector2::new(start.0, start.1);
        let delta = Vector2::new(end.0, end.1) - origin;
        let length = delta.norm();
        if length < LENGTH_TOLERANCE {
            return Err(Error::DegenerateElement(
                "wall end nodes coincide".to_string(),
            ));
        }
        if height <= 0.0 {
            return Err(Error::DegenerateElement(format!(
                "wall height {} is not positive",
                height
            )));
        }

        Ok(Self {
            origin,
            direction: delta / length,
            length,
            yaw: delta.y.atan2(delta.x),
            base,
            height,
            thickness,
        })
    }

    /// World position of a local `(along, up)` point on the wall's center plane
    pub fn point(&self, along: f64, up: f64) -> Point3<f64> {
        let plan = self.origin + self.direction * along;
        Point3::new(plan.x, self.base + up, plan.y)
    }

    /// Prism covering a local rectangle, `thickness` deep across the wall
    pub fn block(&self, rect: &LocalRect, thickness: f64, config: &GeometryConfig) -> Mesh {
        let width = rect.width();
        let spec = PrismSpec::new(
            Vector3::new(width, rect.height(), thickness),
            [config.segment_count(width), 1, 1],
        );
        let center = self.point(
            (rect.start + rect.end) / 2.0,
            (rect.bottom + rect.top) / 2.0,
        );
        placed_prism(&spec, &Placement::new(center, self.yaw))
    }
}

/// Axis-aligned rectangle in wall-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRect {
    pub start: f64,
    pub end: f64,
    pub bottom: f64,
    pub top: f64,
}

impl LocalRect {
    pub fn new(start: f64, end: f64, bottom: f64, top: f64) -> Self {
        Self {
            start,
            end,
            bottom,
            top,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= LENGTH_TOLERANCE || self.height() <= LENGTH_TOLERANCE
    }

    /// Interiors intersect
    pub fn overlaps(&self, other: &LocalRect) -> bool {
        self.start < other.end - LENGTH_TOLERANCE
            && other.start < self.end - LENGTH_TOLERANCE
            && self.bottom < other.top - LENGTH_TOLERANCE
            && other.bottom < self.top - LENGTH_TOLERANCE
    }
}

/// Role of a solid piece of a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSegmentKind {
    /// Whole wall, no openings
    Solid,
    /// Between the previous opening (or wall start) and the next jamb
    Before,
    /// Sill under an opening
    Below,
    /// Lintel over an opening
    Above,
    LeftJamb,
    RightJamb,
    /// After the last opening
    Trailing,
}

impl WallSegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallSegmentKind::Solid => "Solid",
            WallSegmentKind::Before => "Before",
            WallSegmentKind::Below => "Below",
            WallSegmentKind::Above => "Above",
            WallSegmentKind::LeftJamb => "LeftJamb",
            WallSegmentKind::RightJamb => "RightJamb",
            WallSegmentKind::Trailing => "Trailing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub kind: WallSegmentKind,
    pub rect: LocalRect,
}

/// Clamp raw opening records to the wall and sort them along it.
///
/// Openings missing a bound, with no area after clamping, or overlapping an
/// earlier opening are dropped with a warning.
pub fn normalize_openings(spacings: &[Spacing], length: f64, height: f64) -> Vec<LocalRect> {
    let mut openings: Vec<LocalRect> = spacings
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let (Some(x0), Some(x1), Some(y0), Some(y1)) = (s.start_x, s.end_x, s.start_y, s.end_y)
            else {
                tracing::warn!(opening = i, "Opening is missing a bound, ignored");
                return None;
            };
            let rect = LocalRect::new(
                x0.min(x1).clamp(0.0, length),
                x0.max(x1).clamp(0.0, length),
                y0.min(y1).clamp(0.0, height),
                y0.max(y1).clamp(0.0, height),
            );
            if rect.is_empty() {
                tracing::warn!(opening = i, "Opening has no area inside the wall, ignored");
                return None;
            }
            Some(rect)
        })
        .collect();

    openings.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut kept: Vec<LocalRect> = Vec::with_capacity(openings.len());
    for opening in openings {
        if let Some(previous) = kept.last() {
            if opening.start < previous.end - LENGTH_TOLERANCE {
                tracing::warn!(
                    start = opening.start,
                    previous_end = previous.end,
                    "Opening overlaps the previous opening, ignored"
                );
                continue;
            }
        }
        kept.push(opening);
    }
    kept
}

/// Split a wall of `length` x `height` into solid pieces around `openings`.
///
/// `openings` must come from [`normalize_openings`]. Each opening gets a
/// left and right jamb of `jamb` width, narrowed where the wall end or a
/// neighboring opening leaves less room, plus a sill and lintel where the
/// opening does not reach the wall bottom or top. Empty pieces are dropped.
pub fn wall_segments(length: f64, height: f64, openings: &[LocalRect], jamb: f64) -> Vec<WallSegment> {
    if openings.is_empty() {
        return vec![WallSegment {
            kind: WallSegmentKind::Solid,
            rect: LocalRect::new(0.0, length, 0.0, height),
        }];
    }

    let jamb = jamb.max(0.0);
    let mut segments = Vec::with_capacity(openings.len() * 5 + 1);
    let mut push = |kind: WallSegmentKind, rect: LocalRect| {
        if !rect.is_empty() {
            segments.push(WallSegment { kind, rect });
        }
    };

    let mut cursor = 0.0_f64;
    for (i, opening) in openings.iter().enumerate() {
        let jamb_start = (opening.start - jamb).max(cursor).min(opening.start);
        push(
            WallSegmentKind::Before,
            LocalRect::new(cursor, jamb_start, 0.0, height),
        );
        push(
            WallSegmentKind::LeftJamb,
            LocalRect::new(jamb_start, opening.start, 0.0, height),
        );
        push(
            WallSegmentKind::Below,
            LocalRect::new(opening.start, opening.end, 0.0, opening.bottom),
        );
        push(
            WallSegmentKind::Above,
            LocalRect::new(opening.start, opening.end, opening.top, height),
        );

        let limit = openings.get(i + 1).map_or(length, |next| next.start);
        let jamb_end = (opening.end + jamb).min(limit).max(opening.end);
        push(
            WallSegmentKind::RightJamb,
            LocalRect::new(opening.end, jamb_end, 0.0, height),
        );
        cursor = jamb_end;
    }

    push(
        WallSegmentKind::Trailing,
        LocalRect::new(cursor, length, 0.0, height),
    );
    segments
}

/// Resolved size of an embedded wall part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSize {
    pub along: f64,
    pub across: f64,
    pub vertical: f64,
}

/// Beam embedded along the top of the wall, flush with its top edge.
///
/// It is slightly thicker than the wall so it reads on both faces.
pub fn wall_beam_mesh(frame: &WallFrame, beam: &WallBeam, config: &GeometryConfig) -> (Mesh, PartSize) {
    let eps = config.surface_epsilon;
    let depth = GeometryConfig::dimension(beam.depth, config.default_wall_beam_depth).min(frame.height);
    let across = GeometryConfig::dimension(beam.width, frame.thickness) + 2.0 * eps;
    let rect = LocalRect::new(0.0, frame.length, frame.height - depth, frame.height);
    let size = PartSize {
        along: frame.length,
        across,
        vertical: depth,
    };
    (frame.block(&rect, across, config), size)
}

/// Which end of the wall an embedded column sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallEnd {
    Start,
    End,
}

/// Column embedded flush with one wall end, full wall height
pub fn wall_column_mesh(
    frame: &WallFrame,
    column: &WallColumn,
    end: WallEnd,
    config: &GeometryConfig,
) -> (Mesh, PartSize) {
    let eps = config.surface_epsilon;
    let along = GeometryConfig::dimension(column.b1, config.default_wall_column_length).min(frame.length);
    let across = GeometryConfig::dimension(column.b2, frame.thickness) + 2.0 * eps;
    let rect = match end {
        WallEnd::Start => LocalRect::new(0.0, along, 0.0, frame.height),
        WallEnd::End => LocalRect::new(frame.length - along, frame.length, 0.0, frame.height),
    };
    let size = PartSize {
        along,
        across,
        vertical: frame.height,
    };
    (frame.block(&rect, across, config), size)
}
