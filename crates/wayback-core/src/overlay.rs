// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer-agnostic map overlays for history entries.
//!
//! Ways draw unchanged edges first so that removed and added edges stay on
//! top. Nodes draw a marker for each side of a move.

use serde::{Deserialize, Serialize};
use wayback_geom::{Bounds, LatLng};

use crate::assemble::HistoryEntry;
use crate::model::ElementKind;
use crate::segments::Segment;

/// Colours and stroke settings for overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Stroke colour for unchanged edges.
    pub unchanged_color: String,
    /// Stroke colour for removed edges and previous positions.
    pub removed_color: String,
    /// Stroke colour for added edges and next positions.
    pub added_color: String,
    /// Edge stroke width in pixels.
    pub line_weight: u32,
    /// Edge opacity, 0..=1.
    pub line_opacity: f64,
    /// Marker radius in pixels.
    pub marker_radius: u32,
    /// Marker stroke width in pixels.
    pub marker_weight: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            unchanged_color: "#444".into(),
            removed_color: "#a00".into(),
            added_color: "#0a0".into(),
            line_weight: 5,
            line_opacity: 0.7,
            marker_radius: 5,
            marker_weight: 3,
        }
    }
}

/// One drawable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayPath {
    /// A straight two-point line.
    Polyline {
        /// Stroke colour.
        color: String,
        /// Stroke width.
        weight: u32,
        /// Opacity.
        opacity: f64,
        /// Start and end.
        points: [LatLng; 2],
    },
    /// A fixed-size circle.
    CircleMarker {
        /// Stroke colour.
        color: String,
        /// Radius in pixels.
        radius: u32,
        /// Stroke width.
        weight: u32,
        /// Centre.
        center: LatLng,
    },
}

/// Shapes to draw for one entry plus the bounds to fit the view to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOverlay {
    /// Bounds enclosing every shape.
    pub bounds: Bounds,
    /// Shapes in draw order.
    pub paths: Vec<OverlayPath>,
}

fn line(segment: &Segment, color: &str, style: &OverlayStyle) -> Option<OverlayPath> {
    Some(OverlayPath::Polyline {
        color: color.to_owned(),
        weight: style.line_weight,
        opacity: style.line_opacity,
        points: [segment.from.position?, segment.to.position?],
    })
}

fn marker(center: LatLng, color: &str, style: &OverlayStyle) -> OverlayPath {
    OverlayPath::CircleMarker {
        color: color.to_owned(),
        radius: style.marker_radius,
        weight: style.marker_weight,
        center,
    }
}

/// Overlay for a way entry.
///
/// Absent unless the entry has a segment classification with at least one
/// added or removed edge. Edges with an unlocated endpoint are not drawn.
pub fn way_overlay(entry: &HistoryEntry, style: &OverlayStyle) -> Option<MapOverlay> {
    let diff = entry.segments.as_ref().filter(|d| d.has_changes())?;
    let bounds = Bounds::from_points(
        diff.iter()
            .flat_map(|s| [s.from.position, s.to.position])
            .flatten(),
    )?;
    let paths = diff
        .unchanged
        .iter()
        .filter_map(|s| line(s, &style.unchanged_color, style))
        .chain(
            diff.removed
                .iter()
                .filter_map(|s| line(s, &style.removed_color, style)),
        )
        .chain(
            diff.added
                .iter()
                .filter_map(|s| line(s, &style.added_color, style)),
        )
        .collect();
    Some(MapOverlay { bounds, paths })
}

/// Overlay for a node entry.
///
/// Absent unless the coordinates changed. A creation shows only the new
/// position, a deletion only the old one.
pub fn node_overlay(entry: &HistoryEntry, style: &OverlayStyle) -> Option<MapOverlay> {
    let coords = entry.diff.coordinates;
    if !coords.is_changed() {
        return None;
    }
    let bounds = Bounds::from_points(coords.prev.into_iter().chain(coords.next))?;
    let paths = coords
        .prev
        .map(|p| marker(p, &style.removed_color, style))
        .into_iter()
        .chain(coords.next.map(|p| marker(p, &style.added_color, style)))
        .collect();
    Some(MapOverlay { bounds, paths })
}

/// Overlay for any entry, dispatched on element kind. Relations have none.
pub fn entry_overlay(entry: &HistoryEntry, style: &OverlayStyle) -> Option<MapOverlay> {
    match entry.version.kind {
        ElementKind::Node => node_overlay(entry, style),
        ElementKind::Way => way_overlay(entry, style),
        ElementKind::Relation => None,
    }
}
