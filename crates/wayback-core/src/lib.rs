// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! History diff and way-segment reconciliation for map elements.
//!
//! Given every version of a node, way, or relation, `wayback-core` computes
//! what changed between each pair of consecutive versions:
//!
//! - [`tags`]: key-by-key tag diffs plus node/member counts and coordinates.
//! - [`resolve`]: where each node of a way stood at the time of a way version.
//! - [`segments`]: which edges of a way were added, removed, or kept.
//! - [`assemble`]: the per-version driver tying the three together.
//!
//! Around the engine sit a retrieval port ([`source`], [`gather`]) and
//! presentation helpers ([`overlay`], [`editor`]).
//!
//! # Determinism
//!
//! The engine is pure and synchronous. Identical inputs yield identical
//! outputs; tag diffs are key-sorted and segment lists follow way order.
//! Nothing holds shared mutable state, so independent elements can be
//! processed in parallel.

pub mod assemble;
pub mod editor;
pub mod gather;
pub mod model;
pub mod overlay;
pub mod resolve;
pub mod segments;
pub mod source;
pub mod tags;

pub use assemble::{compute_history, points_bounds, ElementHistory, HistoryEntry};
pub use gather::{load_history, load_report, HistoryReport, ReportOptions};
pub use model::{
    Changeset, ChangesetId, ElementId, ElementKind, ElementVersion, Member, NodeId, ResolvedPoint,
};
pub use overlay::{entry_overlay, MapOverlay, OverlayPath, OverlayStyle};
pub use resolve::{resolve, resolve_refs, NodeHistories};
pub use segments::{reconcile, segments_of, Segment, SegmentDiff};
pub use source::{HistoryDump, HistorySource, MemorySource, SourceError};
pub use tags::{diff_tags, diff_versions, DiffRecord, TagDiff, ValueDiff};
pub use wayback_geom::{Bounds, LatLng};
