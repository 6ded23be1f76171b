// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Way-segment reconciliation.
//!
//! Given the resolved node list of a way before and after an edit, classify
//! every edge as added, removed, or unchanged.
//!
//! The alignment is a greedy two-cursor walk, not an edit-distance search. It
//! is tuned for the edits that actually happen to ways: nodes appended or
//! prepended, nodes deleted, nodes moved, and small local reorders. Arbitrary
//! permutations produce a valid but not minimal classification.
//!
//! # Walk
//!
//! Each cursor names the *end* of an edge: the edge at cursor `i` runs from
//! point `i - 1` to point `i`, and the edge at cursor `0` has no start. On
//! every step:
//!
//! 1. If both edges have the same start and end (same id, same position) the
//!    edge is unchanged; both cursors move.
//! 2. Otherwise the previous-side edge is removed if its end id matches the
//!    next-side end id, was deleted from the way, or the next side is
//!    exhausted. Symmetrically the next-side edge is added if the end ids
//!    match, its end id is new to the way, or the previous side is exhausted.
//! 3. If neither rule fired, both ends survive the edit but sit at different
//!    positions: the previous edge is removed, the next edge is added, and both
//!    cursors move.
//!
//! Edges without a start emit nothing. Every step moves at least one cursor, so
//! the walk ends after at most `prev.len() + next.len()` steps.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{NodeId, ResolvedPoint};

/// One edge of a way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub from: ResolvedPoint,
    /// End point.
    pub to: ResolvedPoint,
}

impl Segment {
    fn between(from: &ResolvedPoint, to: &ResolvedPoint) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
        }
    }
}

/// Edges of a way split by how an edit affected them.
///
/// Each list is in walk order, which follows the order of the side it was
/// taken from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentDiff {
    /// Edges present only after the edit.
    pub added: Vec<Segment>,
    /// Edges present only before the edit.
    pub removed: Vec<Segment>,
    /// Edges present on both sides.
    pub unchanged: Vec<Segment>,
}

impl SegmentDiff {
    /// `true` if any edge was added or removed.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// All segments, unchanged first, then removed, then added.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.unchanged
            .iter()
            .chain(self.removed.iter())
            .chain(self.added.iter())
    }
}

/// Splits a point list into consecutive edges.
pub fn segments_of(points: &[ResolvedPoint]) -> Vec<Segment> {
    points
        .windows(2)
        .map(|w| Segment::between(&w[0], &w[1]))
        .collect()
}

fn id_set(points: &[ResolvedPoint]) -> BTreeSet<NodeId> {
    points.iter().map(|p| p.id).collect()
}

fn edge_start(points: &[ResolvedPoint], cursor: usize) -> Option<&ResolvedPoint> {
    cursor.checked_sub(1).and_then(|i| points.get(i))
}

fn same_place(a: Option<&ResolvedPoint>, b: Option<&ResolvedPoint>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.same_place(b))
}

fn push_edge(out: &mut Vec<Segment>, from: Option<&ResolvedPoint>, to: Option<&ResolvedPoint>) {
    if let (Some(from), Some(to)) = (from, to) {
        out.push(Segment::between(from, to));
    }
}

/// Classifies the edges of `next` against those of `prev`.
///
/// Returns `None` when neither side has an edge (fewer than two points on
/// both sides); `Some` with empty lists means "compared, nothing to report".
pub fn reconcile(prev: &[ResolvedPoint], next: &[ResolvedPoint]) -> Option<SegmentDiff> {
    match (prev.len() < 2, next.len() < 2) {
        (true, true) => return None,
        (true, false) => {
            return Some(SegmentDiff {
                added: segments_of(next),
                ..SegmentDiff::default()
            })
        }
        (false, true) => {
            return Some(SegmentDiff {
                removed: segments_of(prev),
                ..SegmentDiff::default()
            })
        }
        (false, false) => {}
    }

    let prev_ids = id_set(prev);
    let next_ids = id_set(next);
    let removed_ids: BTreeSet<NodeId> = prev_ids.difference(&next_ids).copied().collect();
    let added_ids: BTreeSet<NodeId> = next_ids.difference(&prev_ids).copied().collect();

    let mut out = SegmentDiff::default();
    let mut prev_it = 0;
    let mut next_it = 0;

    while prev_it < prev.len() || next_it < next.len() {
        let start_prev = edge_start(prev, prev_it);
        let start_next = edge_start(next, next_it);
        let end_prev = prev.get(prev_it);
        let end_next = next.get(next_it);

        if same_place(start_prev, start_next) && same_place(end_prev, end_next) {
            push_edge(&mut out.unchanged, start_prev, end_prev);
            prev_it += 1;
            next_it += 1;
            continue;
        }

        let end_same_id = matches!((end_prev, end_next), (Some(a), Some(b)) if a.id == b.id);
        let drop_prev = end_same_id
            || end_prev.is_some_and(|p| removed_ids.contains(&p.id))
            || end_next.is_none();
        let take_next = end_same_id
            || end_next.is_some_and(|n| added_ids.contains(&n.id))
            || end_prev.is_none();

        if drop_prev {
            push_edge(&mut out.removed, start_prev, end_prev);
            prev_it += 1;
        }
        if take_next {
            push_edge(&mut out.added, start_next, end_next);
            next_it += 1;
        }
        if !drop_prev && !take_next {
            // Both ends survive the edit but moved relative to each other.
            push_edge(&mut out.removed, start_prev, end_prev);
            push_edge(&mut out.added, start_next, end_next);
            prev_it += 1;
            next_it += 1;
        }
    }

    trace!(
        added = out.added.len(),
        removed = out.removed.len(),
        unchanged = out.unchanged.len(),
        "reconciled way segments"
    );
    Some(out)
}
