// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! History assembly: diffs and segment classifications for a whole version
//! list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wayback_geom::{pad, Bounds};

use crate::model::{Changeset, ChangesetId, ElementId, ElementKind, ElementVersion, ResolvedPoint};
use crate::resolve::{resolve_refs, NodeHistories};
use crate::segments::{reconcile, SegmentDiff};
use crate::tags::{diff_versions, DiffRecord};

/// One version together with what changed relative to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The version itself.
    pub version: ElementVersion,
    /// Diff against the previous version (against nothing for the first).
    pub diff: DiffRecord,
    /// Resolved node list of this version (ways only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<ResolvedPoint>>,
    /// Edge classification against the previous version (ways only, and only
    /// when either side has an edge).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<SegmentDiff>,
    /// Changeset metadata, once attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changeset: Option<Changeset>,
}

/// The assembled history of one element, oldest version first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementHistory {
    entries: Vec<HistoryEntry>,
}

/// Assembles the history of one element.
///
/// `versions` must be ordered oldest-first. `nodes` must hold the histories of
/// the nodes referenced by any way version; it is ignored for other kinds.
pub fn compute_history(versions: &[ElementVersion], nodes: &NodeHistories) -> ElementHistory {
    let mut entries: Vec<HistoryEntry> = Vec::with_capacity(versions.len());
    let mut prev: Option<&ElementVersion> = None;
    for version in versions {
        let diff = diff_versions(prev, version);
        let (resolved, segments) = if version.kind == ElementKind::Way {
            let resolved = resolve_refs(&version.node_refs, nodes, version.changeset);
            let before = entries
                .last()
                .and_then(|e| e.nodes.as_deref())
                .unwrap_or_default();
            let segments = reconcile(before, &resolved);
            (Some(resolved), segments)
        } else {
            (None, None)
        };
        debug!(
            kind = %version.kind,
            id = %version.id,
            version = version.version,
            changeset = %version.changeset,
            visible = version.visible,
            tag_changes = diff.tags.iter().filter(|t| t.is_changed()).count(),
            "assembled version"
        );
        entries.push(HistoryEntry {
            version: version.clone(),
            diff,
            nodes: resolved,
            segments,
            changeset: None,
        });
        prev = Some(version);
    }
    ElementHistory { entries }
}

impl ElementHistory {
    /// Entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of versions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for an empty history.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first (presentation order).
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// The most recent entry.
    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// `true` when the most recent version is a deletion.
    pub fn is_deleted(&self) -> bool {
        self.newest().is_some_and(|e| !e.version.visible)
    }

    /// Newest-first entries that changed at least one tag.
    pub fn tag_changes(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.newest_first().filter(|e| e.diff.has_tag_changes())
    }

    /// Distinct changeset ids, in version order.
    pub fn changeset_ids(&self) -> Vec<ChangesetId> {
        let mut seen = std::collections::BTreeSet::new();
        self.entries
            .iter()
            .map(|e| e.version.changeset)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Attaches changeset metadata by id; entries without a match are left
    /// as they are.
    pub fn attach_changesets(&mut self, changesets: &[Changeset]) {
        let by_id: BTreeMap<ChangesetId, &Changeset> =
            changesets.iter().map(|c| (c.id, c)).collect();
        for entry in &mut self.entries {
            if let Some(cs) = by_id.get(&entry.version.changeset) {
                entry.changeset = Some((*cs).clone());
            }
        }
    }

    /// Kind and id of the element, taken from the newest entry.
    pub fn element(&self) -> Option<(ElementKind, ElementId)> {
        self.newest().map(|e| (e.version.kind, e.version.id))
    }

    /// Padded bounds for centring a map on the element's current state.
    ///
    /// Nodes pad their current position; ways pad the bounds of their current
    /// resolved node list; relations pad the bounds of `members` (the
    /// current member nodes, supplied by the caller). Deleted or unlocatable
    /// elements have no focus.
    pub fn focus_bounds(&self, members: &[ResolvedPoint], delta_deg: f64) -> Option<Bounds> {
        let newest = self.newest()?;
        if !newest.version.visible {
            return None;
        }
        match newest.version.kind {
            ElementKind::Node => newest.version.coords.map(|p| pad(p, delta_deg)),
            ElementKind::Way => newest
                .nodes
                .as_deref()
                .and_then(points_bounds)
                .map(|b| b.padded(delta_deg)),
            ElementKind::Relation => points_bounds(members).map(|b| b.padded(delta_deg)),
        }
    }
}

/// Enclosing bounds of every located point.
pub fn points_bounds(points: &[ResolvedPoint]) -> Option<Bounds> {
    Bounds::from_points(points.iter().filter_map(|p| p.position))
}
