// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! "As of" resolution of node positions.
//!
//! A way only stores node ids; where those nodes were at the time of a given
//! way version has to be reconstructed from each node's own history.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::model::{ChangesetId, ElementVersion, NodeId, ResolvedPoint};

/// Full histories of the nodes referenced by a way, each newest-first.
#[derive(Debug, Clone, Default)]
pub struct NodeHistories {
    by_id: BTreeMap<NodeId, Vec<ElementVersion>>,
}

impl NodeHistories {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the history of `id`, re-sorting it newest-first.
    ///
    /// Input order does not matter. Ties on changeset are broken by version so
    /// that the later version of the same changeset wins.
    pub fn insert(&mut self, id: NodeId, mut history: Vec<ElementVersion>) {
        history.sort_by(|a, b| {
            b.changeset
                .cmp(&a.changeset)
                .then_with(|| b.version.cmp(&a.version))
        });
        self.by_id.insert(id, history);
    }

    /// History of `id`, newest-first.
    pub fn get(&self, id: NodeId) -> Option<&[ElementVersion]> {
        self.by_id.get(&id).map(Vec::as_slice)
    }

    /// Number of nodes with a known history.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if no history is stored.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<(NodeId, Vec<ElementVersion>)> for NodeHistories {
    fn from_iter<I: IntoIterator<Item = (NodeId, Vec<ElementVersion>)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (id, history) in iter {
            out.insert(id, history);
        }
        out
    }
}

/// Resolves node `id` as of changeset `as_of`.
///
/// `history` must be newest-first. The first version whose changeset is not
/// after `as_of` is the one in effect. Returns `None` when the node's recorded
/// history starts after `as_of`.
pub fn resolve(id: NodeId, history: &[ElementVersion], as_of: ChangesetId) -> Option<ResolvedPoint> {
    history
        .iter()
        .find(|v| v.changeset <= as_of)
        .map(|v| ResolvedPoint {
            id,
            version: v.version,
            changeset: v.changeset,
            position: v.coords,
        })
}

/// Resolves every reference of a way version, in order.
///
/// References that cannot be resolved are dropped, so the result may be
/// shorter than `refs`. Duplicated references are resolved each time.
pub fn resolve_refs(
    refs: &[NodeId],
    histories: &NodeHistories,
    as_of: ChangesetId,
) -> Vec<ResolvedPoint> {
    refs.iter()
        .filter_map(|&id| {
            let Some(history) = histories.get(id) else {
                warn!(node = %id, "no history for referenced node; dropping reference");
                return None;
            };
            let resolved = resolve(id, history, as_of);
            if resolved.is_none() {
                debug!(node = %id, changeset = %as_of, "node history starts after changeset; dropping reference");
            }
            resolved
        })
        .collect()
}
