// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retrieval port for element histories.
//!
//! The engine never fetches anything itself. A [`HistorySource`] hands it fully
//! materialized version lists; [`MemorySource`] is the in-process
//! implementation, usually filled from a [`HistoryDump`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Changeset, ChangesetId, ElementId, ElementKind, ElementVersion, NodeId, ResolvedPoint,
};

/// Errors raised by a [`HistorySource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source has no history for the element.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing element.
        kind: ElementKind,
        /// Id of the missing element.
        id: ElementId,
    },
    /// I/O failure while reading the source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The source returned data that could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Storage-agnostic access to element histories.
///
/// Calls are independent of each other; implementations may serve them in any
/// order or concurrently.
pub trait HistorySource {
    /// Every version of an element, in any order.
    fn version_history(
        &self,
        kind: ElementKind,
        id: ElementId,
    ) -> Result<Vec<ElementVersion>, SourceError>;

    /// Every version of a node, in any order.
    fn node_history(&self, id: NodeId) -> Result<Vec<ElementVersion>, SourceError> {
        self.version_history(ElementKind::Node, id.into())
    }

    /// Current positions of every node reachable from a relation.
    fn relation_nodes(&self, id: ElementId) -> Result<Vec<ResolvedPoint>, SourceError>;

    /// Metadata for the given changesets. Unknown ids are omitted.
    fn changesets(&self, ids: &[ChangesetId]) -> Result<Vec<Changeset>, SourceError>;
}

/// Serialized form of a [`MemorySource`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryDump {
    /// Versions of every element, including the nodes referenced by ways.
    #[serde(default)]
    pub versions: Vec<ElementVersion>,
    /// Node ids reachable from each relation.
    #[serde(default)]
    pub relation_nodes: BTreeMap<ElementId, Vec<NodeId>>,
    /// Changeset metadata.
    #[serde(default)]
    pub changesets: Vec<Changeset>,
}

/// In-memory [`HistorySource`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    versions: BTreeMap<(ElementKind, ElementId), Vec<ElementVersion>>,
    relation_nodes: BTreeMap<ElementId, Vec<NodeId>>,
    changesets: BTreeMap<ChangesetId, Changeset>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one version of an element.
    pub fn insert_version(&mut self, version: ElementVersion) {
        self.versions
            .entry((version.kind, version.id))
            .or_default()
            .push(version);
    }

    /// Records the nodes reachable from a relation.
    pub fn insert_relation_nodes(&mut self, relation: ElementId, nodes: Vec<NodeId>) {
        self.relation_nodes.insert(relation, nodes);
    }

    /// Adds changeset metadata.
    pub fn insert_changeset(&mut self, changeset: Changeset) {
        self.changesets.insert(changeset.id, changeset);
    }

    /// Number of distinct elements with at least one version.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns `true` if no versions are stored.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    fn current_node(&self, id: NodeId) -> Option<&ElementVersion> {
        self.versions
            .get(&(ElementKind::Node, id.into()))?
            .iter()
            .max_by_key(|v| v.version)
    }
}

impl From<HistoryDump> for MemorySource {
    fn from(dump: HistoryDump) -> Self {
        let mut source = Self::new();
        for version in dump.versions {
            source.insert_version(version);
        }
        for (relation, nodes) in dump.relation_nodes {
            source.insert_relation_nodes(relation, nodes);
        }
        for changeset in dump.changesets {
            source.insert_changeset(changeset);
        }
        source
    }
}

impl HistorySource for MemorySource {
    fn version_history(
        &self,
        kind: ElementKind,
        id: ElementId,
    ) -> Result<Vec<ElementVersion>, SourceError> {
        self.versions
            .get(&(kind, id))
            .cloned()
            .ok_or(SourceError::NotFound { kind, id })
    }

    fn relation_nodes(&self, id: ElementId) -> Result<Vec<ResolvedPoint>, SourceError> {
        let nodes = self
            .relation_nodes
            .get(&id)
            .ok_or(SourceError::NotFound {
                kind: ElementKind::Relation,
                id,
            })?;
        Ok(nodes
            .iter()
            .filter_map(|&n| self.current_node(n))
            .filter(|v| v.visible)
            .map(ResolvedPoint::from_version)
            .collect())
    }

    fn changesets(&self, ids: &[ChangesetId]) -> Result<Vec<Changeset>, SourceError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.changesets.get(id).cloned())
            .collect())
    }
}
