// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fetch-then-assemble orchestration over a [`HistorySource`].
//!
//! All node histories are collected before any resolution starts; the engine
//! itself never interleaves retrieval with diffing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use wayback_geom::{Bounds, DEFAULT_PAD_DELTA_DEG};

use crate::assemble::{compute_history, ElementHistory};
use crate::editor::{load_and_zoom_url, DEFAULT_EDITOR_BASE_URL};
use crate::model::{ElementId, ElementKind, NodeId};
use crate::resolve::NodeHistories;
use crate::source::{HistorySource, SourceError};

/// Knobs for [`load_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Padding radius for focus bounds, in degrees.
    pub pad_delta_deg: f64,
    /// Editor remote-control endpoint.
    pub editor_base_url: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            pad_delta_deg: DEFAULT_PAD_DELTA_DEG,
            editor_base_url: DEFAULT_EDITOR_BASE_URL.to_owned(),
        }
    }
}

/// An assembled history plus everything needed to present it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    /// Element kind.
    pub kind: ElementKind,
    /// Element id.
    pub id: ElementId,
    /// `true` when the current version is a deletion.
    pub deleted: bool,
    /// Padded bounds around the element's current state.
    pub focus: Option<Bounds>,
    /// Editor link for `focus`.
    pub editor_link: Option<String>,
    /// The assembled history, with changesets attached where known.
    pub history: ElementHistory,
}

/// Loads and assembles the history of one element.
///
/// Versions are normalized oldest-first. Every node referenced by any way
/// version is fetched once; a node the source does not know is logged and
/// treated as unresolvable.
#[instrument(skip(source))]
pub fn load_history<S>(
    source: &S,
    kind: ElementKind,
    id: ElementId,
) -> Result<ElementHistory, SourceError>
where
    S: HistorySource + ?Sized,
{
    let mut versions = source.version_history(kind, id)?;
    if versions.is_empty() {
        return Err(SourceError::NotFound { kind, id });
    }
    versions.sort_by_key(|v| v.version);

    let referenced: BTreeSet<NodeId> = versions
        .iter()
        .flat_map(|v| v.node_refs.iter().copied())
        .collect();
    debug!(versions = versions.len(), nodes = referenced.len(), "fetching node histories");

    let mut nodes = NodeHistories::new();
    for node in referenced {
        match source.node_history(node) {
            Ok(history) => nodes.insert(node, history),
            Err(SourceError::NotFound { .. }) => {
                warn!(node = %node, "node history unavailable");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(compute_history(&versions, &nodes))
}

/// Loads a history and decorates it for presentation.
///
/// Changeset metadata and relation membership are best-effort: failures are
/// logged and leave the corresponding fields empty.
#[instrument(skip(source, options))]
pub fn load_report<S>(
    source: &S,
    kind: ElementKind,
    id: ElementId,
    options: &ReportOptions,
) -> Result<HistoryReport, SourceError>
where
    S: HistorySource + ?Sized,
{
    let mut history = load_history(source, kind, id)?;

    match source.changesets(&history.changeset_ids()) {
        Ok(changesets) => history.attach_changesets(&changesets),
        Err(e) => warn!(error = %e, "changeset metadata unavailable"),
    }

    let members = if kind == ElementKind::Relation {
        source.relation_nodes(id).unwrap_or_else(|e| {
            warn!(error = %e, "relation membership unavailable");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let focus = history.focus_bounds(&members, options.pad_delta_deg);
    let editor_link = focus.map(|b| load_and_zoom_url(&options.editor_base_url, &b, kind, id));
    info!(versions = history.len(), deleted = history.is_deleted(), "history loaded");

    Ok(HistoryReport {
        kind,
        id,
        deleted: history.is_deleted(),
        focus,
        editor_link,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Changeset, ChangesetId, ElementVersion, ResolvedPoint};
    use crate::source::MemorySource;
    use wayback_geom::LatLng;

    struct Failing;

    impl HistorySource for Failing {
        fn version_history(
            &self,
            _kind: ElementKind,
            _id: ElementId,
        ) -> Result<Vec<ElementVersion>, SourceError> {
            Err(SourceError::Other("offline".into()))
        }

        fn relation_nodes(&self, _id: ElementId) -> Result<Vec<ResolvedPoint>, SourceError> {
            Err(SourceError::Other("offline".into()))
        }

        fn changesets(&self, _ids: &[ChangesetId]) -> Result<Vec<Changeset>, SourceError> {
            Err(SourceError::Other("offline".into()))
        }
    }

    #[test]
    fn source_errors_propagate() {
        let r = load_history(&Failing, ElementKind::Node, ElementId(1));
        assert!(matches!(r, Err(SourceError::Other(_))));
    }

    #[test]
    fn versions_are_normalized_oldest_first() -> Result<(), SourceError> {
        let mut source = MemorySource::new();
        source.insert_version(ElementVersion::node(1, 2, 20, LatLng::new(1.0, 1.0)));
        source.insert_version(ElementVersion::node(1, 1, 10, LatLng::new(0.0, 0.0)));
        let h = load_history(&source, ElementKind::Node, ElementId(1))?;
        let order: Vec<u64> = h.entries().iter().map(|e| e.version.version).collect();
        assert_eq!(order, [1, 2]);
        assert_eq!(h.entries()[0].diff.coordinates.prev, None);
        Ok(())
    }

    #[test]
    fn missing_node_history_is_not_fatal() -> Result<(), SourceError> {
        let mut source = MemorySource::new();
        source.insert_version(ElementVersion::node(1, 1, 5, LatLng::new(0.0, 0.0)));
        source.insert_version(ElementVersion::node(2, 1, 5, LatLng::new(0.0, 1.0)));
        source.insert_version(ElementVersion::way(9, 1, 10, &[1, 2, 3]));
        let h = load_history(&source, ElementKind::Way, ElementId(9))?;
        let nodes = h.entries()[0].nodes.as_deref().unwrap_or_default();
        assert_eq!(nodes.len(), 2);
        Ok(())
    }

    #[test]
    fn relation_report_focuses_on_members() -> Result<(), SourceError> {
        let mut source = MemorySource::new();
        source.insert_version(ElementVersion::node(1, 1, 5, LatLng::new(10.0, 10.0)));
        source.insert_version(ElementVersion::node(2, 1, 5, LatLng::new(11.0, 12.0)));
        source.insert_version(
            ElementVersion::relation(3, 1, 10, Vec::new()).with_tag("type", "route"),
        );
        source.insert_relation_nodes(ElementId(3), vec![NodeId(1), NodeId(2)]);

        let report = load_report(
            &source,
            ElementKind::Relation,
            ElementId(3),
            &ReportOptions::default(),
        )?;
        assert!(!report.deleted);
        let focus = report.focus.ok_or_else(|| SourceError::Other("no focus".into()))?;
        assert!(focus.contains(LatLng::new(10.0, 10.0)));
        assert!(focus.contains(LatLng::new(11.0, 12.0)));
        assert!(report
            .editor_link
            .is_some_and(|l| l.ends_with("&select=r3")));
        Ok(())
    }
}
