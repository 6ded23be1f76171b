// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! End-to-end scenarios: full way histories through the retrieval port.

use wayback_core::{
    entry_overlay, load_history, load_report, ElementId, ElementKind, ElementVersion, LatLng,
    MemorySource, OverlayStyle, ReportOptions, Segment, SourceError,
};

fn edges(segments: &[Segment]) -> Vec<(u64, u64)> {
    segments.iter().map(|s| (s.from.id.0, s.to.id.0)).collect()
}

fn node_at(id: u64, version: u64, changeset: u64, lat: f64) -> ElementVersion {
    ElementVersion::node(id, version, changeset, LatLng::new(lat, 7.0))
}

/// Five nodes created in changeset 100, a way over them in 101, the middle
/// node dropped in 205, and a tag-only edit in 310.
fn street() -> MemorySource {
    let mut source = MemorySource::new();
    for (i, id) in (1..=5).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let lat = 50.0 + i as f64 * 0.001;
        source.insert_version(node_at(id, 1, 100, lat));
    }
    source.insert_version(
        ElementVersion::way(40, 1, 101, &[1, 2, 3, 4, 5]).with_tag("highway", "residential"),
    );
    source.insert_version(
        ElementVersion::way(40, 2, 205, &[1, 2, 4, 5]).with_tag("highway", "residential"),
    );
    source.insert_version(
        ElementVersion::way(40, 3, 310, &[1, 2, 4, 5])
            .with_tag("highway", "residential")
            .with_tag("name", "Elm Street"),
    );
    source
}

#[test]
fn removing_a_middle_node_replaces_its_two_edges_with_one() -> Result<(), SourceError> {
    let history = load_history(&street(), ElementKind::Way, ElementId(40))?;
    assert_eq!(history.len(), 3);

    let first = history.entries()[0].segments.clone().unwrap_or_default();
    assert_eq!(edges(&first.added), [(1, 2), (2, 3), (3, 4), (4, 5)]);

    let removal = history.entries()[1].segments.clone().unwrap_or_default();
    assert_eq!(edges(&removal.removed), [(2, 3), (3, 4)]);
    assert_eq!(edges(&removal.added), [(2, 4)]);
    assert_eq!(edges(&removal.unchanged), [(1, 2), (4, 5)]);
    assert_eq!(history.entries()[1].diff.node_count.prev, Some(5));
    assert_eq!(history.entries()[1].diff.node_count.next, Some(4));

    let retag = history.entries()[2].segments.clone().unwrap_or_default();
    assert!(!retag.has_changes());
    assert_eq!(edges(&retag.unchanged), [(1, 2), (2, 4), (4, 5)]);

    let tagged: Vec<u64> = history.tag_changes().map(|e| e.version.version).collect();
    assert_eq!(tagged, [3, 1]);
    Ok(())
}

#[test]
fn node_moves_are_seen_as_of_each_way_version() -> Result<(), SourceError> {
    let mut source = street();
    // Node 4 moves in changeset 250, between way versions 2 and 3.
    source.insert_version(node_at(4, 2, 250, 51.0));
    let history = load_history(&source, ElementKind::Way, ElementId(40))?;

    let v2_nodes = history.entries()[1].nodes.clone().unwrap_or_default();
    assert_eq!(v2_nodes[2].version, 1);
    let v3_nodes = history.entries()[2].nodes.clone().unwrap_or_default();
    assert_eq!(v3_nodes[2].version, 2);

    let v3 = history.entries()[2].segments.clone().unwrap_or_default();
    assert_eq!(edges(&v3.unchanged), [(1, 2)]);
    assert_eq!(edges(&v3.removed), [(2, 4), (4, 5)]);
    assert_eq!(edges(&v3.added), [(2, 4), (4, 5)]);
    Ok(())
}

#[test]
fn references_older_than_node_history_are_skipped() -> Result<(), SourceError> {
    let mut source = MemorySource::new();
    source.insert_version(node_at(1, 1, 10, 1.0));
    source.insert_version(node_at(2, 1, 10, 2.0));
    // Node 3's recorded history starts after the way first referenced it.
    source.insert_version(node_at(3, 1, 30, 3.0));
    source.insert_version(ElementVersion::way(8, 1, 20, &[1, 2, 3]));
    source.insert_version(ElementVersion::way(8, 2, 40, &[1, 2, 3]));

    let history = load_history(&source, ElementKind::Way, ElementId(8))?;
    assert_eq!(history.entries()[0].nodes.as_ref().map(Vec::len), Some(2));
    let second = history.entries()[1].segments.clone().unwrap_or_default();
    assert_eq!(edges(&second.unchanged), [(1, 2)]);
    assert_eq!(edges(&second.added), [(2, 3)]);
    Ok(())
}

#[test]
fn deleted_way_removes_every_edge() -> Result<(), SourceError> {
    let mut source = street();
    source.insert_version(ElementVersion::deletion(ElementKind::Way, 40, 4, 400));
    let options = ReportOptions::default();
    let report = load_report(&source, ElementKind::Way, ElementId(40), &options)?;
    assert!(report.deleted);
    assert_eq!(report.focus, None);
    assert_eq!(report.editor_link, None);

    let last = report
        .history
        .newest()
        .and_then(|e| e.segments.clone())
        .unwrap_or_default();
    assert_eq!(edges(&last.removed), [(1, 2), (2, 4), (4, 5)]);
    assert!(last.added.is_empty());
    let tags_after: Vec<_> = report
        .history
        .newest()
        .map(|e| e.diff.tags.iter().filter(|t| t.next.is_some()).count())
        .into_iter()
        .collect();
    assert_eq!(tags_after, [0]);
    Ok(())
}

#[test]
fn live_way_report_links_to_padded_bounds() -> Result<(), SourceError> {
    let options = ReportOptions::default();
    let report = load_report(&street(), ElementKind::Way, ElementId(40), &options)?;
    let focus = report.focus.ok_or_else(|| SourceError::Other("no focus".into()))?;
    assert!(focus.south() < 50.0 && focus.north() > 50.004);
    assert!(report.editor_link.is_some_and(|l| l.contains("select=w40")));

    let overlay = entry_overlay(&report.history.entries()[1], &OverlayStyle::default());
    assert_eq!(overlay.map(|o| o.paths.len()), Some(5));
    Ok(())
}
