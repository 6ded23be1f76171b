// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON view of a history report, newest version first.

use serde::Serialize;
use wayback_app_core::prefs::HistoryPrefs;
use wayback_core::{
    entry_overlay, Bounds, ElementId, ElementKind, HistoryEntry, HistoryReport, MapOverlay,
};

#[derive(Debug, Serialize)]
pub(crate) struct ReportView<'a> {
    kind: ElementKind,
    id: ElementId,
    deleted: bool,
    focus: Option<Bounds>,
    editor_link: Option<&'a str>,
    entries: Vec<EntryView<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EntryView<'a> {
    #[serde(flatten)]
    entry: &'a HistoryEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<MapOverlay>,
}

impl<'a> ReportView<'a> {
    /// Builds the view; `tags_only` overrides `prefs.hide_tagless` when set.
    pub(crate) fn new(report: &'a HistoryReport, prefs: &HistoryPrefs, tags_only: bool) -> Self {
        let hide_tagless = tags_only || prefs.hide_tagless;
        let entries = report
            .history
            .newest_first()
            .filter(|e| !hide_tagless || e.diff.has_tag_changes())
            .map(|entry| EntryView {
                entry,
                overlay: entry_overlay(entry, &prefs.overlay),
            })
            .collect();
        Self {
            kind: report.kind,
            id: report.id,
            deleted: report.deleted,
            focus: report.focus,
            editor_link: report.editor_link.as_deref(),
            entries,
        }
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
