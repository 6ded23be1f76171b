// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted preferences for history views.

use serde::{Deserialize, Serialize};
use wayback_core::editor::DEFAULT_EDITOR_BASE_URL;
use wayback_core::{OverlayStyle, ReportOptions};

use crate::config::{ConfigError, ConfigService, ConfigStore};

/// Config key under which [`HistoryPrefs`] are stored.
pub const PREFS_KEY: &str = "history_prefs";

/// Saved preferences for history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPrefs {
    /// Only list versions that changed at least one tag.
    pub hide_tagless: bool,
    /// Padding radius around the focused element, in degrees.
    pub pad_delta_deg: f64,
    /// Editor remote-control endpoint.
    pub editor_base_url: String,
    /// Map overlay colours and strokes.
    pub overlay: OverlayStyle,
}

impl Default for HistoryPrefs {
    fn default() -> Self {
        let report = ReportOptions::default();
        Self {
            hide_tagless: false,
            pad_delta_deg: report.pad_delta_deg,
            editor_base_url: DEFAULT_EDITOR_BASE_URL.to_owned(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl HistoryPrefs {
    /// Report options derived from these preferences.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            pad_delta_deg: self.pad_delta_deg,
            editor_base_url: self.editor_base_url.clone(),
        }
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load history preferences, falling back to defaults.
    pub fn load_prefs(&self) -> HistoryPrefs {
        self.load_or_default(PREFS_KEY)
    }

    /// Persist history preferences.
    pub fn save_prefs(&self, prefs: &HistoryPrefs) -> Result<(), ConfigError> {
        self.save(PREFS_KEY, prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::MapStore;

    #[test]
    fn defaults_when_nothing_saved() {
        let svc = ConfigService::new(MapStore::default());
        let prefs = svc.load_prefs();
        assert_eq!(prefs, HistoryPrefs::default());
        assert_eq!(prefs.overlay.added_color, "#0a0");
    }

    #[test]
    fn saved_prefs_round_trip_through_the_store() -> Result<(), ConfigError> {
        let store = MapStore::default();
        store.save_raw(
            PREFS_KEY,
            br##"{"hide_tagless":true,"overlay":{"added_color":"#00f"}}"##,
        )?;
        let svc = ConfigService::new(store);
        let prefs = svc.load_prefs();
        assert!(prefs.hide_tagless);
        assert_eq!(prefs.overlay.added_color, "#00f");
        assert_eq!(prefs.overlay.removed_color, "#a00");
        assert_eq!(prefs.editor_base_url, DEFAULT_EDITOR_BASE_URL);

        let mut changed = prefs;
        changed.pad_delta_deg = 0.01;
        svc.save_prefs(&changed)?;
        assert!((svc.load_prefs().report_options().pad_delta_deg - 0.01).abs() < 1e-12);
        Ok(())
    }
}
