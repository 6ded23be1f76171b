// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Links that open an element in a desktop editor via its remote-control API.

use wayback_geom::Bounds;

use crate::model::{ElementId, ElementKind};

/// Default remote-control endpoint of a locally running editor.
pub const DEFAULT_EDITOR_BASE_URL: &str = "http://localhost:8111";

/// Builds a `load_and_zoom` URL that loads `bounds` and selects the element.
pub fn load_and_zoom_url(base: &str, bounds: &Bounds, kind: ElementKind, id: ElementId) -> String {
    format!(
        "{}/load_and_zoom?left={}&right={}&top={}&bottom={}&select={}{}",
        base.trim_end_matches('/'),
        bounds.west(),
        bounds.east(),
        bounds.north(),
        bounds.south(),
        kind.prefix(),
        id
    )
}
