// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element versions and the identifiers that tie them together.
//!
//! Everything here is produced by a retrieval collaborator and treated as
//! immutable by the engine.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wayback_geom::LatLng;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Stable identifier of a map element (unique per kind).
    ElementId
);
id_newtype!(
    /// Identifier of a node referenced from a way.
    NodeId
);
id_newtype!(
    /// Identifier of the edit batch (changeset) that produced a version.
    ///
    /// Ordering is numeric; "as of" lookups rely on it.
    ChangesetId
);

impl From<NodeId> for ElementId {
    fn from(id: NodeId) -> Self {
        Self(id.0)
    }
}

/// The three kinds of map element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A single point with coordinates.
    Node,
    /// An ordered polyline of node references.
    Way,
    /// A named group of other elements.
    Relation,
}

impl ElementKind {
    /// Lowercase name used in paths and selectors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }

    /// Single-letter prefix used by editor selectors (`n123`, `w45`).
    pub const fn prefix(self) -> char {
        match self {
            Self::Node => 'n',
            Self::Way => 'w',
            Self::Relation => 'r',
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown element kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element kind: {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            other => Err(UnknownKind(other.to_owned())),
        }
    }
}

/// One member of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Kind of the referenced element.
    pub kind: ElementKind,
    /// Id of the referenced element.
    pub id: ElementId,
    /// Free-form role string; empty when unset.
    #[serde(default)]
    pub role: String,
}

const fn visible_by_default() -> bool {
    true
}

/// One immutable snapshot of an element.
///
/// Only the fields meaningful for `kind` are populated: `coords` for nodes,
/// `node_refs` for ways, `members` for relations. A version with
/// `visible == false` is a deletion and typically carries none of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementVersion {
    /// Element kind.
    pub kind: ElementKind,
    /// Element id.
    pub id: ElementId,
    /// Sequential version number, starting at 1.
    pub version: u64,
    /// Changeset that produced this version.
    pub changeset: ChangesetId,
    /// `false` when this version deleted the element.
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    /// Edit timestamp as reported by the source (display only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Display name of the editor (display only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Key/value attributes.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Ordered node references (ways); duplicates allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_refs: Vec<NodeId>,
    /// Ordered members (relations).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    /// Position (nodes); absent on deletions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<LatLng>,
}

impl ElementVersion {
    fn bare(kind: ElementKind, id: u64, version: u64, changeset: u64) -> Self {
        Self {
            kind,
            id: ElementId(id),
            version,
            changeset: ChangesetId(changeset),
            visible: true,
            timestamp: None,
            user: None,
            tags: BTreeMap::new(),
            node_refs: Vec::new(),
            members: Vec::new(),
            coords: None,
        }
    }

    /// A visible node version at `coords`.
    pub fn node(id: u64, version: u64, changeset: u64, coords: LatLng) -> Self {
        Self {
            coords: Some(coords),
            ..Self::bare(ElementKind::Node, id, version, changeset)
        }
    }

    /// A visible way version referencing `refs` in order.
    pub fn way(id: u64, version: u64, changeset: u64, refs: &[u64]) -> Self {
        Self {
            node_refs: refs.iter().copied().map(NodeId).collect(),
            ..Self::bare(ElementKind::Way, id, version, changeset)
        }
    }

    /// A visible relation version with `members`.
    pub fn relation(id: u64, version: u64, changeset: u64, members: Vec<Member>) -> Self {
        Self {
            members,
            ..Self::bare(ElementKind::Relation, id, version, changeset)
        }
    }

    /// A deletion of the given element.
    pub fn deletion(kind: ElementKind, id: u64, version: u64, changeset: u64) -> Self {
        Self {
            visible: false,
            ..Self::bare(kind, id, version, changeset)
        }
    }

    /// Adds a tag, replacing any previous value for `key`.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Sets the editor name.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Number of node references, absent when the version has none.
    pub fn node_count(&self) -> Option<usize> {
        (!self.node_refs.is_empty()).then_some(self.node_refs.len())
    }

    /// Number of relation members, absent when the version has none.
    pub fn member_count(&self) -> Option<usize> {
        (!self.members.is_empty()).then_some(self.members.len())
    }
}

/// Changeset metadata shown next to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Changeset id.
    pub id: ChangesetId,
    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// The changeset's `comment` tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Creation timestamp as reported by the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A node as it stood at some changeset.
///
/// `position` is absent when the version in effect was itself a deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPoint {
    /// Node id.
    pub id: NodeId,
    /// Node version that was in effect.
    pub version: u64,
    /// Changeset of that node version.
    pub changeset: ChangesetId,
    /// Coordinates of that node version.
    pub position: Option<LatLng>,
}

impl ResolvedPoint {
    /// Builds a resolved point from a node version.
    pub fn from_version(v: &ElementVersion) -> Self {
        Self {
            id: NodeId(v.id.0),
            version: v.version,
            changeset: v.changeset,
            position: v.coords,
        }
    }

    /// Same node at the same place. Versions are ignored: re-tagging a node
    /// does not move it.
    pub fn same_place(&self, other: &Self) -> bool {
        self.id == other.id && self.position == other.position
    }
}
