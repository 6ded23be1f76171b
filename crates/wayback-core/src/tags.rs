// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute-level differences between consecutive versions.
//!
//! The diff reports raw before/after values. Whether an equal pair counts as a
//! change is left to the caller (see [`TagDiff::is_changed`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wayback_geom::LatLng;

use crate::model::ElementVersion;

/// One key of a tag diff.
///
/// At least one of `prev`/`next` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDiff {
    /// Tag key.
    pub key: String,
    /// Value in the previous version, if the key existed there.
    pub prev: Option<String>,
    /// Value in the next version, if the key exists there.
    pub next: Option<String>,
}

impl TagDiff {
    /// `true` when the key was added, removed, or its value changed.
    pub fn is_changed(&self) -> bool {
        self.prev != self.next
    }
}

/// A before/after pair for a non-tag attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDiff<T> {
    /// Previous value.
    pub prev: Option<T>,
    /// Next value.
    pub next: Option<T>,
}

impl<T: PartialEq> ValueDiff<T> {
    /// Pairs two optional values.
    pub fn new(prev: Option<T>, next: Option<T>) -> Self {
        Self { prev, next }
    }

    /// `true` when the two sides differ.
    pub fn is_changed(&self) -> bool {
        self.prev != self.next
    }
}

/// Everything that changed between two consecutive versions of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Tag diff, sorted by key.
    pub tags: Vec<TagDiff>,
    /// Node reference count (ways).
    pub node_count: ValueDiff<usize>,
    /// Member count (relations).
    pub member_count: ValueDiff<usize>,
    /// Coordinates (nodes).
    pub coordinates: ValueDiff<LatLng>,
}

impl DiffRecord {
    /// `true` when at least one tag was added, removed, or modified.
    pub fn has_tag_changes(&self) -> bool {
        self.tags.iter().any(TagDiff::is_changed)
    }
}

/// Diffs two tag sets.
///
/// Keys are the union of both sides, each reported once, in ascending
/// lexicographic order. A missing `prev` reports every tag of `next` as added.
pub fn diff_tags(
    prev: Option<&BTreeMap<String, String>>,
    next: &BTreeMap<String, String>,
) -> Vec<TagDiff> {
    let mut all: BTreeMap<&str, (Option<&str>, Option<&str>)> = BTreeMap::new();
    for (k, v) in prev.into_iter().flatten() {
        all.entry(k.as_str()).or_default().0 = Some(v.as_str());
    }
    for (k, v) in next {
        all.entry(k.as_str()).or_default().1 = Some(v.as_str());
    }
    all.into_iter()
        .map(|(key, (prev, next))| TagDiff {
            key: key.to_owned(),
            prev: prev.map(str::to_owned),
            next: next.map(str::to_owned),
        })
        .collect()
}

/// Diffs a version against its predecessor (`None` for the first version).
pub fn diff_versions(prev: Option<&ElementVersion>, next: &ElementVersion) -> DiffRecord {
    DiffRecord {
        tags: diff_tags(prev.map(|p| &p.tags), &next.tags),
        node_count: ValueDiff::new(prev.and_then(ElementVersion::node_count), next.node_count()),
        member_count: ValueDiff::new(
            prev.and_then(ElementVersion::member_count),
            next.member_count(),
        ),
        coordinates: ValueDiff::new(prev.and_then(|p| p.coords), next.coords),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementId, ElementKind, Member};

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn first_version_reports_everything_as_added() {
        let next = tags(&[("name", "Main St"), ("highway", "primary")]);
        let diff = diff_tags(None, &next);
        assert_eq!(
            diff.iter().map(|d| d.key.as_str()).collect::<Vec<_>>(),
            ["highway", "name"]
        );
        assert!(diff.iter().all(|d| d.prev.is_none() && d.next.is_some()));
    }

    #[test]
    fn added_removed_changed_and_kept() {
        let prev = tags(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let next = tags(&[("b", "2"), ("c", "4"), ("d", "5")]);
        let diff = diff_tags(Some(&prev), &next);
        let expect = |key: &str, p: Option<&str>, n: Option<&str>| TagDiff {
            key: key.into(),
            prev: p.map(Into::into),
            next: n.map(Into::into),
        };
        assert_eq!(
            diff,
            vec![
                expect("a", Some("1"), None),
                expect("b", Some("2"), Some("2")),
                expect("c", Some("3"), Some("4")),
                expect("d", None, Some("5")),
            ]
        );
        assert_eq!(diff.iter().filter(|d| d.is_changed()).count(), 3);
    }

    #[test]
    fn empty_sides_give_empty_diff() {
        assert!(diff_tags(Some(&BTreeMap::new()), &BTreeMap::new()).is_empty());
        assert!(diff_tags(None, &BTreeMap::new()).is_empty());
    }

    #[test]
    fn version_diff_carries_counts_and_coordinates() {
        let v1 = ElementVersion::way(1, 1, 10, &[1, 2, 3]).with_tag("highway", "path");
        let v2 = ElementVersion::way(1, 2, 11, &[1, 3]).with_tag("highway", "path");
        let d = diff_versions(Some(&v1), &v2);
        assert_eq!(d.node_count, ValueDiff::new(Some(3), Some(2)));
        assert_eq!(d.member_count, ValueDiff::new(None, None));
        assert_eq!(d.coordinates, ValueDiff::new(None, None));
        assert!(!d.has_tag_changes());

        let first = diff_versions(None, &v1);
        assert_eq!(first.node_count, ValueDiff::new(None, Some(3)));
        assert!(first.has_tag_changes());
    }

    #[test]
    fn relation_and_node_counts() {
        let member = Member {
            kind: ElementKind::Way,
            id: ElementId(4),
            role: "outer".into(),
        };
        let r1 = ElementVersion::relation(9, 1, 10, vec![member.clone()]);
        let r2 = ElementVersion::relation(9, 2, 12, vec![member.clone(), member]);
        assert_eq!(
            diff_versions(Some(&r1), &r2).member_count,
            ValueDiff::new(Some(1), Some(2))
        );

        let n1 = ElementVersion::node(5, 1, 10, LatLng::new(1.0, 1.0));
        let n2 = ElementVersion::deletion(ElementKind::Node, 5, 2, 11);
        let d = diff_versions(Some(&n1), &n2);
        assert_eq!(d.coordinates.prev, Some(LatLng::new(1.0, 1.0)));
        assert_eq!(d.coordinates.next, None);
        assert!(d.coordinates.is_changed());
    }
}
