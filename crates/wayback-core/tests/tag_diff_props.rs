// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Property tests for tag diffs.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use wayback_core::diff_tags;

fn tag_set() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z:]{1,8}", "[a-zA-Z0-9 ]{0,6}", 0..12)
}

proptest! {
    #[test]
    fn keys_are_the_sorted_union(a in tag_set(), b in tag_set()) {
        let diff = diff_tags(Some(&a), &b);
        let keys: Vec<&str> = diff.iter().map(|d| d.key.as_str()).collect();
        let expected: BTreeSet<&str> = a.keys().chain(b.keys()).map(String::as_str).collect();
        prop_assert_eq!(keys, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn no_entry_is_empty_on_both_sides(a in tag_set(), b in tag_set()) {
        for d in diff_tags(Some(&a), &b) {
            prop_assert!(d.prev.is_some() || d.next.is_some());
            prop_assert_eq!(d.prev.as_ref(), a.get(&d.key));
            prop_assert_eq!(d.next.as_ref(), b.get(&d.key));
        }
    }

    #[test]
    fn missing_prev_is_all_added(b in tag_set()) {
        let diff = diff_tags(None, &b);
        prop_assert_eq!(diff.len(), b.len());
        prop_assert!(diff.iter().all(|d| d.prev.is_none()));
    }

    #[test]
    fn self_diff_is_all_kept(a in tag_set()) {
        let diff = diff_tags(Some(&a), &a);
        prop_assert_eq!(diff.len(), a.len());
        for d in &diff {
            prop_assert!(d.prev.is_some() && d.prev == d.next);
            prop_assert!(!d.is_changed());
        }
    }
}
