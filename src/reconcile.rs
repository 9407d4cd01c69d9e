//! Incremental room-list reconciliation.
//!
//! Keeps an ordered, identifier-keyed cache in sync with a freshly fetched
//! backend sequence by computing a minimal edit script and applying it in
//! place. Values that survive a pass are carried forward untouched, so
//! expensive presentation objects are only constructed for true insertions.
//!
//! The algorithm is generic over anything with a stable identifier; nothing
//! in here knows about rooms or the SDK.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::hash::Hash;

/// One step of an ordered edit script.
///
/// `Remove` offsets index the *old* sequence, `Insert` offsets index the
/// *new* sequence, matching the usual LCS difference representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<K> {
    Insert { offset: usize, key: K },
    Remove { offset: usize, key: K },
}

/// Computes the minimal ordered edit script turning `old` into `new`.
///
/// The returned script lists removals first, in descending offset order,
/// followed by insertions in ascending offset order. Applying the steps in
/// that order to `old` yields `new`.
pub fn diff<K: PartialEq + Clone>(old: &[K], new: &[K]) -> Vec<Edit<K>> {
    let n = old.len();
    let m = new.len();

    // Suffix LCS table: lcs[i][j] is the LCS length of old[i..] and new[j..].
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut removals = Vec::new();
    let mut insertions = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            removals.push(Edit::Remove {
                offset: i,
                key: old[i].clone(),
            });
            i += 1;
        } else {
            insertions.push(Edit::Insert {
                offset: j,
                key: new[j].clone(),
            });
            j += 1;
        }
    }
    while i < n {
        removals.push(Edit::Remove {
            offset: i,
            key: old[i].clone(),
        });
        i += 1;
    }
    while j < m {
        insertions.push(Edit::Insert {
            offset: j,
            key: new[j].clone(),
        });
        j += 1;
    }

    // Removals are applied highest offset first so earlier offsets stay valid.
    removals.reverse();
    removals.extend(insertions);
    removals
}

/// Outcome of one reconciliation pass.
#[derive(Debug)]
pub struct Reconciliation<K, V> {
    /// The new ordered cache, in backend-reported order.
    pub entries: IndexMap<K, V>,
    /// How many values were freshly built this pass.
    pub built: usize,
    /// Keys whose insertion was skipped because `build` returned `None`.
    pub skipped: Vec<K>,
}

/// Diffs `previous`'s key order against `new_keys` and applies the resulting
/// edit script, producing the next cache generation.
///
/// On insertion the value is taken from `previous` if the key is already
/// cached (a remove-then-insert within the same script is a move, not a
/// rebuild); only keys absent from the previous generation go through
/// `build`. `build` returning `None` marks a key whose backing handle could
/// not be resolved: that single insertion is dropped and the rest of the
/// script still applies.
pub fn reconcile<K, V, F>(
    previous: &IndexMap<K, V>,
    new_keys: &[K],
    mut build: F,
) -> Reconciliation<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: FnMut(&K) -> Option<V>,
{
    let old_keys: Vec<K> = previous.keys().cloned().collect();
    let script = diff(&old_keys, new_keys);

    let mut order = old_keys;
    let mut fresh: HashMap<K, V> = HashMap::new();
    let mut built = 0;
    let mut skipped = Vec::new();

    for edit in script {
        match edit {
            Edit::Remove { offset, .. } => {
                // The value stays in `previous` until the end of the pass so
                // a later insert of the same key reuses it.
                order.remove(offset);
            }
            Edit::Insert { offset, key } => {
                if !previous.contains_key(&key) && !fresh.contains_key(&key) {
                    match build(&key) {
                        Some(value) => {
                            fresh.insert(key.clone(), value);
                            built += 1;
                        }
                        None => {
                            skipped.push(key);
                            continue;
                        }
                    }
                }
                // A skipped insertion earlier in the script can leave later
                // offsets past the end; clamp instead of panicking.
                order.insert(offset.min(order.len()), key);
            }
        }
    }

    let mut entries = IndexMap::with_capacity(order.len());
    for key in order {
        if let Some(value) = previous.get(&key).or_else(|| fresh.get(&key)) {
            entries.insert(key, value.clone());
        }
    }

    Reconciliation {
        entries,
        built,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn keys(entries: &IndexMap<&'static str, Arc<String>>) -> Vec<&'static str> {
        entries.keys().copied().collect()
    }

    fn cache(ids: &[&'static str]) -> IndexMap<&'static str, Arc<String>> {
        ids.iter()
            .map(|id| (*id, Arc::new(id.to_string())))
            .collect()
    }

    fn apply(old: &[&str], script: &[Edit<&str>]) -> Vec<String> {
        let mut result: Vec<String> = old.iter().map(|s| s.to_string()).collect();
        for edit in script {
            match edit {
                Edit::Remove { offset, .. } => {
                    result.remove(*offset);
                }
                Edit::Insert { offset, key } => {
                    result.insert(*offset, key.to_string());
                }
            }
        }
        result
    }

    #[test]
    fn diff_produces_applicable_script() {
        let cases: &[(&[&str], &[&str])] = &[
            (&[], &["a", "b"]),
            (&["a", "b"], &[]),
            (&["a", "b", "c"], &["a", "c", "d"]),
            (&["a", "b", "c"], &["c", "a", "b"]),
            (&["a"], &["b", "a", "c"]),
            (&["x", "y", "z"], &["x", "y", "z"]),
        ];
        for (old, new) in cases {
            let script = diff(old, new);
            let expected: Vec<String> = new.iter().map(|s| s.to_string()).collect();
            assert_eq!(apply(old, &script), expected, "old={old:?} new={new:?}");
        }
    }

    #[test]
    fn diff_of_identical_sequences_is_empty() {
        assert!(diff(&["a", "b", "c"], &["a", "b", "c"]).is_empty());
    }

    #[test]
    fn diff_is_minimal_for_single_edit() {
        let script = diff(&["a", "b", "c"], &["a", "c"]);
        assert_eq!(
            script,
            vec![Edit::Remove {
                offset: 1,
                key: "b"
            }]
        );
    }

    #[test]
    fn reconcile_reuses_surviving_values() {
        let previous = cache(&["a", "b", "c"]);
        let result = reconcile(&previous, &["a", "c", "d"], |id| {
            Some(Arc::new(id.to_string()))
        });

        assert_eq!(keys(&result.entries), vec!["a", "c", "d"]);
        assert_eq!(result.built, 1);
        assert!(Arc::ptr_eq(&previous["a"], &result.entries["a"]));
        assert!(Arc::ptr_eq(&previous["c"], &result.entries["c"]));
        assert!(!previous.contains_key("d"));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let previous = cache(&["a", "b", "c"]);
        let result = reconcile(&previous, &["a", "b", "c"], |_| {
            panic!("nothing should be built")
        });

        assert_eq!(result.built, 0);
        assert_eq!(keys(&result.entries), vec!["a", "b", "c"]);
        for key in ["a", "b", "c"] {
            assert!(Arc::ptr_eq(&previous[key], &result.entries[key]));
        }
    }

    #[test]
    fn reconcile_builds_everything_from_empty() {
        let previous: IndexMap<&str, Arc<String>> = IndexMap::new();
        let mut builds = 0;
        let result = reconcile(&previous, &["a", "b"], |id| {
            builds += 1;
            Some(Arc::new(id.to_string()))
        });

        assert_eq!(builds, 2);
        assert_eq!(result.built, 2);
        assert_eq!(keys(&result.entries), vec!["a", "b"]);
    }

    #[test]
    fn reconcile_preserves_identity_across_moves() {
        let previous = cache(&["a", "b", "c"]);
        let result = reconcile(&previous, &["c", "a", "b"], |_| {
            panic!("a reorder must not rebuild anything")
        });

        assert_eq!(result.built, 0);
        assert_eq!(keys(&result.entries), vec!["c", "a", "b"]);
        for key in ["a", "b", "c"] {
            assert!(Arc::ptr_eq(&previous[key], &result.entries[key]));
        }
    }

    #[test]
    fn reconcile_skips_unresolvable_insertions() {
        let previous = cache(&["a", "b"]);
        let result = reconcile(&previous, &["a", "x", "b", "d"], |id| {
            if *id == "x" {
                None
            } else {
                Some(Arc::new(id.to_string()))
            }
        });

        // "x" is dropped, everything else in the script still applies.
        assert_eq!(keys(&result.entries), vec!["a", "b", "d"]);
        assert_eq!(result.built, 1);
        assert_eq!(result.skipped, vec!["x"]);
        assert!(Arc::ptr_eq(&previous["a"], &result.entries["a"]));
        assert!(Arc::ptr_eq(&previous["b"], &result.entries["b"]));
    }

    #[test]
    fn reconcile_drops_removed_keys() {
        let previous = cache(&["a", "b"]);
        let result = reconcile(&previous, &[], |_| panic!("nothing should be built"));

        assert!(result.entries.is_empty());
        assert_eq!(result.built, 0);
    }
}
