use std::collections::BTreeSet;

use crate::events::EntryId;
use crate::scanner::Snapshot;

/// Set difference between two successive snapshots. The three sets are
/// pairwise disjoint by construction. BTreeSet keeps iteration sorted by
/// identity, so callers get deterministic log output for free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: BTreeSet<EntryId>,
    pub removed: BTreeSet<EntryId>,
    pub modified: BTreeSet<EntryId>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Compare two snapshots. Pure set algebra:
/// added = keys only in `new`, removed = keys only in `old`,
/// modified = keys in both whose timestamps differ.
pub fn compare_snapshots(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    let mut diff = SnapshotDiff::default();

    for (id, mtime) in new {
        match old.get(id) {
            None => {
                diff.added.insert(id.clone());
            }
            Some(old_mtime) if old_mtime != mtime => {
                diff.modified.insert(id.clone());
            }
            Some(_) => {}
        }
    }

    for id in old.keys() {
        if !new.contains_key(id) {
            diff.removed.insert(id.clone());
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(entries: &[(&str, f64)]) -> Snapshot {
        entries
            .iter()
            .map(|(rel, mtime)| (EntryId::new("/base", *rel), *mtime))
            .collect()
    }

    #[test]
    fn self_diff_is_empty() {
        let a = snap(&[("x.txt", 1.0), ("sub/", 2.0), ("sub/y.log", 3.5)]);
        let diff = compare_snapshots(&a, &a);
        assert!(diff.is_empty());
        assert_eq!(diff.len(), 0);
    }

    #[test]
    fn single_timestamp_change_is_the_only_modification() {
        let old = snap(&[("x.txt", 1.0), ("y.txt", 2.0)]);
        let mut new = old.clone();
        new.insert(EntryId::new("/base", "y.txt"), 2.5);

        let diff = compare_snapshots(&old, &new);

        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(
            diff.modified.into_iter().collect::<Vec<_>>(),
            vec![EntryId::new("/base", "y.txt")]
        );
    }

    #[test]
    fn added_and_removed_are_detected() {
        let old = snap(&[("gone.txt", 1.0), ("kept.txt", 1.0)]);
        let new = snap(&[("kept.txt", 1.0), ("fresh.txt", 9.0)]);

        let diff = compare_snapshots(&old, &new);

        assert_eq!(
            diff.added.into_iter().collect::<Vec<_>>(),
            vec![EntryId::new("/base", "fresh.txt")]
        );
        assert_eq!(
            diff.removed.into_iter().collect::<Vec<_>>(),
            vec![EntryId::new("/base", "gone.txt")]
        );
        assert!(diff.modified.is_empty());
    }

    #[test]
    fn result_sets_are_pairwise_disjoint() {
        let old = snap(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let new = snap(&[("b", 2.5), ("c", 3.0), ("d", 4.0)]);

        let diff = compare_snapshots(&old, &new);

        assert!(diff.added.is_disjoint(&diff.removed));
        assert!(diff.added.is_disjoint(&diff.modified));
        assert!(diff.removed.is_disjoint(&diff.modified));
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn iteration_is_sorted_by_identity() {
        let old = Snapshot::new();
        let new = snap(&[("zeta", 1.0), ("alpha", 1.0), ("midway", 1.0)]);

        let diff = compare_snapshots(&old, &new);
        let order: Vec<String> = diff.added.iter().map(|id| id.rel.clone()).collect();

        assert_eq!(order, vec!["alpha", "midway", "zeta"]);
    }
}
