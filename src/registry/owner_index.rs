//! Owner-count index
//!
//! Derived data: the count stored for an owner must always equal the number of
//! records whose `owner` is that identity.

use std::collections::{BTreeMap, HashMap};

use crate::models::equipment::{EquipmentRecord, OwnerId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerIndex {
    counts: HashMap<OwnerId, i64>,
}

impl OwnerIndex {
    /// Rebuild the index from the records it summarizes
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EquipmentRecord>) -> Self {
        let mut counts = HashMap::new();
        for record in records {
            *counts.entry(record.owner.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Records currently held by `owner`; unknown owners hold zero
    pub fn count(&self, owner: &OwnerId) -> i64 {
        self.counts.get(owner).copied().unwrap_or(0)
    }

    /// Start staging counter changes against the current values
    pub fn stage(&self) -> StagedCounts<'_> {
        StagedCounts {
            index: self,
            staged: BTreeMap::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OwnerId, i64)> {
        self.counts.iter().map(|(owner, count)| (owner, *count))
    }

    pub(crate) fn set(&mut self, owner: OwnerId, count: i64) {
        self.counts.insert(owner, count);
    }

    /// Same counts, ignoring owners whose entry is zero
    pub fn agrees_with(&self, other: &OwnerIndex) -> bool {
        let nonzero = |index: &OwnerIndex| -> BTreeMap<OwnerId, i64> {
            index
                .iter()
                .filter(|(_, count)| *count != 0)
                .map(|(owner, count)| (owner.clone(), count))
                .collect()
        };
        nonzero(self) == nonzero(other)
    }
}

/// Pending counter values for one mutation.
///
/// Adjustments to the same owner accumulate, so a decrement followed by an
/// increment of one identity leaves its count where it started.
#[derive(Debug)]
pub struct StagedCounts<'a> {
    index: &'a OwnerIndex,
    staged: BTreeMap<OwnerId, i64>,
}

impl StagedCounts<'_> {
    pub fn increment(&mut self, owner: &OwnerId) {
        *self.entry(owner) += 1;
    }

    pub fn decrement(&mut self, owner: &OwnerId) {
        let count = self.entry(owner);
        debug_assert!(*count > 0, "owner index underflow");
        *count = (*count - 1).max(0);
    }

    /// Absolute post-mutation values of every touched owner
    pub fn into_counts(self) -> Vec<(OwnerId, i64)> {
        self.staged.into_iter().collect()
    }

    fn entry(&mut self, owner: &OwnerId) -> &mut i64 {
        let index = self.index;
        self.staged
            .entry(owner.clone())
            .or_insert_with(|| index.count(owner))
    }
}
