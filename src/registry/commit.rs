//! Planned registry changes and persisted registry state

use crate::models::equipment::{EquipmentRecord, OwnerId};

/// The complete effect of one mutation, computed before anything is written.
///
/// Values are absolute post-mutation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Touched record as it must look afterwards
    pub record: EquipmentRecord,
    /// The record is new; stores must refuse it if the id is already taken
    pub inserts_record: bool,
    /// Touched owner counters with their new values
    pub owner_counts: Vec<(OwnerId, i64)>,
    /// Id allocator value afterwards
    pub next_id: i64,
}

/// Everything a store holds for the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub records: Vec<EquipmentRecord>,
    pub owner_counts: Vec<(OwnerId, i64)>,
    pub next_id: i64,
}
