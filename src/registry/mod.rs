//! Equipment registry state
//!
//! Holds the record store, the owner-count index and the id allocator, and
//! implements every state transition on them. Each mutation is planned first
//! (validation plus the full resulting state, see [`Commit`]) and applied
//! second, so callers can make a commit durable before it becomes visible.

pub mod commit;
pub mod owner_index;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::equipment::{EquipmentDetails, EquipmentRecord, OwnerId};

pub use commit::{Commit, LedgerSnapshot};
pub use owner_index::OwnerIndex;

/// Rejections raised by registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Equipment {id} not found")]
    NotFound { id: i64 },

    #[error("{caller} is not the owner of equipment {id}")]
    NotAuthorized { id: i64, caller: OwnerId },
}

#[derive(Debug, Clone)]
pub struct EquipmentRegistry {
    records: BTreeMap<i64, EquipmentRecord>,
    owners: OwnerIndex,
    next_id: i64,
}

impl Default for EquipmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentRegistry {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            owners: OwnerIndex::default(),
            next_id: 1,
        }
    }

    /// Rebuild a registry from persisted state.
    ///
    /// The owner index is recomputed from the records. Stored counters that
    /// disagree with it are returned with their corrected values, so the
    /// caller can write them back.
    pub fn restore(snapshot: LedgerSnapshot) -> (Self, Vec<(OwnerId, i64)>) {
        let records: BTreeMap<i64, EquipmentRecord> = snapshot
            .records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        let mut owners = OwnerIndex::from_records(records.values());

        let mut repairs = Vec::new();
        for (owner, stored) in &snapshot.owner_counts {
            let actual = owners.count(owner);
            if actual == 0 {
                // keep known owners visible with an explicit zero
                owners.set(owner.clone(), 0);
            }
            if *stored != actual {
                repairs.push((owner.clone(), actual));
            }
        }
        for (owner, actual) in owners.iter() {
            if !snapshot.owner_counts.iter().any(|(stored, _)| stored == owner) {
                repairs.push((owner.clone(), actual));
            }
        }
        repairs.sort();

        let after_last = records.keys().next_back().map_or(1, |id| id + 1);
        let next_id = snapshot.next_id.max(after_last);

        let registry = Self {
            records,
            owners,
            next_id,
        };
        (registry, repairs)
    }

    /// Full state, in the shape stores persist it
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut owner_counts: Vec<(OwnerId, i64)> = self
            .owners
            .iter()
            .map(|(owner, count)| (owner.clone(), count))
            .collect();
        owner_counts.sort();
        LedgerSnapshot {
            records: self.records.values().cloned().collect(),
            owner_counts,
            next_id: self.next_id,
        }
    }

    /// Identifier the next registration will receive
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Look up a record; unknown ids are simply absent
    pub fn get_details(&self, id: i64) -> Option<&EquipmentRecord> {
        self.records.get(&id)
    }

    /// Number of records currently owned by `owner`, zero if none
    pub fn owner_equipment_count(&self, owner: &OwnerId) -> i64 {
        self.owners.count(owner)
    }

    /// Ownership guard shared by every owner-gated operation
    pub fn require_owner(&self, caller: &OwnerId, id: i64) -> Result<&EquipmentRecord, RegistryError> {
        let record = self.records.get(&id).ok_or(RegistryError::NotFound { id })?;
        if &record.owner != caller {
            return Err(RegistryError::NotAuthorized {
                id,
                caller: caller.clone(),
            });
        }
        Ok(record)
    }

    pub fn plan_register(&self, caller: &OwnerId, details: EquipmentDetails) -> Commit {
        let record = EquipmentRecord {
            id: self.next_id,
            owner: caller.clone(),
            equipment_type: details.equipment_type,
            model: details.model,
            serial_number: details.serial_number,
            installation_date: details.installation_date,
            warranty_expiry: details.warranty_expiry,
            last_service_date: 0,
        };

        let mut counts = self.owners.stage();
        counts.increment(caller);

        Commit {
            record,
            inserts_record: true,
            owner_counts: counts.into_counts(),
            next_id: self.next_id + 1,
        }
    }

    pub fn plan_update_details(
        &self,
        caller: &OwnerId,
        id: i64,
        details: EquipmentDetails,
    ) -> Result<Commit, RegistryError> {
        let record = self.require_owner(caller, id)?.clone().with_details(details);
        Ok(self.commit_record(record))
    }

    pub fn plan_transfer(
        &self,
        caller: &OwnerId,
        id: i64,
        new_owner: OwnerId,
    ) -> Result<Commit, RegistryError> {
        let mut record = self.require_owner(caller, id)?.clone();

        let mut counts = self.owners.stage();
        counts.decrement(caller);
        counts.increment(&new_owner);
        record.owner = new_owner;

        Ok(Commit {
            record,
            inserts_record: false,
            owner_counts: counts.into_counts(),
            next_id: self.next_id,
        })
    }

    /// Not owner-gated: the service scheduler is authorized upstream
    pub fn plan_service_date(&self, id: i64, service_date: i64) -> Result<Commit, RegistryError> {
        let mut record = self
            .records
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound { id })?;
        record.last_service_date = service_date;
        Ok(self.commit_record(record))
    }

    /// Make a planned commit visible. Returns the touched record.
    pub fn apply(&mut self, commit: Commit) -> EquipmentRecord {
        for (owner, count) in commit.owner_counts {
            self.owners.set(owner, count);
        }
        self.next_id = commit.next_id;
        self.records.insert(commit.record.id, commit.record.clone());
        commit.record
    }

    pub fn register(&mut self, caller: &OwnerId, details: EquipmentDetails) -> i64 {
        let commit = self.plan_register(caller, details);
        self.apply(commit).id
    }

    pub fn update_details(
        &mut self,
        caller: &OwnerId,
        id: i64,
        details: EquipmentDetails,
    ) -> Result<(), RegistryError> {
        let commit = self.plan_update_details(caller, id, details)?;
        self.apply(commit);
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &OwnerId,
        id: i64,
        new_owner: OwnerId,
    ) -> Result<(), RegistryError> {
        let commit = self.plan_transfer(caller, id, new_owner)?;
        self.apply(commit);
        Ok(())
    }

    pub fn update_last_service_date(&mut self, id: i64, service_date: i64) -> Result<(), RegistryError> {
        let commit = self.plan_service_date(id, service_date)?;
        self.apply(commit);
        Ok(())
    }

    fn commit_record(&self, record: EquipmentRecord) -> Commit {
        Commit {
            record,
            inserts_record: false,
            owner_counts: Vec::new(),
            next_id: self.next_id,
        }
    }
}
