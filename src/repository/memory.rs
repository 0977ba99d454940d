//! In-process store, for development and tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::LedgerStore;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{EquipmentRecord, OwnerId},
    registry::{Commit, LedgerSnapshot},
};

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<i64, EquipmentRecord>,
    owner_counts: BTreeMap<OwnerId, i64>,
    next_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing state
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        let state = MemoryState {
            records: snapshot
                .records
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
            owner_counts: snapshot.owner_counts.into_iter().collect(),
            next_id: snapshot.next_id,
        };
        Self {
            state: Mutex::new(state),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryRepository {
    async fn load(&self) -> AppResult<LedgerSnapshot> {
        let state = self.state.lock().await;
        Ok(LedgerSnapshot {
            records: state.records.values().cloned().collect(),
            owner_counts: state
                .owner_counts
                .iter()
                .map(|(owner, count)| (owner.clone(), *count))
                .collect(),
            next_id: state.next_id,
        })
    }

    async fn commit(&self, commit: &Commit) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let id = commit.record.id;
        if commit.inserts_record == state.records.contains_key(&id) {
            return Err(AppError::Internal(if commit.inserts_record {
                format!("Equipment {} is already stored", id)
            } else {
                format!("Equipment {} is not stored", id)
            }));
        }

        state.records.insert(id, commit.record.clone());
        for (owner, count) in &commit.owner_counts {
            state.owner_counts.insert(owner.clone(), *count);
        }
        state.next_id = commit.next_id;
        Ok(())
    }

    async fn repair_counts(&self, counts: &[(OwnerId, i64)]) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for (owner, count) in counts {
            state.owner_counts.insert(owner.clone(), *count);
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
