//! Equipment registry service
//!
//! Serializes every mutation behind one write lock and makes each commit
//! durable before it becomes visible to readers.

use std::sync::Arc;

use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{EquipmentDetails, EquipmentRecord, OwnerId},
    registry::{Commit, EquipmentRegistry, RegistryError},
    repository::LedgerStore,
};

#[derive(Clone)]
pub struct EquipmentService {
    registry: Arc<RwLock<EquipmentRegistry>>,
    store: Arc<dyn LedgerStore>,
}

impl EquipmentService {
    /// Load the registry from the store, writing back drifted owner counts
    pub async fn new(store: Arc<dyn LedgerStore>) -> AppResult<Self> {
        let snapshot = store.load().await?;
        let (registry, repairs) = EquipmentRegistry::restore(snapshot);
        if !repairs.is_empty() {
            tracing::warn!(
                "Stored owner counts disagree with equipment records, repairing {} owner(s)",
                repairs.len()
            );
            store.repair_counts(&repairs).await?;
        }
        tracing::info!("Registry loaded, next equipment id is {}", registry.next_id());
        Ok(Self {
            registry: Arc::new(RwLock::new(registry)),
            store,
        })
    }

    /// Register equipment owned by the caller
    pub async fn register(&self, caller: &OwnerId, details: EquipmentDetails) -> AppResult<EquipmentRecord> {
        let owner = caller.clone();
        let record = self
            .mutate(move |registry| Ok(registry.plan_register(&owner, details)))
            .await?;
        tracing::info!(equipment_id = record.id, owner = %caller, "Equipment registered");
        Ok(record)
    }

    /// Replace descriptive fields; owner only
    pub async fn update_details(
        &self,
        caller: &OwnerId,
        id: i64,
        details: EquipmentDetails,
    ) -> AppResult<EquipmentRecord> {
        let owner = caller.clone();
        let record = self
            .mutate(move |registry| registry.plan_update_details(&owner, id, details))
            .await?;
        tracing::info!(equipment_id = id, owner = %caller, "Equipment details updated");
        Ok(record)
    }

    /// Hand equipment to another principal; owner only
    pub async fn transfer_ownership(
        &self,
        caller: &OwnerId,
        id: i64,
        new_owner: OwnerId,
    ) -> AppResult<EquipmentRecord> {
        let owner = caller.clone();
        let record = self
            .mutate(move |registry| registry.plan_transfer(&owner, id, new_owner))
            .await?;
        tracing::info!(equipment_id = id, from = %caller, to = %record.owner, "Equipment ownership transferred");
        Ok(record)
    }

    /// Record a service date. Open to any caller.
    pub async fn update_last_service_date(&self, id: i64, service_date: i64) -> AppResult<EquipmentRecord> {
        let record = self
            .mutate(move |registry| registry.plan_service_date(id, service_date))
            .await?;
        tracing::info!(equipment_id = id, service_date, "Service date recorded");
        Ok(record)
    }

    pub async fn get_details(&self, id: i64) -> Option<EquipmentRecord> {
        self.registry.read().await.get_details(id).cloned()
    }

    pub async fn owner_equipment_count(&self, owner: &OwnerId) -> i64 {
        self.registry.read().await.owner_equipment_count(owner)
    }

    /// Check the backing store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Plan, persist, then apply, all under the write lock.
    ///
    /// Runs on its own task: once started it finishes even if the caller is
    /// dropped, so a durable commit is always applied in memory too.
    async fn mutate<F>(&self, plan: F) -> AppResult<EquipmentRecord>
    where
        F: FnOnce(&EquipmentRegistry) -> Result<Commit, RegistryError> + Send + 'static,
    {
        let registry = self.registry.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let registry = registry.write_owned().await;
            commit_and_apply(registry, store.as_ref(), plan).await
        })
        .await
        .map_err(|e| AppError::Internal(format!("Registry task failed: {}", e)))?
    }
}

async fn commit_and_apply<F>(
    mut registry: OwnedRwLockWriteGuard<EquipmentRegistry>,
    store: &dyn LedgerStore,
    plan: F,
) -> AppResult<EquipmentRecord>
where
    F: FnOnce(&EquipmentRegistry) -> Result<Commit, RegistryError>,
{
    let commit = plan(&registry).map_err(|e| {
        tracing::warn!("Rejected registry mutation: {}", e);
        e
    })?;
    store.commit(&commit).await?;
    Ok(registry.apply(commit))
}
