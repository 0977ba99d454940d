//! Business logic services

pub mod equipment;

use crate::{config::StorageConfig, error::AppResult, repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
}

impl Services {
    /// Open the configured store and load the registry from it
    pub async fn new(storage: &StorageConfig) -> AppResult<Self> {
        let store = repository::connect(storage).await?;
        Ok(Self {
            equipment: equipment::EquipmentService::new(store).await?,
        })
    }
}
