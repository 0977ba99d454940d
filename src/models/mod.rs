//! Data models for the equipment registry

pub mod caller;
pub mod equipment;

// Re-export commonly used types
pub use caller::CallerClaims;
pub use equipment::{EquipmentDetails, EquipmentRecord, OwnerId};
