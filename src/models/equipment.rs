//! Equipment model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Identity of a principal that can own equipment
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Registered equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentRecord {
    /// Registry-assigned identifier, never reused
    pub id: i64,
    pub owner: OwnerId,
    pub equipment_type: String,
    pub model: String,
    pub serial_number: String,
    /// Unix timestamp
    pub installation_date: i64,
    /// Unix timestamp
    pub warranty_expiry: i64,
    /// Unix timestamp, 0 when never serviced
    pub last_service_date: i64,
}

impl EquipmentRecord {
    /// Replace the descriptive fields, keeping id, owner and service date
    pub(crate) fn with_details(mut self, details: EquipmentDetails) -> Self {
        self.equipment_type = details.equipment_type;
        self.model = details.model;
        self.serial_number = details.serial_number;
        self.installation_date = details.installation_date;
        self.warranty_expiry = details.warranty_expiry;
        self
    }
}

/// Owner-editable descriptive fields, used both to register and to update equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EquipmentDetails {
    pub equipment_type: String,
    pub model: String,
    pub serial_number: String,
    pub installation_date: i64,
    pub warranty_expiry: i64,
}

/// Transfer ownership request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferOwnership {
    pub new_owner: OwnerId,
}

/// Record service date request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateServiceDate {
    /// Unix timestamp
    pub service_date: i64,
}

/// Number of records held by an owner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerEquipmentCount {
    pub owner: OwnerId,
    pub count: i64,
}
