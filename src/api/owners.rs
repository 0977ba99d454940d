//! Owner API endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::equipment::{OwnerEquipmentCount, OwnerId};

/// Number of equipment records held by an owner
#[utoipa::path(
    get,
    path = "/owners/{owner}/equipment-count",
    tag = "owners",
    params(("owner" = String, Path, description = "Owner identity")),
    responses(
        (status = 200, description = "Equipment count, zero for unknown owners", body = OwnerEquipmentCount)
    )
)]
pub async fn get_equipment_count(
    State(state): State<crate::AppState>,
    Path(owner): Path<String>,
) -> Json<OwnerEquipmentCount> {
    let owner = OwnerId::new(owner);
    let count = state.services.equipment.owner_equipment_count(&owner).await;
    Json(OwnerEquipmentCount { owner, count })
}
