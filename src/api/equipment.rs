//! Equipment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::equipment::{EquipmentDetails, EquipmentRecord, TransferOwnership, UpdateServiceDate},
};

use super::AuthenticatedCaller;

/// Register equipment owned by the caller
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = EquipmentDetails,
    responses(
        (status = 201, description = "Equipment registered", body = EquipmentRecord),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(data): Json<EquipmentDetails>,
) -> AppResult<(StatusCode, Json<EquipmentRecord>)> {
    let equipment = state.services.equipment.register(&caller, data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Get equipment by ID
///
/// Unknown ids answer `null` rather than an error.
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details, or null when unknown", body = EquipmentRecord)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> Json<Option<EquipmentRecord>> {
    Json(state.services.equipment.get_details(id).await)
}

/// Update equipment details
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = EquipmentDetails,
    responses(
        (status = 200, description = "Equipment updated", body = EquipmentRecord),
        (status = 403, description = "Caller does not own the equipment", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<i64>,
    Json(data): Json<EquipmentDetails>,
) -> AppResult<Json<EquipmentRecord>> {
    let equipment = state.services.equipment.update_details(&caller, id, data).await?;
    Ok(Json(equipment))
}

/// Transfer equipment to another owner
#[utoipa::path(
    post,
    path = "/equipment/{id}/transfer",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = TransferOwnership,
    responses(
        (status = 200, description = "Ownership transferred", body = EquipmentRecord),
        (status = 403, description = "Caller does not own the equipment", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn transfer_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<i64>,
    Json(data): Json<TransferOwnership>,
) -> AppResult<Json<EquipmentRecord>> {
    let equipment = state
        .services
        .equipment
        .transfer_ownership(&caller, id, data.new_owner)
        .await?;
    Ok(Json(equipment))
}

/// Record the last service date
///
/// Open to any caller: the service scheduler is authorized in front of this API.
#[utoipa::path(
    put,
    path = "/equipment/{id}/service-date",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = UpdateServiceDate,
    responses(
        (status = 200, description = "Service date recorded", body = EquipmentRecord),
        (status = 404, description = "Unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_service_date(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateServiceDate>,
) -> AppResult<Json<EquipmentRecord>> {
    let equipment = state
        .services
        .equipment
        .update_last_service_date(id, data.service_date)
        .await?;
    Ok(Json(equipment))
}
