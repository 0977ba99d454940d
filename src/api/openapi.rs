//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, owners};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Equipment Registry API",
        version = "1.0.0",
        description = "Ownership and lifecycle registry for physical equipment"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::register_equipment,
        equipment::get_equipment,
        equipment::update_equipment,
        equipment::transfer_equipment,
        equipment::update_service_date,
        // Owners
        owners::get_equipment_count,
    ),
    components(
        schemas(
            crate::models::equipment::OwnerId,
            crate::models::equipment::EquipmentRecord,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::TransferOwnership,
            crate::models::equipment::UpdateServiceDate,
            crate::models::equipment::OwnerEquipmentCount,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Equipment registration and lifecycle"),
        (name = "owners", description = "Per-owner queries")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
