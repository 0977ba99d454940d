//! API handlers for the registry REST endpoints

pub mod equipment;
pub mod health;
pub mod openapi;
pub mod owners;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::{caller::CallerClaims, equipment::OwnerId}, AppState};

/// Extractor for the caller identity asserted by a bearer token
pub struct AuthenticatedCaller(pub OwnerId);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = CallerClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if claims.sub.is_empty() {
            return Err(AppError::Authentication("Token has no subject".to_string()));
        }

        Ok(AuthenticatedCaller(claims.caller()))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Equipment
        .route("/equipment", post(equipment::register_equipment))
        .route(
            "/equipment/:id",
            get(equipment::get_equipment).put(equipment::update_equipment),
        )
        .route("/equipment/:id/transfer", post(equipment::transfer_equipment))
        .route("/equipment/:id/service-date", put(equipment::update_service_date))
        // Owners
        .route("/owners/:owner/equipment-count", get(owners::get_equipment_count))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
