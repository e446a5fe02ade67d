use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AvailableQuery, ProviderError};
use crate::services::availability::AvailabilityService;
use crate::services::provider::ProviderService;

#[derive(Clone)]
pub struct ProviderCellState {
    pub providers: Arc<ProviderService>,
    pub availability: Arc<AvailabilityService>,
    pub config: Arc<AppConfig>,
}

pub async fn index(State(state): State<ProviderCellState>) -> Result<Json<Value>, AppError> {
    let providers = state
        .providers
        .list_providers()
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(providers)))
}

pub async fn available(
    State(state): State<ProviderCellState>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<AvailableQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = state
        .availability
        .day_slots(provider_id, query.date)
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(slots)))
}

fn map_provider_error(e: ProviderError) -> AppError {
    match e {
        ProviderError::NotFound => AppError::NotFound("provider not found".to_string()),
        ProviderError::Database(msg) => AppError::Database(msg),
    }
}
