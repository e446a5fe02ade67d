use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::NotificationError;
use crate::services::notification::NotificationService;

#[derive(Clone)]
pub struct NotificationCellState {
    pub notifications: NotificationService,
    pub config: Arc<AppConfig>,
}

pub async fn index(
    State(state): State<NotificationCellState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let notifications = state
        .notifications
        .list_for_provider(auth.id)
        .await
        .map_err(map_notification_error)?;

    Ok(Json(json!(notifications)))
}

pub async fn update(
    State(state): State<NotificationCellState>,
    Path(notification_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let notification = state
        .notifications
        .mark_read(auth.id, notification_id)
        .await
        .map_err(map_notification_error)?;

    Ok(Json(json!(notification)))
}

fn map_notification_error(e: NotificationError) -> AppError {
    match e {
        NotificationError::NotFound => AppError::NotFound("notification not found".to_string()),
        NotificationError::NotProvider => {
            AppError::Auth("only providers can read notifications".to_string())
        }
        NotificationError::Forbidden => {
            AppError::Auth("notification belongs to another user".to_string())
        }
        NotificationError::Database(msg) => AppError::Database(msg),
    }
}
