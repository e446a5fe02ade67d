use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::{AuthError, SessionRequest};
use crate::services::session::SessionService;

#[derive(Clone)]
pub struct SessionCellState {
    pub sessions: Arc<SessionService>,
    pub config: Arc<AppConfig>,
}

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

pub async fn store(
    State(state): State<SessionCellState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<Value>, AppError> {
    if let Err(fields) = request.validate() {
        return Err(AppError::FieldValidation(fields));
    }

    let session = state.sessions.login(request).await.map_err(|e| match e {
        AuthError::InvalidCredentials => AppError::Auth("invalid credentials".to_string()),
        AuthError::Token(msg) => AppError::Internal(msg),
        AuthError::Database(msg) => AppError::Database(msg),
    })?;

    Ok(Json(json!(session)))
}

pub async fn verify(
    State(state): State<SessionCellState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &state.config.jwt_secret) {
        Ok(user) => Ok(Json(TokenResponse {
            valid: true,
            user_id: Some(user.id),
        })),
        Err(_) => Ok(Json(TokenResponse {
            valid: false,
            user_id: None,
        })),
    }
}
