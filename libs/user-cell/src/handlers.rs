use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{CreateUserRequest, UpdateUserRequest, UserError};
use crate::services::user::UserService;

#[derive(Clone)]
pub struct UserCellState {
    pub users: Arc<UserService>,
    pub config: Arc<AppConfig>,
}

pub async fn store(
    State(state): State<UserCellState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    if let Err(fields) = request.validate() {
        return Err(AppError::FieldValidation(fields));
    }

    let user = state
        .users
        .create_user(request)
        .await
        .map_err(map_user_error)?;

    Ok(Json(json!(user.to_response())))
}

pub async fn update(
    State(state): State<UserCellState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    if let Err(fields) = request.validate() {
        return Err(AppError::FieldValidation(fields));
    }

    let user = state
        .users
        .update_user(auth.id, request)
        .await
        .map_err(map_user_error)?;

    Ok(Json(json!(user.to_response())))
}

fn map_user_error(e: UserError) -> AppError {
    match e {
        UserError::EmailTaken => AppError::BadRequest("email is already in use".to_string()),
        UserError::NotFound => AppError::NotFound("user not found".to_string()),
        UserError::WrongPassword => AppError::Auth("password does not match".to_string()),
        UserError::Hashing(msg) => AppError::Internal(msg),
        UserError::Database(msg) => AppError::Database(msg),
    }
}
