use serde::{Deserialize, Serialize};

use shared_models::error::FieldError;
use user_cell::models::{is_valid_email, UserResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub email: String,
    pub password: String,
}

impl SessionRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut fields = Vec::new();

        if !is_valid_email(&self.email) {
            fields.push(FieldError::new("email", "email must be a valid address"));
        }
        if self.password.is_empty() {
            fields.push(FieldError::new("password", "password is required"));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(fields)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Unknown email and wrong password collapse into one message on purpose.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token issuance failed: {0}")]
    Token(String),

    #[error("database error: {0}")]
    Database(String),
}
