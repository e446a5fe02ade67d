use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::FieldError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Directory record as stored. The password hash never serializes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub provider: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            provider: self.provider,
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Public projection of a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub provider: bool,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub provider: bool,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut fields = Vec::new();

        if self.name.trim().is_empty() {
            fields.push(FieldError::new("name", "name is required"));
        }
        if !is_valid_email(&self.email) {
            fields.push(FieldError::new("email", "email must be a valid address"));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            fields.push(FieldError::new(
                "password",
                "password must be at least 6 characters",
            ));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(fields)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub old_password: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut fields = Vec::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                fields.push(FieldError::new("name", "name cannot be empty"));
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                fields.push(FieldError::new("email", "email must be a valid address"));
            }
        }
        if let Some(password) = &self.password {
            if password.len() < MIN_PASSWORD_LENGTH {
                fields.push(FieldError::new(
                    "password",
                    "password must be at least 6 characters",
                ));
            }
            if self.old_password.is_none() {
                fields.push(FieldError::new(
                    "old_password",
                    "old_password is required to change the password",
                ));
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(fields)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();

    email_regex.is_match(email) && email.len() <= 254
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("email is already in use")]
    EmailTaken,

    #[error("user not found")]
    NotFound,

    #[error("password does not match")]
    WrongPassword,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("database error: {0}")]
    Database(String),
}
