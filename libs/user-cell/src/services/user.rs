use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{DbError, SupabaseClient};

use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserError};
use crate::services::password;

pub struct UserService {
    supabase: Arc<SupabaseClient>,
}

impl UserService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserError> {
        debug!("Creating user for {}", request.email);

        if self.email_in_use(&request.email).await? {
            return Err(UserError::EmailTaken);
        }

        let password_hash = password::hash_password(&request.password)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let now = Utc::now();
        let user_data = json!({
            "name": request.name,
            "email": request.email,
            "password_hash": password_hash,
            "provider": request.provider,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
        });

        let result: Vec<User> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/users",
                Some(user_data),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| match e {
                // The unique constraint on users.email backstops the pre-check.
                DbError::Conflict(_) => UserError::EmailTaken,
                other => UserError::Database(other.to_string()),
            })?;

        let user = result
            .into_iter()
            .next()
            .ok_or_else(|| UserError::Database("user creation returned no record".to_string()))?;

        info!("User {} created", user.id);
        Ok(user)
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, UserError> {
        debug!("Updating user {}", user_id);

        let current = self.get_user(user_id).await?;

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(email) = request.email {
            if email != current.email && self.email_in_use(&email).await? {
                return Err(UserError::EmailTaken);
            }
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(avatar_url) = request.avatar_url {
            update_data.insert("avatar_url".to_string(), json!(avatar_url));
        }
        if let Some(new_password) = request.password {
            let old_password = request.old_password.as_deref().unwrap_or_default();
            let matches = password::verify_password(old_password, &current.password_hash)
                .map_err(|e| UserError::Hashing(e.to_string()))?;
            if !matches {
                return Err(UserError::WrongPassword);
            }

            let password_hash = password::hash_password(&new_password)
                .map_err(|e| UserError::Hashing(e.to_string()))?;
            update_data.insert("password_hash".to_string(), json!(password_hash));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/users?id=eq.{}", user_id);
        let result: Vec<User> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => UserError::EmailTaken,
                other => UserError::Database(other.to_string()),
            })?;

        result.into_iter().next().ok_or(UserError::NotFound)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, UserError> {
        let path = format!("/rest/v1/users?id=eq.{}", user_id);
        let result: Vec<User> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(UserError::NotFound)
    }

    async fn email_in_use(&self, email: &str) -> Result<bool, UserError> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&select=id",
            urlencoding::encode(email)
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        Ok(!existing.is_empty())
    }
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
