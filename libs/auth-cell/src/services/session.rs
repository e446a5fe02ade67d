use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::jwt;
use user_cell::models::User;
use user_cell::services::password;

use crate::models::{AuthError, SessionRequest, SessionResponse};

pub struct SessionService {
    supabase: Arc<SupabaseClient>,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl SessionService {
    pub fn new(supabase: Arc<SupabaseClient>, config: &AppConfig) -> Self {
        Self {
            supabase,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    /// Authenticate an email/password pair and issue a session token.
    pub async fn login(&self, request: SessionRequest) -> Result<SessionResponse, AuthError> {
        debug!("Authenticating session for {}", request.email);

        let path = format!(
            "/rest/v1/users?email=eq.{}",
            urlencoding::encode(&request.email)
        );
        let result: Vec<User> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        let user = match result.into_iter().next() {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials),
        };

        let matches = password::verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let token = jwt::issue_token(user.id, &self.jwt_secret, self.token_ttl_hours)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        info!("Session issued for user {}", user.id);
        Ok(SessionResponse {
            user: user.to_response(),
            token,
        })
    }
}
