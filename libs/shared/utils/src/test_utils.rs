use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;

use crate::jwt;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_hours: 24,
            mail_api_url: self.mail_api_url.clone(),
            mail_api_key: self.mail_api_key.clone(),
            mail_sender: "Bookly <noreply@bookly.test>".to_string(),
            locale: "en_US".to_string(),
            schedule_opens_at: 8,
            schedule_closes_at: 20,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub provider: bool,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            provider: false,
        }
    }
}

impl TestUser {
    pub fn client(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            provider: false,
        }
    }

    pub fn provider(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            provider: true,
        }
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser { id: self.id }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        jwt::issue_token(user.id, secret, exp_hours.unwrap_or(24))
            .expect("test token issuance should succeed")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        jwt::issue_token(user.id, secret, -1).expect("test token issuance should succeed")
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        jwt::issue_token(user.id, "wrong-secret", 24).expect("test token issuance should succeed")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn user_row(user: &TestUser) -> serde_json::Value {
        json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$placeholder$placeholder",
            "provider": user.provider,
            "avatar_url": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn user_row_with_password_hash(user: &TestUser, password_hash: &str) -> serde_json::Value {
        let mut row = Self::user_row(user);
        row["password_hash"] = json!(password_hash);
        row
    }

    pub fn provider_summary_row(user: &TestUser) -> serde_json::Value {
        json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "avatar_url": null
        })
    }

    pub fn appointment_row(
        user_id: Uuid,
        provider_id: Uuid,
        date: DateTime<Utc>,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "user_id": user_id,
            "provider_id": provider_id,
            "date": date.to_rfc3339(),
            "canceled_at": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_with_provider_row(
        user_id: Uuid,
        provider: &TestUser,
        date: DateTime<Utc>,
    ) -> serde_json::Value {
        let mut row = Self::appointment_row(user_id, provider.id, date);
        row["provider"] = json!({
            "id": provider.id,
            "name": provider.name,
            "avatar_url": null
        });
        row
    }

    pub fn appointment_with_parties_row(
        client: &TestUser,
        provider: &TestUser,
        date: DateTime<Utc>,
    ) -> serde_json::Value {
        let mut row = Self::appointment_row(client.id, provider.id, date);
        row["provider"] = json!({
            "id": provider.id,
            "name": provider.name,
            "email": provider.email,
            "avatar_url": null
        });
        row["user"] = json!({
            "id": client.id,
            "name": client.name
        });
        row
    }

    pub fn notification_row(user_id: Uuid, content: &str, read: bool) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "user_id": user_id,
            "content": content,
            "read": read,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }
}
